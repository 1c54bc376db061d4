use anyhow::Context;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use secret_santa::utils::error::ErrorSeverity;
use secret_santa::utils::{logger, validation::Validate};
use secret_santa::{CliConfig, ExchangeEngine, SantaConfig, Transport};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("🎅 Starting secret-santa");
    tracing::info!("📁 Loading configuration from: {}", cli.config);

    let mut config = SantaConfig::from_file(&cli.config)
        .with_context(|| format!("failed to load config file '{}'", cli.config))?;
    cli.apply_overrides(&mut config);

    tracing::debug!("Transport config: {:?}", config.transport);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!(
        "✅ Configuration loaded: {} participants, transport {:?}",
        config.participants.len(),
        config.transport.kind
    );

    let mut rng = match config.seed() {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let transport = Transport::from_config(&config.transport)?;
    let solver_options = config.solver_options();
    let engine = ExchangeEngine::new(config.participants, config.message, transport)
        .with_solver_options(solver_options);

    let result = if cli.dry_run {
        tracing::info!("🔍 DRY RUN MODE - no messages will be sent");
        engine.draw(&mut rng).map(|assignment| {
            let lengths: Vec<usize> = assignment.cycles().iter().map(Vec::len).collect();
            println!("✅ A valid assignment exists for {} participants", assignment.len());
            println!("🔁 Gift cycle lengths: {:?}", lengths);
        })
    } else {
        engine.run(&mut rng).await.map(|report| {
            println!("✅ Notified {} of {} participants", report.delivered, report.participants);
            println!("🔁 Gift cycle lengths: {:?}", report.cycle_lengths);
        })
    };

    if let Err(e) = result {
        tracing::error!(
            "❌ Secret Santa failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}
