pub mod toml_config;

pub use toml_config::{SantaConfig, SolverConfig, TransportConfig, TransportKind};

#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "secret-santa")]
#[command(about = "Draw a Secret Santa assignment and notify every participant")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "santa.toml")]
    pub config: String,

    /// Fixed random seed, overrides [solver].seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Draw and verify the assignment without sending anything
    #[arg(long)]
    pub dry_run: bool,

    /// Emit JSON log lines instead of the compact format
    #[arg(long)]
    pub json_logs: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 命令列設定覆蓋檔案設定
    pub fn apply_overrides(&self, config: &mut SantaConfig) {
        if let Some(seed) = self.seed {
            config.solver.get_or_insert_with(SolverConfig::default).seed = Some(seed);
            tracing::info!("🔧 Seed overridden to: {}", seed);
        }
    }
}
