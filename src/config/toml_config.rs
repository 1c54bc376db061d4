use crate::core::message::MessageTemplate;
use crate::core::solver::SolverOptions;
use crate::domain::model::Participant;
use crate::utils::error::{Result, SantaError};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SantaConfig {
    pub participants: Vec<Participant>,
    #[serde(default)]
    pub message: MessageTemplate,
    pub transport: TransportConfig,
    pub solver: Option<SolverConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// POST each message as JSON to a mail relay.
    Http,
    /// Write each message to a file under `output_dir`.
    Outbox,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct TransportConfig {
    pub kind: TransportKind,
    pub from: Option<String>,
    pub endpoint: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub output_dir: Option<String>,
}

// 密碼不得出現在日誌中
impl fmt::Debug for TransportConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportConfig")
            .field("kind", &self.kind)
            .field("from", &self.from)
            .field("endpoint", &self.endpoint)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("timeout_seconds", &self.timeout_seconds)
            .field("output_dir", &self.output_dir)
            .finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SolverConfig {
    pub seed: Option<u64>,
    pub max_nodes: Option<u64>,
}

impl SantaConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SantaError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| SantaError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SMTP_PASSWORD})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| SantaError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn seed(&self) -> Option<u64> {
        self.solver.as_ref().and_then(|s| s.seed)
    }

    pub fn solver_options(&self) -> SolverOptions {
        SolverOptions {
            max_nodes: self.solver.as_ref().and_then(|s| s.max_nodes),
        }
    }

    pub fn identities(&self) -> Vec<&str> {
        self.participants.iter().map(|p| p.email.as_str()).collect()
    }

    pub fn validate_config(&self) -> Result<()> {
        if self.participants.len() < 2 {
            return Err(SantaError::InvalidConfigValueError {
                field: "participants".to_string(),
                value: self.participants.len().to_string(),
                reason: "At least two participants are required".to_string(),
            });
        }

        for (i, p) in self.participants.iter().enumerate() {
            validation::validate_non_empty_string(&format!("participants[{}].name", i), &p.name)?;
            validation::validate_email(&format!("participants[{}].email", i), &p.email)?;
        }

        validation::validate_unique("participants.email", self.identities())?;

        let known: HashSet<&str> = self.identities().into_iter().collect();
        for (i, p) in self.participants.iter().enumerate() {
            if let Some(unknown) = p.exclusions.iter().find(|e| !known.contains(e.as_str())) {
                return Err(SantaError::InvalidConfigValueError {
                    field: format!("participants[{}].exclusions", i),
                    value: unknown.clone(),
                    reason: "Exclusion does not name a participant".to_string(),
                });
            }
        }

        self.message.validate_placeholders()?;
        self.transport.validate()?;

        if let Some(max_nodes) = self.solver.as_ref().and_then(|s| s.max_nodes) {
            validation::validate_positive_number("solver.max_nodes", max_nodes, 1)?;
        }

        Ok(())
    }
}

impl TransportConfig {
    pub fn validate(&self) -> Result<()> {
        match self.kind {
            TransportKind::Http => {
                let endpoint =
                    validation::validate_required_field("transport.endpoint", &self.endpoint)?;
                validation::validate_url("transport.endpoint", endpoint)?;
                let from = validation::validate_required_field("transport.from", &self.from)?;
                validation::validate_email("transport.from", from)?;

                for (field, value) in [
                    ("transport.username", &self.username),
                    ("transport.password", &self.password),
                ] {
                    if value.as_deref().is_some_and(|v| v.contains("${")) {
                        return Err(SantaError::MissingConfigError {
                            field: format!("{} (environment variable not set)", field),
                        });
                    }
                }
                if let Some(timeout) = self.timeout_seconds {
                    validation::validate_positive_number("transport.timeout_seconds", timeout, 1)?;
                }
            }
            TransportKind::Outbox => {
                let dir =
                    validation::validate_required_field("transport.output_dir", &self.output_dir)?;
                validation::validate_path("transport.output_dir", dir)?;
            }
        }
        Ok(())
    }
}

impl Validate for SantaConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
