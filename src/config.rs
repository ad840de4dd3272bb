use crate::error::{LedgerError, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

/// Names of the tools served by the MCP layer
pub const RECORD_THOUGHT: &str = "record_thought";
pub const SUMMARIZE_THOUGHTS: &str = "summarize_thoughts";
pub const CLEAR_THOUGHTS: &str = "clear_thoughts";
pub const TOOL_NAMES: [&str; 3] = [RECORD_THOUGHT, SUMMARIZE_THOUGHTS, CLEAR_THOUGHTS];

/// thought-ledger service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    pub server: ServerConfig,
    pub validation: ValidationConfig,
    pub display: DisplayConfig,
    pub tools: ToolsConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server name reported to MCP clients
    pub name: String,
    /// Server version reported to MCP clients
    pub version: String,
}

/// Limits applied to incoming thoughts
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Maximum thought length in characters, unlimited when unset
    #[serde(default)]
    pub max_thought_length: Option<usize>,
}

/// Console rendering of recorded thoughts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Write the bordered block for each record to stderr
    pub enabled: bool,
    /// Use ANSI colours in that block
    pub color: bool,
}

/// Which tools the server answers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Allowed tool names; every tool is served when unset
    pub allowed: Option<Vec<String>>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "thought-ledger".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            color: true,
        }
    }
}

impl ToolsConfig {
    pub fn is_allowed(&self, tool: &str) -> bool {
        match &self.allowed {
            Some(allowed) => allowed.iter().any(|name| name == tool),
            None => true,
        }
    }
}

impl LedgerConfig {
    /// Load configuration from defaults, an optional TOML file and the environment
    pub fn load() -> Result<Self> {
        let config_file = std::env::var("THOUGHT_LEDGER_CONFIG")
            .unwrap_or_else(|_| "thought-ledger.toml".to_string());
        Self::load_from(&config_file)
    }

    /// Same as [`LedgerConfig::load`] with an explicit file path
    pub fn load_from(config_file: &str) -> Result<Self> {
        let defaults = LedgerConfig::default();

        let config = Config::builder()
            .set_default("server.name", defaults.server.name)?
            .set_default("server.version", defaults.server.version)?
            .set_default("display.enabled", defaults.display.enabled)?
            .set_default("display.color", defaults.display.color)?
            .add_source(File::with_name(config_file).required(false))
            .add_source(
                Environment::with_prefix("THOUGHT_LEDGER")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("tools.allowed")
                    .try_parsing(true),
            )
            .build()?;

        let loaded: LedgerConfig = config.try_deserialize()?;
        tracing::debug!("Loaded configuration: {:?}", loaded);
        Ok(loaded)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.validation.max_thought_length == Some(0) {
            return Err(LedgerError::InvalidConfig(
                "validation.max_thought_length must be greater than 0 when set".to_string(),
            ));
        }

        if let Some(allowed) = &self.tools.allowed {
            if let Some(unknown) = allowed.iter().find(|name| !TOOL_NAMES.contains(&name.as_str())) {
                return Err(LedgerError::InvalidConfig(format!("Unknown tool in tools.allowed: {}", unknown)));
            }
        }

        Ok(())
    }
}
