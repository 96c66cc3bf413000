use reprint_printer::PartialOptions;
use std::path::PathBuf;

pub const DEFAULT_CONFIG_NAME: &str = "reprint.config.json";

/// Reprint configuration file format
///
/// The file holds printer options by their camelCase names; unknown
/// names are an error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub options: PartialOptions,
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_json(&content)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    pub fn from_json(content: &str) -> anyhow::Result<Self> {
        let options = PartialOptions::from_json_str(content)
            .map_err(|e| anyhow::anyhow!("{}: {}", DEFAULT_CONFIG_NAME, e))?;
        Ok(Self { options })
    }
}
