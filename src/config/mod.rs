pub mod sources;

#[cfg(feature = "cli")]
use crate::domain::ports::ConfigProvider;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{validate_path, validate_positive_number, Validate};
#[cfg(feature = "cli")]
use clap::Parser;

/// CLI 設定
#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "srs-etl")]
#[command(about = "Convert plaintext domain lists into sing-box binary rule-sets")]
pub struct CliConfig {
    /// Path to the rule sources file
    #[arg(long, default_value = "rules/sources.txt")]
    pub sources: String,

    /// Directory for generated .json and .srs files
    #[arg(long, default_value = "./build")]
    pub output_path: String,

    /// Convert only the named source instead of the whole list
    #[arg(long)]
    pub source: Option<String>,

    /// Use this sing-box binary instead of downloading one
    #[arg(long)]
    pub compiler: Option<String>,

    /// Directory for the downloaded sing-box binary
    #[arg(long, default_value = "./tools")]
    pub tools_path: String,

    /// Per-source download timeout in seconds
    #[arg(long, default_value = "60")]
    pub timeout_secs: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Enable system monitoring
    #[arg(long)]
    pub monitor: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("sources", &self.sources)?;
        validate_path("output_path", &self.output_path)?;
        validate_path("tools_path", &self.tools_path)?;
        if let Some(compiler) = &self.compiler {
            validate_path("compiler", compiler)?;
        }
        validate_positive_number("timeout_secs", self.timeout_secs as usize, 1)?;
        Ok(())
    }
}
