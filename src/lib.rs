pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::compiler::SingBoxCompiler;
pub use adapters::release::ReleaseClient;
pub use adapters::storage::LocalStorage;
pub use config::sources::SourceList;
pub use core::{etl::EtlEngine, pipeline::RulesetPipeline};
pub use utils::error::{EtlError, Result};
