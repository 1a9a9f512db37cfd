pub mod etl;
pub mod pipeline;

pub use crate::domain::model::{
    CompileResult, ConversionResult, DomainRule, RuleSetDocument, RuleSource, RunSummary,
    SourceFailure, TransformResult,
};
pub use crate::domain::ports::{Compiler, ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
