use crate::domain::model::{CompileResult, ConversionResult, RuleSource, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::Path;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn output_path(&self) -> &str;
    fn timeout_secs(&self) -> u64;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self, source: &RuleSource) -> Result<String>;
    async fn transform(&self, source: &RuleSource, raw: String) -> Result<TransformResult>;
    async fn load(&self, source: &RuleSource, result: TransformResult)
        -> Result<ConversionResult>;
}

#[async_trait]
pub trait Compiler: Send + Sync {
    async fn compile(&self, input: &Path, output: &Path) -> Result<CompileResult>;
}
