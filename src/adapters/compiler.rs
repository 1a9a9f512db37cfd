use crate::domain::model::CompileResult;
use crate::domain::ports::Compiler;
use crate::utils::error::{EtlError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// sing-box 外部編譯器，透過子行程執行 `rule-set compile`
#[derive(Debug, Clone)]
pub struct SingBoxCompiler {
    binary: PathBuf,
}

impl SingBoxCompiler {
    pub fn new(binary: PathBuf) -> Self {
        Self { binary }
    }
}

#[async_trait]
impl Compiler for SingBoxCompiler {
    async fn compile(&self, input: &Path, output: &Path) -> Result<CompileResult> {
        tracing::debug!(
            "🔧 Running compiler: {} rule-set compile {} -o {}",
            self.binary.display(),
            input.display(),
            output.display()
        );

        let result = Command::new(&self.binary)
            .arg("rule-set")
            .arg("compile")
            .arg(input)
            .arg("-o")
            .arg(output)
            .output()
            .await?;

        if !result.status.success() {
            return Err(EtlError::CompilerError {
                code: result.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }

        // 結束碼 0 不代表輸出檔一定存在
        match tokio::fs::metadata(output).await {
            Ok(metadata) => Ok(CompileResult {
                output_size: metadata.len(),
            }),
            Err(_) => Err(EtlError::CompilerOutputMissingError {
                path: output.display().to_string(),
            }),
        }
    }
}
