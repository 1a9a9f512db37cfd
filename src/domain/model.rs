use crate::utils::error::EtlError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// sing-box 規則集 schema 版本
pub const RULESET_VERSION: u32 = 1;

/// 規則來源（sources 檔案中的一行）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSource {
    pub name: String,
    pub url: String,
}

/// 單條規則：每個條目只承載一個字面域名
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainRule {
    pub domain: Vec<String>,
}

/// sing-box 規則集 JSON 文件結構
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSetDocument {
    pub version: u32,
    pub rules: Vec<DomainRule>,
}

impl RuleSetDocument {
    pub fn new(rules: Vec<DomainRule>) -> Self {
        Self {
            version: RULESET_VERSION,
            rules,
        }
    }
}

/// 過濾階段的輸出
#[derive(Debug, Clone)]
pub struct TransformResult {
    pub document: RuleSetDocument,
    pub accepted: usize,
}

/// 編譯器執行結果，輸出檔案已確認存在
#[derive(Debug, Clone)]
pub struct CompileResult {
    pub output_size: u64,
}

/// 單一來源的轉換結果
#[derive(Debug, Clone)]
pub struct ConversionResult {
    pub source: String,
    pub rule_count: usize,
    pub json_path: String,
    pub srs_path: String,
    pub srs_size: u64,
    pub duration: Duration,
}

/// 單一來源的失敗記錄
#[derive(Debug)]
pub struct SourceFailure {
    pub source: String,
    pub error: EtlError,
}

/// 整次執行的摘要
#[derive(Debug, Default)]
pub struct RunSummary {
    pub completed: Vec<ConversionResult>,
    pub failed: Vec<SourceFailure>,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn total(&self) -> usize {
        self.completed.len() + self.failed.len()
    }
}
