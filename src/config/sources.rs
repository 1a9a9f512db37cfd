use crate::domain::model::RuleSource;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_url, Validate};
use regex::Regex;

/// 規則來源清單，來自 `name url` 純文本檔案
#[derive(Debug, Clone, Default)]
pub struct SourceList {
    pub sources: Vec<RuleSource>,
}

impl SourceList {
    /// 從檔案載入來源清單
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_str(&content))
    }

    /// 解析來源清單內容
    ///
    /// 每行取前兩個非空白欄位作為名稱與 URL，其餘內容忽略；
    /// 空行、`#` 註解行與格式不符的行直接跳過。
    pub fn from_str(content: &str) -> Self {
        let processed = Self::substitute_env_vars(content);
        let re = Regex::new(r"^(\S+)\s+(\S+)").unwrap();

        let mut sources = Vec::new();
        for line in processed.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(caps) = re.captures(line) {
                sources.push(RuleSource {
                    name: caps[1].to_string(),
                    url: caps[2].to_string(),
                });
            }
        }

        Self { sources }
    }

    /// 替換環境變數 (例如 ${MIRROR_HOST})，未設定的保留原樣
    fn substitute_env_vars(content: &str) -> String {
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }

    /// 以名稱查找來源（--source 模式用）
    pub fn find(&self, name: &str) -> Result<&RuleSource> {
        self.sources
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| EtlError::SourceNotFoundError {
                name: name.to_string(),
            })
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }
}

impl Validate for SourceList {
    fn validate(&self) -> Result<()> {
        for source in &self.sources {
            validate_non_empty_string("source.name", &source.name)?;
            // 名稱會成為輸出檔名
            if source.name.contains('/') || source.name.contains('\\') {
                return Err(EtlError::InvalidConfigValueError {
                    field: "source.name".to_string(),
                    value: source.name.clone(),
                    reason: "Source names are used as file names and cannot contain path separators"
                        .to_string(),
                });
            }
            validate_url("source.url", &source.url)?;
        }
        Ok(())
    }
}
