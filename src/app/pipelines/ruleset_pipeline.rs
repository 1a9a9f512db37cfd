use crate::domain::model::{ConversionResult, RuleSource, TransformResult};
use crate::domain::ports::{Compiler, ConfigProvider, Pipeline, Storage};
use crate::domain::services;
use crate::utils::error::Result;
use reqwest::Client;
use std::path::Path;
use std::time::Duration;

/// 單一來源的轉換管線：下載規則文本、過濾、輸出 JSON 並編譯成 SRS
pub struct RulesetPipeline<S: Storage, C: ConfigProvider, K: Compiler> {
    pub(crate) storage: S,
    pub(crate) config: C,
    pub(crate) compiler: K,
    pub(crate) client: Client,
}

impl<S: Storage, C: ConfigProvider, K: Compiler> RulesetPipeline<S, C, K> {
    pub fn new(storage: S, config: C, compiler: K) -> Self {
        Self {
            storage,
            config,
            compiler,
            client: Client::new(),
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider, K: Compiler> Pipeline for RulesetPipeline<S, C, K> {
    async fn extract(&self, source: &RuleSource) -> Result<String> {
        tracing::info!("📥 Downloading ruleset: {} ({})", source.name, source.url);

        let response = self
            .client
            .get(&source.url)
            .timeout(Duration::from_secs(self.config.timeout_secs()))
            .send()
            .await?
            .error_for_status()?;

        let text = response.text().await?;
        tracing::info!(
            "📥 Download completed. Size: {:.2} MB",
            text.len() as f64 / 1024.0 / 1024.0
        );

        Ok(text)
    }

    async fn transform(&self, source: &RuleSource, raw: String) -> Result<TransformResult> {
        let result = services::build_ruleset(&raw);

        tracing::info!(
            "📊 Processing completed for {}. Valid domains: {}",
            source.name,
            result.accepted
        );

        Ok(result)
    }

    async fn load(&self, source: &RuleSource, result: TransformResult) -> Result<ConversionResult> {
        let json_data = serde_json::to_string_pretty(&result.document)?;

        // storage 以 output_path 為根，路徑欄位則保留完整位置供編譯與回報使用
        let json_path = format!("{}/{}.json", self.config.output_path(), source.name);
        let srs_path = format!("{}/{}.srs", self.config.output_path(), source.name);

        self.storage
            .write_file(&format!("{}.json", source.name), json_data.as_bytes())
            .await?;
        tracing::info!("💾 JSON rule file saved: {}", json_path);

        tracing::info!("🔄 Converting {} to SRS format...", source.name);
        let compile_result = self
            .compiler
            .compile(Path::new(&json_path), Path::new(&srs_path))
            .await?;

        tracing::info!(
            "✅ Conversion successful! File size: {:.2} KB",
            compile_result.output_size as f64 / 1024.0
        );

        Ok(ConversionResult {
            source: source.name.clone(),
            rule_count: result.accepted,
            json_path,
            srs_path,
            srs_size: compile_result.output_size,
            duration: Duration::default(),
        })
    }
}
