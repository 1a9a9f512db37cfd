use crate::domain::model::{ConversionResult, RuleSource, RunSummary, SourceFailure};
use crate::domain::ports::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;
use std::time::Instant;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: Option<SystemMonitor>,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self {
            pipeline,
            monitor: None,
        }
    }

    pub fn new_with_monitoring(pipeline: P, enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: enabled.then(|| SystemMonitor::new(true)),
        }
    }

    /// 依序處理每個來源，單一來源失敗不中斷整體流程
    pub async fn run(&self, sources: &[RuleSource]) -> RunSummary {
        let mut summary = RunSummary::default();

        if let Some(monitor) = &self.monitor {
            monitor.log_stats("Conversion run started");
        }

        for source in sources {
            let start_time = Instant::now();
            tracing::info!("🚀 Starting conversion for: {}", source.name);

            match self.process_source(source).await {
                Ok(mut result) => {
                    result.duration = start_time.elapsed();
                    tracing::info!(
                        "✅ Source converted: {} (rules: {}, duration: {:?})",
                        result.source,
                        result.rule_count,
                        result.duration
                    );
                    summary.completed.push(result);
                }
                Err(e) => {
                    tracing::error!(
                        "❌ Task failed for {}: {} (Category: {:?}, Severity: {:?})",
                        source.name,
                        e,
                        e.category(),
                        e.severity()
                    );
                    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
                    summary.failed.push(SourceFailure {
                        source: source.name.clone(),
                        error: e,
                    });
                }
            }
        }

        if let Some(monitor) = &self.monitor {
            monitor.log_stats("Conversion run completed");
            monitor.log_final_stats();
        }

        summary
    }

    async fn process_source(&self, source: &RuleSource) -> Result<ConversionResult> {
        let raw = self.pipeline.extract(source).await?;
        tracing::debug!("📥 Extracted {} bytes", raw.len());

        let transformed = self.pipeline.transform(source, raw).await?;
        tracing::debug!("🔄 Transformed into {} rules", transformed.accepted);

        let result = self.pipeline.load(source, transformed).await?;
        tracing::debug!("💾 Loaded output to: {}", result.srs_path);

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::TransformResult;
    use crate::domain::services;
    use crate::utils::error::EtlError;

    struct MockPipeline {
        fail_on: Option<String>,
    }

    #[async_trait::async_trait]
    impl Pipeline for MockPipeline {
        async fn extract(&self, source: &RuleSource) -> Result<String> {
            if self.fail_on.as_deref() == Some(source.name.as_str()) {
                return Err(EtlError::DownloadError {
                    message: format!("GET {} returned 500 Internal Server Error", source.url),
                });
            }
            Ok("example.com\n".to_string())
        }

        async fn transform(&self, _source: &RuleSource, raw: String) -> Result<TransformResult> {
            Ok(services::build_ruleset(&raw))
        }

        async fn load(
            &self,
            source: &RuleSource,
            result: TransformResult,
        ) -> Result<ConversionResult> {
            Ok(ConversionResult {
                source: source.name.clone(),
                rule_count: result.accepted,
                json_path: format!("out/{}.json", source.name),
                srs_path: format!("out/{}.srs", source.name),
                srs_size: 64,
                duration: std::time::Duration::default(),
            })
        }
    }

    fn sources(names: &[&str]) -> Vec<RuleSource> {
        names
            .iter()
            .map(|name| RuleSource {
                name: name.to_string(),
                url: format!("https://example.com/{}.txt", name),
            })
            .collect()
    }

    #[tokio::test]
    async fn test_run_converts_all_sources() {
        let engine = EtlEngine::new(MockPipeline { fail_on: None });

        let summary = engine.run(&sources(&["anti-ad", "peter-lowe"])).await;

        assert!(summary.is_success());
        assert_eq!(summary.completed.len(), 2);
        assert_eq!(summary.completed[0].source, "anti-ad");
        assert_eq!(summary.completed[0].rule_count, 1);
    }

    #[tokio::test]
    async fn test_run_continues_after_source_failure() {
        let engine = EtlEngine::new(MockPipeline {
            fail_on: Some("b".to_string()),
        });

        let summary = engine.run(&sources(&["a", "b", "c"])).await;

        assert!(!summary.is_success());
        assert_eq!(summary.completed.len(), 2);
        assert_eq!(summary.failed.len(), 1);
        assert_eq!(summary.failed[0].source, "b");
        assert_eq!(summary.total(), 3);
    }

    #[tokio::test]
    async fn test_run_with_no_sources_is_success() {
        let engine = EtlEngine::new(MockPipeline { fail_on: None });

        let summary = engine.run(&[]).await;

        assert!(summary.is_success());
        assert_eq!(summary.total(), 0);
    }
}
