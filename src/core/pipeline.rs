pub use crate::app::pipelines::ruleset_pipeline::RulesetPipeline;
