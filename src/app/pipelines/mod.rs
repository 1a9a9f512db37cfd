pub mod ruleset_pipeline;
