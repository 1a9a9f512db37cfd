use clap::Parser;
use srs_etl::utils::{logger, validation::Validate};
use srs_etl::{
    CliConfig, EtlEngine, LocalStorage, ReleaseClient, RulesetPipeline, SingBoxCompiler,
    SourceList,
};
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("🚀 Starting srs-etl");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    // 載入規則來源
    tracing::info!("📁 Loading rule sources from: {}", config.sources);
    let source_list = match SourceList::from_file(&config.sources) {
        Ok(list) => list,
        Err(e) => {
            tracing::error!("❌ Failed to load sources file: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    if let Err(e) = source_list.validate() {
        tracing::error!("❌ Sources validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 建議: {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    // --source 模式只轉換指定來源
    let sources = match &config.source {
        Some(name) => match source_list.find(name) {
            Ok(source) => vec![source.clone()],
            Err(e) => {
                tracing::error!("❌ {}", e);
                eprintln!("❌ {}", e.user_friendly_message());
                eprintln!("💡 建議: {}", e.recovery_suggestion());
                std::process::exit(1);
            }
        },
        None => source_list.sources.clone(),
    };

    if sources.is_empty() {
        tracing::warn!("⚠️ No rule sources configured, nothing to do");
        println!("⚠️ No rule sources configured, nothing to do");
        return Ok(());
    }
    tracing::info!("📋 {} rule source(s) to convert", sources.len());

    // 取得 sing-box 編譯器
    let compiler_path = match resolve_compiler(&config).await {
        Ok(path) => path,
        Err(e) => {
            tracing::error!(
                "❌ Failed to prepare sing-box compiler: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    let monitor_enabled = config.monitor;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    // 創建存儲和管道
    let storage = LocalStorage::new(config.output_path.clone());
    let compiler = SingBoxCompiler::new(compiler_path);
    let pipeline = RulesetPipeline::new(storage, config, compiler);

    // 創建ETL引擎並運行
    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);
    let summary = engine.run(&sources).await;

    tracing::info!(
        "📊 Conversion summary: {} succeeded, {} failed",
        summary.completed.len(),
        summary.failed.len()
    );
    println!(
        "📊 Conversion summary: {} succeeded, {} failed",
        summary.completed.len(),
        summary.failed.len()
    );
    for result in &summary.completed {
        println!(
            "  ✅ {} -> {} ({} rules, {:.2} KB, {:?})",
            result.source,
            result.srs_path,
            result.rule_count,
            result.srs_size as f64 / 1024.0,
            result.duration
        );
    }
    for failure in &summary.failed {
        println!(
            "  ❌ {}: {}",
            failure.source,
            failure.error.user_friendly_message()
        );
    }

    if summary.is_success() {
        tracing::info!("✅ All tasks completed!");
        println!("✅ All tasks completed!");
    } else {
        tracing::error!("❌ {} source(s) failed to convert", summary.failed.len());
        eprintln!("❌ {} source(s) failed to convert", summary.failed.len());
        std::process::exit(1);
    }

    Ok(())
}

/// 取得 sing-box 可執行檔：--compiler 指定時直接使用，否則下載最新 release
async fn resolve_compiler(config: &CliConfig) -> srs_etl::Result<PathBuf> {
    match &config.compiler {
        Some(compiler) => {
            let path = PathBuf::from(compiler);
            if !path.exists() {
                return Err(srs_etl::EtlError::InvalidConfigValueError {
                    field: "compiler".to_string(),
                    value: compiler.clone(),
                    reason: "File does not exist".to_string(),
                });
            }
            tracing::info!("🔧 Using compiler binary: {}", path.display());
            Ok(path)
        }
        None => {
            ReleaseClient::new()?
                .ensure_compiler(&config.tools_path)
                .await
        }
    }
}
