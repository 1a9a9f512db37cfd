use httpmock::prelude::*;
use srs_etl::domain::model::{RuleSetDocument, RuleSource};
use srs_etl::utils::validation::Validate;
use srs_etl::{
    CliConfig, EtlEngine, EtlError, LocalStorage, RulesetPipeline, SingBoxCompiler, SourceList,
};
use tempfile::TempDir;

#[cfg(unix)]
fn write_fake_compiler(dir: &std::path::Path, body: &str) -> std::path::PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("fake-sing-box");
    std::fs::write(&path, body).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn config_for(output_dir: &TempDir, tools_dir: &TempDir) -> CliConfig {
    CliConfig {
        sources: "rules/sources.txt".to_string(),
        output_path: output_dir.path().to_string_lossy().to_string(),
        source: None,
        compiler: None,
        tools_path: tools_dir.path().to_string_lossy().to_string(),
        timeout_secs: 10,
        verbose: false,
        monitor: false,
    }
}

#[cfg(unix)]
#[tokio::test]
async fn test_end_to_end_conversion_with_real_http() {
    let server = MockServer::start();
    let output_dir = TempDir::new().unwrap();
    let tools_dir = TempDir::new().unwrap();

    let ads_mock = server.mock(|when, then| {
        when.method(GET).path("/ads.txt");
        then.status(200)
            .body("# ad servers\nads.example.org\ntracker.example.net\n1.2.3.4\n");
    });
    let malware_mock = server.mock(|when, then| {
        when.method(GET).path("/malware.txt");
        then.status(200).body("bad.example.com\n");
    });

    let sources = vec![
        RuleSource {
            name: "ads".to_string(),
            url: server.url("/ads.txt"),
        },
        RuleSource {
            name: "malware".to_string(),
            url: server.url("/malware.txt"),
        },
    ];

    let config = config_for(&output_dir, &tools_dir);
    // The fake compiler copies its input to the output location
    let compiler_path = write_fake_compiler(tools_dir.path(), "#!/bin/sh\ncp \"$3\" \"$5\"\n");

    let storage = LocalStorage::new(config.output_path.clone());
    let compiler = SingBoxCompiler::new(compiler_path);
    let pipeline = RulesetPipeline::new(storage, config, compiler);
    let engine = EtlEngine::new(pipeline);

    let summary = engine.run(&sources).await;

    ads_mock.assert();
    malware_mock.assert();
    assert!(summary.is_success());
    assert_eq!(summary.completed.len(), 2);

    let json_path = output_dir.path().join("ads.json");
    let srs_path = output_dir.path().join("ads.srs");
    assert!(json_path.exists());
    assert!(srs_path.exists());

    // IP lines are dropped, comments skipped, order preserved
    let json_text = std::fs::read_to_string(&json_path).unwrap();
    assert!(json_text.starts_with("{\n  \"version\": 1,\n  \"rules\": ["));
    let document: RuleSetDocument = serde_json::from_str(&json_text).unwrap();
    assert_eq!(document.version, 1);
    assert_eq!(document.rules.len(), 2);
    assert_eq!(document.rules[0].domain, vec!["ads.example.org"]);
    assert_eq!(document.rules[1].domain, vec!["tracker.example.net"]);

    let ads_result = summary
        .completed
        .iter()
        .find(|r| r.source == "ads")
        .unwrap();
    assert_eq!(ads_result.rule_count, 2);
    assert_eq!(
        ads_result.srs_size,
        std::fs::metadata(&srs_path).unwrap().len()
    );
}

#[cfg(unix)]
#[tokio::test]
async fn test_failing_source_does_not_stop_the_run() {
    let server = MockServer::start();
    let output_dir = TempDir::new().unwrap();
    let tools_dir = TempDir::new().unwrap();

    server.mock(|when, then| {
        when.method(GET).path("/broken.txt");
        then.status(500);
    });
    server.mock(|when, then| {
        when.method(GET).path("/good.txt");
        then.status(200).body("good.example.com\n");
    });

    let sources = vec![
        RuleSource {
            name: "broken".to_string(),
            url: server.url("/broken.txt"),
        },
        RuleSource {
            name: "good".to_string(),
            url: server.url("/good.txt"),
        },
    ];

    let config = config_for(&output_dir, &tools_dir);
    let compiler_path = write_fake_compiler(tools_dir.path(), "#!/bin/sh\ncp \"$3\" \"$5\"\n");

    let storage = LocalStorage::new(config.output_path.clone());
    let compiler = SingBoxCompiler::new(compiler_path);
    let pipeline = RulesetPipeline::new(storage, config, compiler);
    let engine = EtlEngine::new(pipeline);

    let summary = engine.run(&sources).await;

    assert!(!summary.is_success());
    assert_eq!(summary.failed.len(), 1);
    assert_eq!(summary.failed[0].source, "broken");
    assert_eq!(summary.completed.len(), 1);
    assert!(output_dir.path().join("good.json").exists());
    assert!(output_dir.path().join("good.srs").exists());
    assert!(!output_dir.path().join("broken.json").exists());
}

#[cfg(unix)]
#[tokio::test]
async fn test_compiler_failure_is_reported() {
    let server = MockServer::start();
    let output_dir = TempDir::new().unwrap();
    let tools_dir = TempDir::new().unwrap();

    server.mock(|when, then| {
        when.method(GET).path("/rules.txt");
        then.status(200).body("example.com\n");
    });

    let sources = vec![RuleSource {
        name: "rules".to_string(),
        url: server.url("/rules.txt"),
    }];

    let config = config_for(&output_dir, &tools_dir);
    let compiler_path =
        write_fake_compiler(tools_dir.path(), "#!/bin/sh\necho 'compile failed' >&2\nexit 1\n");

    let storage = LocalStorage::new(config.output_path.clone());
    let compiler = SingBoxCompiler::new(compiler_path);
    let pipeline = RulesetPipeline::new(storage, config, compiler);
    let engine = EtlEngine::new(pipeline);

    let summary = engine.run(&sources).await;

    assert!(!summary.is_success());
    assert_eq!(summary.failed.len(), 1);
    assert!(matches!(
        summary.failed[0].error,
        EtlError::CompilerError { .. }
    ));
    // The JSON intermediate is still written before compilation fails
    assert!(output_dir.path().join("rules.json").exists());
}

#[tokio::test]
async fn test_sources_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sources.txt");
    std::fs::write(
        &path,
        "# rule sources\n\
         anti-ad https://anti-ad.net/domains.txt\n\
         \n\
         peter-lowe https://pgl.yoyo.org/adservers/serverlist.php?hostformat=nohtml\n",
    )
    .unwrap();

    let list = SourceList::from_file(path.to_str().unwrap()).unwrap();

    assert_eq!(list.len(), 2);
    assert!(list.validate().is_ok());
    let source = list.find("peter-lowe").unwrap();
    assert_eq!(
        source.url,
        "https://pgl.yoyo.org/adservers/serverlist.php?hostformat=nohtml"
    );
}

#[cfg(unix)]
#[tokio::test]
async fn test_end_to_end_with_monitoring() {
    let server = MockServer::start();
    let output_dir = TempDir::new().unwrap();
    let tools_dir = TempDir::new().unwrap();

    server.mock(|when, then| {
        when.method(GET).path("/rules.txt");
        then.status(200).body("example.com\n");
    });

    let sources = vec![RuleSource {
        name: "rules".to_string(),
        url: server.url("/rules.txt"),
    }];

    let config = config_for(&output_dir, &tools_dir);
    let compiler_path = write_fake_compiler(tools_dir.path(), "#!/bin/sh\ncp \"$3\" \"$5\"\n");

    let storage = LocalStorage::new(config.output_path.clone());
    let compiler = SingBoxCompiler::new(compiler_path);
    let pipeline = RulesetPipeline::new(storage, config, compiler);
    let engine = EtlEngine::new_with_monitoring(pipeline, true);

    let summary = engine.run(&sources).await;

    assert!(summary.is_success());
    assert_eq!(summary.completed.len(), 1);
    assert!(output_dir.path().join("rules.srs").exists());
}
