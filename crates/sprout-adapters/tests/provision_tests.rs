//! End-to-end provisioning against the real and in-memory filesystems.

use std::path::Path;
use std::sync::Arc;

use serde_json::Value;
use sprout_adapters::{
    LocalFilesystem, MemoryFilesystem, RecordingDiagnostics, RecordingReporter, ScriptedRunner,
    bundled_assets,
};
use sprout_core::{
    application::{ApplicationError, AssetSource, ProvisionStep},
    error::SproutError,
    prelude::*,
};
use tempfile::TempDir;

fn request(root: &Path) -> ProvisionRequestBuilder {
    ProvisionRequest::builder()
        .root_path(root)
        .name("My Blog")
        .pinned_dependencies(["strapi", "strapi-admin"])
        .pinned_version("3.6.8")
        .connection_param("filename", ".tmp/data.db")
}

fn creator(
    filesystem: Arc<dyn Filesystem>,
    assets: AssetSource,
    runner: ScriptedRunner,
    reporter: RecordingReporter,
    diagnostics: RecordingDiagnostics,
) -> ProjectCreator {
    let reporter: Arc<dyn LifecycleReporter> = Arc::new(reporter);
    ProjectCreator::new(
        Provisioner::new(filesystem, reporter.clone(), assets),
        Installer::new(Arc::new(runner), reporter.clone(), Arc::new(diagnostics)),
        reporter,
    )
}

fn memory_assets(fs: &MemoryFilesystem) -> AssetSource {
    fs.seed_file("/assets/files/config/server.js", "module.exports = {};\n");
    fs.seed_file("/assets/files/README.md", "# app\n");
    fs.seed_file("/assets/dot-files/gitignore", "node_modules\n");
    fs.seed_file("/assets/dot-files/editorconfig", "root = true\n");
    AssetSource::from_root("/assets")
}

#[tokio::test]
async fn provisions_bundled_skeleton_on_disk() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("my-blog");
    let runner = ScriptedRunner::new();
    let reporter = RecordingReporter::new();

    let created = creator(
        Arc::new(LocalFilesystem::new()),
        bundled_assets().unwrap(),
        runner.clone(),
        reporter.clone(),
        RecordingDiagnostics::new(),
    )
    .create(&request(&root).build().unwrap(), &NoProgress)
    .await
    .unwrap();

    assert_eq!(created.install, InstallOutcome::Installed);
    assert!(root.join("config/server.js").is_file());
    assert!(root.join(".gitignore").is_file());
    assert!(root.join(".editorconfig").is_file());
    assert!(!root.join("gitignore").exists());
    assert!(root.join("node_modules").is_dir());
    assert!(root.join("config/database.js").is_file());
    assert!(!root.join("optic.yml").exists());

    let manifest: Value =
        serde_json::from_str(&std::fs::read_to_string(root.join("package.json")).unwrap())
            .unwrap();
    assert_eq!(manifest["name"], "my-blog");
    assert_eq!(manifest["dependencies"]["strapi-admin"], "3.6.8");

    let calls = runner.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].program, "npm");
    assert_eq!(calls[0].cwd, root);

    assert_eq!(
        reporter.names(),
        vec![
            "filesCopied",
            "packageManifestWritten",
            "configFilesWritten",
            "installStarting",
            "installSucceeded",
            "operationCompleted",
        ]
    );
}

#[tokio::test]
async fn docs_failure_rolls_back_whole_project() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("my-blog");
    // A directory where optic.yml should go makes the write fail.
    std::fs::create_dir_all(root.join("optic.yml")).unwrap();
    let runner = ScriptedRunner::new();

    let err = creator(
        Arc::new(LocalFilesystem::new()),
        bundled_assets().unwrap(),
        runner.clone(),
        RecordingReporter::new(),
        RecordingDiagnostics::new(),
    )
    .create(&request(&root).docs(true).build().unwrap(), &NoProgress)
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        SproutError::Application(ApplicationError::DocsConfigFailed { .. })
    ));
    assert!(!root.exists());
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn docs_enabled_writes_optic_config() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("my-blog");

    creator(
        Arc::new(LocalFilesystem::new()),
        bundled_assets().unwrap(),
        ScriptedRunner::new(),
        RecordingReporter::new(),
        RecordingDiagnostics::new(),
    )
    .create(
        &request(&root).docs(true).skip_install(true).build().unwrap(),
        &NoProgress,
    )
    .await
    .unwrap();

    let optic = std::fs::read_to_string(root.join("optic.yml")).unwrap();
    assert!(optic.starts_with("name: my-blog\n"));
}

#[tokio::test]
async fn manifest_failure_removes_target() {
    let fs = MemoryFilesystem::new();
    let assets = memory_assets(&fs);
    fs.fail_on("/out/blog/package.json");
    let reporter = RecordingReporter::new();

    let err = creator(
        Arc::new(fs.clone()),
        assets,
        ScriptedRunner::new(),
        reporter.clone(),
        RecordingDiagnostics::new(),
    )
    .create(
        &request(Path::new("/out/blog")).build().unwrap(),
        &NoProgress,
    )
    .await
    .unwrap_err();

    match err {
        SproutError::Application(e) => {
            assert_eq!(e.failed_step(), Some(ProvisionStep::WriteManifest))
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!fs.contains(Path::new("/out/blog")));
    assert_eq!(reporter.names(), vec!["filesCopied"]);
}

#[tokio::test]
async fn hidden_file_failure_removes_target_before_any_event() {
    let fs = MemoryFilesystem::new();
    let assets = memory_assets(&fs);
    fs.fail_on("/out/blog/.gitignore");
    let reporter = RecordingReporter::new();
    let runner = ScriptedRunner::new();

    let err = creator(
        Arc::new(fs.clone()),
        assets,
        runner.clone(),
        reporter.clone(),
        RecordingDiagnostics::new(),
    )
    .create(
        &request(Path::new("/out/blog")).build().unwrap(),
        &NoProgress,
    )
    .await
    .unwrap_err();

    assert_eq!(err.failed_step(), Some(ProvisionStep::CopyHiddenFiles));
    assert!(!fs.contains(Path::new("/out/blog")));
    assert!(reporter.names().is_empty());
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn failed_rollback_is_reported_with_original_cause() {
    let fs = MemoryFilesystem::new();
    let assets = memory_assets(&fs);
    fs.fail_on("/out/blog/config/database.js");
    fs.fail_removal_of("/out/blog");

    let err = creator(
        Arc::new(fs),
        assets,
        ScriptedRunner::new(),
        RecordingReporter::new(),
        RecordingDiagnostics::new(),
    )
    .create(
        &request(Path::new("/out/blog")).build().unwrap(),
        &NoProgress,
    )
    .await
    .unwrap_err();

    match err {
        SproutError::Application(e @ ApplicationError::RollbackFailed { .. }) => {
            assert_eq!(e.failed_step(), Some(ProvisionStep::WriteDatabaseConfig))
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn hidden_files_get_dot_prefix() {
    let fs = MemoryFilesystem::new();
    let assets = memory_assets(&fs);

    creator(
        Arc::new(fs.clone()),
        assets,
        ScriptedRunner::new(),
        RecordingReporter::new(),
        RecordingDiagnostics::new(),
    )
    .create(
        &request(Path::new("/out/blog"))
            .skip_install(true)
            .build()
            .unwrap(),
        &NoProgress,
    )
    .await
    .unwrap();

    assert_eq!(
        fs.read_file(Path::new("/out/blog/.gitignore")).as_deref(),
        Some("node_modules\n")
    );
    assert!(fs.read_file(Path::new("/out/blog/.editorconfig")).is_some());
    assert!(fs.read_file(Path::new("/out/blog/gitignore")).is_none());
}

#[tokio::test]
async fn install_failure_keeps_project_and_captures_stderr() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("my-blog");
    let reporter = RecordingReporter::new();
    let diagnostics = RecordingDiagnostics::new();

    let created = creator(
        Arc::new(LocalFilesystem::new()),
        bundled_assets().unwrap(),
        ScriptedRunner::new().exit_with(1, "network timeout"),
        reporter.clone(),
        diagnostics.clone(),
    )
    .create(
        &request(&root).use_alternate_package_manager(true).build().unwrap(),
        &NoProgress,
    )
    .await
    .unwrap();

    let failure = created.install.failure().expect("install failed");
    assert_eq!(
        failure.retry_command(),
        format!("cd {} && yarn install", root.display())
    );
    assert!(root.join("package.json").is_file());

    let captured = diagnostics.captured();
    assert_eq!(captured.len(), 1);
    assert_eq!(captured[0].1.stderr, "network timeout");
    assert!(reporter.names().contains(&"installFailed"));
    assert_eq!(reporter.names().last(), Some(&"operationCompleted"));
}

#[tokio::test]
async fn skip_install_runs_nothing() {
    let fs = MemoryFilesystem::new();
    let assets = memory_assets(&fs);
    let runner = ScriptedRunner::new();
    let reporter = RecordingReporter::new();

    let created = creator(
        Arc::new(fs),
        assets,
        runner.clone(),
        reporter.clone(),
        RecordingDiagnostics::new(),
    )
    .create(
        &request(Path::new("/out/blog"))
            .skip_install(true)
            .build()
            .unwrap(),
        &NoProgress,
    )
    .await
    .unwrap();

    assert_eq!(created.install, InstallOutcome::Skipped);
    assert!(runner.calls().is_empty());
    assert!(!reporter.names().contains(&"installStarting"));
}
