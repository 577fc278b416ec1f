//! Integration tests for sprout-cli.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A `sprout` command isolated from the user's config files and env.
fn sprout(workdir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("sprout").unwrap();
    cmd.current_dir(workdir)
        .env("HOME", workdir)
        .env("XDG_CONFIG_HOME", workdir.join(".config"))
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn help_flag() {
    let dir = TempDir::new().unwrap();
    sprout(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Strapi"))
        .stdout(predicate::str::contains("new"));
}

#[test]
fn version_flag() {
    let dir = TempDir::new().unwrap();
    sprout(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn new_without_install_creates_project() {
    let dir = TempDir::new().unwrap();
    sprout(dir.path())
        .args(["new", "my-blog", "--no-install"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Your application was created at"))
        .stdout(predicate::str::contains("npm run develop"))
        .stdout(predicate::str::contains("npm install"));

    let root = dir.path().join("my-blog");
    assert!(root.join("package.json").is_file());
    assert!(root.join("config/database.js").is_file());
    assert!(root.join("config/server.js").is_file());
    assert!(root.join(".gitignore").is_file());
    assert!(root.join("node_modules").is_dir());
    assert!(!root.join("optic.yml").exists());

    let manifest: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(root.join("package.json")).unwrap()).unwrap();
    assert_eq!(manifest["name"], "my-blog");
    assert_eq!(manifest["dependencies"]["strapi"], "3.6.8");
    assert_eq!(manifest["dependencies"]["strapi-connector-bookshelf"], "3.6.8");
    assert_eq!(manifest["dependencies"]["sqlite3"], "latest");
}

#[test]
fn apidocs_writes_optic_config() {
    let dir = TempDir::new().unwrap();
    sprout(dir.path())
        .args(["new", "docs-app", "--no-install", "--apidocs", "--use-yarn"])
        .assert()
        .success()
        .stdout(predicate::str::contains("yarn monitor"));

    let optic = fs::read_to_string(dir.path().join("docs-app/optic.yml")).unwrap();
    assert!(optic.contains("docs-app"));
}

#[test]
fn postgres_connection_lands_in_database_config() {
    let dir = TempDir::new().unwrap();
    sprout(dir.path())
        .args([
            "new",
            "api",
            "--no-install",
            "--dbclient",
            "pg",
            "--dbhost",
            "db.internal",
            "--dbname",
            "cms",
        ])
        .assert()
        .success();

    let db = fs::read_to_string(dir.path().join("api/config/database.js")).unwrap();
    assert!(db.contains("postgres"));
    assert!(db.contains("db.internal"));
    assert!(db.contains("5432"));
}

#[test]
fn dry_run_prints_manifest_and_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let out = sprout(dir.path())
        .args([
            "--output-format",
            "json",
            "new",
            "preview",
            "--dry-run",
            "--dependency",
            "strapi-plugin-graphql@3.6.8",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let manifest: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(manifest["name"], "preview");
    assert_eq!(manifest["dependencies"]["strapi-plugin-graphql"], "3.6.8");
    assert!(!dir.path().join("preview").exists());
}

#[test]
fn json_summary_after_create() {
    let dir = TempDir::new().unwrap();
    let out = sprout(dir.path())
        .args(["--output-format", "json", "new", "quiet-app", "--no-install"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let summary: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(summary["install"], "skipped");
    assert_eq!(summary["packageManager"], "npm");
    assert!(summary["retryCommand"].is_null());
}

#[cfg(unix)]
#[test]
fn failed_install_keeps_project_and_exits_zero() {
    let dir = TempDir::new().unwrap();
    let empty_path = dir.path().join("no-bin");
    fs::create_dir(&empty_path).unwrap();

    sprout(dir.path())
        .env("PATH", &empty_path)
        .args(["new", "offline"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Error while installing dependencies"))
        .stdout(predicate::str::contains("Keep trying!"))
        .stdout(predicate::str::contains("npm install"));

    assert!(dir.path().join("offline/package.json").is_file());
}

#[cfg(unix)]
#[test]
fn quiet_failed_install_still_prints_retry_command() {
    let dir = TempDir::new().unwrap();
    let empty_path = dir.path().join("no-bin");
    fs::create_dir(&empty_path).unwrap();

    sprout(dir.path())
        .env("PATH", &empty_path)
        .args(["-q", "new", "offline"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Keep trying!").not())
        .stdout(predicate::str::contains("offline && npm install"));
}

#[test]
fn no_color_env_accepts_any_value() {
    for value in ["1", "true", "yes-please"] {
        let dir = TempDir::new().unwrap();
        sprout(dir.path())
            .env("NO_COLOR", value)
            .args(["new", "plain", "--no-install"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\u{1b}[").not());
        assert!(dir.path().join("plain/package.json").is_file());
    }
}

#[test]
fn config_env_override_is_visible() {
    let dir = TempDir::new().unwrap();
    sprout(dir.path())
        .env("SPROUT__DEFAULTS__PACKAGE_MANAGER", "yarn")
        .args(["config", "get", "defaults.package_manager"])
        .assert()
        .success()
        .stdout(predicate::str::diff("yarn\n"));
}

#[test]
fn local_config_file_is_read() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(".sprout.toml"),
        "[defaults]\nstrapi_version = \"3.6.7\"\n",
    )
    .unwrap();

    sprout(dir.path())
        .args(["config", "get", "defaults.strapi_version"])
        .assert()
        .success()
        .stdout(predicate::str::contains("3.6.7"));
}

#[test]
fn config_list_and_path() {
    let dir = TempDir::new().unwrap();
    sprout(dir.path())
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("strapi_version"));

    sprout(dir.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn init_local_writes_config_once() {
    let dir = TempDir::new().unwrap();
    sprout(dir.path())
        .args(["init", "--local"])
        .assert()
        .success();
    let written = fs::read_to_string(dir.path().join(".sprout.toml")).unwrap();
    assert!(written.contains("[defaults]"));

    fs::write(dir.path().join(".sprout.toml"), "# mine\n").unwrap();
    sprout(dir.path())
        .args(["init", "--local"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--force"));
    assert_eq!(
        fs::read_to_string(dir.path().join(".sprout.toml")).unwrap(),
        "# mine\n"
    );
}

#[test]
fn completions_for_bash() {
    let dir = TempDir::new().unwrap();
    sprout(dir.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("sprout"));
}
