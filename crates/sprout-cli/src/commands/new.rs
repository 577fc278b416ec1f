//! Implementation of the `sprout new` command.
//!
//! Responsibility: translate CLI arguments into a `ProvisionRequest`, wire
//! the adapters, call the core `ProjectCreator`, and display results. No
//! business logic lives here.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info, instrument};

use sprout_adapters::{
    LocalFilesystem, TokioProcessRunner, TracingDiagnostics, TracingReporter, resolve_assets,
};
use sprout_core::{
    application::{
        Installer, ProjectCreated, ProjectCreator, Provisioner, ports::LifecycleReporter,
    },
    domain::{
        DatabaseClient, InstallFailure, InstallOutcome, PackageManager, ProvisionRequest,
        render_manifest,
    },
    error::SproutError,
};

use crate::{
    cli::{NewArgs, OutputFormat},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::{OutputManager, Spinner, SpinnerReporter},
};

/// Sqlite database file used when `--dbfilename` is absent.
const DEFAULT_SQLITE_FILE: &str = ".tmp/data.db";
const DEFAULT_DB_HOST: &str = "127.0.0.1";
const DEFAULT_DB_NAME: &str = "strapi";

/// Execute the `sprout new` command.
///
/// Dispatch sequence:
/// 1. Resolve the target path and refuse a non-empty directory
/// 2. Build the `ProvisionRequest` from flags over config defaults
/// 3. Early-exit with the manifest if `--dry-run`
/// 4. Provision and install via `ProjectCreator`
/// 5. Print the outcome and next steps
#[instrument(skip_all, fields(path = %args.path.display()))]
pub async fn execute(args: NewArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    // 1. Resolve project path
    let root = resolve_root(&args.path)?;
    ensure_target_available(&root)?;

    // 2. Build request
    let request = build_request(&args, &config, root)?;
    debug!(
        name = %request.name(),
        client = %request.client(),
        package_manager = %request.package_manager(),
        docs = request.docs(),
        "Request resolved"
    );

    // 3. Dry run: show the manifest but do not write.
    if args.dry_run {
        let manifest = render_manifest(&request).map_err(SproutError::from)?;
        output.info(&format!(
            "Dry run: would create '{}' at {}",
            request.name(),
            request.root_path().display()
        ))?;
        output.data(manifest.trim_end())?;
        return Ok(());
    }

    // 4. Wire adapters and create. The spinner only appears once the
    // install starts.
    let spinner = output.spinner("Installing dependencies:");
    let creator = build_creator(&config, &spinner)?;

    output.header(&format!(
        "Creating a new Strapi application at {}.",
        request.root_path().display()
    ))?;
    info!(root = %request.root_path().display(), "Create started");

    let created = match creator.create(&request, &spinner).await {
        Ok(created) => created,
        Err(e) => {
            spinner.abandon();
            return Err(e.into());
        }
    };

    // 5. Outcome
    match &created.install {
        InstallOutcome::Installed => spinner.finish("done"),
        InstallOutcome::Skipped | InstallOutcome::Failed(_) => spinner.abandon(),
    }

    if output.format() == OutputFormat::Json {
        output.data(&summary_json(&created).to_string())?;
        return Ok(());
    }

    match &created.install {
        InstallOutcome::Installed => output.success("Dependencies installed successfully.")?,
        InstallOutcome::Skipped => output.info("Skipped dependency installation.")?,
        InstallOutcome::Failed(failure) => show_install_failure(failure, &output)?,
    }

    show_next_steps(&created, &output)?;
    Ok(())
}

// ── Path resolution ───────────────────────────────────────────────────────────

/// Make `path` absolute against the current directory.
fn resolve_root(path: &Path) -> CliResult<PathBuf> {
    if path.as_os_str().is_empty() {
        return Err(CliError::InvalidInput {
            message: "project path cannot be empty".into(),
            source: None,
        });
    }
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().with_cli_context(|| "Failed to read current directory")?;
    Ok(cwd.join(path))
}

/// A missing or empty directory is fine; anything else is refused.
fn ensure_target_available(root: &Path) -> CliResult<()> {
    if !root.exists() {
        return Ok(());
    }
    if !root.is_dir() {
        return Err(CliError::ProjectExists {
            path: root.to_path_buf(),
        });
    }
    let mut entries = std::fs::read_dir(root)
        .with_cli_context(|| format!("Failed to read '{}'", root.display()))?;
    if entries.next().is_some() {
        return Err(CliError::ProjectExists {
            path: root.to_path_buf(),
        });
    }
    Ok(())
}

// ── Request construction ──────────────────────────────────────────────────────

fn build_request(args: &NewArgs, config: &AppConfig, root: PathBuf) -> CliResult<ProvisionRequest> {
    let name = match &args.name {
        Some(name) => name.clone(),
        None => root
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .ok_or_else(|| CliError::InvalidInput {
                message: format!("cannot derive a name from '{}'; pass --name", root.display()),
                source: None,
            })?,
    };

    let client = match args.dbclient {
        Some(client) => client.into(),
        None => DatabaseClient::from_str(&config.defaults.dbclient).map_err(SproutError::from)?,
    };
    let package_manager = resolve_package_manager(args, config)?;

    let mut pinned = config.defaults.dependencies.clone();
    pinned.push(client.connector_package());

    let mut builder = ProvisionRequest::builder()
        .root_path(root)
        .name(name)
        .client(client)
        .pinned_dependencies(pinned)
        .pinned_version(
            args.strapi_version
                .clone()
                .unwrap_or_else(|| config.defaults.strapi_version.clone()),
        )
        .package_manager(package_manager)
        .docs(args.apidocs)
        .skip_install(args.no_install);

    if let Some(driver) = client.driver_package() {
        builder = builder.additional_dependency(driver, "latest");
    }
    // User-supplied dependencies win over the driver default.
    for (name, version) in &args.dependencies {
        builder = builder.additional_dependency(name.as_str(), version.as_str());
    }
    for (key, value) in connection_params(args, client) {
        builder = builder.connection_param(key, value);
    }

    Ok(builder.build().map_err(SproutError::from)?)
}

fn resolve_package_manager(args: &NewArgs, config: &AppConfig) -> CliResult<PackageManager> {
    if args.use_yarn {
        return Ok(PackageManager::Yarn);
    }
    if args.use_npm {
        return Ok(PackageManager::Npm);
    }
    Ok(PackageManager::from_str(&config.defaults.package_manager).map_err(SproutError::from)?)
}

fn connection_params(args: &NewArgs, client: DatabaseClient) -> Vec<(&'static str, serde_json::Value)> {
    if client.is_file_based() {
        let filename = args.dbfilename.as_deref().unwrap_or(DEFAULT_SQLITE_FILE);
        return vec![("filename", json!(filename))];
    }

    let mut params = vec![
        ("host", json!(args.dbhost.as_deref().unwrap_or(DEFAULT_DB_HOST))),
        ("port", json!(args.dbport.unwrap_or_else(|| default_port(client)))),
        ("database", json!(args.dbname.as_deref().unwrap_or(DEFAULT_DB_NAME))),
    ];
    if let Some(username) = &args.dbusername {
        params.push(("username", json!(username)));
    }
    if let Some(password) = &args.dbpassword {
        params.push(("password", json!(password)));
    }
    if args.dbssl {
        params.push(("ssl", json!(true)));
    }
    params
}

fn default_port(client: DatabaseClient) -> u16 {
    match client {
        DatabaseClient::Postgres => 5432,
        DatabaseClient::Mysql => 3306,
        DatabaseClient::Mongo => 27017,
        DatabaseClient::Sqlite => 0,
    }
}

// ── Wiring ────────────────────────────────────────────────────────────────────

fn build_creator(config: &AppConfig, spinner: &Spinner) -> CliResult<ProjectCreator> {
    let assets = resolve_assets(config.resources.dir.as_deref())?;
    let reporter: Arc<dyn LifecycleReporter> =
        Arc::new(SpinnerReporter::new(TracingReporter, spinner.clone()));

    let provisioner = Provisioner::new(Arc::new(LocalFilesystem::new()), reporter.clone(), assets);
    let installer = Installer::new(
        Arc::new(TokioProcessRunner::new()),
        reporter.clone(),
        Arc::new(TracingDiagnostics),
    )
    .with_timeout(config.install.timeout());

    Ok(ProjectCreator::new(provisioner, installer, reporter))
}

// ── Display ───────────────────────────────────────────────────────────────────

fn show_install_failure(failure: &InstallFailure, output: &OutputManager) -> CliResult<()> {
    output.error("Error while installing dependencies:")?;
    if !failure.stderr.trim().is_empty() {
        eprintln!("{}", failure.stderr.trim_end());
    }
    output.print("")?;
    output.warning("Keep trying!")?;
    output.print("")?;
    // The retry command is the one line quiet mode must not swallow.
    let guidance = failure.guidance();
    if let Some((retry, explanation)) = guidance.split_last() {
        for line in explanation {
            output.print(line)?;
        }
        output.data(retry)?;
    }
    output.print("")?;
    Ok(())
}

fn show_next_steps(created: &ProjectCreated, output: &OutputManager) -> CliResult<()> {
    output.print("")?;
    output.success(&format!(
        "Your application was created at {}.",
        created.root.display()
    ))?;
    output.print("")?;
    output.print("Available commands in your project:")?;
    output.print("")?;
    for (command, description) in created.available_commands() {
        output.command(&command, description)?;
    }

    output.print("You can start by doing:")?;
    output.print("")?;
    output.print(&format!("  cd {}", created.root.display()))?;
    if created.install == InstallOutcome::Skipped {
        output.print(&format!("  {} install", created.package_manager))?;
    }
    output.print(&format!(
        "  {} develop",
        created.package_manager.run_prefix()
    ))?;
    output.print("")?;
    Ok(())
}

fn summary_json(created: &ProjectCreated) -> serde_json::Value {
    let (status, retry) = match &created.install {
        InstallOutcome::Installed => ("installed", None),
        InstallOutcome::Skipped => ("skipped", None),
        InstallOutcome::Failed(failure) => ("failed", Some(failure.retry_command())),
    };
    json!({
        "root": created.root,
        "packageManager": created.package_manager.as_str(),
        "install": status,
        "retryCommand": retry,
        "commands": created
            .available_commands()
            .into_iter()
            .map(|(command, _)| command)
            .collect::<Vec<_>>(),
    })
}

// ── tests ─────────────────────────────────────────────────────────────────────
