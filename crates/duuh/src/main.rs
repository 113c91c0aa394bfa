//! duuh: docker unattended upgrade helper
//!
//! Checks a container image for pending distribution package upgrades and
//! optionally rebuilds it in place with the upgrades applied.
//!
//! Exit status: 0 when there is nothing to do or the image was rebuilt,
//! 2 when upgrades are pending and `--build` was not given, 1 on failure.

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use color_eyre::Result;
use duuh_core::{
    CheckOptions, Config, ContainerRuntime, Pipeline, RebuildDriver, SelfCheckBridge,
};
use duuh_exec::LocalExecutor;
use duuh_pkg::ManagerContext;
use tracing_subscriber::EnvFilter;

mod check;
mod cli;

use cli::Args;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    color_eyre::install()?;

    let args = match Args::try_parse_from(cli::normalize_flags(std::env::args_os())) {
        Ok(args) => args,
        Err(e) => {
            e.print()?;
            // Usage errors must not collide with the "upgrades pending" status
            return Ok(if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            });
        }
    };

    if args.check {
        let config = Config::default().with_env(|key| std::env::var(key).ok());
        init_tracing(&config.log_level, args.verbose)?;
        let secs = args.command_timeout.unwrap_or(config.command_timeout_secs);
        let executor = Arc::new(LocalExecutor::new().with_inherited_stderr());
        let ctx = ManagerContext::new(executor)
            .with_timeout((secs > 0).then(|| Duration::from_secs(secs)));
        check::run(ctx, &mut std::io::stdout().lock()).await?;
        return Ok(ExitCode::SUCCESS);
    }

    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::load_default()?,
    }
    .with_env(|key| std::env::var(key).ok());
    if let Some(runtime) = args.runtime.clone() {
        config.runtime = runtime;
    }
    if let Some(secs) = args.command_timeout {
        config.command_timeout_secs = secs;
    }
    init_tracing(&config.log_level, args.verbose)?;

    let Some(image) = args.image.as_deref() else {
        eyre::bail!("please provide an image");
    };

    let executor = Arc::new(LocalExecutor::new().with_inherited_stderr());
    let runtime = ContainerRuntime::new(executor, config.runtime.as_str())
        .with_timeout(config.command_timeout());
    let bridge = SelfCheckBridge::for_current_exe(runtime.clone(), config.mount_path.as_str())?
        .with_command_timeout(Some(config.command_timeout_secs));
    let driver = RebuildDriver::new(runtime.clone(), config.label_key.as_str());

    let options = CheckOptions {
        pull: args.pull,
        build: args.build,
        push: args.push,
    };
    let outcome = Pipeline::new(runtime, bridge, driver)
        .check_image(image, options)
        .await?;

    Ok(ExitCode::from(outcome.exit_code()))
}

/// Log to stderr; stdout is reserved for the check report
fn init_tracing(level: &str, verbose: u8) -> Result<()> {
    let directive = match verbose {
        0 => level,
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_new(directive)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| eyre::eyre!("failed to initialize logging: {e}"))?;
    Ok(())
}
