use crate::{
    common::{constants::PRODUCT, error::Result},
    opts::{
        validators::{validate_chart_dir, validate_helmv3_in_path, validate_values_file},
        CliArgs,
    },
};
use clap::Parser;
use install::install;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod common;
mod helm;
mod install;
mod opts;
mod vault;

#[tokio::main]
async fn main() -> Result<()> {
    let opts = CliArgs::parse();
    init_logging(opts.debug());

    let opts = validate_cli_args(opts).map_err(|error| {
        error!(%error, "Failed to install {PRODUCT}");
        error
    })?;

    match install(&opts).await {
        Ok(summary) => {
            info!(
                cluster = %summary.cluster_name(),
                release = %summary.release_name(),
                namespace = %summary.namespace(),
                status = %summary.status(),
                "Successfully installed {PRODUCT}"
            );
            Ok(())
        }
        Err(error) => {
            error!(%error, "Failed to install {PRODUCT}");
            Err(error)
        }
    }
}

/// Initialize logging components -- tracing. The --debug flag raises the default
/// filter so that the captured output of external tool invocations is surfaced.
fn init_logging(debug: bool) {
    let default_directive = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// This function handles validation of arguments whose validation depends on state
/// outside of the argument list -- the helm binary, the chart directory and the values
/// file.
pub(crate) fn validate_cli_args(opts: CliArgs) -> Result<CliArgs> {
    validate_helmv3_in_path()?;
    validate_chart_dir(opts.chart_path())?;
    validate_values_file(opts.values_file())?;

    info!("Validated all inputs");

    Ok(opts)
}
