use crate::{
    common::{
        constants::{
            HELM_SET_CLUSTER_CODE, HELM_SET_CLUSTER_ID, HELM_SET_CLUSTER_TOKEN, HELM_SET_REGISTRY,
        },
        error::{
            ChartInvalid, HelmClientNs, HelmCommand, HelmInstallCommand, HelmStatusCommand, Result,
            U8VectorToString, YamlParseFromSlice,
        },
    },
    helm::runner::{ProcessRunner, ToolRunner},
    install::DeploymentRequest,
    vault::secrets::ClusterSecrets,
    vec_to_strings,
};
use serde::Deserialize;
use snafu::{ensure, ResultExt};
use std::{path::Path, str};
use tracing::debug;

/// This struct is used to deserialize the output of `helm status -n <namespace>
/// <release_name> -o yaml`.
#[derive(Deserialize)]
pub(crate) struct HelmReleaseStatus {
    info: HelmReleaseInfo,
}

#[derive(Deserialize)]
struct HelmReleaseInfo {
    status: String,
}

impl HelmReleaseStatus {
    /// This is a getter for the release state reported by helm.
    pub(crate) fn status(&self) -> &str {
        self.info.status.as_str()
    }
}

/// This is a builder for HelmReleaseClient.
#[derive(Default)]
pub(crate) struct HelmReleaseClientBuilder {
    namespace: Option<String>,
    runner: Option<Box<dyn ToolRunner>>,
}

impl HelmReleaseClientBuilder {
    /// This is a builder option to add Namespace. This is mandatory,
    /// because all helm releases are tied to a Namespace.
    #[must_use]
    pub(crate) fn with_namespace<J>(mut self, ns: J) -> Self
    where
        J: ToString,
    {
        self.namespace = Some(ns.to_string());
        self
    }

    /// This is a builder option to substitute the external tool runner. Tests use this
    /// to avoid spawning a real helm process.
    #[must_use]
    pub(crate) fn with_runner(mut self, runner: Box<dyn ToolRunner>) -> Self {
        self.runner = Some(runner);
        self
    }

    /// Build the HelmReleaseClient.
    pub(crate) fn build(self) -> Result<HelmReleaseClient> {
        let namespace = self.namespace.ok_or(HelmClientNs.build())?;
        let runner = self
            .runner
            .unwrap_or_else(|| Box::new(ProcessRunner::default()));
        Ok(HelmReleaseClient { namespace, runner })
    }
}

/// This type has functions which execute helm commands to validate, install and inspect
/// the release.
pub(crate) struct HelmReleaseClient {
    namespace: String,
    runner: Box<dyn ToolRunner>,
}

impl HelmReleaseClient {
    /// This creates an empty builder.
    pub(crate) fn builder() -> HelmReleaseClientBuilder {
        HelmReleaseClientBuilder::default()
    }

    /// Runs command `helm lint <chart_dir>`. A lint error fails the chart, lint
    /// warnings do not.
    pub(crate) fn lint<P>(&self, chart_dir: P) -> Result<()>
    where
        P: AsRef<Path>,
    {
        let command: &str = "helm";
        let args: Vec<String> = vec_to_strings!["lint", chart_dir.as_ref().to_string_lossy()];

        debug!(%command, ?args, "Helm lint command");

        let output = self
            .runner
            .run(command, args.as_slice())
            .context(HelmCommand {
                command: command.to_string(),
                args: args.clone(),
            })?;

        let stdout_str = str::from_utf8(output.stdout.as_slice()).context(U8VectorToString)?;
        debug!(stdout=%stdout_str, "Helm lint command standard output");
        ensure!(
            output.success(),
            ChartInvalid {
                chart_dir: chart_dir.as_ref().to_path_buf(),
                std_out: stdout_str.to_string(),
                std_err: str::from_utf8(output.stderr.as_slice())
                    .context(U8VectorToString)?
                    .to_string()
            }
        );

        Ok(())
    }

    /// Runs command `helm upgrade --install <release_name> <chart_dir> -n <namespace>
    /// -f <values_file>` with the fetched secrets layered on top of the values file as
    /// `--set` arguments. Re-running upgrades the release in place.
    pub(crate) fn install(
        &self,
        request: &DeploymentRequest,
        secrets: &ClusterSecrets,
    ) -> Result<()> {
        let command: &str = "helm";
        let mut args: Vec<String> = vec_to_strings![
            "upgrade",
            "--install",
            request.release_name(),
            request.chart_dir().to_string_lossy(),
            "-n",
            self.namespace.as_str(),
            "-f",
            request.values_file().to_string_lossy(),
            "--set",
            format!("{HELM_SET_CLUSTER_ID}={}", secrets.cluster_id()),
            "--set",
            format!("{HELM_SET_CLUSTER_TOKEN}={}", secrets.cluster_token()),
            "--set",
            format!("{HELM_SET_CLUSTER_CODE}={}", secrets.cluster_code()),
            "--set",
            format!("{HELM_SET_REGISTRY}={}", request.registry())
        ];

        if request.create_namespace() {
            args.push("--create-namespace".to_string());
        }
        if request.debug() {
            args.push("--debug".to_string());
        }

        // Log and propagate the redacted argument list only, the real one carries
        // secret values.
        let masked = masked_args(args.as_slice());
        debug!(%command, args = ?masked, "Helm install command");

        let output = self
            .runner
            .run(command, args.as_slice())
            .context(HelmCommand {
                command: command.to_string(),
                args: masked.clone(),
            })?;

        let stdout_str = str::from_utf8(output.stdout.as_slice()).context(U8VectorToString)?;
        debug!(stdout=%stdout_str, "Helm install command standard output");
        ensure!(
            output.success(),
            HelmInstallCommand {
                command: command.to_string(),
                args: masked,
                exit_code: output.exit_code,
                std_err: str::from_utf8(output.stderr.as_slice())
                    .context(U8VectorToString)?
                    .to_string()
            }
        );

        Ok(())
    }

    /// Runs command `helm status <release_name> -n <namespace> -o yaml`. This is a
    /// single poll of the release state, there is no wait loop.
    pub(crate) fn status<A>(&self, release_name: A) -> Result<HelmReleaseStatus>
    where
        A: ToString,
    {
        let command: &str = "helm";
        let args: Vec<String> = vec_to_strings![
            "status",
            release_name,
            "-n",
            self.namespace.as_str(),
            "-o",
            "yaml"
        ];

        debug!(%command, ?args, "Helm status command");

        let output = self
            .runner
            .run(command, args.as_slice())
            .context(HelmCommand {
                command: command.to_string(),
                args: args.clone(),
            })?;

        let stdout_str = str::from_utf8(output.stdout.as_slice()).context(U8VectorToString)?;
        debug!(stdout=%stdout_str, "Helm status command standard output");
        ensure!(
            output.success(),
            HelmStatusCommand {
                command: command.to_string(),
                args,
                std_err: str::from_utf8(output.stderr.as_slice())
                    .context(U8VectorToString)?
                    .to_string()
            }
        );

        serde_yaml::from_slice(output.stdout.as_slice()).context(YamlParseFromSlice {
            input_yaml: stdout_str.to_string(),
        })
    }
}

/// Helm args with every `--set` value redacted. Safe for logs and error messages.
pub(crate) fn masked_args(args: &[String]) -> Vec<String> {
    let mut masked = Vec::with_capacity(args.len());
    let mut redact_next = false;
    for arg in args {
        if redact_next {
            match arg.split_once('=') {
                Some((key, _)) => masked.push(format!("{key}=<redacted>")),
                None => masked.push("<redacted>".to_string()),
            }
            redact_next = false;
        } else {
            redact_next = arg == "--set";
            masked.push(arg.clone());
        }
    }
    masked
}
