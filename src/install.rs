use crate::{
    common::{
        constants::HELM_STATUS_DEPLOYED,
        error::{ReleaseNotDeployed, Result},
        kube_client,
    },
    helm::client::HelmReleaseClient,
    opts::CliArgs,
    vault::{
        client::VaultClient,
        secrets::{cluster_secret_keys, platform_secret_keys, ClusterSecrets},
        VaultConfig,
    },
};
use snafu::ensure;
use std::{fmt, path::PathBuf};
use tracing::info;

/// The sequential steps of one install run, in execution order. Any step failure
/// short-circuits the remaining steps via the try operator, and is reported once at the
/// process boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum InstallPhase {
    Authenticating,
    FetchingSecrets,
    EnsuringNamespace,
    ValidatingChart,
    Installing,
    Verifying,
    Done,
}

impl fmt::Display for InstallPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let phase = match self {
            Self::Authenticating => "authenticating",
            Self::FetchingSecrets => "fetching-secrets",
            Self::EnsuringNamespace => "ensuring-namespace",
            Self::ValidatingChart => "validating-chart",
            Self::Installing => "installing",
            Self::Verifying => "verifying",
            Self::Done => "done",
        };
        write!(f, "{phase}")
    }
}

/// The resolved parameters of one install. Built once from the CLI options, read-only
/// afterwards.
pub(crate) struct DeploymentRequest {
    cluster_name: String,
    chart_dir: PathBuf,
    namespace: String,
    values_file: PathBuf,
    release_name: String,
    registry: String,
    create_namespace: bool,
    debug: bool,
}

impl DeploymentRequest {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        cluster_name: String,
        chart_dir: PathBuf,
        namespace: String,
        values_file: PathBuf,
        release_name: String,
        registry: String,
        create_namespace: bool,
        debug: bool,
    ) -> Self {
        Self {
            cluster_name,
            chart_dir,
            namespace,
            values_file,
            release_name,
            registry,
            create_namespace,
            debug,
        }
    }

    /// Resolve the request from the CLI options.
    pub(crate) fn from_cli(opts: &CliArgs) -> Self {
        Self::new(
            opts.cluster_name(),
            opts.chart_path(),
            opts.namespace(),
            opts.values_file(),
            opts.release_name(),
            opts.registry(),
            opts.create_namespace(),
            opts.debug(),
        )
    }

    /// This returns the name of the target Kubernetes cluster.
    pub(crate) fn cluster_name(&self) -> &str {
        self.cluster_name.as_str()
    }

    /// This returns the Helm chart directory.
    pub(crate) fn chart_dir(&self) -> &PathBuf {
        &self.chart_dir
    }

    /// This returns the Kubernetes Namespace for the Helm release.
    pub(crate) fn namespace(&self) -> &str {
        self.namespace.as_str()
    }

    /// This returns the Helm values file path.
    pub(crate) fn values_file(&self) -> &PathBuf {
        &self.values_file
    }

    /// This returns the Helm release name.
    pub(crate) fn release_name(&self) -> &str {
        self.release_name.as_str()
    }

    /// This returns the container registry for the workload images.
    pub(crate) fn registry(&self) -> &str {
        self.registry.as_str()
    }

    /// This decides if an absent Namespace may be created.
    pub(crate) fn create_namespace(&self) -> bool {
        self.create_namespace
    }

    /// This decides if external tool output is surfaced in the logs.
    pub(crate) fn debug(&self) -> bool {
        self.debug
    }
}

/// Outcome of a completed install run.
pub(crate) struct DeploymentSummary {
    cluster_name: String,
    release_name: String,
    namespace: String,
    status: String,
}

impl DeploymentSummary {
    /// This returns the name of the target Kubernetes cluster.
    pub(crate) fn cluster_name(&self) -> &str {
        self.cluster_name.as_str()
    }

    /// This returns the Helm release name.
    pub(crate) fn release_name(&self) -> &str {
        self.release_name.as_str()
    }

    /// This returns the Kubernetes Namespace of the Helm release.
    pub(crate) fn namespace(&self) -> &str {
        self.namespace.as_str()
    }

    /// This returns the release state reported by helm after the install.
    pub(crate) fn status(&self) -> &str {
        self.status.as_str()
    }
}

/// This function starts and sees the install through to the end: Vault login, secret
/// retrieval, namespace checks, chart validation, the Helm install itself, and the
/// post-install verification. The secrets fetched here do not outlive this call.
pub(crate) async fn install(opts: &CliArgs) -> Result<DeploymentSummary> {
    let request = DeploymentRequest::from_cli(opts);
    let config = VaultConfig::from_cli(opts)?;

    info!(
        phase = %InstallPhase::Authenticating,
        cluster = %request.cluster_name(),
        environment = %config.environment(),
        "Logging in to Vault"
    );
    let vault = VaultClient::authenticate(&config).await?;

    info!(
        phase = %InstallPhase::FetchingSecrets,
        environment = %vault.session().environment(),
        "Fetching platform credentials"
    );
    let platform_creds = vault
        .fetch_secrets(config.platform_creds_url(), &platform_secret_keys())
        .await?;
    info!(
        "Retrieved {} platform credential entries",
        platform_creds.len()
    );

    info!(
        phase = %InstallPhase::FetchingSecrets,
        cluster = %request.cluster_name(),
        "Fetching cluster install secrets"
    );
    let bundle = vault
        .fetch_secrets(
            config.cluster_secrets_url(),
            &cluster_secret_keys(request.cluster_name()),
        )
        .await?;
    let secrets = ClusterSecrets::from_bundle(
        request.cluster_name(),
        &bundle,
        config.cluster_secrets_url().as_str(),
    )?;

    info!(
        phase = %InstallPhase::EnsuringNamespace,
        namespace = %request.namespace(),
        create = request.create_namespace(),
        "Checking the target Namespace"
    );
    kube_client::ensure_namespace(request.namespace(), request.create_namespace()).await?;

    let helm = HelmReleaseClient::builder()
        .with_namespace(request.namespace())
        .build()?;

    info!(
        phase = %InstallPhase::ValidatingChart,
        chart_dir = %request.chart_dir().display(),
        "Linting the Helm chart"
    );
    helm.lint(request.chart_dir())?;

    info!(
        phase = %InstallPhase::Installing,
        release = %request.release_name(),
        namespace = %request.namespace(),
        "Installing the Helm chart"
    );
    helm.install(&request, &secrets)?;

    info!(
        phase = %InstallPhase::Verifying,
        release = %request.release_name(),
        "Verifying the Helm release state"
    );
    let status = helm.status(request.release_name())?;
    ensure!(
        status.status().eq(HELM_STATUS_DEPLOYED),
        ReleaseNotDeployed {
            release_name: request.release_name().to_string(),
            namespace: request.namespace().to_string(),
            status: status.status().to_string(),
        }
    );

    info!(phase = %InstallPhase::Done, "Install complete");

    Ok(DeploymentSummary {
        cluster_name: request.cluster_name().to_string(),
        release_name: request.release_name().to_string(),
        namespace: request.namespace().to_string(),
        status: status.status().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn phases_render_in_kebab_case() {
        assert_eq!(InstallPhase::FetchingSecrets.to_string(), "fetching-secrets");
        assert_eq!(InstallPhase::Done.to_string(), "done");
    }

    #[test]
    fn request_picks_up_cli_defaults() {
        let opts = CliArgs::parse_from([
            "illumio-install",
            "--cluster-name",
            "demo",
            "--sa-token",
            "jwt",
            "--environment",
            "dev",
            "--vault-login",
            "https://vault.dev/login",
            "--platform-creds-path",
            "https://vault.dev/v1/secret/pce",
            "--cluster-secrets-path",
            "https://vault.dev/v1/secret/illumio",
        ]);
        let request = DeploymentRequest::from_cli(&opts);

        assert_eq!(request.cluster_name(), "demo");
        assert_eq!(request.chart_dir(), &PathBuf::from("."));
        assert_eq!(request.namespace(), "illumio-system");
        assert_eq!(request.values_file(), &PathBuf::from("values.yaml"));
        assert_eq!(request.release_name(), "illumio");
        assert_eq!(request.registry(), "registry.access.redhat.com/ubi9");
        assert!(!request.create_namespace());
        assert!(!request.debug());
    }
}
