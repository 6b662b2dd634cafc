use crate::common::constants::{
    DEFAULT_CHART_DIR, DEFAULT_NAMESPACE, DEFAULT_REGISTRY, DEFAULT_RELEASE_NAME,
    DEFAULT_VALUES_FILE, PRODUCT,
};
use clap::Parser;
use std::path::PathBuf;
use url::Url;

/// Validate input whose validation depends on other inputs.
pub(crate) mod validators;

/// These are the supported cli configuration options for the install.
#[derive(Parser)]
#[command(name = env!("CARGO_PKG_NAME"), version)]
#[command(about = format!("Installs the {} Helm chart with secrets from Vault", PRODUCT), long_about = None)]
pub(crate) struct CliArgs {
    /// Name of the target Kubernetes cluster. Used to derive the per-cluster secret
    /// keys in Vault.
    #[arg(short = 'c', long)]
    cluster_name: String,

    /// This is the Helm chart directory filepath.
    #[arg(long, default_value = DEFAULT_CHART_DIR, value_name = "DIR_PATH")]
    chart_path: PathBuf,

    /// This is the Kubernetes Namespace for the Helm release.
    #[arg(short, long, default_value = DEFAULT_NAMESPACE)]
    namespace: String,

    /// This is the Helm values file for the install.
    #[arg(long, default_value = DEFAULT_VALUES_FILE, value_name = "FILE_PATH")]
    values_file: PathBuf,

    /// This is the release name for the installed Helm chart.
    #[arg(long, default_value = DEFAULT_RELEASE_NAME)]
    release_name: String,

    /// Container registry for the workload images.
    #[arg(long, default_value = DEFAULT_REGISTRY)]
    registry: String,

    /// Create the Namespace if it does not exist.
    #[arg(long, default_value_t = false)]
    create_namespace: bool,

    /// Surface the full output of the external tool invocations in the logs.
    #[arg(long, default_value_t = false)]
    debug: bool,

    /// Service-account JWT for the Vault login.
    #[arg(long, env = "SA_TOKEN", hide_env_values = true)]
    sa_token: String,

    /// Deployment environment. Selects the Vault login endpoint(s).
    #[arg(long, env = "ENVIRONMENT")]
    environment: String,

    /// Vault login URL for non-prod environments.
    #[arg(long, env = "VAULT_LOGIN", value_name = "URL")]
    vault_login: Option<Url>,

    /// Primary Vault login URL for the prod environment.
    #[arg(long, env = "STL_VAULT_LOGIN", value_name = "URL")]
    stl_vault_login: Option<Url>,

    /// Secondary Vault login URL for the prod environment.
    #[arg(long, env = "PHX_VAULT_LOGIN", value_name = "URL")]
    phx_vault_login: Option<Url>,

    /// Vault path holding the platform API credentials.
    #[arg(long, env = "PCE_CREDS", value_name = "URL")]
    platform_creds_path: Url,

    /// Vault path holding the per-cluster install secrets.
    #[arg(long, env = "CLUSTER_SECRETS_PATH", value_name = "URL")]
    cluster_secrets_path: Url,
}

impl CliArgs {
    /// This returns the name of the target Kubernetes cluster.
    pub(crate) fn cluster_name(&self) -> String {
        self.cluster_name.clone()
    }

    /// This returns the Helm chart directory filepath.
    pub(crate) fn chart_path(&self) -> PathBuf {
        self.chart_path.clone()
    }

    /// This returns the Kubernetes Namespace for the Helm chart release.
    pub(crate) fn namespace(&self) -> String {
        self.namespace.clone()
    }

    /// This returns the Helm values file for the install.
    pub(crate) fn values_file(&self) -> PathBuf {
        self.values_file.clone()
    }

    /// This returns the Helm release name for the installed Helm chart.
    pub(crate) fn release_name(&self) -> String {
        self.release_name.clone()
    }

    /// This returns the container registry for the workload images.
    pub(crate) fn registry(&self) -> String {
        self.registry.clone()
    }

    /// This decides if an absent Namespace may be created.
    pub(crate) fn create_namespace(&self) -> bool {
        self.create_namespace
    }

    /// This decides if external tool output is surfaced in the logs.
    pub(crate) fn debug(&self) -> bool {
        self.debug
    }

    /// This returns the service-account JWT for the Vault login.
    pub(crate) fn sa_token(&self) -> String {
        self.sa_token.clone()
    }

    /// This returns the deployment environment name.
    pub(crate) fn environment(&self) -> String {
        self.environment.clone()
    }

    /// This returns the Vault login URL for non-prod environments.
    pub(crate) fn vault_login(&self) -> Option<Url> {
        self.vault_login.clone()
    }

    /// This returns the primary Vault login URL for the prod environment.
    pub(crate) fn stl_vault_login(&self) -> Option<Url> {
        self.stl_vault_login.clone()
    }

    /// This returns the secondary Vault login URL for the prod environment.
    pub(crate) fn phx_vault_login(&self) -> Option<Url> {
        self.phx_vault_login.clone()
    }

    /// This returns the Vault path holding the platform API credentials.
    pub(crate) fn platform_creds_path(&self) -> Url {
        self.platform_creds_path.clone()
    }

    /// This returns the Vault path holding the per-cluster install secrets.
    pub(crate) fn cluster_secrets_path(&self) -> Url {
        self.cluster_secrets_path.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cluster_name_is_required() {
        let result = CliArgs::try_parse_from([
            "illumio-install",
            "--sa-token",
            "jwt",
            "--environment",
            "dev",
            "--platform-creds-path",
            "https://vault.dev/v1/secret/pce",
            "--cluster-secrets-path",
            "https://vault.dev/v1/secret/illumio",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn defaults_match_the_documented_surface() {
        let opts = CliArgs::parse_from([
            "illumio-install",
            "--cluster-name",
            "demo",
            "--sa-token",
            "jwt",
            "--environment",
            "dev",
            "--platform-creds-path",
            "https://vault.dev/v1/secret/pce",
            "--cluster-secrets-path",
            "https://vault.dev/v1/secret/illumio",
        ]);

        assert_eq!(opts.chart_path(), PathBuf::from("."));
        assert_eq!(opts.namespace(), "illumio-system");
        assert_eq!(opts.values_file(), PathBuf::from("values.yaml"));
        assert_eq!(opts.release_name(), "illumio");
        assert_eq!(opts.registry(), "registry.access.redhat.com/ubi9");
        assert!(!opts.create_namespace());
        assert!(!opts.debug());
    }
}
