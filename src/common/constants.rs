use std::time::Duration;

/// Name of the product.
pub(crate) const PRODUCT: &str = "Illumio";

/// Default Kubernetes Namespace for the Helm release.
pub(crate) const DEFAULT_NAMESPACE: &str = "illumio-system";

/// Default Helm release name.
pub(crate) const DEFAULT_RELEASE_NAME: &str = "illumio";

/// Default Helm chart directory.
pub(crate) const DEFAULT_CHART_DIR: &str = ".";

/// Default Helm values file.
pub(crate) const DEFAULT_VALUES_FILE: &str = "values.yaml";

/// Default container registry for the workload images.
pub(crate) const DEFAULT_REGISTRY: &str = "registry.access.redhat.com/ubi9";

/// Vault role bound to the pipeline's Kubernetes service account.
pub(crate) const VAULT_LOGIN_ROLE: &str = "ips-illumio-pipeline-integration-mapping";

/// Request timeout for Vault HTTP calls.
pub(crate) const VAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Secret keys expected at the platform credentials path.
pub(crate) const PLATFORM_API_USER_KEY: &str = "api_user";
pub(crate) const PLATFORM_API_KEY_KEY: &str = "api_key";

/// Per-cluster secret key suffixes at the cluster secrets path. The full key
/// is `{cluster_name}_{suffix}`.
pub(crate) const CLUSTER_ID_SUFFIX: &str = "container_cluster_id";
pub(crate) const CLUSTER_TOKEN_SUFFIX: &str = "container_cluster_token";
pub(crate) const CLUSTER_CODE_SUFFIX: &str = "container_cluster_code";

/// Helm values keys which are `--set` on the install command line.
pub(crate) const HELM_SET_CLUSTER_ID: &str = "cluster_id";
pub(crate) const HELM_SET_CLUSTER_TOKEN: &str = "cluster_token";
pub(crate) const HELM_SET_CLUSTER_CODE: &str = "cluster_code";
pub(crate) const HELM_SET_REGISTRY: &str = "registry";

/// Helm release state which marks a successful install.
pub(crate) const HELM_STATUS_DEPLOYED: &str = "deployed";
