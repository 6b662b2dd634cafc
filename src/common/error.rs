use crate::common::constants::PRODUCT;
use snafu::Snafu;
use std::path::PathBuf;
use url::Url;

/// For use with multiple fallible operations which may fail for different reasons, but are
/// defined withing the same scope and must return to the outer scope (calling scope) using
/// the try operator -- '?'.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
#[snafu(context(suffix(false)))]
pub(crate) enum Error {
    /// Error for when the Vault login URL for the target environment is not configured.
    #[snafu(display(
        "No Vault login URL set for environment '{}', expected the {} environment variable",
        environment,
        variable
    ))]
    VaultLoginUrlAbsent {
        environment: String,
        variable: String,
    },

    /// Error for when the HTTP client cannot be built.
    #[snafu(display("Failed to build HTTP client: {}", source))]
    HttpClientBuild { source: reqwest::Error },

    /// Error for when a Vault login request fails at the transport level.
    #[snafu(display("Failed to reach Vault login endpoint {}: {}", url, source))]
    VaultAuthRequest { source: reqwest::Error, url: Url },

    /// Error for when Vault rejects the service-account token.
    #[snafu(display(
        "Vault login at {} was rejected with HTTP status {}",
        url,
        status_code
    ))]
    VaultAuthDenied {
        url: Url,
        status_code: reqwest::StatusCode,
    },

    /// Error for when the Vault login response cannot be decoded.
    #[snafu(display("Failed to decode Vault login response from {}: {}", url, source))]
    VaultAuthResponseParse { source: reqwest::Error, url: Url },

    /// Error for when no Vault login endpoint for the environment could be used.
    #[snafu(display("Vault is inaccessible in environment '{}'", environment))]
    VaultUnreachable { environment: String },

    /// Error for when a secrets GET request fails at the transport level.
    #[snafu(display("Failed to fetch secrets from Vault at {}: {}", url, source))]
    SecretsRequest { source: reqwest::Error, url: Url },

    /// Error for when a secrets GET request returns a failure HTTP status.
    #[snafu(display(
        "Vault secrets request to {} failed with HTTP status {}",
        url,
        status_code
    ))]
    SecretsRequestDenied {
        url: Url,
        status_code: reqwest::StatusCode,
    },

    /// Error for when the Vault secrets response cannot be decoded.
    #[snafu(display("Failed to decode Vault secrets response from {}: {}", url, source))]
    SecretsResponseParse { source: reqwest::Error, url: Url },

    /// Error for when expected secret keys are absent (or empty) in the Vault response.
    #[snafu(display("Missing secrets at {}: {}", path, missing.join(", ")))]
    SecretsNotFound {
        path: String,
        missing: Vec<String>,
    },

    /// Error for when Kubernetes API client generation fails.
    #[snafu(display("Failed to generate kubernetes client: {}", source))]
    K8sClientGeneration { source: kube_client::Error },

    /// Error for when a Kubernetes API GET request for a namespace resource fails.
    #[snafu(display("Failed to GET Kubernetes namespace {}: {}", namespace, source))]
    GetNamespace {
        source: kube::Error,
        namespace: String,
    },

    /// Error for when a Kubernetes namespace create request fails.
    #[snafu(display("Failed to create Kubernetes namespace {}: {}", namespace, source))]
    CreateNamespace {
        source: kube::Error,
        namespace: String,
    },

    /// Error for when the target namespace is absent and may not be created.
    #[snafu(display(
        "Namespace {} does not exist, and --create-namespace is not set",
        namespace
    ))]
    NamespaceAbsent { namespace: String },

    /// Error for when a Helm command fails.
    #[snafu(display(
        "Failed to run Helm command,\ncommand: {},\nargs: {:?},\ncommand_error: {}",
        command,
        args,
        source
    ))]
    HelmCommand {
        source: std::io::Error,
        command: String,
        args: Vec<String>,
    },

    /// Error for when a Helm version command execution succeeds, but with an error.
    #[snafu(display(
        "`helm version` command return an error,\ncommand: {},\nargs: {:?},\nstd_err: {}",
        command,
        args,
        std_err,
    ))]
    HelmVersionCommand {
        command: String,
        args: Vec<String>,
        std_err: String,
    },

    /// Error for when Helm v3.x.y is not present in $PATH.
    #[snafu(display("Helm version {} does not start with 'v3.x.y'", version))]
    HelmVersion { version: String },

    /// Error for when the Helm chart fails lint validation.
    #[snafu(display(
        "Helm chart at {} failed validation,\nstd_out: {},\nstd_err: {}",
        chart_dir.display(),
        std_out,
        std_err
    ))]
    ChartInvalid {
        chart_dir: PathBuf,
        std_out: String,
        std_err: String,
    },

    /// Error for when a Helm install command exits with a failure. The args here carry
    /// redacted `--set` values.
    #[snafu(display(
        "`helm upgrade --install` command return an error,\ncommand: {},\nargs: {:?},\nexit_code: {},\nstd_err: {}",
        command,
        args,
        exit_code,
        std_err,
    ))]
    HelmInstallCommand {
        command: String,
        args: Vec<String>,
        exit_code: i32,
        std_err: String,
    },

    /// Error for when a Helm status command execution succeeds, but with an error.
    #[snafu(display(
        "`helm status` command return an error,\ncommand: {},\nargs: {:?},\nstd_err: {}",
        command,
        args,
        std_err,
    ))]
    HelmStatusCommand {
        command: String,
        args: Vec<String>,
        std_err: String,
    },

    /// Error for when the installed release does not report the 'deployed' state.
    #[snafu(display(
        "{} Helm release {} in Namespace {} is in state '{}', expected 'deployed'",
        PRODUCT,
        release_name,
        namespace,
        status
    ))]
    ReleaseNotDeployed {
        release_name: String,
        namespace: String,
        status: String,
    },

    /// Error for mandatory options for a HelmReleaseClient are missing when building.
    #[snafu(display("Setting namespace is mandatory for HelmReleaseClient"))]
    HelmClientNs,

    /// Error for when yaml could not be parsed from a slice.
    #[snafu(display("Failed to parse YAML {}: {}", input_yaml, source))]
    YamlParseFromSlice {
        source: serde_yaml::Error,
        input_yaml: String,
    },

    /// Error for when yaml could not be parsed from a file.
    #[snafu(display("Failed to parse YAML at {}: {}", filepath.display(), source))]
    YamlParseFromFile {
        source: serde_yaml::Error,
        filepath: PathBuf,
    },

    /// Error for use when converting Vec<> to String.
    #[snafu(display("Failed to convert Vec<u8> to UTF-8 formatted String: {}", source))]
    U8VectorToString { source: std::str::Utf8Error },

    /// Error for when regular expression parsing or compilation fails.
    #[snafu(display("Failed to compile regex {}: {}", expression, source))]
    RegexCompile {
        source: regex::Error,
        expression: String,
    },

    /// Error when reading a file.
    #[snafu(display("Failed to read file {}: {}", filepath.display(), source))]
    ReadingFile {
        source: std::io::Error,
        filepath: PathBuf,
    },

    /// Error for when the path to a directory cannot be validated.
    #[snafu(display("Failed to validate directory path {}: {}", path.display(), source))]
    ValidateDirPath {
        source: std::io::Error,
        path: PathBuf,
    },

    /// Error for when the path to a file cannot be validated.
    #[snafu(display("Failed to validate filepath {}: {}", path.display(), source))]
    ValidateFilePath {
        source: std::io::Error,
        path: PathBuf,
    },

    /// Error for when the path is not that of a directory.
    #[snafu(display("{} is not a directory", path.display()))]
    NotADirectory { path: PathBuf },

    /// Error for when the path is not that of a file.
    #[snafu(display("{} is not a file", path.display()))]
    NotAFile { path: PathBuf },
}

/// A wrapper type to remove repeated Result<T, Error> returns.
pub(crate) type Result<T, E = Error> = std::result::Result<T, E>;
