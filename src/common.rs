/// Constants used in various places in this crate.
pub(crate) mod constants;

/// Error handling for this crate.
pub(crate) mod error;

/// Kubernetes API client helpers.
pub(crate) mod kube_client;

/// Macros for use in various places in this crate.
pub(crate) mod macros;
