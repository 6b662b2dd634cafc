/// Contains the structure of the Helm chart metadata file.
pub(crate) mod chart;

/// Helm client for chart validation, install and release status.
pub(crate) mod client;

/// Narrow interface over external tool invocation.
pub(crate) mod runner;
