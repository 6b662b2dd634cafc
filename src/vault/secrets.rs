use crate::common::{
    constants::{
        CLUSTER_CODE_SUFFIX, CLUSTER_ID_SUFFIX, CLUSTER_TOKEN_SUFFIX, PLATFORM_API_KEY_KEY,
        PLATFORM_API_USER_KEY,
    },
    error::{Result, SecretsNotFound},
};
use snafu::ensure;
use std::{collections::HashMap, fmt};

/// The exact set of per-cluster secret keys expected at the cluster secrets path for
/// `cluster_name`. Missing-key detection is a set difference against this.
pub(crate) fn cluster_secret_keys(cluster_name: &str) -> Vec<String> {
    vec![
        format!("{cluster_name}_{CLUSTER_ID_SUFFIX}"),
        format!("{cluster_name}_{CLUSTER_TOKEN_SUFFIX}"),
        format!("{cluster_name}_{CLUSTER_CODE_SUFFIX}"),
    ]
}

/// The secret keys expected at the platform credentials path.
pub(crate) fn platform_secret_keys() -> Vec<String> {
    vec![
        PLATFORM_API_USER_KEY.to_string(),
        PLATFORM_API_KEY_KEY.to_string(),
    ]
}

/// Strip stray quote characters and surrounding whitespace which Vault tooling
/// sometimes leaves on stored values.
fn cleanup_secret(value: &str) -> String {
    value.replace('"', "").trim().to_string()
}

/// An immutable set of secret values fetched from the secret store. Lives in process
/// memory for the duration of one install run, and is never persisted or logged.
pub(crate) struct SecretBundle {
    entries: HashMap<String, String>,
}

impl SecretBundle {
    /// Select `keys` out of a raw secret-store response, cleaning up the values. Fails
    /// listing every requested key which is absent from the response or empty after
    /// cleanup.
    pub(crate) fn select(
        data: &HashMap<String, String>,
        keys: &[String],
        path: &str,
    ) -> Result<Self> {
        let mut entries = HashMap::with_capacity(keys.len());
        let mut missing: Vec<String> = Vec::new();

        for key in keys {
            match data.get(key).map(|value| cleanup_secret(value)) {
                Some(value) if !value.is_empty() => {
                    entries.insert(key.clone(), value);
                }
                _ => missing.push(key.clone()),
            }
        }

        ensure!(
            missing.is_empty(),
            SecretsNotFound {
                path: path.to_string(),
                missing
            }
        );

        Ok(Self { entries })
    }

    /// This returns the secret value for `key`, if present.
    pub(crate) fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// This returns the number of secret entries in the bundle.
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

// Secret values must never end up in logs, so Debug only shows the entry count.
impl fmt::Debug for SecretBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretBundle({} entries)", self.entries.len())
    }
}

/// Typed view over the per-cluster secrets which parameterise the Helm install.
pub(crate) struct ClusterSecrets {
    cluster_id: String,
    cluster_token: String,
    cluster_code: String,
}

impl ClusterSecrets {
    /// Pick the per-cluster values out of a fetched bundle.
    pub(crate) fn from_bundle(
        cluster_name: &str,
        bundle: &SecretBundle,
        path: &str,
    ) -> Result<Self> {
        let keys = cluster_secret_keys(cluster_name);
        let mut values = Vec::with_capacity(keys.len());
        let mut missing: Vec<String> = Vec::new();

        for key in keys.iter() {
            match bundle.get(key) {
                Some(value) => values.push(value.to_string()),
                None => missing.push(key.clone()),
            }
        }

        ensure!(
            missing.is_empty(),
            SecretsNotFound {
                path: path.to_string(),
                missing
            }
        );

        let mut values = values.into_iter();
        Ok(Self {
            cluster_id: values.next().unwrap_or_default(),
            cluster_token: values.next().unwrap_or_default(),
            cluster_code: values.next().unwrap_or_default(),
        })
    }

    /// This returns the container cluster id.
    pub(crate) fn cluster_id(&self) -> &str {
        self.cluster_id.as_str()
    }

    /// This returns the container cluster token.
    pub(crate) fn cluster_token(&self) -> &str {
        self.cluster_token.as_str()
    }

    /// This returns the pairing (activation) code for the cluster.
    pub(crate) fn cluster_code(&self) -> &str {
        self.cluster_code.as_str()
    }
}

impl fmt::Debug for ClusterSecrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClusterSecrets(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::error::Error;

    fn raw(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn cluster_keys_are_derived_from_the_cluster_name() {
        assert_eq!(
            cluster_secret_keys("demo"),
            vec![
                "demo_container_cluster_id".to_string(),
                "demo_container_cluster_token".to_string(),
                "demo_container_cluster_code".to_string(),
            ]
        );
    }

    #[test]
    fn select_cleans_up_quoted_values() {
        let data = raw(&[
            ("demo_container_cluster_id", "\"abc\"\n"),
            ("demo_container_cluster_token", " xyz "),
            ("demo_container_cluster_code", "c1"),
        ]);
        let bundle =
            SecretBundle::select(&data, &cluster_secret_keys("demo"), "secret/illumio").unwrap();

        assert_eq!(bundle.get("demo_container_cluster_id"), Some("abc"));
        assert_eq!(bundle.get("demo_container_cluster_token"), Some("xyz"));
        assert_eq!(bundle.len(), 3);
    }

    #[test]
    fn select_lists_exactly_the_missing_keys() {
        // cluster_token is absent, cluster_code is present but empty. Both count as
        // missing; cluster_id must not be reported.
        let data = raw(&[
            ("demo_container_cluster_id", "abc"),
            ("demo_container_cluster_code", "  "),
        ]);

        match SecretBundle::select(&data, &cluster_secret_keys("demo"), "secret/illumio") {
            Err(Error::SecretsNotFound { missing, .. }) => assert_eq!(
                missing,
                vec![
                    "demo_container_cluster_token".to_string(),
                    "demo_container_cluster_code".to_string(),
                ]
            ),
            Err(other) => panic!("expected SecretsNotFound, got {other:?}"),
            Ok(_) => panic!("expected SecretsNotFound, got a bundle"),
        }
    }

    #[test]
    fn missing_key_error_names_the_key() {
        let data = raw(&[
            ("demo_container_cluster_id", "abc"),
            ("demo_container_cluster_code", "c1"),
        ]);

        let error = SecretBundle::select(&data, &cluster_secret_keys("demo"), "secret/illumio")
            .err()
            .map(|error| error.to_string())
            .unwrap_or_default();
        assert!(error.contains("container_cluster_token"));
        assert!(!error.contains("abc"));
    }

    #[test]
    fn cluster_secrets_view_maps_fields_in_order() {
        let data = raw(&[
            ("demo_container_cluster_id", "abc"),
            ("demo_container_cluster_token", "xyz"),
            ("demo_container_cluster_code", "c1"),
        ]);
        let bundle =
            SecretBundle::select(&data, &cluster_secret_keys("demo"), "secret/illumio").unwrap();
        let secrets = ClusterSecrets::from_bundle("demo", &bundle, "secret/illumio").unwrap();

        assert_eq!(secrets.cluster_id(), "abc");
        assert_eq!(secrets.cluster_token(), "xyz");
        assert_eq!(secrets.cluster_code(), "c1");
    }

    #[test]
    fn bundle_debug_output_redacts_values() {
        let data = raw(&[("api_user", "user"), ("api_key", "topsecret")]);
        let bundle = SecretBundle::select(&data, &platform_secret_keys(), "secret/pce").unwrap();

        let printed = format!("{bundle:?}");
        assert!(!printed.contains("topsecret"));
    }
}
