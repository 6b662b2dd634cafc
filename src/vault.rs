use crate::common::error::{Result, VaultLoginUrlAbsent};
use crate::opts::CliArgs;
use snafu::OptionExt;
use url::Url;

/// Vault HTTP API client.
pub(crate) mod client;

/// Secret bundles and per-cluster key derivation.
pub(crate) mod secrets;

/// Connection and lookup configuration for the Vault secret store. Built once at
/// startup from the CLI options, then handed to the components which need it. No
/// component reads process environment state directly.
#[derive(Clone)]
pub(crate) struct VaultConfig {
    service_account_token: String,
    environment: String,
    login_urls: Vec<Url>,
    platform_creds_url: Url,
    cluster_secrets_url: Url,
}

impl VaultConfig {
    /// Resolve the Vault configuration from the CLI options. The 'prod' environment
    /// requires both the primary (STL) and secondary (PHX) login endpoints; any other
    /// environment requires the single login endpoint.
    pub(crate) fn from_cli(opts: &CliArgs) -> Result<Self> {
        let environment = opts.environment();

        let login_urls = match environment.as_str() {
            "prod" => {
                let primary = opts.stl_vault_login().context(VaultLoginUrlAbsent {
                    environment: environment.clone(),
                    variable: "STL_VAULT_LOGIN".to_string(),
                })?;
                let secondary = opts.phx_vault_login().context(VaultLoginUrlAbsent {
                    environment: environment.clone(),
                    variable: "PHX_VAULT_LOGIN".to_string(),
                })?;
                vec![primary, secondary]
            }
            _ => {
                let url = opts.vault_login().context(VaultLoginUrlAbsent {
                    environment: environment.clone(),
                    variable: "VAULT_LOGIN".to_string(),
                })?;
                vec![url]
            }
        };

        Ok(Self {
            service_account_token: opts.sa_token(),
            environment,
            login_urls,
            platform_creds_url: opts.platform_creds_path(),
            cluster_secrets_url: opts.cluster_secrets_path(),
        })
    }

    /// This returns the service-account JWT used for the Vault login.
    pub(crate) fn service_account_token(&self) -> &str {
        self.service_account_token.as_str()
    }

    /// This returns the deployment environment name.
    pub(crate) fn environment(&self) -> &str {
        self.environment.as_str()
    }

    /// This returns the ordered set of Vault login endpoints for the environment.
    pub(crate) fn login_urls(&self) -> &[Url] {
        self.login_urls.as_slice()
    }

    /// This returns the Vault path holding the platform API credentials.
    pub(crate) fn platform_creds_url(&self) -> &Url {
        &self.platform_creds_url
    }

    /// This returns the Vault path holding the per-cluster install secrets.
    pub(crate) fn cluster_secrets_url(&self) -> &Url {
        &self.cluster_secrets_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::error::Error;
    use clap::Parser;

    fn base_args() -> Vec<&'static str> {
        vec![
            "illumio-install",
            "--cluster-name",
            "demo",
            "--sa-token",
            "jwt-value",
            "--platform-creds-path",
            "https://vault.test/v1/secret/pce",
            "--cluster-secrets-path",
            "https://vault.test/v1/secret/illumio",
        ]
    }

    #[test]
    fn non_prod_uses_the_single_login_endpoint() {
        let mut args = base_args();
        args.extend(["--environment", "dev", "--vault-login", "https://vault.dev/login"]);
        let opts = CliArgs::parse_from(args);

        let config = VaultConfig::from_cli(&opts).unwrap();
        assert_eq!(config.login_urls().len(), 1);
        assert_eq!(config.login_urls()[0].as_str(), "https://vault.dev/login");
    }

    #[test]
    fn prod_requires_primary_and_secondary_endpoints() {
        let mut args = base_args();
        args.extend([
            "--environment",
            "prod",
            "--stl-vault-login",
            "https://vault-stl.prod/login",
        ]);
        let opts = CliArgs::parse_from(args);

        match VaultConfig::from_cli(&opts) {
            Err(Error::VaultLoginUrlAbsent { variable, .. }) => {
                assert_eq!(variable, "PHX_VAULT_LOGIN")
            }
            Err(other) => panic!("expected VaultLoginUrlAbsent, got {other:?}"),
            Ok(_) => panic!("expected VaultLoginUrlAbsent, got a config"),
        }
    }

    #[test]
    fn prod_login_endpoints_are_ordered_primary_first() {
        let mut args = base_args();
        args.extend([
            "--environment",
            "prod",
            "--stl-vault-login",
            "https://vault-stl.prod/login",
            "--phx-vault-login",
            "https://vault-phx.prod/login",
        ]);
        let opts = CliArgs::parse_from(args);

        let config = VaultConfig::from_cli(&opts).unwrap();
        let urls: Vec<&str> = config.login_urls().iter().map(Url::as_str).collect();
        assert_eq!(
            urls,
            vec![
                "https://vault-stl.prod/login",
                "https://vault-phx.prod/login"
            ]
        );
    }
}
