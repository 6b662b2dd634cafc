use crate::{
    common::{
        constants::{VAULT_LOGIN_ROLE, VAULT_REQUEST_TIMEOUT},
        error::{
            HttpClientBuild, Result, SecretsRequest, SecretsRequestDenied, SecretsResponseParse,
            VaultAuthDenied, VaultAuthRequest, VaultAuthResponseParse, VaultUnreachable,
        },
    },
    vault::{secrets::SecretBundle, VaultConfig},
};
use serde::{Deserialize, Serialize};
use snafu::{ensure, ResultExt};
use std::{collections::HashMap, fmt};
use tracing::{info, warn};
use url::Url;

/// Request body for the Kubernetes-auth style Vault login.
#[derive(Serialize)]
struct LoginRequest<'a> {
    jwt: &'a str,
    role: &'a str,
}

/// This struct is used to deserialize the Vault login response.
#[derive(Deserialize)]
struct LoginResponse {
    auth: LoginAuth,
}

#[derive(Deserialize)]
struct LoginAuth {
    client_token: String,
}

/// This struct is used to deserialize a Vault secrets read response.
#[derive(Deserialize)]
struct SecretsResponse {
    data: HashMap<String, String>,
}

/// An authenticated Vault session: the client token, and the environment which selected
/// the login endpoint. Created once per run and discarded at process exit.
pub(crate) struct AuthSession {
    client_token: String,
    environment: String,
}

impl AuthSession {
    /// This returns the environment the session was established for.
    pub(crate) fn environment(&self) -> &str {
        self.environment.as_str()
    }
}

// The client token is a credential, keep it out of logs.
impl fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSession")
            .field("environment", &self.environment)
            .field("client_token", &"<redacted>")
            .finish()
    }
}

/// This type authenticates against the Vault HTTP API and fetches secret bundles.
pub(crate) struct VaultClient {
    http: reqwest::Client,
    session: AuthSession,
}

impl VaultClient {
    /// Log in to Vault with the service-account JWT. The 'prod' environment has a
    /// primary and a secondary endpoint, tried in order, and authentication fails only
    /// if both fail. Every other environment has a single endpoint whose failure is
    /// surfaced immediately. There are no retries against any one endpoint.
    pub(crate) async fn authenticate(config: &VaultConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(VAULT_REQUEST_TIMEOUT)
            .build()
            .context(HttpClientBuild)?;

        let body = LoginRequest {
            jwt: config.service_account_token(),
            role: VAULT_LOGIN_ROLE,
        };

        let mut last_error = None;
        for url in config.login_urls() {
            match login(&http, url, &body).await {
                Ok(client_token) => {
                    info!(%url, "Authenticated to Vault");
                    return Ok(Self {
                        http,
                        session: AuthSession {
                            client_token,
                            environment: config.environment().to_string(),
                        },
                    });
                }
                Err(error) => {
                    warn!(%url, %error, "Vault login attempt failed");
                    last_error = Some(error);
                }
            }
        }

        match last_error {
            Some(error) if config.login_urls().len() == 1 => Err(error),
            _ => VaultUnreachable {
                environment: config.environment().to_string(),
            }
            .fail(),
        }
    }

    /// This returns the authenticated session.
    pub(crate) fn session(&self) -> &AuthSession {
        &self.session
    }

    /// Fetch the secrets at `url` and select `keys` out of the response. Fails listing
    /// the missing keys if any requested key is absent.
    pub(crate) async fn fetch_secrets(&self, url: &Url, keys: &[String]) -> Result<SecretBundle> {
        let response = self
            .http
            .get(url.clone())
            .header("X-Vault-Token", self.session.client_token.as_str())
            .send()
            .await
            .context(SecretsRequest { url: url.clone() })?;

        ensure!(
            response.status().is_success(),
            SecretsRequestDenied {
                url: url.clone(),
                status_code: response.status(),
            }
        );

        let body: SecretsResponse = response
            .json()
            .await
            .context(SecretsResponseParse { url: url.clone() })?;

        SecretBundle::select(&body.data, keys, url.as_str())
    }
}

/// Run one login call against one endpoint.
async fn login(http: &reqwest::Client, url: &Url, body: &LoginRequest<'_>) -> Result<String> {
    let response = http
        .post(url.clone())
        .json(body)
        .send()
        .await
        .context(VaultAuthRequest { url: url.clone() })?;

    ensure!(
        response.status().is_success(),
        VaultAuthDenied {
            url: url.clone(),
            status_code: response.status(),
        }
    );

    let login: LoginResponse = response
        .json()
        .await
        .context(VaultAuthResponseParse { url: url.clone() })?;

    Ok(login.auth.client_token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_response_parses_the_client_token() {
        let raw = r#"{"auth": {"client_token": "s.1234", "lease_duration": 3600}}"#;
        let response: LoginResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.auth.client_token, "s.1234");
    }

    #[test]
    fn secrets_response_parses_the_data_map() {
        let raw = r#"{"request_id": "r1", "data": {"api_user": "u", "api_key": "k"}}"#;
        let response: SecretsResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.data.get("api_key").map(String::as_str), Some("k"));
    }

    #[test]
    fn auth_session_debug_redacts_the_token() {
        let session = AuthSession {
            client_token: "s.supersecret".to_string(),
            environment: "dev".to_string(),
        };
        let printed = format!("{session:?}");
        assert!(!printed.contains("supersecret"));
        assert!(printed.contains("dev"));
    }
}
