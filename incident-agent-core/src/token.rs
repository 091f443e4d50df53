//! IBM Cloud IAM token exchange.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, error};

use crate::contract::{BearerToken, TokenProvider};
use crate::error::AuthError;

/// Public IAM token exchange endpoint.
pub const DEFAULT_TOKEN_URL: &str = "https://iam.cloud.ibm.com/identity/token";

const GRANT_TYPE: &str = "urn:ibm:params:oauth:grant-type:apikey";
const EXCHANGE_TIMEOUT: Duration = Duration::from_secs(20);

/// Exchanges a long-lived API key for a short-lived bearer token.
///
/// Performs a fresh exchange on every call. Tokens are not cached, so the
/// workflow never has to reason about expiry mid-attempt; the cost is one
/// extra round trip per store call.
pub struct IamTokenProvider {
    client: reqwest::Client,
    token_url: String,
    api_key: String,
}

impl IamTokenProvider {
    pub fn new(token_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            token_url: token_url.into(),
            api_key: api_key.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

#[async_trait]
impl TokenProvider for IamTokenProvider {
    async fn bearer_token(&self) -> Result<BearerToken, AuthError> {
        let response = self
            .client
            .post(&self.token_url)
            .timeout(EXCHANGE_TIMEOUT)
            .form(&[("grant_type", GRANT_TYPE), ("apikey", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, "Token exchange returned an error status");
            return Err(AuthError::ExchangeFailed {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: TokenResponse = response.json().await?;
        match parsed.access_token {
            Some(access_token) if !access_token.is_empty() => {
                debug!("Obtained fresh bearer token");
                Ok(BearerToken { access_token })
            }
            _ => {
                error!("Token exchange response carried no access_token");
                Err(AuthError::MissingAccessToken)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_keeps_the_configured_endpoint() {
        let provider = IamTokenProvider::new("https://iam.example.test/token", "key-123");
        assert_eq!(provider.token_url, "https://iam.example.test/token");
        assert_eq!(provider.api_key, "key-123");
    }

    #[test]
    fn missing_token_error_matches_operator_wording() {
        assert_eq!(
            AuthError::MissingAccessToken.to_string(),
            "missing access_token from IAM response"
        );
    }
}
