use std::path::PathBuf;

use async_trait::async_trait;
use yup_oauth2::{InstalledFlowAuthenticator, InstalledFlowReturnMethod};

/// Sending mail is the only thing this tool does, so it asks for nothing more.
pub const SCOPES: &[&str] = &["https://www.googleapis.com/auth/gmail.send"];

/// OAuth client secret downloaded from the Google Cloud console. Read-only;
/// this program never writes it.
pub const CLIENT_SECRET_FILE: &str = "credentials.json";

/// Token cache written by the authorization flow and reused across runs.
pub const TOKEN_CACHE_FILE: &str = "token.json";

// Credential acquisition behind a trait so callers can inject a test double.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn access_token(&self) -> Result<String, Box<dyn std::error::Error + Send + Sync>>;
}

/// Real provider backed by yup-oauth2's installed-application flow. The
/// library owns the cache states: a valid cached token is used as-is, an
/// expired one with a refresh token is refreshed in place, and anything else
/// (no cache, no refresh token, failed refresh) falls back to the interactive
/// browser flow. Fresh tokens are persisted back to the cache file.
pub struct InstalledFlowTokenProvider {
    pub client_secret_path: PathBuf,
    pub token_cache_path: PathBuf,
}

impl Default for InstalledFlowTokenProvider {
    fn default() -> Self {
        Self {
            client_secret_path: PathBuf::from(CLIENT_SECRET_FILE),
            token_cache_path: PathBuf::from(TOKEN_CACHE_FILE),
        }
    }
}

#[async_trait]
impl TokenProvider for InstalledFlowTokenProvider {
    async fn access_token(&self) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let secret = match yup_oauth2::read_application_secret(&self.client_secret_path).await {
            Ok(secret) => secret,
            Err(e) => {
                eprintln!(
                    "Failed to read {}: {}",
                    self.client_secret_path.display(),
                    e
                );
                eprintln!(
                    "Download an OAuth client secret for a desktop application from the Google Cloud console and save it as {}.",
                    self.client_secret_path.display()
                );
                return Err("Client secret not found.".into());
            }
        };

        let auth = InstalledFlowAuthenticator::builder(secret, InstalledFlowReturnMethod::HTTPRedirect)
            .persist_tokens_to_disk(&self.token_cache_path)
            .build()
            .await?;

        let token = auth.token(SCOPES).await?;
        match token.token() {
            Some(token) => Ok(token.to_string()),
            None => Err("Authorization flow returned no access token.".into()),
        }
    }
}
