// =============================================================================
// SERVICE ACCOUNT AUTHENTICATION
// =============================================================================
//
// Exchanges a signed JWT for a Google OAuth2 access token, the same flow the
// official client libraries use for service accounts:
//
// 1. Read the JSON key (`credentials.json` by default).
// 2. Sign `{iss, scope, aud, iat, exp}` with the key's RSA private key (RS256).
// 3. POST the assertion to the key's `token_uri`.
//
// The destination folder must be shared with the key's `client_email`.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::core::errors::HelperError;
use crate::infra::http::{build_client, ensure_success};

pub const DRIVE_SCOPE: &str = "https://www.googleapis.com/auth/drive";

const JWT_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const TOKEN_LIFETIME_SECS: i64 = 3600;

/// Anything that can hand out a bearer token for Google APIs.
#[async_trait]
pub trait AccessTokenSource: Send + Sync {
    async fn access_token(&self) -> Result<String, HelperError>;
}

/// Service account credentials from the JSON key file.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    /// The service account email (used as issuer in JWT).
    pub client_email: String,

    /// The private key in PEM format.
    pub private_key: String,

    /// The token URI (where to exchange JWT for access token).
    #[serde(default = "default_token_uri")]
    pub token_uri: String,

    /// Scopes to request. Standard key files omit this.
    #[serde(default)]
    pub scopes: Vec<String>,
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

impl ServiceAccountKey {
    pub async fn from_file(path: &Path) -> Result<Self, HelperError> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            HelperError::invalid_input(format!(
                "Cannot read service account key {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self, HelperError> {
        serde_json::from_str(json).map_err(|e| {
            HelperError::authentication(format!("Malformed service account key: {}", e))
        })
    }
}

/// JWT claims for Google OAuth2.
#[derive(Debug, Serialize)]
struct JwtClaims {
    iss: String,
    scope: String,
    aud: String,
    iat: i64,
    exp: i64,
}

/// Response from Google's token endpoint.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

/// Cached access token with expiration (unix seconds).
struct CachedToken {
    token: String,
    expires_at: i64,
}

/// Authenticator that handles OAuth2 with service account credentials.
pub struct ServiceAccountAuth {
    key: ServiceAccountKey,
    encoding_key: EncodingKey,
    scopes: Vec<String>,
    client: Client,
    cached_token: RwLock<Option<CachedToken>>,
}

impl ServiceAccountAuth {
    /// Validates the PEM up front so a broken key fails before any request.
    pub fn new(key: ServiceAccountKey, timeout: Duration) -> Result<Self, HelperError> {
        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes()).map_err(|e| {
            HelperError::authentication(format!("Service account private key is unusable: {}", e))
        })?;
        let scopes = if key.scopes.is_empty() {
            vec![DRIVE_SCOPE.to_string()]
        } else {
            key.scopes.clone()
        };

        Ok(Self {
            key,
            encoding_key,
            scopes,
            client: build_client(None, timeout)?,
            cached_token: RwLock::new(None),
        })
    }

    pub async fn from_file(path: &Path, timeout: Duration) -> Result<Self, HelperError> {
        let key = ServiceAccountKey::from_file(path).await?;
        Self::new(key, timeout)
    }

    pub fn client_email(&self) -> &str {
        &self.key.client_email
    }

    fn signed_assertion(&self, now: i64) -> Result<String, HelperError> {
        let claims = JwtClaims {
            iss: self.key.client_email.clone(),
            scope: self.scopes.join(" "),
            aud: self.key.token_uri.clone(),
            iat: now,
            exp: now + TOKEN_LIFETIME_SECS,
        };

        encode(&Header::new(Algorithm::RS256), &claims, &self.encoding_key)
            .map_err(|e| HelperError::authentication(format!("Failed to sign JWT: {}", e)))
    }

    /// Fetches a new access token from Google.
    async fn fetch_new_token(&self) -> Result<CachedToken, HelperError> {
        let now = Utc::now().timestamp();
        let assertion = self.signed_assertion(now)?;

        tracing::debug!("Exchanging JWT for {} at {}", self.key.client_email, self.key.token_uri);
        let response = self
            .client
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_GRANT_TYPE), ("assertion", assertion.as_str())])
            .send()
            .await?;

        let response = ensure_success(response, "Token exchange")
            .await
            .map_err(|e| match e {
                // Any rejection at the token endpoint is a credential problem.
                HelperError::NotFound {
                    status: status @ Some(_),
                    message,
                }
                | HelperError::Permission {
                    status: status @ Some(_),
                    message,
                }
                | HelperError::RemoteService {
                    status: status @ Some(_),
                    message,
                } => HelperError::Authentication { status, message },
                other => other,
            })?;

        let token: TokenResponse = response.json().await.map_err(|e| {
            HelperError::authentication(format!("Token endpoint returned an unreadable body: {}", e))
        })?;

        Ok(CachedToken {
            token: token.access_token,
            expires_at: now + token.expires_in.unwrap_or(TOKEN_LIFETIME_SECS),
        })
    }
}

#[async_trait]
impl AccessTokenSource for ServiceAccountAuth {
    /// Gets a valid access token, refreshing if necessary.
    async fn access_token(&self) -> Result<String, HelperError> {
        {
            let cached = self.cached_token.read().await;
            if let Some(token) = cached.as_ref() {
                if token.expires_at > Utc::now().timestamp() + 60 {
                    return Ok(token.token.clone());
                }
            }
        }

        let fresh = self.fetch_new_token().await?;
        let token = fresh.token.clone();
        *self.cached_token.write().await = Some(fresh);

        tracing::info!("Authenticated as {}", self.key.client_email);
        Ok(token)
    }
}

/// A fixed token the caller already holds.
pub struct StaticToken(pub String);

#[async_trait]
impl AccessTokenSource for StaticToken {
    async fn access_token(&self) -> Result<String, HelperError> {
        Ok(self.0.clone())
    }
}
