//! Service account authentication for Google APIs.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::client::DriveClient;
use crate::error::{DriveError, Result};
use crate::models::{ServiceAccountCredentials, TokenResponse};

/// Google OAuth2 token endpoint.
const TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Google Drive API scope. Read/write over the whole drive.
const DRIVE_SCOPE: &str = "https://www.googleapis.com/auth/drive";

/// Lifetime requested for each assertion.
const ASSERTION_LIFETIME_SECS: u64 = 3600;

/// JWT claims for service account authentication.
#[derive(Debug, Serialize)]
struct Claims {
    iss: String,   // Issuer (service account email)
    scope: String, // OAuth scope
    aud: String,   // Audience (token endpoint)
    exp: u64,      // Expiration time
    iat: u64,      // Issued at
}

/// Cached access token with expiration.
#[derive(Clone)]
struct CachedToken {
    access_token: String,
    expires_at: SystemTime,
}

/// Authenticator for Google APIs using service account credentials.
#[derive(Clone)]
pub struct Authenticator {
    client_email: String,
    token_uri: String,
    key: Arc<EncodingKey>,
    client: Client,
    cached_token: Arc<RwLock<Option<CachedToken>>>,
}

impl Authenticator {
    /// Create a new authenticator from a service account JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| DriveError::CredentialsFileError {
            path: path.to_path_buf(),
            source,
        })?;
        let credentials: ServiceAccountCredentials = serde_json::from_str(&content)?;
        Self::new(credentials)
    }

    /// Create a new authenticator from credentials.
    ///
    /// The private key is parsed and used once to sign a throwaway assertion,
    /// so a corrupted key fails here instead of on the first API call.
    pub fn new(credentials: ServiceAccountCredentials) -> Result<Self> {
        let key = EncodingKey::from_rsa_pem(credentials.private_key.as_bytes())?;
        let token_uri = credentials
            .token_uri
            .unwrap_or_else(|| TOKEN_URI.to_string());

        let auth = Self {
            client_email: credentials.client_email,
            token_uri,
            key: Arc::new(key),
            client: Client::new(),
            cached_token: Arc::new(RwLock::new(None)),
        };
        auth.sign_assertion()?;
        Ok(auth)
    }

    /// Service account identity.
    pub fn client_email(&self) -> &str {
        &self.client_email
    }

    /// Get a valid access token, refreshing if necessary.
    pub async fn get_access_token(&self) -> Result<String> {
        {
            let cached = self.cached_token.read().await;
            if let Some(token) = cached.as_ref() {
                // Add 60 second buffer before expiration
                let buffer = Duration::from_secs(60);
                if token.expires_at > SystemTime::now() + buffer {
                    return Ok(token.access_token.clone());
                }
            }
        }

        let new_token = self.refresh_token().await?;

        {
            let mut cached = self.cached_token.write().await;
            *cached = Some(new_token.clone());
        }

        Ok(new_token.access_token)
    }

    fn sign_assertion(&self) -> Result<String> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| DriveError::TokenRefreshError(format!("system clock error: {}", e)))?
            .as_secs();

        let claims = Claims {
            iss: self.client_email.clone(),
            scope: DRIVE_SCOPE.to_string(),
            aud: self.token_uri.clone(),
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        };

        let header = Header::new(Algorithm::RS256);
        Ok(encode(&header, &claims, &self.key)?)
    }

    /// Exchange a freshly signed JWT for an access token.
    async fn refresh_token(&self) -> Result<CachedToken> {
        let jwt = self.sign_assertion()?;
        debug!(token_uri = %self.token_uri, "requesting access token");

        let params = [
            ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
            ("assertion", &jwt),
        ];

        let response = self
            .client
            .post(&self.token_uri)
            .form(&params)
            .send()
            .await
            .map_err(|e| DriveError::TokenRefreshError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DriveError::TokenRefreshError(format!(
                "Status {}: {}",
                status, body
            )));
        }

        let token_response: TokenResponse = response
            .json()
            .await
            .map_err(|e| DriveError::TokenRefreshError(e.to_string()))?;

        let expires_at = SystemTime::now() + Duration::from_secs(token_response.expires_in);

        Ok(CachedToken {
            access_token: token_response.access_token,
            expires_at,
        })
    }
}

/// Load a service-account credential and build an authenticated Drive handle.
///
/// No network traffic happens here; the first access token is fetched by the
/// first API call.
pub fn authenticate(credentials_path: Option<&Path>, api_base: Option<&str>) -> Result<DriveClient> {
    let path = credentials_path.ok_or(DriveError::CredentialsMissing)?;
    let auth = Authenticator::from_file(path)?;
    debug!(client_email = %auth.client_email(), "loaded service account");

    let client = match api_base {
        Some(base) => DriveClient::with_api_base(auth, base),
        None => DriveClient::new(auth),
    };
    info!("Authentication successful.");
    Ok(client)
}
