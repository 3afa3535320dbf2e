// SPDX-FileCopyrightText: 2026 CampusMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! [`IdentityAdapter`] over the Firebase Identity Toolkit REST API.

use std::time::Duration;

use async_trait::async_trait;
use campusmind_config::model::FirebaseConfig;
use campusmind_core::error::CampusMindError;
use campusmind_core::traits::{IdentityAdapter, PluginAdapter};
use campusmind_core::types::{
    AdapterType, HealthStatus, NewUser, ProfileUpdate, Role, SessionClaims, SessionCookie,
    UserRecord,
};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::service_account::{ServiceAccount, TokenSource};
use crate::verifier::{SESSION_KEYS_URL, SessionVerifier};

const DEFAULT_BASE_URL: &str = "https://identitytoolkit.googleapis.com";

/// Provider-side page size cap for `accounts:batchGet`.
pub const MAX_PAGE_SIZE: usize = 1000;

/// Session lifetimes the provider accepts.
const MIN_SESSION: Duration = Duration::from_secs(5 * 60);
const MAX_SESSION: Duration = Duration::from_secs(14 * 24 * 60 * 60);

/// Account as returned by `accounts:lookup` / `accounts:batchGet`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountInfo {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    photo_url: Option<String>,
    #[serde(default)]
    disabled: bool,
    /// JSON-encoded custom claims.
    #[serde(default)]
    custom_attributes: Option<String>,
    /// Epoch seconds before which issued sessions are revoked.
    #[serde(default)]
    valid_since: Option<String>,
}

impl From<AccountInfo> for UserRecord {
    fn from(info: AccountInfo) -> Self {
        let role = info
            .custom_attributes
            .as_deref()
            .map(role_from_attributes)
            .unwrap_or_default();
        UserRecord {
            uid: info.local_id,
            email: info.email,
            display_name: info.display_name,
            photo_url: info.photo_url,
            disabled: info.disabled,
            role,
        }
    }
}

fn role_from_attributes(attributes: &str) -> Role {
    match serde_json::from_str::<Value>(attributes) {
        Ok(claims) if claims.get("admin").and_then(Value::as_bool) == Some(true) => Role::Admin,
        Ok(_) => Role::Student,
        Err(e) => {
            warn!(error = %e, "ignoring unparseable custom claims");
            Role::Student
        }
    }
}

#[derive(Deserialize)]
struct AccountList {
    #[serde(default)]
    users: Vec<AccountInfo>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatedAccount {
    local_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    id_token: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionCookieResponse {
    session_cookie: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// Firebase-backed identity provider.
pub struct FirebaseIdentity {
    http: reqwest::Client,
    base_url: String,
    project_id: String,
    web_api_key: Option<String>,
    tokens: TokenSource,
    verifier: SessionVerifier,
}

impl FirebaseIdentity {
    /// Builds the adapter, or returns `Ok(None)` when no service account is configured.
    pub fn from_config(config: &FirebaseConfig) -> Result<Option<Self>, CampusMindError> {
        let Some(account) = ServiceAccount::discover(config, |var| std::env::var(var).ok())? else {
            info!("no service account configured; identity features disabled");
            return Ok(None);
        };
        let base_url = config
            .identity_base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let keys_url = match &config.identity_base_url {
            Some(base) => format!("{}/v1/sessionCookiePublicKeys", base.trim_end_matches('/')),
            None => SESSION_KEYS_URL.to_string(),
        };
        let project_id = config
            .project_id
            .clone()
            .unwrap_or_else(|| account.project_id.clone());
        Self::new(&account, &project_id, &base_url, &keys_url, config.web_api_key.clone()).map(Some)
    }

    /// Builds the adapter against explicit endpoints.
    pub fn new(
        account: &ServiceAccount,
        project_id: &str,
        base_url: &str,
        keys_url: &str,
        web_api_key: Option<String>,
    ) -> Result<Self, CampusMindError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| CampusMindError::Identity {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;
        let tokens = TokenSource::new(account, http.clone())?;
        let verifier = SessionVerifier::new(http.clone(), keys_url, project_id);
        info!(project_id, "Firebase identity adapter initialized");
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            project_id: project_id.to_string(),
            web_api_key,
            tokens,
            verifier,
        })
    }

    fn project_url(&self, op: &str) -> String {
        format!("{}/v1/projects/{}{op}", self.base_url, self.project_id)
    }

    async fn lookup(&self, uid: &str) -> Result<Option<AccountInfo>, CampusMindError> {
        let list: AccountList = self
            .admin_post(
                &self.project_url("/accounts:lookup"),
                &json!({"localId": [uid]}),
            )
            .await?;
        Ok(list.users.into_iter().next())
    }

    /// POSTs an authorized admin call and decodes the reply.
    async fn admin_post<T: DeserializeOwned>(
        &self,
        url: &str,
        body: &Value,
    ) -> Result<T, CampusMindError> {
        let token = self.tokens.access_token().await?;
        let response = self
            .http
            .post(url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;
        decode(response).await
    }

    async fn update(&self, body: Value) -> Result<(), CampusMindError> {
        let url = self.project_url("/accounts:update");
        let _: Value = self.admin_post(&url, &body).await?;
        Ok(())
    }
}

fn transport_error(e: reqwest::Error) -> CampusMindError {
    CampusMindError::Identity {
        message: format!("identity request failed: {e}"),
        source: Some(Box::new(e)),
    }
}

/// Decodes a success body, or maps the provider's error code.
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, CampusMindError> {
    let status = response.status();
    let body = response.text().await.map_err(transport_error)?;
    if status.is_success() {
        return serde_json::from_str(&body).map_err(|e| CampusMindError::Identity {
            message: format!("unexpected identity response: {e}"),
            source: Some(Box::new(e)),
        });
    }

    let code = serde_json::from_str::<ErrorEnvelope>(&body)
        .map(|env| env.error.message)
        .unwrap_or_default();
    debug!(status = %status, code = %code, "identity provider rejected request");
    Err(map_error_code(&code, status))
}

/// Maps Identity Toolkit error codes (e.g. `EMAIL_EXISTS : ...`) to domain errors.
fn map_error_code(message: &str, status: reqwest::StatusCode) -> CampusMindError {
    let code = message.split([' ', ':']).next().unwrap_or_default();
    match code {
        "EMAIL_EXISTS" | "DUPLICATE_EMAIL" => CampusMindError::EmailAlreadyExists,
        "INVALID_LOGIN_CREDENTIALS" | "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "USER_DISABLED"
        | "INVALID_ID_TOKEN" | "TOKEN_EXPIRED" | "USER_NOT_FOUND" if status.as_u16() == 400 => {
            CampusMindError::Unauthenticated(code.to_string())
        }
        "INVALID_EMAIL" => CampusMindError::validation("email", "Please enter a valid email address."),
        "WEAK_PASSWORD" => CampusMindError::validation(
            "password",
            "Password must be at least 6 characters long.",
        ),
        _ => CampusMindError::Identity {
            message: if message.is_empty() {
                format!("identity provider returned {status}")
            } else {
                format!("identity provider returned {status}: {message}")
            },
            source: None,
        },
    }
}

#[async_trait]
impl PluginAdapter for FirebaseIdentity {
    fn name(&self) -> &str {
        "firebase"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Identity
    }

    async fn health_check(&self) -> Result<HealthStatus, CampusMindError> {
        match self.tokens.access_token().await {
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(e.to_string())),
        }
    }

    async fn shutdown(&self) -> Result<(), CampusMindError> {
        debug!("Firebase identity adapter shutting down");
        Ok(())
    }
}

/// Disabled accounts and sessions minted before the account's
/// `validSince` are refused even when the cookie itself is still valid.
fn check_session_standing(
    account: &AccountInfo,
    claims: &SessionClaims,
) -> Result<(), CampusMindError> {
    if account.disabled {
        return Err(CampusMindError::Unauthenticated("user is disabled".into()));
    }
    let valid_since = account
        .valid_since
        .as_deref()
        .and_then(|v| v.parse::<i64>().ok());
    if valid_since.is_some_and(|since| claims.issued_at < since) {
        return Err(CampusMindError::Unauthenticated("session has been revoked".into()));
    }
    Ok(())
}

#[async_trait]
impl IdentityAdapter for FirebaseIdentity {
    async fn create_user(&self, user: NewUser) -> Result<UserRecord, CampusMindError> {
        let mut body = json!({"email": user.email, "password": user.password});
        if let Some(name) = &user.display_name {
            body["displayName"] = json!(name);
        }
        let created: CreatedAccount = self.admin_post(&self.project_url("/accounts"), &body).await?;
        info!(uid = %created.local_id, "account created");
        Ok(UserRecord {
            uid: created.local_id,
            email: Some(user.email),
            display_name: user.display_name,
            photo_url: None,
            disabled: false,
            role: Role::Student,
        })
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<String, CampusMindError> {
        let key = self.web_api_key.as_deref().ok_or_else(|| {
            CampusMindError::NotConfigured(
                "Password sign-in requires firebase.web_api_key to be set.".into(),
            )
        })?;
        let response = self
            .http
            .post(format!("{}/v1/accounts:signInWithPassword?key={key}", self.base_url))
            .json(&json!({"email": email, "password": password, "returnSecureToken": true}))
            .send()
            .await
            .map_err(transport_error)?;
        let signed_in: SignInResponse = decode(response).await?;
        Ok(signed_in.id_token)
    }

    async fn create_session_cookie(
        &self,
        id_token: &str,
        valid_for: Duration,
    ) -> Result<SessionCookie, CampusMindError> {
        if !(MIN_SESSION..=MAX_SESSION).contains(&valid_for) {
            return Err(CampusMindError::validation(
                "validDuration",
                "session lifetime must be between 5 minutes and 14 days",
            ));
        }
        let body = json!({"idToken": id_token, "validDuration": valid_for.as_secs()});
        let minted: SessionCookieResponse = self
            .admin_post(&self.project_url(":createSessionCookie"), &body)
            .await?;
        Ok(SessionCookie {
            value: minted.session_cookie,
            max_age: valid_for,
        })
    }

    async fn verify_session_cookie(&self, cookie: &str) -> Result<SessionClaims, CampusMindError> {
        let claims = self.verifier.verify(cookie).await?;
        let account = self.lookup(&claims.uid).await?.ok_or_else(|| {
            CampusMindError::Unauthenticated("session user no longer exists".into())
        })?;
        check_session_standing(&account, &claims)?;
        Ok(claims)
    }

    async fn get_user(&self, uid: &str) -> Result<UserRecord, CampusMindError> {
        self.lookup(uid)
            .await?
            .map(UserRecord::from)
            .ok_or_else(|| CampusMindError::NotFound(format!("user {uid}")))
    }

    async fn list_users(&self, max_results: usize) -> Result<Vec<UserRecord>, CampusMindError> {
        let max = max_results.clamp(1, MAX_PAGE_SIZE);
        let token = self.tokens.access_token().await?;
        let response = self
            .http
            .get(self.project_url(&format!("/accounts:batchGet?maxResults={max}")))
            .bearer_auth(token)
            .send()
            .await
            .map_err(transport_error)?;
        let list: AccountList = decode(response).await?;
        debug!(count = list.users.len(), "listed accounts");
        Ok(list.users.into_iter().map(UserRecord::from).collect())
    }

    async fn set_disabled(&self, uid: &str, disabled: bool) -> Result<(), CampusMindError> {
        self.update(json!({"localId": uid, "disableUser": disabled}))
            .await?;
        info!(uid, disabled, "account status updated");
        Ok(())
    }

    async fn update_profile(
        &self,
        uid: &str,
        update: ProfileUpdate,
    ) -> Result<(), CampusMindError> {
        let mut body = json!({"localId": uid});
        if let Some(name) = update.display_name {
            body["displayName"] = json!(name);
        }
        if let Some(photo) = update.photo_url {
            body["photoUrl"] = json!(photo);
        }
        self.update(body).await
    }

    async fn set_role(&self, uid: &str, role: Role) -> Result<(), CampusMindError> {
        let claims = match role {
            Role::Admin => json!({"admin": true}),
            Role::Student => json!({}),
        };
        self.update(json!({"localId": uid, "customAttributes": claims.to_string()}))
            .await?;
        info!(uid, role = %role, "role claim updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::{self, tests::{TEST_JWKS, TEST_KEY_PEM}};

    #[test]
    fn error_codes_map_to_domain_errors() {
        let bad = reqwest::StatusCode::BAD_REQUEST;
        assert!(matches!(
            map_error_code("EMAIL_EXISTS", bad),
            CampusMindError::EmailAlreadyExists
        ));
        assert!(matches!(
            map_error_code("INVALID_LOGIN_CREDENTIALS", bad),
            CampusMindError::Unauthenticated(_)
        ));
        assert!(matches!(
            map_error_code("WEAK_PASSWORD : Password should be at least 6 characters", bad),
            CampusMindError::Validation { .. }
        ));
        assert!(matches!(
            map_error_code("", reqwest::StatusCode::INTERNAL_SERVER_ERROR),
            CampusMindError::Identity { .. }
        ));
    }

    fn account(disabled: bool, valid_since: Option<&str>) -> AccountInfo {
        AccountInfo {
            local_id: "uid-42".into(),
            email: None,
            display_name: None,
            photo_url: None,
            disabled,
            custom_attributes: None,
            valid_since: valid_since.map(str::to_string),
        }
    }

    fn session(issued_at: i64) -> SessionClaims {
        SessionClaims {
            uid: "uid-42".into(),
            email: None,
            issued_at,
            expires_at: issued_at + 3600,
            role: Role::Student,
        }
    }

    #[test]
    fn session_standing_rejects_disabled_and_revoked() {
        assert!(check_session_standing(&account(false, None), &session(1_000)).is_ok());
        assert!(check_session_standing(&account(false, Some("900")), &session(1_000)).is_ok());
        assert!(matches!(
            check_session_standing(&account(true, None), &session(1_000)),
            Err(CampusMindError::Unauthenticated(_))
        ));
        assert!(matches!(
            check_session_standing(&account(false, Some("1200")), &session(1_000)),
            Err(CampusMindError::Unauthenticated(_))
        ));
    }

    async fn identity_with_account(disabled: bool) -> (wiremock::MockServer, FirebaseIdentity) {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "ya29.admin",
                "expires_in": 3600
            })))
            .mount(&server)
            .await;
        let jwks: Value = serde_json::from_str(TEST_JWKS).unwrap();
        Mock::given(method("GET"))
            .and(path("/keys"))
            .respond_with(ResponseTemplate::new(200).set_body_json(jwks))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/projects/campusmind-test/accounts:lookup"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "users": [{"localId": "uid-42", "disabled": disabled}]
            })))
            .mount(&server)
            .await;

        let service_account = ServiceAccount {
            project_id: "campusmind-test".into(),
            client_email: "svc@campusmind-test.iam.gserviceaccount.com".into(),
            private_key: TEST_KEY_PEM.into(),
            private_key_id: None,
            token_uri: format!("{}/token", server.uri()),
        };
        let identity = FirebaseIdentity::new(
            &service_account,
            "campusmind-test",
            &server.uri(),
            &format!("{}/keys", server.uri()),
            None,
        )
        .unwrap();
        (server, identity)
    }

    fn signed_cookie() -> String {
        let key = jwt::key_pair_from_pem(TEST_KEY_PEM).unwrap();
        let now = chrono::Utc::now().timestamp();
        jwt::sign_rs256(
            &key,
            Some("test-kid"),
            &json!({
                "iss": "https://session.firebase.google.com/campusmind-test",
                "aud": "campusmind-test",
                "sub": "uid-42",
                "iat": now,
                "exp": now + 3600,
            }),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn enabled_account_keeps_its_session() {
        let (_server, identity) = identity_with_account(false).await;
        let claims = identity.verify_session_cookie(&signed_cookie()).await.unwrap();
        assert_eq!(claims.uid, "uid-42");
    }

    #[tokio::test]
    async fn disabled_account_loses_a_valid_session() {
        let (_server, identity) = identity_with_account(true).await;
        let err = identity
            .verify_session_cookie(&signed_cookie())
            .await
            .unwrap_err();
        assert!(matches!(err, CampusMindError::Unauthenticated(_)), "got {err:?}");
    }

    #[test]
    fn custom_attributes_drive_role() {
        assert_eq!(role_from_attributes(r#"{"admin":true}"#), Role::Admin);
        assert_eq!(role_from_attributes(r#"{"admin":false}"#), Role::Student);
        assert_eq!(role_from_attributes("not json"), Role::Student);
    }
}
