// SPDX-FileCopyrightText: 2026 CampusMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Identity adapter trait for the external identity provider.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::CampusMindError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{NewUser, ProfileUpdate, Role, SessionClaims, SessionCookie, UserRecord};

/// Adapter for the identity provider that owns user records and session credentials.
///
/// CampusMind never mints or inspects credentials itself; every credential
/// operation is delegated here.
#[async_trait]
pub trait IdentityAdapter: PluginAdapter {
    /// Creates a new account.
    async fn create_user(&self, user: NewUser) -> Result<UserRecord, CampusMindError>;

    /// Exchanges an email/password pair for a short-lived ID token.
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<String, CampusMindError>;

    /// Exchanges a short-lived ID token for a long-lived session credential.
    async fn create_session_cookie(
        &self,
        id_token: &str,
        valid_for: Duration,
    ) -> Result<SessionCookie, CampusMindError>;

    /// Verifies a session credential's signature, expiry, issuer, and audience,
    /// and that its account is still enabled and has not revoked it.
    async fn verify_session_cookie(&self, cookie: &str) -> Result<SessionClaims, CampusMindError>;

    /// Fetches one user record.
    async fn get_user(&self, uid: &str) -> Result<UserRecord, CampusMindError>;

    /// Lists user records, up to the provider's page size.
    async fn list_users(&self, max_results: usize) -> Result<Vec<UserRecord>, CampusMindError>;

    /// Enables or disables an account.
    async fn set_disabled(&self, uid: &str, disabled: bool) -> Result<(), CampusMindError>;

    /// Updates profile fields on an account.
    async fn update_profile(&self, uid: &str, update: ProfileUpdate)
    -> Result<(), CampusMindError>;

    /// Attaches a role claim to an account.
    async fn set_role(&self, uid: &str, role: Role) -> Result<(), CampusMindError>;
}
