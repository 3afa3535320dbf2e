// SPDX-FileCopyrightText: 2026 CampusMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory identity provider.
//!
//! Accounts live in a vector, passwords and session cookies in maps. ID
//! tokens are `mock-id-token:<uid>`; session cookies are opaque counters
//! that only this instance will verify.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;

use campusmind_core::CampusMindError;
use campusmind_core::traits::{IdentityAdapter, PluginAdapter};
use campusmind_core::types::{
    AdapterType, HealthStatus, NewUser, ProfileUpdate, Role, SessionClaims, SessionCookie,
    UserRecord,
};

const ID_TOKEN_PREFIX: &str = "mock-id-token:";

#[derive(Default)]
struct Accounts {
    users: Vec<UserRecord>,
    passwords: HashMap<String, (String, String)>,
    sessions: HashMap<String, SessionClaims>,
}

pub struct MockIdentity {
    accounts: Mutex<Accounts>,
    fail_mutations: AtomicBool,
    next_id: AtomicU64,
}

impl MockIdentity {
    pub fn new() -> Self {
        Self::with_users(Vec::new())
    }

    pub fn with_users(users: Vec<UserRecord>) -> Self {
        Self {
            accounts: Mutex::new(Accounts {
                users,
                ..Accounts::default()
            }),
            fail_mutations: AtomicBool::new(false),
            next_id: AtomicU64::new(1),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Accounts> {
        self.accounts.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Make `set_disabled`, `update_profile` and `set_role` fail.
    pub fn fail_mutations(&self, fail: bool) {
        self.fail_mutations.store(fail, Ordering::SeqCst);
    }

    /// Current state of one record.
    pub fn user(&self, uid: &str) -> Option<UserRecord> {
        self.lock().users.iter().find(|u| u.uid == uid).cloned()
    }

    /// Mints a session cookie for `uid` without going through sign-in.
    ///
    /// The role is taken from the stored record, defaulting to student.
    pub fn issue_session(&self, uid: &str) -> String {
        let mut accounts = self.lock();
        let record = accounts.users.iter().find(|u| u.uid == uid);
        let now = unix_now();
        let claims = SessionClaims {
            uid: uid.to_string(),
            email: record.and_then(|u| u.email.clone()),
            issued_at: now,
            expires_at: now + 60 * 60 * 24 * 5,
            role: record.map(|u| u.role).unwrap_or_default(),
        };
        let value = format!("mock-session-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        accounts.sessions.insert(value.clone(), claims);
        value
    }

    /// Number of session cookies minted so far.
    pub fn session_count(&self) -> usize {
        self.lock().sessions.len()
    }

    fn mutation_guard(&self) -> Result<(), CampusMindError> {
        if self.fail_mutations.load(Ordering::SeqCst) {
            Err(CampusMindError::Identity {
                message: "mock identity refused the mutation".to_string(),
                source: None,
            })
        } else {
            Ok(())
        }
    }

    fn with_record<T>(
        &self,
        uid: &str,
        f: impl FnOnce(&mut UserRecord) -> T,
    ) -> Result<T, CampusMindError> {
        let mut accounts = self.lock();
        let record = accounts
            .users
            .iter_mut()
            .find(|u| u.uid == uid)
            .ok_or_else(|| CampusMindError::NotFound(format!("user {uid}")))?;
        Ok(f(record))
    }
}

impl Default for MockIdentity {
    fn default() -> Self {
        Self::new()
    }
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}

#[async_trait]
impl PluginAdapter for MockIdentity {
    fn name(&self) -> &str {
        "mock-identity"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Identity
    }

    async fn health_check(&self) -> Result<HealthStatus, CampusMindError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), CampusMindError> {
        Ok(())
    }
}

#[async_trait]
impl IdentityAdapter for MockIdentity {
    async fn create_user(&self, user: NewUser) -> Result<UserRecord, CampusMindError> {
        let mut accounts = self.lock();
        let email = user.email.to_lowercase();
        if accounts.passwords.contains_key(&email)
            || accounts
                .users
                .iter()
                .any(|u| u.email.as_deref().map(str::to_lowercase).as_deref() == Some(email.as_str()))
        {
            return Err(CampusMindError::EmailAlreadyExists);
        }
        let record = UserRecord {
            uid: format!("uid-{}", self.next_id.fetch_add(1, Ordering::SeqCst)),
            email: Some(user.email),
            display_name: user.display_name,
            photo_url: None,
            disabled: false,
            role: Role::Student,
        };
        accounts
            .passwords
            .insert(email, (user.password, record.uid.clone()));
        accounts.users.push(record.clone());
        Ok(record)
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<String, CampusMindError> {
        let accounts = self.lock();
        match accounts.passwords.get(&email.to_lowercase()) {
            Some((stored, uid)) if stored == password => Ok(format!("{ID_TOKEN_PREFIX}{uid}")),
            _ => Err(CampusMindError::Unauthenticated(
                "INVALID_LOGIN_CREDENTIALS".to_string(),
            )),
        }
    }

    async fn create_session_cookie(
        &self,
        id_token: &str,
        valid_for: Duration,
    ) -> Result<SessionCookie, CampusMindError> {
        let uid = id_token
            .strip_prefix(ID_TOKEN_PREFIX)
            .ok_or_else(|| CampusMindError::Unauthenticated("INVALID_ID_TOKEN".to_string()))?;
        Ok(SessionCookie {
            value: self.issue_session(uid),
            max_age: valid_for,
        })
    }

    async fn verify_session_cookie(&self, cookie: &str) -> Result<SessionClaims, CampusMindError> {
        let accounts = self.lock();
        let claims = accounts
            .sessions
            .get(cookie)
            .cloned()
            .ok_or_else(|| CampusMindError::Unauthenticated("session cookie is invalid".into()))?;
        let disabled = accounts
            .users
            .iter()
            .any(|u| u.uid == claims.uid && u.disabled);
        if disabled {
            return Err(CampusMindError::Unauthenticated("user is disabled".into()));
        }
        Ok(claims)
    }

    async fn get_user(&self, uid: &str) -> Result<UserRecord, CampusMindError> {
        self.user(uid)
            .ok_or_else(|| CampusMindError::NotFound(format!("user {uid}")))
    }

    async fn list_users(&self, max_results: usize) -> Result<Vec<UserRecord>, CampusMindError> {
        Ok(self.lock().users.iter().take(max_results).cloned().collect())
    }

    async fn set_disabled(&self, uid: &str, disabled: bool) -> Result<(), CampusMindError> {
        self.mutation_guard()?;
        self.with_record(uid, |u| u.disabled = disabled)
    }

    async fn update_profile(
        &self,
        uid: &str,
        update: ProfileUpdate,
    ) -> Result<(), CampusMindError> {
        self.mutation_guard()?;
        self.with_record(uid, |u| {
            if let Some(name) = update.display_name {
                u.display_name = Some(name);
            }
            if let Some(url) = update.photo_url {
                u.photo_url = Some(url);
            }
        })
    }

    async fn set_role(&self, uid: &str, role: Role) -> Result<(), CampusMindError> {
        self.mutation_guard()?;
        self.with_record(uid, |u| u.role = role)
    }
}
