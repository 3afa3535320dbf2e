// SPDX-FileCopyrightText: 2026 CampusMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The administrative user listing and its enable/disable toggle.
//!
//! The listing is a local snapshot of the provider's records. A toggle is
//! applied to the snapshot first, then sent to the provider; if the provider
//! refuses, the inverse is applied so the snapshot never disagrees with the
//! provider for longer than one call.

use std::sync::{Arc, Mutex, MutexGuard};

use campusmind_core::CampusMindError;
use campusmind_core::traits::IdentityAdapter;
use campusmind_core::types::{Capabilities, UserRecord};
use serde::Serialize;
use tracing::{info, warn};

use crate::firebase::MAX_PAGE_SIZE;

/// Toast-style notification returned by a toggle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub variant: NotificationVariant,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationVariant {
    Default,
    Destructive,
}

impl Notification {
    fn success(disabled: bool) -> Self {
        Self {
            variant: NotificationVariant::Default,
            title: "Success".into(),
            description: format!(
                "User has been {}.",
                if disabled { "disabled" } else { "enabled" }
            ),
        }
    }

    fn failure(message: String) -> Self {
        Self {
            variant: NotificationVariant::Destructive,
            title: "Error".into(),
            description: message,
        }
    }
}

/// Result of a toggle: the record as it now stands, plus the notification.
#[derive(Debug, Clone, Serialize)]
pub struct ToggleOutcome {
    pub user: UserRecord,
    pub applied: bool,
    pub notification: Notification,
}

/// Snapshot of user records with optimistic mutation.
pub struct UserDirectory {
    identity: Arc<dyn IdentityAdapter>,
    users: Mutex<Vec<UserRecord>>,
}

impl UserDirectory {
    pub fn new(identity: Arc<dyn IdentityAdapter>) -> Self {
        Self {
            identity,
            users: Mutex::new(Vec::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<UserRecord>> {
        // A poisoned snapshot is still a valid list of records.
        self.users.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Reloads the snapshot from the provider, capped at one page.
    pub async fn refresh(&self) -> Result<Vec<UserRecord>, CampusMindError> {
        let fresh = self.identity.list_users(MAX_PAGE_SIZE).await?;
        info!(count = fresh.len(), "user directory refreshed");
        *self.lock() = fresh.clone();
        Ok(fresh)
    }

    /// Current snapshot.
    pub fn users(&self) -> Vec<UserRecord> {
        self.lock().clone()
    }

    fn set_local(&self, uid: &str, disabled: bool) -> Option<UserRecord> {
        let mut users = self.lock();
        let user = users.iter_mut().find(|u| u.uid == uid)?;
        user.disabled = disabled;
        Some(user.clone())
    }

    /// Sets `disabled` on one record, optimistically.
    ///
    /// Remote failures do not surface as `Err`: the local change is reverted
    /// and the outcome carries an error notification. `Err` is reserved for
    /// requests that are refused before anything is applied.
    pub async fn toggle_disabled(
        &self,
        uid: &str,
        disabled: bool,
    ) -> Result<ToggleOutcome, CampusMindError> {
        let prior = {
            let users = self.lock();
            let target = users
                .iter()
                .find(|u| u.uid == uid)
                .ok_or_else(|| CampusMindError::NotFound(format!("user {uid}")))?;
            if target.can_administer() {
                return Err(CampusMindError::Forbidden(
                    "administrator accounts cannot be disabled".into(),
                ));
            }
            target.disabled
        };

        let applied = self.set_local(uid, disabled);
        match self.identity.set_disabled(uid, disabled).await {
            Ok(()) => {
                info!(uid, disabled, "user status changed");
                let user = applied.ok_or_else(|| CampusMindError::NotFound(format!("user {uid}")))?;
                Ok(ToggleOutcome {
                    user,
                    applied: true,
                    notification: Notification::success(disabled),
                })
            }
            Err(e) => {
                warn!(uid, disabled, prior, error = %e, "status change failed, reverting");
                let user = self
                    .set_local(uid, prior)
                    .ok_or_else(|| CampusMindError::NotFound(format!("user {uid}")))?;
                let message = match &e {
                    CampusMindError::Identity { message, .. } => message.clone(),
                    _ => "Failed to update user status.".to_string(),
                };
                Ok(ToggleOutcome {
                    user,
                    applied: false,
                    notification: Notification::failure(message),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_notification_names_the_new_state() {
        assert_eq!(
            Notification::success(true).description,
            "User has been disabled."
        );
        assert_eq!(
            Notification::success(false).description,
            "User has been enabled."
        );
    }
}
