// SPDX-FileCopyrightText: 2026 CampusMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `campusmind grant-admin` command implementation.
//!
//! Administrator access is a role claim on the identity record; this is the
//! only place that writes it.

use campusmind_config::model::CampusMindConfig;
use campusmind_core::CampusMindError;
use campusmind_core::traits::IdentityAdapter;
use campusmind_core::types::Role;
use campusmind_identity::{FirebaseIdentity, NOT_CONFIGURED_MESSAGE};

/// Runs the `campusmind grant-admin` command.
pub async fn run_grant_admin(
    config: &CampusMindConfig,
    uid: &str,
    revoke: bool,
) -> Result<(), CampusMindError> {
    let identity = FirebaseIdentity::from_config(&config.firebase)?
        .ok_or_else(|| CampusMindError::NotConfigured(NOT_CONFIGURED_MESSAGE.to_string()))?;
    let role = apply_role(&identity, uid, revoke).await?;
    println!("campusmind: {uid} now has the {role} role");
    println!("  The change applies to sessions created from now on.");
    Ok(())
}

/// Looks the account up first so a mistyped uid fails before any write.
pub(crate) async fn apply_role(
    identity: &dyn IdentityAdapter,
    uid: &str,
    revoke: bool,
) -> Result<Role, CampusMindError> {
    let role = if revoke { Role::Student } else { Role::Admin };
    let user = identity.get_user(uid).await?;
    if user.role == role {
        return Ok(role);
    }
    identity.set_role(uid, role).await?;
    tracing::info!(uid, %role, "role updated");
    Ok(role)
}

#[cfg(test)]
mod tests {
    use campusmind_core::types::UserRecord;
    use campusmind_test_utils::MockIdentity;

    use super::*;

    fn student(uid: &str) -> UserRecord {
        UserRecord {
            uid: uid.into(),
            email: Some(format!("{uid}@campus.edu")),
            display_name: None,
            photo_url: None,
            disabled: false,
            role: Role::Student,
        }
    }

    #[tokio::test]
    async fn grant_then_revoke() {
        let identity = MockIdentity::with_users(vec![student("u1")]);
        assert_eq!(apply_role(&identity, "u1", false).await.unwrap(), Role::Admin);
        assert_eq!(identity.user("u1").unwrap().role, Role::Admin);

        assert_eq!(apply_role(&identity, "u1", true).await.unwrap(), Role::Student);
        assert_eq!(identity.user("u1").unwrap().role, Role::Student);
    }

    #[tokio::test]
    async fn unknown_uid_is_not_found() {
        let identity = MockIdentity::new();
        assert!(matches!(
            apply_role(&identity, "ghost", false).await,
            Err(CampusMindError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn unchanged_role_skips_the_write() {
        let identity = MockIdentity::with_users(vec![student("u1")]);
        identity.fail_mutations(true);
        assert_eq!(apply_role(&identity, "u1", true).await.unwrap(), Role::Student);
    }
}
