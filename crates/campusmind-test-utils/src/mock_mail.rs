// SPDX-FileCopyrightText: 2026 CampusMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use campusmind_core::CampusMindError;
use campusmind_core::traits::{MailAdapter, PluginAdapter};
use campusmind_core::types::{AdapterType, HealthStatus, SupportEmail};

/// A mail transport that records instead of sending.
#[derive(Default)]
pub struct MockMail {
    sent: Mutex<Vec<SupportEmail>>,
    failing: AtomicBool,
}

impl MockMail {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every send fail with a mail error.
    pub fn fail(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Emails accepted so far.
    pub fn sent(&self) -> Vec<SupportEmail> {
        self.sent.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl PluginAdapter for MockMail {
    fn name(&self) -> &str {
        "mock-mail"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Mail
    }

    async fn health_check(&self) -> Result<HealthStatus, CampusMindError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), CampusMindError> {
        Ok(())
    }
}

#[async_trait]
impl MailAdapter for MockMail {
    async fn send(&self, email: &SupportEmail) -> Result<(), CampusMindError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(CampusMindError::Mail {
                message: "mock relay refused the message".to_string(),
                source: None,
            });
        }
        self.sent
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(email.clone());
        Ok(())
    }
}
