// SPDX-FileCopyrightText: 2026 CampusMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for CampusMind integration tests.
//!
//! Provides mock adapters and a router harness for fast, deterministic,
//! CI-runnable tests without external services.
//!
//! # Components
//!
//! - [`MockModel`] - scripted hosted model
//! - [`MockFlows`] - scripted flow runtime
//! - [`MockIdentity`] - in-memory identity provider that mints session cookies
//! - [`MockMail`] - mail transport that records what it was asked to send
//! - [`TestHarness`] - full router over the mocks, driven with `oneshot`

pub mod harness;
pub mod mock_flows;
pub mod mock_identity;
pub mod mock_mail;
pub mod mock_model;

pub use harness::{TestHarness, TestResponse};
pub use mock_flows::MockFlows;
pub use mock_identity::MockIdentity;
pub use mock_mail::MockMail;
pub use mock_model::MockModel;
