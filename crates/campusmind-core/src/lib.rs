// SPDX-FileCopyrightText: 2026 CampusMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for CampusMind.
//!
//! This crate provides the trait definitions, error types, and common types
//! shared by every CampusMind crate. Each external collaborator (hosted
//! model, identity provider, mail transport) sits behind a trait defined here.

pub mod error;
pub mod traits;
pub mod types;
pub mod validation;

// Re-export key items at crate root for ergonomic imports.
pub use error::CampusMindError;
pub use types::{AdapterType, Capabilities, HealthStatus, Role, TurnId};

pub use traits::{FlowAdapter, IdentityAdapter, MailAdapter, ModelAdapter, PluginAdapter};
