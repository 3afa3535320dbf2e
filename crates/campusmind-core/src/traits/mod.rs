// SPDX-FileCopyrightText: 2026 CampusMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions for CampusMind's external collaborators.
//!
//! All adapters extend the [`PluginAdapter`] base trait and use
//! `#[async_trait]` for dynamic dispatch compatibility.

pub mod adapter;
pub mod flow;
pub mod identity;
pub mod mail;
pub mod model;

pub use adapter::PluginAdapter;
pub use flow::FlowAdapter;
pub use identity::IdentityAdapter;
pub use mail::MailAdapter;
pub use model::ModelAdapter;
