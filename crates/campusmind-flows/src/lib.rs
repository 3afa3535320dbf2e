// SPDX-FileCopyrightText: 2026 CampusMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt flow runtime for CampusMind.
//!
//! Two flows share one runtime: the response flow produces a short
//! empathetic reply, the triage flow classifies the user's need into one of
//! four categories. Both are schema-in/schema-out contracts over a hosted
//! model.

pub mod prompts;
pub mod runtime;
pub mod schema;
pub mod service;

pub use runtime::PromptFlows;
pub use service::FlowService;
