// SPDX-FileCopyrightText: 2026 CampusMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Model adapter trait for hosted generative-language models.

use async_trait::async_trait;

use crate::error::CampusMindError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ModelRequest, ModelResponse};

/// Adapter for a hosted language model.
///
/// Model adapters only move a rendered prompt to the model and bring the raw
/// text back; schema validation of that text belongs to the flow runtime.
#[async_trait]
pub trait ModelAdapter: PluginAdapter {
    /// Sends a single-shot generation request and returns the full reply.
    async fn generate(&self, request: ModelRequest) -> Result<ModelResponse, CampusMindError>;
}
