// SPDX-FileCopyrightText: 2026 CampusMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory sessions keyed by uid, and the submit path through the response flow.

use std::sync::{Arc, Mutex, MutexGuard};

use campusmind_core::CampusMindError;
use campusmind_core::types::ChatTurn;
use campusmind_flows::FlowService;
use dashmap::DashMap;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::session::ChatSession;

/// The assistant's reply to one submission.
#[derive(Debug, Clone, Serialize)]
pub struct Exchange {
    pub response: String,
    pub turn: ChatTurn,
}

/// All live chat sessions.
#[derive(Default)]
pub struct ChatRegistry {
    sessions: DashMap<String, Arc<Mutex<ChatSession>>>,
}

fn lock(session: &Mutex<ChatSession>) -> MutexGuard<'_, ChatSession> {
    session.lock().unwrap_or_else(|e| e.into_inner())
}

impl ChatRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn session(&self, uid: &str) -> Arc<Mutex<ChatSession>> {
        self.sessions
            .entry(uid.to_string())
            .or_insert_with(|| {
                debug!(uid, "chat session created");
                Arc::new(Mutex::new(ChatSession::new(uid)))
            })
            .clone()
    }

    /// The transcript so far. Empty for users who never chatted.
    pub fn transcript(&self, uid: &str) -> Vec<ChatTurn> {
        let Some(session) = self.sessions.get(uid).map(|entry| entry.clone()) else {
            return Vec::new();
        };
        let turns = lock(&session).turns().to_vec();
        turns
    }

    /// Forgets a user's transcript.
    pub fn end(&self, uid: &str) {
        if self.sessions.remove(uid).is_some() {
            info!(uid, "chat session ended");
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Appends the user's message, runs the response flow, appends the reply.
    ///
    /// The session lock is released while the flow runs; the `AwaitingReply`
    /// state is what keeps a second submission out. The flow call and the
    /// settle run on their own task, so a caller that goes away mid-flight
    /// still leaves the session settled and idle.
    pub async fn submit(
        &self,
        uid: &str,
        text: &str,
        flows: &FlowService,
    ) -> Result<Exchange, CampusMindError> {
        let session = self.session(uid);
        let input = lock(&session).begin(text)?;

        let flows = flows.clone();
        let round_trip = tokio::spawn(async move {
            let output = flows.respond(&input).await;
            let turn = lock(&session).settle(output.response.clone())?;
            Ok(Exchange {
                response: output.response,
                turn,
            })
        });

        round_trip.await.map_err(|e| {
            warn!(uid, error = %e, "chat reply task did not complete");
            CampusMindError::Internal(format!("chat reply task failed: {e}"))
        })?
    }
}
