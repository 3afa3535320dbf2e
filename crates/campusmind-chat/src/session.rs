// SPDX-FileCopyrightText: 2026 CampusMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Transcript FSM for a single user's conversation.
//!
//! Idle -> AwaitingReply on `begin`, AwaitingReply -> Idle on `settle`.
//! The transcript only ever grows, and at most one submission is in flight.

use campusmind_core::CampusMindError;
use campusmind_core::types::{ChatTurn, ResponseFlowInput, Sender, TurnId};
use serde::Serialize;

/// States in the chat session FSM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Ready for the next message.
    Idle,
    /// A user turn has been appended and its reply has not settled.
    AwaitingReply,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionState::Idle => write!(f, "idle"),
            SessionState::AwaitingReply => write!(f, "awaiting_reply"),
        }
    }
}

/// One user's transcript.
#[derive(Debug)]
pub struct ChatSession {
    uid: String,
    state: SessionState,
    turns: Vec<ChatTurn>,
    next_id: u64,
}

impl ChatSession {
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            state: SessionState::Idle,
            turns: Vec::new(),
            next_id: 1,
        }
    }

    pub fn uid(&self) -> &str {
        &self.uid
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    fn append(&mut self, sender: Sender, text: String) -> ChatTurn {
        let turn = ChatTurn {
            id: TurnId(self.next_id),
            sender,
            text,
            created_at: chrono::Utc::now().to_rfc3339(),
        };
        self.next_id += 1;
        self.turns.push(turn.clone());
        turn
    }

    /// Appends the user's turn and waits for a reply.
    ///
    /// Blank text is rejected without touching the transcript.
    pub fn begin(&mut self, text: &str) -> Result<ResponseFlowInput, CampusMindError> {
        if self.state == SessionState::AwaitingReply {
            return Err(CampusMindError::Busy);
        }
        let input = ResponseFlowInput::new(text)?;
        self.append(Sender::User, input.user_input.clone());
        self.state = SessionState::AwaitingReply;
        Ok(input)
    }

    /// Appends the assistant's turn and returns to idle.
    pub fn settle(&mut self, reply: String) -> Result<ChatTurn, CampusMindError> {
        if self.state != SessionState::AwaitingReply {
            return Err(CampusMindError::Internal(format!(
                "settle called while {}",
                self.state
            )));
        }
        let turn = self.append(Sender::Assistant, reply);
        self.state = SessionState::Idle;
        Ok(turn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn begin_then_settle_alternates() {
        let mut session = ChatSession::new("u1");
        session.begin("hello").unwrap();
        assert_eq!(session.state(), SessionState::AwaitingReply);
        let reply = session.settle("Hey! How's your day going?".into()).unwrap();
        assert_eq!(reply.sender, Sender::Assistant);
        assert_eq!(reply.id, TurnId(2));
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn second_begin_while_awaiting_is_busy() {
        let mut session = ChatSession::new("u1");
        session.begin("one").unwrap();
        assert!(matches!(session.begin("two"), Err(CampusMindError::Busy)));
        assert_eq!(session.turns().len(), 1);
    }

    #[test]
    fn blank_input_leaves_transcript_untouched() {
        let mut session = ChatSession::new("u1");
        let err = session.begin("   ").unwrap_err();
        assert_eq!(err.user_message(), "Please enter a message.");
        assert!(session.turns().is_empty());
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn settle_without_begin_is_rejected() {
        let mut session = ChatSession::new("u1");
        assert!(session.settle("orphan".into()).is_err());
        assert!(session.turns().is_empty());
    }

    proptest! {
        #[test]
        fn n_exchanges_yield_2n_alternating_turns(
            messages in proptest::collection::vec("[a-z]{1,12}( [a-z]{1,12}){0,3}", 0..20)
        ) {
            let mut session = ChatSession::new("u1");
            for (i, message) in messages.iter().enumerate() {
                session.begin(message).unwrap();
                session.settle(format!("reply {i}")).unwrap();
            }

            let turns = session.turns();
            prop_assert_eq!(turns.len(), messages.len() * 2);
            for (i, turn) in turns.iter().enumerate() {
                let expected = if i % 2 == 0 { Sender::User } else { Sender::Assistant };
                prop_assert_eq!(turn.sender, expected);
                prop_assert_eq!(turn.id, TurnId(i as u64 + 1));
            }
            prop_assert_eq!(session.state(), SessionState::Idle);
        }
    }
}
