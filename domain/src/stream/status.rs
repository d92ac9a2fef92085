//! Stream session lifecycle.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Lifecycle state of one streaming exchange.
///
/// ```text
/// idle ──submit──▶ sending ──connected──▶ streaming ──exhausted──▶ done
///                     │                      │
///                     ├──failed / cancel──┐  ├──cancel──▶ cancelled
///                     ▼                   │  └──error───▶ errored
///                  errored           cancelled
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamStatus {
    #[default]
    Idle,
    Sending,
    Streaming,
    Done,
    Cancelled,
    Errored,
}

impl StreamStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StreamStatus::Idle => "idle",
            StreamStatus::Sending => "sending",
            StreamStatus::Streaming => "streaming",
            StreamStatus::Done => "done",
            StreamStatus::Cancelled => "cancelled",
            StreamStatus::Errored => "errored",
        }
    }

    /// Terminal states are never left.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            StreamStatus::Done | StreamStatus::Cancelled | StreamStatus::Errored
        )
    }

    pub fn can_transition_to(&self, next: StreamStatus) -> bool {
        use StreamStatus::*;
        matches!(
            (self, next),
            (Idle, Sending)
                | (Sending, Streaming)
                | (Sending, Cancelled)
                | (Sending, Errored)
                | (Streaming, Done)
                | (Streaming, Cancelled)
                | (Streaming, Errored)
        )
    }

    /// Validated transition.
    pub fn transition(self, next: StreamStatus) -> Result<StreamStatus, DomainError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(DomainError::InvalidTransition {
                from: self.as_str(),
                to: next.as_str(),
            })
        }
    }
}

impl std::fmt::Display for StreamStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_transitions() {
        let s = StreamStatus::Idle
            .transition(StreamStatus::Sending)
            .and_then(|s| s.transition(StreamStatus::Streaming))
            .and_then(|s| s.transition(StreamStatus::Done))
            .unwrap();
        assert_eq!(s, StreamStatus::Done);
        assert!(s.is_terminal());
    }

    #[test]
    fn terminal_states_are_sticky() {
        for terminal in [StreamStatus::Done, StreamStatus::Cancelled, StreamStatus::Errored] {
            for next in [
                StreamStatus::Idle,
                StreamStatus::Sending,
                StreamStatus::Streaming,
                StreamStatus::Done,
            ] {
                assert!(!terminal.can_transition_to(next), "{terminal} -> {next}");
            }
        }
    }

    #[test]
    fn idle_cannot_skip_sending() {
        let err = StreamStatus::Idle.transition(StreamStatus::Streaming).unwrap_err();
        assert_eq!(
            err,
            DomainError::InvalidTransition {
                from: "idle",
                to: "streaming"
            }
        );
    }

    #[test]
    fn sending_can_be_cancelled_before_connect() {
        assert!(StreamStatus::Sending.can_transition_to(StreamStatus::Cancelled));
        assert!(!StreamStatus::Sending.can_transition_to(StreamStatus::Done));
    }
}
