//! Pipeline status tracking
//!
//! A small deterministic state machine over the discrete events the pipeline
//! emits. Kept as a pure reducer, entirely separate from the async
//! coordinator, so it can be unit-tested without any asynchronous harness.
//!
//! The waiting-library set mirrors the in-flight request set: a library is a
//! member from fetch-started until fetch-finished (success or failure), and
//! membership is unique.

use crate::domain::LibraryKey;
use crate::profile::Profile;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Discrete events observable at the pipeline boundary.
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    ProfileWaitStarted,
    ProfileReceived(Arc<Profile>),
    SymbolicationStarted,
    SymbolicationStep(Arc<Profile>),
    SymbolicationFinished,
    LibraryFetchStarted(LibraryKey),
    LibraryFetchFinished(LibraryKey),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolicationStatus {
    NotStarted,
    InProgress,
    Done,
}

/// Pipeline phase plus the current profile snapshot and in-flight libraries.
#[derive(Debug, Clone, Default)]
pub enum AppState {
    #[default]
    Idle,
    WaitingForProfile,
    HasProfile {
        profile: Arc<Profile>,
        symbolication: SymbolicationStatus,
        waiting_for_libs: BTreeSet<LibraryKey>,
    },
}

impl AppState {
    /// Short phase name for logging.
    #[must_use]
    pub fn phase(&self) -> &'static str {
        match self {
            AppState::Idle => "idle",
            AppState::WaitingForProfile => "waiting-for-profile",
            AppState::HasProfile { symbolication: SymbolicationStatus::NotStarted, .. } => {
                "has-profile"
            }
            AppState::HasProfile { symbolication: SymbolicationStatus::InProgress, .. } => {
                "symbolicating"
            }
            AppState::HasProfile { symbolication: SymbolicationStatus::Done, .. } => "done",
        }
    }

    /// Libraries currently being fetched, when a profile is present.
    #[must_use]
    pub fn waiting_for_libs(&self) -> Option<&BTreeSet<LibraryKey>> {
        match self {
            AppState::HasProfile { waiting_for_libs, .. } => Some(waiting_for_libs),
            _ => None,
        }
    }

    /// Latest profile snapshot, when one has been received.
    #[must_use]
    pub fn profile(&self) -> Option<&Arc<Profile>> {
        match self {
            AppState::HasProfile { profile, .. } => Some(profile),
            _ => None,
        }
    }
}

/// Apply one event to the state. Events that do not apply to the current
/// phase leave the state unchanged.
#[must_use]
pub fn reduce(state: AppState, event: &PipelineEvent) -> AppState {
    match (state, event) {
        (_, PipelineEvent::ProfileWaitStarted) => AppState::WaitingForProfile,

        (_, PipelineEvent::ProfileReceived(profile)) => AppState::HasProfile {
            profile: Arc::clone(profile),
            symbolication: SymbolicationStatus::NotStarted,
            waiting_for_libs: BTreeSet::new(),
        },

        (AppState::HasProfile { profile, waiting_for_libs, .. }, PipelineEvent::SymbolicationStarted) => {
            AppState::HasProfile {
                profile,
                symbolication: SymbolicationStatus::InProgress,
                waiting_for_libs,
            }
        }

        (
            AppState::HasProfile { symbolication, waiting_for_libs, .. },
            PipelineEvent::SymbolicationStep(snapshot),
        ) => AppState::HasProfile {
            profile: Arc::clone(snapshot),
            symbolication,
            waiting_for_libs,
        },

        (AppState::HasProfile { profile, .. }, PipelineEvent::SymbolicationFinished) => {
            AppState::HasProfile {
                profile,
                symbolication: SymbolicationStatus::Done,
                waiting_for_libs: BTreeSet::new(),
            }
        }

        (
            AppState::HasProfile { profile, symbolication, mut waiting_for_libs },
            PipelineEvent::LibraryFetchStarted(key),
        ) => {
            waiting_for_libs.insert(key.clone());
            AppState::HasProfile { profile, symbolication, waiting_for_libs }
        }

        (
            AppState::HasProfile { profile, symbolication, mut waiting_for_libs },
            PipelineEvent::LibraryFetchFinished(key),
        ) => {
            waiting_for_libs.remove(key);
            AppState::HasProfile { profile, symbolication, waiting_for_libs }
        }

        (state, _) => state,
    }
}
