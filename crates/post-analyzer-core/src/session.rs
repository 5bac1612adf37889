//! Extraction session state machine.
//!
//! A [`Session`] owns the state of one file's journey from selection to
//! result. The extraction task never touches that state directly: it sends
//! [`SessionEvent`]s over a channel and the session applies them in order.
//!
//! ```text
//! Idle ──Started──▶ Loading ──Progress──▶ Loading
//!                      │
//!                      ├──Completed──▶ Success
//!                      └──Failed─────▶ Failed
//! (any) ──Reset──▶ Idle
//! ```

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::analysis::{self, AnalysisReport, Thresholds};
use crate::error::ExtractError;
use crate::extract::{Extractor, InputFile, Progress};

/// Current state of a session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Nothing selected yet, or the session was reset.
    #[default]
    Idle,
    /// Extraction is running.
    Loading {
        /// Status line for the user.
        message: String,
        /// Percent complete, once the backend has reported any.
        progress: Option<u8>,
    },
    /// Extraction finished.
    Success {
        /// Full extracted text (possibly empty).
        text: String,
        /// Analysis of `text`.
        report: AnalysisReport,
    },
    /// Extraction or selection failed.
    Failed {
        /// Human-readable reason.
        message: String,
        /// Whether running the same file again may help.
        retryable: bool,
    },
}

impl SessionState {
    /// Whether extraction is in flight.
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    /// Whether the session ended in a failure that allows a retry.
    pub const fn can_retry(&self) -> bool {
        matches!(self, Self::Failed { retryable: true, .. })
    }
}

/// Messages sent from an extraction task to the session owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Extraction began.
    Started {
        /// Status line for the user.
        message: String,
    },
    /// Percent complete.
    Progress(u8),
    /// Extraction produced text.
    Completed(String),
    /// Extraction or selection failed.
    Failed {
        /// Human-readable reason.
        message: String,
        /// Whether running the same file again may help.
        retryable: bool,
    },
    /// Return to idle, discarding any result.
    Reset,
}

impl From<&ExtractError> for SessionEvent {
    fn from(err: &ExtractError) -> Self {
        Self::Failed {
            message: err.to_string(),
            retryable: err.is_retryable(),
        }
    }
}

/// Owner of one extraction session's state.
#[derive(Debug, Clone, Default)]
pub struct Session {
    state: SessionState,
    thresholds: Thresholds,
}

impl Session {
    /// Create an idle session with default analysis thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use custom thresholds when analyzing completed text.
    pub const fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Current state.
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    /// Consume the session and return its final state.
    pub fn into_state(self) -> SessionState {
        self.state
    }

    /// Apply one event.
    ///
    /// `Progress`, `Completed` and `Failed` only take effect while loading;
    /// late or stray events are ignored. `Failed` is also accepted from
    /// `Idle` so selection errors can be surfaced before extraction starts.
    pub fn apply(&mut self, event: SessionEvent) {
        let next = match (&self.state, event) {
            (_, SessionEvent::Reset) => Some(SessionState::Idle),
            (_, SessionEvent::Started { message }) => Some(SessionState::Loading {
                message,
                progress: None,
            }),
            (SessionState::Loading { message, .. }, SessionEvent::Progress(percent)) => {
                Some(SessionState::Loading {
                    message: message.clone(),
                    progress: Some(percent.min(100)),
                })
            }
            (SessionState::Loading { .. }, SessionEvent::Completed(text)) => {
                let report = analysis::analyze_with(&text, &self.thresholds);
                Some(SessionState::Success { text, report })
            }
            (
                SessionState::Loading { .. } | SessionState::Idle,
                SessionEvent::Failed { message, retryable },
            ) => Some(SessionState::Failed { message, retryable }),
            (state, event) => {
                debug!(?state, ?event, "ignoring event");
                None
            }
        };

        if let Some(next) = next {
            self.state = next;
        }
    }

    /// Record a failure that happened before extraction started.
    pub fn reject(&mut self, err: &ExtractError) {
        warn!(error = %err, "input rejected");
        self.apply(SessionEvent::Reset);
        self.apply(err.into());
    }

    /// Run `extractor` on `file`, applying every event and calling `observe`
    /// after each transition.
    ///
    /// Returns the final state: `Success` or `Failed`.
    #[tracing::instrument(skip_all, fields(backend = extractor.name(), path = %file.path()))]
    pub async fn drive<F>(
        &mut self,
        extractor: &dyn Extractor,
        file: &InputFile,
        mut observe: F,
    ) -> &SessionState
    where
        F: FnMut(&SessionState),
    {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let task = run_extraction(extractor, file, tx);
        let consume = async {
            while let Some(event) = rx.recv().await {
                self.apply(event);
                observe(&self.state);
            }
        };
        tokio::join!(task, consume);
        &self.state
    }
}

/// Run one extraction, reporting everything as [`SessionEvent`]s.
///
/// Sends `Started`, any number of `Progress`, then exactly one of
/// `Completed` or `Failed`. The channel closes when this returns.
pub async fn run_extraction(
    extractor: &dyn Extractor,
    file: &InputFile,
    tx: mpsc::UnboundedSender<SessionEvent>,
) {
    // Send errors mean the receiver is gone; there is nobody left to tell.
    let _ = tx.send(SessionEvent::Started {
        message: extractor.loading_message().to_string(),
    });

    let progress = {
        let tx = tx.clone();
        Progress::new(move |percent| {
            let _ = tx.send(SessionEvent::Progress(percent));
        })
    };

    let event = match extractor.extract(file, &progress).await {
        Ok(text) => {
            info!(
                backend = extractor.name(),
                chars = text.len(),
                "extraction complete"
            );
            SessionEvent::Completed(text)
        }
        Err(err) => {
            warn!(backend = extractor.name(), error = %err, "extraction failed");
            SessionEvent::from(&err)
        }
    };
    let _ = tx.send(event);
}
