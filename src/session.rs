use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::DisplayConfig;
use crate::error::ViewError;
use crate::view::{ThresholdMode, ViewState};

/// When threshold and mode edits take effect. Fixed for the lifetime of a
/// session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum CommitPolicy {
    /// Every edit is applied immediately.
    Live,
    /// Edits stay pending until an explicit commit.
    #[default]
    OnSubmit,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ViewEvent {
    SetThreshold(f64),
    SetMode(ThresholdMode),
    SetSentiment(bool),
    Commit,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct PerMode {
    absolute: f64,
    share: f64,
}

impl PerMode {
    fn get(&self, mode: ThresholdMode) -> f64 {
        match mode {
            ThresholdMode::Absolute => self.absolute,
            ThresholdMode::Share => self.share,
        }
    }

    fn set(&mut self, mode: ThresholdMode, value: f64) {
        match mode {
            ThresholdMode::Absolute => self.absolute = value,
            ThresholdMode::Share => self.share = value,
        }
    }
}

/// Single writer of the committed [`ViewState`]. Each mode remembers its own
/// pending threshold, so switching back and forth restores the last value.
#[derive(Clone, Debug)]
pub struct ViewSession {
    committed: ViewState,
    pending_mode: ThresholdMode,
    pending: PerMode,
    policy: CommitPolicy,
    revision: u64,
}

impl ViewSession {
    pub fn new(config: &DisplayConfig) -> Result<Self, ViewError> {
        let pending = PerMode {
            absolute: config.absolute.initial,
            share: config.share.initial,
        };
        let mode = config.initial_mode;
        let committed = ViewState::new(pending.get(mode), mode, config.show_sentiment)?;

        Ok(Self {
            committed,
            pending_mode: mode,
            pending,
            policy: config.commit,
            revision: 0,
        })
    }

    pub fn state(&self) -> ViewState {
        self.committed
    }

    pub fn policy(&self) -> CommitPolicy {
        self.policy
    }

    /// Bumped on every committed change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn pending_mode(&self) -> ThresholdMode {
        self.pending_mode
    }

    pub fn pending_threshold(&self) -> f64 {
        self.pending.get(self.pending_mode)
    }

    pub fn has_pending_changes(&self) -> bool {
        self.pending_mode != self.committed.mode()
            || self.pending_threshold() != self.committed.threshold()
    }

    /// Applies one user event. Returns the new snapshot when the visible graph
    /// must be recomputed, `None` when nothing committed changed.
    pub fn apply(&mut self, event: ViewEvent) -> Result<Option<ViewState>, ViewError> {
        match event {
            ViewEvent::SetThreshold(value) => {
                if !value.is_finite() {
                    return Err(ViewError::InvalidThreshold(value));
                }
                self.pending.set(self.pending_mode, value);
                self.commit_if_live()
            }
            ViewEvent::SetMode(mode) => {
                self.pending_mode = mode;
                self.commit_if_live()
            }
            ViewEvent::SetSentiment(show) => {
                Ok(self.replace(self.committed.with_sentiment(show)))
            }
            ViewEvent::Commit => self.commit(),
        }
    }

    fn commit_if_live(&mut self) -> Result<Option<ViewState>, ViewError> {
        match self.policy {
            CommitPolicy::Live => self.commit(),
            CommitPolicy::OnSubmit => Ok(None),
        }
    }

    fn commit(&mut self) -> Result<Option<ViewState>, ViewError> {
        let next = self
            .committed
            .with_filter(self.pending_mode, self.pending_threshold())?;
        Ok(self.replace(next))
    }

    fn replace(&mut self, next: ViewState) -> Option<ViewState> {
        if next == self.committed {
            return None;
        }

        self.committed = next;
        self.revision = self.revision.wrapping_add(1);
        debug!(
            revision = self.revision,
            mode = %next.mode(),
            threshold = next.threshold(),
            show_sentiment = next.show_sentiment(),
            "view state committed"
        );
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(policy: CommitPolicy) -> ViewSession {
        let config = DisplayConfig {
            commit: policy,
            ..DisplayConfig::default()
        };
        ViewSession::new(&config).unwrap()
    }

    #[test]
    fn starts_from_configured_defaults() {
        let session = session(CommitPolicy::OnSubmit);
        let state = session.state();
        assert_eq!(state.mode(), ThresholdMode::Absolute);
        assert_eq!(state.threshold(), 5.0);
        assert!(!state.show_sentiment());
        assert_eq!(session.revision(), 0);
    }

    #[test]
    fn on_submit_holds_edits_until_commit() {
        let mut session = session(CommitPolicy::OnSubmit);
        assert_eq!(session.apply(ViewEvent::SetThreshold(12.0)), Ok(None));
        assert_eq!(session.state().threshold(), 5.0);
        assert!(session.has_pending_changes());

        let committed = session.apply(ViewEvent::Commit).unwrap().unwrap();
        assert_eq!(committed.threshold(), 12.0);
        assert_eq!(session.revision(), 1);
        assert!(!session.has_pending_changes());

        assert_eq!(session.apply(ViewEvent::Commit), Ok(None));
        assert_eq!(session.revision(), 1);
    }

    #[test]
    fn live_commits_every_edit() {
        let mut session = session(CommitPolicy::Live);
        let state = session.apply(ViewEvent::SetThreshold(8.0)).unwrap().unwrap();
        assert_eq!(state.threshold(), 8.0);

        let state = session
            .apply(ViewEvent::SetMode(ThresholdMode::Share))
            .unwrap()
            .unwrap();
        assert_eq!(state.mode(), ThresholdMode::Share);
        assert_eq!(state.threshold(), 0.01);
    }

    #[test]
    fn each_mode_remembers_its_threshold() {
        let mut session = session(CommitPolicy::OnSubmit);
        session.apply(ViewEvent::SetThreshold(20.0)).unwrap();
        session.apply(ViewEvent::SetMode(ThresholdMode::Share)).unwrap();
        assert_eq!(session.pending_threshold(), 0.01);
        session.apply(ViewEvent::SetThreshold(0.05)).unwrap();
        session.apply(ViewEvent::SetMode(ThresholdMode::Absolute)).unwrap();
        assert_eq!(session.pending_threshold(), 20.0);
    }

    #[test]
    fn mode_switch_alone_is_pending_under_submit() {
        let mut session = session(CommitPolicy::OnSubmit);
        assert_eq!(session.apply(ViewEvent::SetMode(ThresholdMode::Share)), Ok(None));
        assert_eq!(session.state().mode(), ThresholdMode::Absolute);
        let state = session.apply(ViewEvent::Commit).unwrap().unwrap();
        assert_eq!((state.mode(), state.threshold()), (ThresholdMode::Share, 0.01));
    }

    #[test]
    fn sentiment_toggle_applies_immediately_and_idempotently() {
        let mut session = session(CommitPolicy::OnSubmit);
        session.apply(ViewEvent::SetThreshold(30.0)).unwrap();

        let state = session.apply(ViewEvent::SetSentiment(true)).unwrap().unwrap();
        assert!(state.show_sentiment());
        // Pending threshold edit is not swept along.
        assert_eq!(state.threshold(), 5.0);

        assert_eq!(session.apply(ViewEvent::SetSentiment(true)), Ok(None));
        assert_eq!(session.revision(), 1);
    }

    #[test]
    fn non_finite_threshold_is_rejected() {
        let mut session = session(CommitPolicy::Live);
        assert!(session.apply(ViewEvent::SetThreshold(f64::INFINITY)).is_err());
        assert_eq!(session.state().threshold(), 5.0);
    }
}
