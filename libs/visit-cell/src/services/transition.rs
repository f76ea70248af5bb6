// libs/visit-cell/src/services/transition.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

use crate::error::VisitError;
use crate::models::{Stamp, Visit, VisitContext, VisitStatus};

/// Buttons a screen can press on a visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VisitAction {
    Confirm,
    Call,
    Start,
    Complete,
    Cancel,
    NoShow,
}

impl VisitAction {
    pub const ALL: [VisitAction; 6] = [
        VisitAction::Confirm,
        VisitAction::Call,
        VisitAction::Start,
        VisitAction::Complete,
        VisitAction::Cancel,
        VisitAction::NoShow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VisitAction::Confirm => "confirm",
            VisitAction::Call => "call",
            VisitAction::Start => "start",
            VisitAction::Complete => "complete",
            VisitAction::Cancel => "cancel",
            VisitAction::NoShow => "no-show",
        }
    }
}

impl fmt::Display for VisitAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a permitted transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub from: VisitStatus,
    pub action: VisitAction,
    pub to: VisitStatus,
    pub stamp: Option<Stamp>,
}

/// The transition table shared by every screen.
///
/// Pairs not listed are rejected, so terminal statuses accept nothing and
/// `complete` on a waiting patient fails.
pub fn next_status(status: VisitStatus, action: VisitAction) -> Result<Transition, VisitError> {
    use VisitAction as A;
    use VisitStatus as S;

    let (to, stamp) = match (status, action) {
        (S::Scheduled, A::Confirm) => (S::Confirmed, None),
        (S::Waiting, A::Call) => (S::Called, Some(Stamp::CalledAt)),
        (S::Scheduled | S::Confirmed | S::Called, A::Start) => (S::InProgress, Some(Stamp::StartedAt)),
        (S::Called | S::InProgress, A::Complete) => (S::Completed, Some(Stamp::CompletedAt)),
        (S::Scheduled | S::Confirmed | S::Waiting | S::Called, A::Cancel) => (S::Cancelled, None),
        (S::Scheduled | S::Confirmed | S::Waiting | S::Called, A::NoShow) => (S::NoShow, None),
        _ => return Err(VisitError::InvalidTransition { from: status, action }),
    };

    Ok(Transition { from: status, action, to, stamp })
}

/// [`next_status`] restricted to one screen's vocabulary.
pub fn transition_in(
    context: VisitContext,
    status: VisitStatus,
    action: VisitAction,
) -> Result<Transition, VisitError> {
    ensure_admitted(context, status)?;
    let transition = next_status(status, action)?;
    ensure_admitted(context, transition.to)?;
    Ok(transition)
}

pub fn ensure_admitted(context: VisitContext, status: VisitStatus) -> Result<(), VisitError> {
    if context.admits(status) {
        Ok(())
    } else {
        Err(VisitError::StatusNotInContext { status, context })
    }
}

/// Actions a screen should offer for a record in `status`.
pub fn available_actions(context: VisitContext, status: VisitStatus) -> Vec<VisitAction> {
    VisitAction::ALL
        .into_iter()
        .filter(|action| transition_in(context, status, *action).is_ok())
        .collect()
}

/// Runs `action` against `visit`, updating its status and stamping the side-effect timestamp.
pub fn apply_action<V: Visit>(
    visit: &mut V,
    action: VisitAction,
    now: DateTime<Utc>,
) -> Result<Transition, VisitError> {
    let transition = transition_in(V::CONTEXT, visit.status(), action).map_err(|e| {
        warn!("Rejected {} on {} {}: {}", action, V::CONTEXT, visit.id(), e);
        e
    })?;

    visit.set_status(transition.to);
    if let Some(stamp) = transition.stamp {
        visit.stamp(stamp, now);
    }

    debug!(
        "{} {}: {} --{}--> {}",
        V::CONTEXT,
        visit.id(),
        transition.from,
        action,
        transition.to
    );
    Ok(transition)
}
