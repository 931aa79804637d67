use serde::{Deserialize, Serialize};
use std::fmt;
use time::OffsetDateTime;

/// The role a participant plays in a change's review lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Author,
    HumanReviewer,
    AiReviewer,
    SystemCi,
}

impl Role {
    /// Whether this role represents a non-human participant.
    pub fn is_automated(self) -> bool {
        matches!(self, Role::AiReviewer | Role::SystemCi)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Author => write!(f, "author"),
            Role::HumanReviewer => write!(f, "human_reviewer"),
            Role::AiReviewer => write!(f, "ai_reviewer"),
            Role::SystemCi => write!(f, "system_ci"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "author" => Ok(Role::Author),
            "human_reviewer" => Ok(Role::HumanReviewer),
            "ai_reviewer" => Ok(Role::AiReviewer),
            "system_ci" => Ok(Role::SystemCi),
            other => anyhow::bail!(
                "unknown role: {other}. Expected: author, human_reviewer, ai_reviewer, system_ci"
            ),
        }
    }
}

/// A participant responsible for one or more timeline events.
///
/// Created once per distinct handle per analysis and never modified after.
/// Authorship always overrides automation signals: the builder assigns
/// `Role::Author` before any heuristic runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub handle: String,
    pub display_name: String,
    pub role: Role,
    pub automated: bool,
}

impl Actor {
    pub fn new(handle: impl Into<String>, display_name: impl Into<String>, role: Role) -> Self {
        Self {
            handle: handle.into(),
            display_name: display_name.into(),
            role,
            automated: role.is_automated(),
        }
    }
}

/// What happened at one point of a change's timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Created,
    CommitPushed,
    AutomatedReview,
    HumanReview,
    CommentPosted,
    Approved,
    PipelineQueued,
    PipelineFinished,
    Merged,
}

impl EventKind {
    /// Tie-break priority when two sources report the same instant:
    /// creation, commit, comment, approval, pipeline, merge.
    pub fn source_priority(self) -> u8 {
        match self {
            EventKind::Created => 0,
            EventKind::CommitPushed => 1,
            EventKind::AutomatedReview | EventKind::HumanReview | EventKind::CommentPosted => 2,
            EventKind::Approved => 3,
            EventKind::PipelineQueued | EventKind::PipelineFinished => 4,
            EventKind::Merged => 5,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Created => write!(f, "created"),
            EventKind::CommitPushed => write!(f, "commit pushed"),
            EventKind::AutomatedReview => write!(f, "automated review"),
            EventKind::HumanReview => write!(f, "human review"),
            EventKind::CommentPosted => write!(f, "comment"),
            EventKind::Approved => write!(f, "approved"),
            EventKind::PipelineQueued => write!(f, "pipeline queued"),
            EventKind::PipelineFinished => write!(f, "pipeline finished"),
            EventKind::Merged => write!(f, "merged"),
        }
    }
}

/// One entry of a change's ordered timeline.
///
/// Sequence numbers strictly increase with instant order. `gap_to_next` is
/// the whole-second interval to the following event; the last event has
/// none.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub seq: u64,
    #[serde(with = "time::serde::rfc3339")]
    pub ts: OffsetDateTime,
    pub actor: Actor,
    pub kind: EventKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gap_to_next: Option<i64>,
}

/// Canonical lifecycle milestones. At most one occurrence per change: the
/// first timeline event satisfying the state's predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyState {
    Created,
    FirstCommit,
    FirstAutomatedReview,
    FirstHumanReview,
    Approved,
    Merged,
}

impl KeyState {
    /// All states in canonical order. Segmentation re-sorts by actual
    /// instant; this order is for display and map iteration only.
    pub const ALL: [KeyState; 6] = [
        KeyState::Created,
        KeyState::FirstCommit,
        KeyState::FirstAutomatedReview,
        KeyState::FirstHumanReview,
        KeyState::Approved,
        KeyState::Merged,
    ];
}

impl fmt::Display for KeyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyState::Created => write!(f, "created"),
            KeyState::FirstCommit => write!(f, "first commit"),
            KeyState::FirstAutomatedReview => write!(f, "first automated review"),
            KeyState::FirstHumanReview => write!(f, "first human review"),
            KeyState::Approved => write!(f, "approved"),
            KeyState::Merged => write!(f, "merged"),
        }
    }
}

/// The upper boundary of a phase: the next discovered milestone, or "now"
/// for the open tail of an unmerged change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseEnd {
    State(KeyState),
    Now,
}

impl fmt::Display for PhaseEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhaseEnd::State(s) => s.fmt(f),
            PhaseEnd::Now => write!(f, "now"),
        }
    }
}

/// The span between two temporally adjacent discovered milestones.
///
/// Phases are contiguous and non-overlapping; their durations sum to the
/// total lifecycle duration and their percent shares to 100 within one
/// point (independent per-phase rounding).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    pub from: KeyState,
    pub to: PhaseEnd,
    pub seconds: i64,
    pub percent: f64,
}

impl Phase {
    /// Human-readable span label, e.g. "created -> first commit".
    pub fn label(&self) -> String {
        format!("{} -> {}", self.from, self.to)
    }
}
