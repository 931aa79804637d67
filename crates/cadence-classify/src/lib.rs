//! Participant role classification.
//!
//! A handle is classified by an ordered list of independent heuristics,
//! stopping at the first that fires: CI exclusion, explicit allow-list,
//! handle patterns, content signatures, comment length, and an optional
//! time-window check. The fallback is always [`Role::HumanReviewer`];
//! authorship is resolved by the caller before classification runs.

pub mod patterns;

use cadence_core::Role;
use time::OffsetDateTime;

/// CI accounts recognized out of the box. Checked as case-insensitive
/// substrings of the handle.
pub const BUILTIN_CI_ACCOUNTS: [&str; 7] = [
    "gitlab-ci",
    "github-actions",
    "jenkins",
    "teamcity",
    "buildkite",
    "circleci",
    "azure-pipelines",
];

/// Average comment length at or above which a participant with no
/// allow-list entry is treated as automated.
pub const AI_AVG_COMMENT_LEN: usize = 300;

/// Immutable classifier configuration.
///
/// `with_reviewer` and `without_reviewer` return new values rather than
/// mutating shared state, so a config can be shared across a batch without
/// one change's adjustments leaking into another's classifications.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    ci_accounts: Vec<String>,
    reviewers: Option<Vec<String>>,
    automation_window_mins: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            ci_accounts: BUILTIN_CI_ACCOUNTS.iter().map(|s| s.to_string()).collect(),
            reviewers: None,
            automation_window_mins: 0,
        }
    }
}

impl ClassifierConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add configured CI account names on top of the built-in set.
    pub fn with_ci_accounts(mut self, accounts: &[String]) -> Self {
        self.ci_accounts
            .extend(accounts.iter().map(|a| a.to_lowercase()));
        self
    }

    /// Supply an explicit automated-reviewer allow-list. A supplied list
    /// disables the content, length, and time-window heuristics.
    pub fn with_allow_list(mut self, handles: &[String]) -> Self {
        self.reviewers = Some(handles.iter().map(|h| h.to_lowercase()).collect());
        self
    }

    /// New config with one more allow-listed reviewer.
    pub fn with_reviewer(&self, handle: &str) -> Self {
        let mut next = self.clone();
        let lower = handle.to_lowercase();
        match &mut next.reviewers {
            Some(list) => {
                if !list.contains(&lower) {
                    list.push(lower);
                }
            }
            None => next.reviewers = Some(vec![lower]),
        }
        next
    }

    /// New config with one reviewer removed from the allow-list.
    pub fn without_reviewer(&self, handle: &str) -> Self {
        let mut next = self.clone();
        let lower = handle.to_lowercase();
        if let Some(list) = &mut next.reviewers {
            list.retain(|h| h != &lower);
        }
        next
    }

    /// Enable the time-window heuristic: comments posted within this many
    /// minutes of change creation classify as automated. 0 disables it.
    pub fn with_automation_window_mins(mut self, mins: u64) -> Self {
        self.automation_window_mins = mins;
        self
    }

    pub fn has_allow_list(&self) -> bool {
        self.reviewers.is_some()
    }
}

/// Sampled comment evidence for one participant, aggregated across all of
/// their comments before any single one is classified.
#[derive(Debug, Default)]
pub struct CommentSignals<'a> {
    pub texts: &'a [String],
    pub average_length: usize,
    pub first_comment: Option<OffsetDateTime>,
    pub change_created: Option<OffsetDateTime>,
}

/// Classify a participant handle. Pure function; never fails.
///
/// Layers fire in strict priority order. CI exclusion runs first because
/// CI account names often also contain automation-suggestive substrings
/// like "bot".
pub fn classify(config: &ClassifierConfig, handle: &str, signals: Option<&CommentSignals>) -> Role {
    let lower = handle.to_lowercase();

    // Layer 1: CI exclusion
    if config.ci_accounts.iter().any(|a| lower.contains(a)) {
        return Role::SystemCi;
    }

    // Layer 2: explicit allow-list
    if let Some(reviewers) = &config.reviewers {
        if reviewers.iter().any(|r| r == &lower) {
            return Role::AiReviewer;
        }
    }

    // Layer 3: handle patterns
    if patterns::handle_matches_automation(handle) {
        return Role::AiReviewer;
    }

    // Layers 4-6 only apply when no allow-list was supplied.
    if config.reviewers.is_none() {
        if let Some(signals) = signals {
            // Layer 4: content signatures across the comment sample
            if !signals.texts.is_empty() && patterns::generated_fraction(signals.texts) > 0.5 {
                return Role::AiReviewer;
            }

            // Layer 5: average comment length
            if signals.average_length >= AI_AVG_COMMENT_LEN {
                return Role::AiReviewer;
            }

            // Layer 6: time window after change creation
            if config.automation_window_mins > 0 {
                if let (Some(comment), Some(created)) =
                    (signals.first_comment, signals.change_created)
                {
                    let secs = (comment - created).whole_seconds();
                    if secs >= 0 && secs <= config.automation_window_mins as i64 * 60 {
                        return Role::AiReviewer;
                    }
                }
            }
        }
    }

    Role::HumanReviewer
}
