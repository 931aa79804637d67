use std::sync::LazyLock;

use regex::Regex;

/// Compiled handle patterns for review-automation tools, initialized once.
static AUTOMATED_HANDLE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        // "bot" bounded by non-letters: review-bot, bot42, Bot
        Regex::new(r"(?i)(^|[^[:alpha:]])bot([^[:alpha:]]|$)").unwrap(),
        // "ai" bounded by delimiters: ai-review, review.ai, my_ai_helper
        Regex::new(r"(?i)(^|[-_.])ai([-_.]|$)").unwrap(),
        // Known review-automation product names
        Regex::new(r"(?i)(coderabbit|copilot|sourcery|greptile|qodo|codiumai)").unwrap(),
    ]
});

/// Bold-header markdown table row, the skeleton of generated review tables:
/// `| **File** | **Issue** |`
static BOLD_TABLE_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\|\s*\*\*[^|*]+\*\*\s*\|").unwrap());

/// Opening banners that generated review output leads with.
const REVIEW_BANNERS: [&str; 2] = ["## walkthrough", "**actionable comments posted"];

/// Marker emoji clustered in generated review output.
const MARKER_EMOJI: [&str; 6] = ["\u{1F6E0}", "\u{26A0}", "\u{1F4A1}", "\u{1F50D}", "\u{2705}", "\u{2757}"];

/// Bolded file-path labels used by generated per-file findings.
const FILE_PATH_LABELS: [&str; 2] = ["**file:**", "**path:**"];

/// Whether a handle matches the fixed naming patterns of review automation.
pub fn handle_matches_automation(handle: &str) -> bool {
    AUTOMATED_HANDLE_PATTERNS.iter().any(|p| p.is_match(handle))
}

/// Whether a single comment body carries a structural signature of
/// generated review output.
pub fn looks_generated(body: &str) -> bool {
    if BOLD_TABLE_HEADER.is_match(body) {
        return true;
    }
    let lower = body.to_lowercase();
    if REVIEW_BANNERS
        .iter()
        .any(|b| lower.trim_start().starts_with(b))
    {
        return true;
    }
    if FILE_PATH_LABELS.iter().any(|l| lower.contains(l)) {
        return true;
    }
    // Two or more distinct marker emoji count as a cluster.
    let distinct = MARKER_EMOJI.iter().filter(|e| body.contains(**e)).count();
    distinct >= 2
}

/// Fraction of sampled comment bodies that look generated.
pub fn generated_fraction(texts: &[String]) -> f64 {
    if texts.is_empty() {
        return 0.0;
    }
    let matched = texts.iter().filter(|t| looks_generated(t)).count();
    matched as f64 / texts.len() as f64
}
