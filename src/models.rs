use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Summary text for a thread with nothing stored.
pub const NO_THOUGHTS_RECORDED: &str = "No thoughts recorded yet";

/// Parameters for the record_thought tool.
///
/// Fields are accepted as raw JSON so that a wrongly typed argument is
/// reported back as a validation failure instead of a protocol error.
/// The advertised schema still carries the expected types.
#[derive(Debug, Default, Clone, Deserialize, schemars::JsonSchema)]
pub struct RecordThoughtParams {
    #[schemars(with = "String")]
    #[schemars(description = "Id of the user owning the reasoning trace")]
    #[serde(default)]
    pub user_id: Value,

    #[schemars(with = "String")]
    #[schemars(description = "Id of the conversation the trace belongs to")]
    #[serde(default)]
    pub thread_id: Value,

    #[schemars(with = "String")]
    #[schemars(description = "Your current thinking step")]
    #[serde(default)]
    pub thought: Value,

    #[schemars(with = "i64")]
    #[schemars(description = "Current number in sequence (can go beyond the initial total)")]
    #[serde(default)]
    pub thought_number: Value,

    #[schemars(with = "i64")]
    #[schemars(description = "Current estimate of thoughts needed (can be adjusted up or down)")]
    #[serde(default)]
    pub total_thoughts: Value,

    #[schemars(with = "Option<bool>")]
    #[schemars(description = "True if more thinking is needed (default: true)")]
    #[serde(default)]
    pub next_thought_needed: Value,

    #[schemars(with = "Option<bool>")]
    #[schemars(description = "Whether this thought revises previous thinking")]
    #[serde(default)]
    pub is_revision: Value,

    #[schemars(with = "Option<i64>")]
    #[schemars(description = "Which thought number is being reconsidered")]
    #[serde(default)]
    pub revises_thought: Value,

    #[schemars(with = "Option<i64>")]
    #[schemars(description = "Thought number this branch diverges from")]
    #[serde(default)]
    pub branch_from_thought: Value,

    #[schemars(with = "Option<String>")]
    #[schemars(description = "Identifier for the current branch")]
    #[serde(default)]
    pub branch_id: Value,

    #[schemars(with = "Option<bool>")]
    #[schemars(description = "Set when reaching the end but more thoughts are needed")]
    #[serde(default)]
    pub needs_more_thoughts: Value,
}

/// Parameters shared by summarize_thoughts and clear_thoughts
#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
pub struct ThreadParams {
    #[schemars(description = "Id of the user owning the reasoning trace")]
    pub user_id: String,

    #[schemars(description = "Id of the conversation the trace belongs to")]
    pub thread_id: String,
}

/// One validated reasoning step. Never mutated once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThoughtRecord {
    pub user_id: String,
    pub thread_id: String,
    pub thought: String,
    pub thought_number: i64,
    pub total_thoughts: i64,
    pub next_thought_needed: bool,
    pub is_revision: Option<bool>,
    pub revises_thought: Option<i64>,
    pub branch_from_thought: Option<i64>,
    pub branch_id: Option<String>,
    pub needs_more_thoughts: Option<bool>,
}

impl ThoughtRecord {
    /// Plain step with no revision or branch markers
    pub fn new(
        user_id: impl Into<String>,
        thread_id: impl Into<String>,
        thought: impl Into<String>,
        thought_number: i64,
        total_thoughts: i64,
        next_thought_needed: bool,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            thread_id: thread_id.into(),
            thought: thought.into(),
            thought_number,
            total_thoughts,
            next_thought_needed,
            is_revision: None,
            revises_thought: None,
            branch_from_thought: None,
            branch_id: None,
            needs_more_thoughts: None,
        }
    }

    pub fn is_revision(&self) -> bool {
        self.is_revision.unwrap_or(false)
    }

    /// Branch bucket this record belongs to, if it declares both a
    /// divergence point and a branch name.
    pub fn branch_key(&self) -> Option<&str> {
        match (self.branch_from_thought, self.branch_id.as_deref()) {
            (Some(_), Some(id)) => Some(id),
            _ => None,
        }
    }

    /// Raise total_thoughts to thought_number when the step overshoots
    /// the caller's estimate.
    pub fn with_corrected_total(mut self) -> Self {
        if self.thought_number > self.total_thoughts {
            self.total_thoughts = self.thought_number;
        }
        self
    }
}

/// Global ledger state observed right after an append
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerSnapshot {
    pub branches: Vec<String>,
    pub user_count: usize,
}

/// Response from a successful record_thought call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordResponse {
    pub thought_number: i64,
    pub total_thoughts: i64,
    pub next_thought_needed: bool,
    pub branches: Vec<String>,
    pub thought_history_length: usize,
}

/// Structured failure returned in place of an error
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureResponse {
    pub error: String,
    pub status: String,
}

impl FailureResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            status: "failed".to_string(),
        }
    }
}

/// Outcome of record_thought. Serialized as whichever payload it holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RecordResult {
    Recorded(RecordResponse),
    Failed(FailureResponse),
}

impl RecordResult {
    pub fn is_failure(&self) -> bool {
        matches!(self, RecordResult::Failed(_))
    }
}

/// One entry of a summary timeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineEntry {
    pub number: i64,
    pub thought: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    pub total_thoughts: usize,
    pub timeline: Vec<TimelineEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Summary {
    Recorded(Timeline),
    Empty(String),
}

/// Response from summarize_thoughts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryResponse {
    pub summary: Summary,
}

impl SummaryResponse {
    pub fn empty() -> Self {
        Self {
            summary: Summary::Empty(NO_THOUGHTS_RECORDED.to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.summary, Summary::Empty(_))
    }

    pub fn timeline(&self) -> Option<&Timeline> {
        match &self.summary {
            Summary::Recorded(timeline) => Some(timeline),
            Summary::Empty(_) => None,
        }
    }
}

/// Response from clear_thoughts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClearResponse {
    pub status: String,
    pub message: String,
}

impl ClearResponse {
    pub fn cleared() -> Self {
        Self {
            status: "success".to_string(),
            message: "Thought history cleared".to_string(),
        }
    }

    pub fn nothing_to_clear() -> Self {
        Self {
            status: "success".to_string(),
            message: "Nothing to clear".to_string(),
        }
    }
}
