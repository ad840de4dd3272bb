use std::sync::Arc;

use crate::config::LedgerConfig;
use crate::error::{LedgerError, Result};
use crate::models::{
    ClearResponse, FailureResponse, RecordResponse, RecordResult, RecordThoughtParams, Summary,
    SummaryResponse, ThoughtRecord, Timeline, TimelineEntry,
};
use crate::repository::{MemoryThoughtStore, ThoughtStorage};
use crate::validation::InputValidator;
use crate::visual::VisualOutput;

/// Sequential-thinking ledger: validates, stores and summarizes the
/// reasoning steps an agent reports for a (user, thread) pair.
pub struct ThoughtLedger<R: ThoughtStorage> {
    storage: Arc<R>,
    validator: InputValidator,
    visual: VisualOutput,
}

impl ThoughtLedger<MemoryThoughtStore> {
    /// Ledger over a fresh in-process store
    pub fn in_memory(config: &LedgerConfig) -> Self {
        Self::new(
            Arc::new(MemoryThoughtStore::new()),
            InputValidator::new(&config.validation),
            VisualOutput::new(&config.display),
        )
    }
}

impl<R: ThoughtStorage> ThoughtLedger<R> {
    pub fn new(storage: Arc<R>, validator: InputValidator, visual: VisualOutput) -> Self {
        Self {
            storage,
            validator,
            visual,
        }
    }

    /// Record one reasoning step.
    ///
    /// Never returns an error: validation and storage failures come back as
    /// a `{error, status: "failed"}` payload and leave the ledger untouched.
    pub async fn record(&self, params: RecordThoughtParams) -> RecordResult {
        match self.try_record(params).await {
            Ok(response) => RecordResult::Recorded(response),
            Err(e) => {
                match &e {
                    LedgerError::Validation { field, .. } => {
                        tracing::warn!("Rejected thought, invalid field '{}': {}", field, e)
                    }
                    _ => tracing::error!("Failed to record thought: {}", e),
                }
                RecordResult::Failed(FailureResponse::new(e.describe()))
            }
        }
    }

    async fn try_record(&self, params: RecordThoughtParams) -> Result<RecordResponse> {
        let record = self.validator.validate_record(&params)?.with_corrected_total();

        let snapshot = self.storage.append_thought(&record).await?;

        tracing::info!(
            "Recorded thought {} of {} for user '{}' thread '{}'",
            record.thought_number,
            record.total_thoughts,
            record.user_id,
            record.thread_id
        );
        self.visual.thought_recorded(&record);

        Ok(RecordResponse {
            thought_number: record.thought_number,
            total_thoughts: record.total_thoughts,
            next_thought_needed: record.next_thought_needed,
            branches: snapshot.branches,
            thought_history_length: snapshot.user_count,
        })
    }

    /// Timeline of a thread ordered by thought number. Records sharing a
    /// number keep their call order.
    pub async fn summarize(&self, user_id: &str, thread_id: &str) -> Result<SummaryResponse> {
        let mut records = match self.storage.thread_thoughts(user_id, thread_id).await? {
            Some(records) if !records.is_empty() => records,
            _ => {
                tracing::debug!("No thoughts to summarize for user '{}' thread '{}'", user_id, thread_id);
                return Ok(SummaryResponse::empty());
            }
        };

        records.sort_by_key(|record| record.thought_number);

        tracing::debug!(
            "Summarized {} thoughts for user '{}' thread '{}'",
            records.len(),
            user_id,
            thread_id
        );

        Ok(SummaryResponse {
            summary: Summary::Recorded(Timeline {
                total_thoughts: records.len(),
                timeline: records
                    .into_iter()
                    .map(|record| TimelineEntry {
                        number: record.thought_number,
                        thought: record.thought,
                    })
                    .collect(),
            }),
        })
    }

    /// Empty a thread's history. Succeeds whether or not anything was stored.
    pub async fn clear(&self, user_id: &str, thread_id: &str) -> Result<ClearResponse> {
        if self.storage.clear_thread(user_id, thread_id).await? {
            tracing::info!("Cleared thoughts for user '{}' thread '{}'", user_id, thread_id);
            self.visual.thread_cleared(user_id, thread_id);
            Ok(ClearResponse::cleared())
        } else {
            tracing::debug!("Nothing to clear for user '{}' thread '{}'", user_id, thread_id);
            Ok(ClearResponse::nothing_to_clear())
        }
    }

    /// Records collected under a branch id across all users and threads
    pub async fn branch(&self, branch_id: &str) -> Result<Vec<ThoughtRecord>> {
        self.storage.branch_thoughts(branch_id).await
    }
}
