use async_trait::async_trait;

use crate::error::Result;
use crate::models::{LedgerSnapshot, ThoughtRecord};

/// Storage behind the thought ledger.
///
/// History is keyed by user, then thread, and kept in call order. Branch
/// buckets are global and keyed by branch id only.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ThoughtStorage: Send + Sync {
    /// Append a record to its thread, and to its branch bucket when it
    /// declares one. Returns the global state as seen right after the append.
    async fn append_thought(&self, record: &ThoughtRecord) -> Result<LedgerSnapshot>;

    /// Records of a thread in call order. `None` when the user or thread
    /// has never been seen.
    async fn thread_thoughts(&self, user_id: &str, thread_id: &str) -> Result<Option<Vec<ThoughtRecord>>>;

    /// Records collected under a branch id, in call order
    async fn branch_thoughts(&self, branch_id: &str) -> Result<Vec<ThoughtRecord>>;

    /// Empty a thread in place. Returns false when there was no such thread.
    async fn clear_thread(&self, user_id: &str, thread_id: &str) -> Result<bool>;
}
