use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use super::ThoughtStorage;
use crate::error::{LedgerError, Result};
use crate::models::{LedgerSnapshot, ThoughtRecord};

#[derive(Debug, Default)]
struct LedgerState {
    /// user_id -> thread_id -> records in call order
    history: HashMap<String, HashMap<String, Vec<ThoughtRecord>>>,
    /// branch_id -> records declaring that branch
    branches: HashMap<String, Vec<ThoughtRecord>>,
    /// Branch ids in the order they were first seen
    branch_order: Vec<String>,
}

impl LedgerState {
    fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            branches: self.branch_order.clone(),
            user_count: self.history.len(),
        }
    }
}

/// In-process store. One lock guards both the history and the branch map,
/// so an append is atomic with respect to every other caller.
#[derive(Debug, Default)]
pub struct MemoryThoughtStore {
    state: Mutex<LedgerState>,
}

impl MemoryThoughtStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, LedgerState>> {
        self.state
            .lock()
            .map_err(|e| LedgerError::Storage(format!("ledger lock poisoned: {}", e)))
    }
}

#[async_trait]
impl ThoughtStorage for MemoryThoughtStore {
    async fn append_thought(&self, record: &ThoughtRecord) -> Result<LedgerSnapshot> {
        let mut state = self.lock()?;

        state
            .history
            .entry(record.user_id.clone())
            .or_default()
            .entry(record.thread_id.clone())
            .or_default()
            .push(record.clone());

        if let Some(branch_id) = record.branch_key() {
            if !state.branches.contains_key(branch_id) {
                state.branch_order.push(branch_id.to_string());
            }
            state
                .branches
                .entry(branch_id.to_string())
                .or_default()
                .push(record.clone());
        }

        Ok(state.snapshot())
    }

    async fn thread_thoughts(&self, user_id: &str, thread_id: &str) -> Result<Option<Vec<ThoughtRecord>>> {
        let state = self.lock()?;
        Ok(state
            .history
            .get(user_id)
            .and_then(|threads| threads.get(thread_id))
            .cloned())
    }

    async fn branch_thoughts(&self, branch_id: &str) -> Result<Vec<ThoughtRecord>> {
        let state = self.lock()?;
        Ok(state.branches.get(branch_id).cloned().unwrap_or_default())
    }

    async fn clear_thread(&self, user_id: &str, thread_id: &str) -> Result<bool> {
        let mut state = self.lock()?;
        match state
            .history
            .get_mut(user_id)
            .and_then(|threads| threads.get_mut(thread_id))
        {
            Some(records) => {
                records.clear();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(user: &str, thread: &str, number: i64) -> ThoughtRecord {
        ThoughtRecord::new(user, thread, format!("thought {}", number), number, 3, true)
    }

    fn branch(user: &str, number: i64, branch_id: &str) -> ThoughtRecord {
        let mut record = record(user, "t1", number);
        record.branch_from_thought = Some(1);
        record.branch_id = Some(branch_id.to_string());
        record
    }

    #[tokio::test]
    async fn test_append_keeps_call_order() {
        let store = MemoryThoughtStore::new();
        for number in [3, 1, 2] {
            store.append_thought(&record("u1", "t1", number)).await.unwrap();
        }

        let stored = store.thread_thoughts("u1", "t1").await.unwrap().unwrap();
        let numbers: Vec<i64> = stored.iter().map(|r| r.thought_number).collect();
        assert_eq!(numbers, vec![3, 1, 2]);
    }

    #[tokio::test]
    async fn test_unknown_user_and_thread() {
        let store = MemoryThoughtStore::new();
        store.append_thought(&record("u1", "t1", 1)).await.unwrap();

        assert!(store.thread_thoughts("nobody", "t1").await.unwrap().is_none());
        assert!(store.thread_thoughts("u1", "other").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_snapshot_counts_distinct_users() {
        let store = MemoryThoughtStore::new();
        store.append_thought(&record("u1", "t1", 1)).await.unwrap();
        store.append_thought(&record("u1", "t2", 1)).await.unwrap();
        let snapshot = store.append_thought(&record("u2", "t1", 1)).await.unwrap();

        assert_eq!(snapshot.user_count, 2);
        assert!(snapshot.branches.is_empty());
    }

    #[tokio::test]
    async fn test_branch_bucket_requires_both_fields() {
        let store = MemoryThoughtStore::new();

        let mut only_id = record("u1", "t1", 2);
        only_id.branch_id = Some("alt".to_string());
        let snapshot = store.append_thought(&only_id).await.unwrap();
        assert!(snapshot.branches.is_empty());

        let mut only_from = record("u1", "t1", 3);
        only_from.branch_from_thought = Some(1);
        let snapshot = store.append_thought(&only_from).await.unwrap();
        assert!(snapshot.branches.is_empty());
        assert!(store.branch_thoughts("alt").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_branches_are_global_and_ordered() {
        let store = MemoryThoughtStore::new();
        store.append_thought(&branch("u1", 2, "beta")).await.unwrap();
        store.append_thought(&branch("u2", 2, "alpha")).await.unwrap();
        let snapshot = store.append_thought(&branch("u1", 3, "beta")).await.unwrap();

        assert_eq!(snapshot.branches, vec!["beta".to_string(), "alpha".to_string()]);
        let beta = store.branch_thoughts("beta").await.unwrap();
        assert_eq!(beta.len(), 2);
    }

    #[tokio::test]
    async fn test_clear_empties_thread_in_place() {
        let store = MemoryThoughtStore::new();
        store.append_thought(&branch("u1", 2, "alt")).await.unwrap();

        assert!(store.clear_thread("u1", "t1").await.unwrap());
        let stored = store.thread_thoughts("u1", "t1").await.unwrap();
        assert_eq!(stored, Some(Vec::new()));

        // Branch buckets survive a thread clear
        assert_eq!(store.branch_thoughts("alt").await.unwrap().len(), 1);
        assert!(!store.clear_thread("u1", "missing").await.unwrap());
    }

    #[tokio::test]
    async fn test_concurrent_appends_are_not_lost() {
        let store = std::sync::Arc::new(MemoryThoughtStore::new());
        let mut tasks = Vec::new();
        for number in 1..=50 {
            let store = store.clone();
            tasks.push(tokio::spawn(async move {
                store.append_thought(&record("u1", "t1", number)).await.unwrap();
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        let stored = store.thread_thoughts("u1", "t1").await.unwrap().unwrap();
        assert_eq!(stored.len(), 50);
    }
}
