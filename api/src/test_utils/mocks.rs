//! Mock implementations of port traits
//!
//! These are in-memory implementations that can be configured for testing.
//! They store data in memory and allow tests to verify behavior.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, RwLock};

use crate::domain::entities::{Improvement, ImprovementId};
use crate::domain::ports::{ChatMessage, FeedSource, ImprovementRepository, LlmClient, RawEntry};
use crate::error::{DomainError, FeedError, LlmError};

// ============================================================================
// In-Memory Improvement Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryImprovementRepository {
    improvements: Arc<RwLock<HashMap<ImprovementId, Improvement>>>,
    fail_writes: Arc<RwLock<bool>>,
}

impl InMemoryImprovementRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with an improvement for testing
    pub fn with_improvement(self, improvement: Improvement) -> Self {
        self.improvements
            .write()
            .unwrap()
            .insert(improvement.id, improvement);
        self
    }

    /// Make every subsequent write fail with a storage error
    pub fn with_failing_writes(self) -> Self {
        *self.fail_writes.write().unwrap() = true;
        self
    }

    pub fn len(&self) -> usize {
        self.improvements.read().unwrap().len()
    }

    fn check_writable(&self) -> Result<(), DomainError> {
        if *self.fail_writes.read().unwrap() {
            return Err(DomainError::Storage("disk full".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ImprovementRepository for InMemoryImprovementRepository {
    async fn add(&self, improvement: &Improvement) -> Result<(), DomainError> {
        self.check_writable()?;
        let mut improvements = self.improvements.write().unwrap();
        if improvements.contains_key(&improvement.id) {
            return Err(DomainError::AlreadyExists(improvement.id.to_string()));
        }
        improvements.insert(improvement.id, improvement.clone());
        Ok(())
    }

    async fn add_all(&self, batch: &[Improvement]) -> Result<usize, DomainError> {
        self.check_writable()?;
        let mut improvements = self.improvements.write().unwrap();
        let mut written = 0;
        for improvement in batch {
            if !improvements.contains_key(&improvement.id) {
                improvements.insert(improvement.id, improvement.clone());
                written += 1;
            }
        }
        Ok(written)
    }

    async fn get(&self, id: &ImprovementId) -> Result<Improvement, DomainError> {
        self.improvements
            .read()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| DomainError::NotFound(id.to_string()))
    }

    async fn get_all(&self) -> Result<Vec<Improvement>, DomainError> {
        Ok(self.improvements.read().unwrap().values().cloned().collect())
    }

    async fn replace(&self, improvement: &Improvement) -> Result<(), DomainError> {
        self.check_writable()?;
        match self.improvements.write().unwrap().get_mut(&improvement.id) {
            Some(stored) => {
                *stored = improvement.clone();
                Ok(())
            }
            None => Err(DomainError::NotFound(improvement.id.to_string())),
        }
    }

    async fn delete(&self, id: &ImprovementId) -> Result<(), DomainError> {
        self.check_writable()?;
        self.improvements
            .write()
            .unwrap()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| DomainError::NotFound(id.to_string()))
    }
}

// ============================================================================
// Mock LLM Client
// ============================================================================

/// Replies from a script, then falls back to `reply-{n}`.
///
/// Every call's messages are recorded for assertions.
#[derive(Default)]
pub struct MockLlmClient {
    script: Arc<RwLock<VecDeque<Result<String, LlmError>>>>,
    calls: Arc<RwLock<Vec<Vec<ChatMessage>>>>,
}

impl MockLlmClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reply(self, reply: &str) -> Self {
        self.script
            .write()
            .unwrap()
            .push_back(Ok(reply.to_string()));
        self
    }

    pub fn with_error(self, error: LlmError) -> Self {
        self.script.write().unwrap().push_back(Err(error));
        self
    }

    pub fn calls(&self) -> Vec<Vec<ChatMessage>> {
        self.calls.read().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmError> {
        let n = {
            let mut calls = self.calls.write().unwrap();
            calls.push(messages.to_vec());
            calls.len()
        };
        match self.script.write().unwrap().pop_front() {
            Some(result) => result,
            None => Ok(format!("reply-{}", n)),
        }
    }
}

// ============================================================================
// Static Feed Source
// ============================================================================

/// Serves whatever entries it currently holds; swap them between runs
#[derive(Default)]
pub struct StaticFeedSource {
    entries: Arc<RwLock<Vec<RawEntry>>>,
    failing: Arc<RwLock<bool>>,
    fetches: Arc<RwLock<usize>>,
}

impl StaticFeedSource {
    pub fn new(entries: Vec<RawEntry>) -> Self {
        Self {
            entries: Arc::new(RwLock::new(entries)),
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        let source = Self::default();
        *source.failing.write().unwrap() = true;
        source
    }

    pub fn set_entries(&self, entries: Vec<RawEntry>) {
        *self.entries.write().unwrap() = entries;
    }

    pub fn fetch_count(&self) -> usize {
        *self.fetches.read().unwrap()
    }
}

#[async_trait]
impl FeedSource for StaticFeedSource {
    async fn fetch_entries(&self) -> Result<Vec<RawEntry>, FeedError> {
        *self.fetches.write().unwrap() += 1;
        if *self.failing.read().unwrap() {
            return Err(FeedError::Status { status: 503 });
        }
        Ok(self.entries.read().unwrap().clone())
    }
}
