use crate::models::{
    non_empty, Case, CreateCaseRequest, UpdateCaseRequest, DEFAULT_PRIORITY, DEFAULT_STATUS,
};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use uuid::Uuid;

/// Store error types
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("{0}")]
    Validation(String),

    #[error("Case not found")]
    NotFound,

    #[error("Internal store error")]
    Internal,
}

/// Message returned when a create request lacks a title or description
pub const MISSING_FIELDS_MESSAGE: &str = "Title and description are required";

/// Repository trait for case operations
#[async_trait]
pub trait CaseRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Case>, StoreError>;
    async fn get(&self, id: &str) -> Result<Case, StoreError>;
    async fn create(&self, request: CreateCaseRequest) -> Result<Case, StoreError>;
    async fn update(&self, id: &str, request: UpdateCaseRequest) -> Result<Case, StoreError>;
    async fn delete(&self, id: &str) -> Result<(), StoreError>;
    async fn count(&self) -> Result<usize, StoreError>;
}

/// In-memory repository keeping cases in insertion order
///
/// Every operation holds the lock for its whole body, so operations are
/// atomic with respect to each other.
#[derive(Clone, Default)]
pub struct InMemoryCaseRepository {
    cases: Arc<Mutex<Vec<Case>>>,
}

impl InMemoryCaseRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the repository with existing records, keeping their order
    pub fn with_cases(cases: Vec<Case>) -> Self {
        Self {
            cases: Arc::new(Mutex::new(cases)),
        }
    }
}

/// Current time, nudged past `previous` when the clock has not advanced.
fn next_timestamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}

#[async_trait]
impl CaseRepository for InMemoryCaseRepository {
    async fn list(&self) -> Result<Vec<Case>, StoreError> {
        let cases = self.cases.lock().map_err(|_| StoreError::Internal)?;
        Ok(cases.clone())
    }

    async fn get(&self, id: &str) -> Result<Case, StoreError> {
        let cases = self.cases.lock().map_err(|_| StoreError::Internal)?;
        cases
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn create(&self, request: CreateCaseRequest) -> Result<Case, StoreError> {
        let (Some(title), Some(description)) =
            (non_empty(request.title), non_empty(request.description))
        else {
            return Err(StoreError::Validation(MISSING_FIELDS_MESSAGE.to_string()));
        };

        let now = Utc::now();
        let case = Case {
            id: Uuid::new_v4().to_string(),
            title,
            description,
            status: non_empty(request.status).unwrap_or_else(|| DEFAULT_STATUS.to_string()),
            priority: non_empty(request.priority).unwrap_or_else(|| DEFAULT_PRIORITY.to_string()),
            assigned_to: non_empty(request.assigned_to),
            created_at: now,
            updated_at: now,
        };

        let mut cases = self.cases.lock().map_err(|_| StoreError::Internal)?;
        cases.push(case.clone());
        Ok(case)
    }

    async fn update(&self, id: &str, request: UpdateCaseRequest) -> Result<Case, StoreError> {
        let mut cases = self.cases.lock().map_err(|_| StoreError::Internal)?;
        let existing = cases
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(StoreError::NotFound)?;

        request.apply_to(existing);
        existing.updated_at = next_timestamp(existing.updated_at);

        Ok(existing.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let mut cases = self.cases.lock().map_err(|_| StoreError::Internal)?;
        let index = cases
            .iter()
            .position(|c| c.id == id)
            .ok_or(StoreError::NotFound)?;

        cases.remove(index);
        Ok(())
    }

    async fn count(&self) -> Result<usize, StoreError> {
        let cases = self.cases.lock().map_err(|_| StoreError::Internal)?;
        Ok(cases.len())
    }
}
