//! Seams to the remote correction service.
//!
//! The engine never talks to the network. Persisting review decisions and
//! querying usage are delegated to whatever implements these traits.

use serde_json::Value;
use std::cell::RefCell;
use std::rc::Rc;
use thiserror::Error;

use crate::models::StatusUpdate;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Service rejected the request: {0}")]
    Rejected(String),
}

/// Receives a notification after every accept, reject or undo
pub trait StatusSink {
    fn save_status(&mut self, update: &StatusUpdate) -> Result<(), ServiceError>;
}

/// Reports account usage as opaque JSON
pub trait UsageSource {
    fn usage(&self) -> Result<Value, ServiceError>;
}

/// Keeps every notification in memory.
///
/// Clones share the same buffer, so a caller can keep a handle after giving
/// the sink to a session.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    updates: Rc<RefCell<Vec<StatusUpdate>>>,
}

impl MemorySink {
    pub fn updates(&self) -> Vec<StatusUpdate> {
        self.updates.borrow().clone()
    }
}

impl StatusSink for MemorySink {
    fn save_status(&mut self, update: &StatusUpdate) -> Result<(), ServiceError> {
        self.updates.borrow_mut().push(update.clone());
        Ok(())
    }
}

/// Usage that never changes
#[derive(Debug, Clone)]
pub struct StaticUsage(pub Value);

impl UsageSource for StaticUsage {
    fn usage(&self) -> Result<Value, ServiceError> {
        Ok(self.0.clone())
    }
}
