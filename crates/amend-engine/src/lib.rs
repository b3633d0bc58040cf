pub mod editing;
pub mod io;
pub mod models;
pub mod service;
pub mod session;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use editing::{Cmd, Document, EditError, Patch};
pub use io::{IoError, StatusLog, read_job, write_job};
pub use models::{Job, Sentence, Status, StatusUpdate, Token, TransformId, Transformation};
pub use service::{ServiceError, StatusSink, UsageSource};
pub use session::{Session, SessionError, SessionOptions};
