pub mod job;
pub mod sentence;
pub mod token;
pub mod transformation;

pub use job::{Job, JobSentence, JobTransformation, Status, StatusUpdate};
pub use sentence::Sentence;
pub use token::{Token, TokenId};
pub use transformation::{GroupId, TokenEdit, TransformId, Transformation};
