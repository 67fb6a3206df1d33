mod classifier;

pub use classifier::{AttachmentClassifier, CandidateRecord};
