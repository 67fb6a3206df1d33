pub mod config;
pub mod helpers;
pub mod integrations;
pub mod jobs;

#[cfg(test)]
mod test_support;

pub use jobs::extraction_manager::{run, ExtractionManager, ExtractionSummary};
