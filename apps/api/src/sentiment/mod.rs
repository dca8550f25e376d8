// Employee sentiment analysis: feedback table → markdown strategy report.
// Prose output; does not go through the JSON extractor.

pub mod handlers;
pub mod prompts;
pub mod report;
pub mod table;

#[cfg(test)]
pub mod testing;
