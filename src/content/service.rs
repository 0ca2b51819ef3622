use std::fmt;

use async_trait::async_trait;

use super::types::{
    ConceptDetails, Experiment, ImageHandle, QuizQuestion, StudentLevel, VideoHandle,
};

/// Errors that can occur while generating content.
/// Variants distinguish the failure taxonomy: configuration, transport,
/// API rejection, and malformed responses.
#[derive(Debug)]
pub enum ServiceError {
    /// Service misconfigured (missing API key). Fails every call immediately.
    Config(String),
    /// Network-level failure (timeout, DNS, connection refused).
    Network(String),
    /// API returned an error response.
    Api { status: u16, message: String },
    /// The response did not match the declared contract.
    Parse(String),
    /// The response was well-formed but carried no usable payload
    /// (e.g. no inline image, no video reference).
    Empty(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::Config(msg) => write!(f, "config error: {msg}"),
            ServiceError::Network(msg) => write!(f, "network error: {msg}"),
            ServiceError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            ServiceError::Parse(msg) => write!(f, "parse error: {msg}"),
            ServiceError::Empty(msg) => write!(f, "empty response: {msg}"),
        }
    }
}

impl std::error::Error for ServiceError {}

/// The five generation operations the application is built on.
///
/// Pure request/response; implementations hold no state between calls.
/// Two failure policies coexist: the primary fetches (`concept_details`,
/// `concept_image`, `experiment_video`) hard-fail with a [`ServiceError`],
/// while the secondary enrichments (`more_experiments`, `quiz`) soft-fail
/// to an empty list so the UI degrades instead of breaking.
#[async_trait]
pub trait ContentService: Send + Sync {
    /// Generates the full text payload of an exhibit for one topic.
    async fn concept_details(
        &self,
        topic: &str,
        level: StudentLevel,
    ) -> Result<ConceptDetails, ServiceError>;

    /// Renders the exhibit illustration for a previously generated prompt.
    async fn concept_image(&self, image_prompt: &str) -> Result<ImageHandle, ServiceError>;

    /// Requests 3 new experiments distinct from `exclude_titles`.
    /// Soft-fail: any error yields an empty list.
    async fn more_experiments(
        &self,
        topic: &str,
        level: StudentLevel,
        exclude_titles: &[String],
    ) -> Vec<Experiment>;

    /// Generates a demonstration video, polling the long-running job
    /// until it completes.
    async fn experiment_video(&self, video_prompt: &str) -> Result<VideoHandle, ServiceError>;

    /// Requests 3 scenario-based questions. Soft-fail: empty on error.
    async fn quiz(&self, topic: &str, level: StudentLevel) -> Vec<QuizQuestion>;
}
