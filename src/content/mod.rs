//! # Content Service
//!
//! Prompt construction, response-shape declaration, and invocation of the
//! external generative API. Pure request/response; no state lives here.
//!
//! - [`types`]: the generated-content data model
//! - [`service`]: the [`ContentService`] trait and [`ServiceError`]
//! - [`gemini`]: the Gemini-backed implementation

pub mod gemini;
pub mod service;
pub mod types;

pub use gemini::GeminiService;
pub use service::{ContentService, ServiceError};
pub use types::{
    ConceptDetails, DeepDive, Experiment, ImageHandle, QuizQuestion, RealWorldApplication,
    StudentLevel, VideoHandle,
};
