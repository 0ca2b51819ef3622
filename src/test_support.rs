//! Shared helpers for unit tests. Compiled only under `cfg(test)`.

use std::sync::Arc;

use async_trait::async_trait;

use crate::content::{
    ConceptDetails, ContentService, DeepDive, Experiment, ImageHandle, QuizQuestion,
    RealWorldApplication, ServiceError, StudentLevel, VideoHandle,
};
use crate::core::state::App;

/// A [`ContentService`] that never succeeds. Reducer tests drive completions
/// through actions directly, so the service is never actually called.
pub struct NoopService;

#[async_trait]
impl ContentService for NoopService {
    async fn concept_details(
        &self,
        _topic: &str,
        _level: StudentLevel,
    ) -> Result<ConceptDetails, ServiceError> {
        Err(ServiceError::Config("noop service".to_string()))
    }

    async fn concept_image(&self, _image_prompt: &str) -> Result<ImageHandle, ServiceError> {
        Err(ServiceError::Config("noop service".to_string()))
    }

    async fn more_experiments(
        &self,
        _topic: &str,
        _level: StudentLevel,
        _exclude_titles: &[String],
    ) -> Vec<Experiment> {
        Vec::new()
    }

    async fn experiment_video(&self, _video_prompt: &str) -> Result<VideoHandle, ServiceError> {
        Err(ServiceError::Config("noop service".to_string()))
    }

    async fn quiz(&self, _topic: &str, _level: StudentLevel) -> Vec<QuizQuestion> {
        Vec::new()
    }
}

pub fn test_app() -> App {
    App::new(Arc::new(NoopService), StudentLevel::Middle)
}

pub fn test_experiment(title: &str) -> Experiment {
    Experiment {
        title: title.to_string(),
        duration: "10 minutes".to_string(),
        materials: vec!["A balloon".to_string(), "A piece of string".to_string()],
        steps: vec![
            "Inflate the balloon.".to_string(),
            "Let it go and watch.".to_string(),
        ],
        scientific_principle: "Every action has an equal and opposite reaction.".to_string(),
        video_prompt: format!("Close-up kitchen shot of: {title}"),
        youtube_query: format!("{title} home experiment"),
    }
}

/// A complete detail payload with `experiments` distinctly-titled experiments.
pub fn test_details(experiments: usize) -> ConceptDetails {
    ConceptDetails {
        summary: "Objects with mass attract each other.".to_string(),
        analogy: "Like a bowling ball on a trampoline.".to_string(),
        image_prompt: "Cutaway 3D diagram of a gravity well".to_string(),
        deep_dive: DeepDive {
            detailed_text: "Mass tells spacetime how to curve.".to_string(),
            formula: "F = G * m1 * m2 / r^2".to_string(),
            formula_explanation: "G is the gravitational constant.".to_string(),
            key_terms: vec!["Mass".to_string(), "Newtons (N)".to_string()],
        },
        experiments: (0..experiments)
            .map(|i| test_experiment(&format!("Experiment {i}")))
            .collect(),
        application: RealWorldApplication {
            product_name: "GPS".to_string(),
            description: "Satellite clocks correct for gravitational time dilation.".to_string(),
            citation_url: "https://en.wikipedia.org/wiki/Global_Positioning_System".to_string(),
        },
        related_inventions: vec!["Pendulum clock".to_string()],
    }
}

/// A four-option question whose correct answer is `correct_index`.
pub fn test_question(correct_index: usize) -> QuizQuestion {
    QuizQuestion {
        scenario: "You drop your keys while getting out of the car.".to_string(),
        question: "Why do they fall straight down?".to_string(),
        options: vec![
            "Option A".to_string(),
            "Option B".to_string(),
            "Option C".to_string(),
            "Option D".to_string(),
        ],
        correct_index,
        explanation: "Gravity accelerates the keys toward the ground.".to_string(),
    }
}

pub fn test_image() -> ImageHandle {
    ImageHandle {
        mime_type: "image/png".to_string(),
        data: "aGVsbG8=".to_string(),
    }
}
