//! Domain data model for generated exhibit content.
//!
//! Wire field names match the upstream structured-output schema
//! (`realWorldAnalogy`, `inDepthInfo`, `veoPrompt`, ...) so the structs
//! deserialize straight from the model's JSON response.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Audience level for generated content. Process-wide selection that only
/// affects future generation requests, never an already-rendered exhibit.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum StudentLevel {
    #[serde(rename = "primary")]
    Primary,
    #[serde(rename = "middle")]
    #[default]
    Middle,
    #[serde(rename = "high")]
    High,
    #[serde(rename = "university")]
    University,
}

impl StudentLevel {
    /// Cycles to the next level (wraps around).
    pub fn next(self) -> StudentLevel {
        match self {
            StudentLevel::Primary => StudentLevel::Middle,
            StudentLevel::Middle => StudentLevel::High,
            StudentLevel::High => StudentLevel::University,
            StudentLevel::University => StudentLevel::Primary,
        }
    }

    /// Human-readable label, also used verbatim in prompts.
    pub fn label(self) -> &'static str {
        match self {
            StudentLevel::Primary => "Primary School",
            StudentLevel::Middle => "Middle School",
            StudentLevel::High => "High School",
            StudentLevel::University => "University",
        }
    }
}

/// The "Under the Hood" panel of an exhibit.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct DeepDive {
    #[serde(rename = "detailedText")]
    pub detailed_text: String,
    pub formula: String,
    #[serde(rename = "formulaExplanation")]
    pub formula_explanation: String,
    #[serde(rename = "keyTerms", default)]
    pub key_terms: Vec<String>,
}

/// A kitchen-science experiment the user can try at home.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Experiment {
    pub title: String,
    pub duration: String,
    #[serde(default)]
    pub materials: Vec<String>,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(rename = "scientificPrinciple")]
    pub scientific_principle: String,
    /// Visual description for the AI video generator.
    #[serde(rename = "veoPrompt")]
    pub video_prompt: String,
    /// Search query for the YouTube fallback.
    #[serde(rename = "youtubeQuery")]
    pub youtube_query: String,
}

/// One modern product or process that relies on the concept.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct RealWorldApplication {
    #[serde(rename = "productName")]
    pub product_name: String,
    pub description: String,
    #[serde(rename = "citationUrl")]
    pub citation_url: String,
}

/// The full text payload of an exhibit, as returned by the detail fetch.
/// The image arrives separately and the quiz only after an explicit request.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ConceptDetails {
    pub summary: String,
    #[serde(rename = "realWorldAnalogy")]
    pub analogy: String,
    #[serde(rename = "imagePrompt")]
    pub image_prompt: String,
    #[serde(rename = "inDepthInfo")]
    pub deep_dive: DeepDive,
    #[serde(rename = "diyExperiments", default)]
    pub experiments: Vec<Experiment>,
    #[serde(rename = "realWorldApplication")]
    pub application: RealWorldApplication,
    #[serde(rename = "relatedInventions", default)]
    pub related_inventions: Vec<String>,
}

/// A scenario-based multiple-choice question. Immutable once generated.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct QuizQuestion {
    pub scenario: String,
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(rename = "correctAnswerIndex")]
    pub correct_index: usize,
    #[serde(rename = "realLifeExplanation")]
    pub explanation: String,
}

impl QuizQuestion {
    /// A question is only usable if the correct index points at a real option.
    pub fn is_valid(&self) -> bool {
        self.correct_index < self.options.len()
    }
}

/// An inline image payload (base64) produced by the image model.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageHandle {
    pub mime_type: String,
    /// Base64-encoded image bytes, exactly as delivered inline.
    pub data: String,
}

/// A playable reference to a generated demonstration video.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoHandle {
    pub uri: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_cycle_wraps() {
        assert_eq!(StudentLevel::Primary.next(), StudentLevel::Middle);
        assert_eq!(StudentLevel::Middle.next(), StudentLevel::High);
        assert_eq!(StudentLevel::High.next(), StudentLevel::University);
        assert_eq!(StudentLevel::University.next(), StudentLevel::Primary);
    }

    #[test]
    fn test_level_default_is_middle() {
        assert_eq!(StudentLevel::default(), StudentLevel::Middle);
        assert_eq!(StudentLevel::default().label(), "Middle School");
    }

    #[test]
    fn test_concept_details_deserializes_wire_names() {
        let json = r#"{
            "summary": "Things fall.",
            "realWorldAnalogy": "Like a magnet for everything.",
            "imagePrompt": "3D diagram of gravity wells",
            "inDepthInfo": {
                "detailedText": "Mass curves spacetime.",
                "formula": "F = G m1 m2 / r^2",
                "formulaExplanation": "Where G is the gravitational constant...",
                "keyTerms": ["Newtons (N)", "Mass"]
            },
            "diyExperiments": [],
            "realWorldApplication": {
                "productName": "GPS",
                "description": "Satellite clocks correct for gravity.",
                "citationUrl": "https://en.wikipedia.org/wiki/GPS"
            },
            "relatedInventions": ["Pendulum clock"]
        }"#;
        let details: ConceptDetails = serde_json::from_str(json).unwrap();
        assert_eq!(details.analogy, "Like a magnet for everything.");
        assert_eq!(details.deep_dive.key_terms.len(), 2);
        assert_eq!(details.application.product_name, "GPS");
        assert_eq!(details.related_inventions, vec!["Pendulum clock"]);
    }

    #[test]
    fn test_quiz_question_index_validation() {
        let mut q = QuizQuestion {
            scenario: "s".into(),
            question: "q".into(),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct_index: 3,
            explanation: "e".into(),
        };
        assert!(q.is_valid());
        q.correct_index = 4;
        assert!(!q.is_valid());
    }
}
