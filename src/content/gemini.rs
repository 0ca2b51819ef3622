//! Gemini implementation of the content service.
//!
//! Speaks the Generative Language REST API:
//! - `models/{model}:generateContent` for text (with a structured-output
//!   schema) and for the exhibit image (inline payload),
//! - `models/{model}:predictLongRunning` + operation polling for video.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::Deserialize;
use serde_json::{Value, json};

use super::service::{ContentService, ServiceError};
use super::types::{
    ConceptDetails, Experiment, ImageHandle, QuizQuestion, StudentLevel, VideoHandle,
};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";
pub const DEFAULT_VIDEO_MODEL: &str = "veo-3.1-fast-generate-preview";

/// Interval between polls of a long-running video operation.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Curator persona sent as the system instruction on every text request.
const SYSTEM_INSTRUCTION: &str = "You are a curator at the \"SciLife Museum\". \
    Your goal is to explain complex scientific and mathematical concepts by directly \
    connecting them to everyday life and practical problem-solving. \
    Avoid dry textbook definitions. Use vivid analogies and storytelling.";

// ============================================================================
// Gemini Wire Types
// ============================================================================

#[derive(Deserialize, Debug)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Debug)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize, Debug)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize, Debug)]
struct Part {
    text: Option<String>,
    #[serde(rename = "inlineData")]
    inline_data: Option<InlinePayload>,
}

#[derive(Deserialize, Debug)]
struct InlinePayload {
    #[serde(rename = "mimeType")]
    mime_type: String,
    data: String,
}

/// A long-running video generation operation, as submitted and as polled.
#[derive(Deserialize, Debug)]
struct VideoOperation {
    name: String,
    #[serde(default)]
    done: bool,
    response: Option<VideoOperationResult>,
}

#[derive(Deserialize, Debug)]
struct VideoOperationResult {
    #[serde(rename = "generateVideoResponse")]
    generate_video_response: Option<GenerateVideoResponse>,
}

#[derive(Deserialize, Debug)]
struct GenerateVideoResponse {
    #[serde(rename = "generatedSamples", default)]
    generated_samples: Vec<GeneratedSample>,
}

#[derive(Deserialize, Debug)]
struct GeneratedSample {
    video: Option<VideoRef>,
}

#[derive(Deserialize, Debug)]
struct VideoRef {
    uri: String,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate's parts.
    fn first_text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        if text.is_empty() { None } else { Some(text) }
    }

    /// First inline (binary) payload of the first candidate, if any.
    fn first_inline(&self) -> Option<&InlinePayload> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .iter()
            .find_map(|p| p.inline_data.as_ref())
    }
}

// ============================================================================
// Prompts & Response Schemas
// ============================================================================

fn details_prompt(topic: &str, level: StudentLevel) -> String {
    format!(
        "Topic: {topic}\n\
         Target Audience: {} student.\n\n\
         We are building a \"Science Museum in an App\".\n\
         1. SUMMARY: Provide a 1-sentence \"Tweet-sized\" explanation of what this is. Simple language.\n\
         2. ANALOGY: Provide a 1-sentence real-world analogy (e.g., \"Think of voltage like water pressure...\").\n\
         3. IMAGE_PROMPT: Write a prompt for an AI image generator to create a clear, educational 3D DIAGRAM \
         or INFOGRAPHIC that explains this concept visually. It should look like a cool museum exhibit poster.\n\
         4. DEEP_DIVE: Provide the technical \"Under the Hood\" details.\n\
         - detailedText: A paragraph explaining the specific mechanics/science.\n\
         - formula: The core mathematical formula or scientific equation associated with this \
         (e.g. \"P = \u{03c1}gh\" or \"F = ma\"). If no exact formula exists, use the core scientific relationship.\n\
         - formulaExplanation: A brief explanation of the variables in the formula.\n\
         - keyTerms: List 2-3 specific units of measurement or technical terms (e.g. [\"Pascals (Pa)\", \"Density\"]).\n\
         5. EXPERIMENTS: Suggest 2 simple \"Kitchen Science\" experiments the user can do RIGHT NOW with \
         common household items. For each experiment, also provide:\n\
         - veoPrompt: A detailed visual description of the experiment being performed, to be used by an AI video generator.\n\
         - youtubeQuery: A specific search query string to find a video of this experiment on YouTube.\n\
         6. APPLICATION: Identify ONE specific modern product, tool, or industry process that heavily relies \
         on this concept (e.g. \"Photocopiers\" for Electrostatics).\n\
         - productName: Name of the product/tool.\n\
         - description: 2-3 sentences explaining exactly how the concept is applied in this product.\n\
         - citationUrl: A URL to a generic Wikipedia page or reputable source about this product/technology.\n\
         7. RELATED_INVENTIONS: List up to 10 distinct inventions or technologies that use this same concept.\n\n\
         Return JSON.",
        level.label()
    )
}

fn more_experiments_prompt(topic: &str, level: StudentLevel, exclude_titles: &[String]) -> String {
    format!(
        "Topic: {topic}\n\
         Target Audience: {} student.\n\n\
         The user has already seen these experiments: {}.\n\n\
         Suggest 3 NEW, DISTINCT simple \"Kitchen Science\" experiments the user can do RIGHT NOW \
         with common household items. They must be different from the ones listed above.\n\n\
         For each experiment, provide:\n\
         - title: Short catchy title.\n\
         - duration: e.g. \"10 mins\".\n\
         - materials: List of items.\n\
         - steps: Numbered list of steps.\n\
         - scientificPrinciple: One sentence explanation.\n\
         - veoPrompt: Visual description for video generation.\n\
         - youtubeQuery: Search query.",
        level.label(),
        serde_json::to_string(exclude_titles).unwrap_or_else(|_| "[]".to_string()),
    )
}

fn quiz_prompt(topic: &str, level: StudentLevel) -> String {
    format!(
        "Topic: {topic}\n\
         Target Audience: {} student.\n\n\
         Create 3 distinct \"Real World Scenarios\" to test the user's understanding. \
         These should not be textbook questions. They should be situations a person might \
         encounter in daily life, DIY projects, sports, or nature.\n\n\
         For each scenario:\n\
         1. scenario: A short description of the situation (e.g. \"You are trying to loosen a tight rusty bolt...\").\n\
         2. question: The question asking what to do based on the science.\n\
         3. options: 4 possible actions.\n\
         4. correctAnswerIndex: 0-3.\n\
         5. realLifeExplanation: Why that answer works, explaining the physics/math behind it simply.",
        level.label()
    )
}

/// Fixed style directive appended to every image request.
fn image_prompt(exhibit_prompt: &str) -> String {
    format!(
        "{exhibit_prompt}\n\
         Style: High-quality 3D Educational Render, Clean, Studio Lighting, Isolated on dark \
         background if possible, similar to Apple product photography or Science Museum digital signage.\n\
         No text overlay."
    )
}

/// Schema for one experiment object, shared by the detail and load-more contracts.
fn experiment_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING" },
            "duration": { "type": "STRING" },
            "materials": { "type": "ARRAY", "items": { "type": "STRING" } },
            "steps": { "type": "ARRAY", "items": { "type": "STRING" } },
            "scientificPrinciple": { "type": "STRING" },
            "veoPrompt": { "type": "STRING" },
            "youtubeQuery": { "type": "STRING" }
        },
        "required": ["title", "duration", "materials", "steps", "scientificPrinciple", "veoPrompt", "youtubeQuery"]
    })
}

fn details_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "summary": { "type": "STRING" },
            "realWorldAnalogy": { "type": "STRING" },
            "imagePrompt": { "type": "STRING" },
            "inDepthInfo": {
                "type": "OBJECT",
                "properties": {
                    "detailedText": { "type": "STRING" },
                    "formula": { "type": "STRING" },
                    "formulaExplanation": { "type": "STRING" },
                    "keyTerms": { "type": "ARRAY", "items": { "type": "STRING" } }
                },
                "required": ["detailedText", "formula", "formulaExplanation", "keyTerms"]
            },
            "diyExperiments": { "type": "ARRAY", "items": experiment_schema() },
            "realWorldApplication": {
                "type": "OBJECT",
                "properties": {
                    "productName": { "type": "STRING" },
                    "description": { "type": "STRING" },
                    "citationUrl": { "type": "STRING" }
                },
                "required": ["productName", "description", "citationUrl"]
            },
            "relatedInventions": { "type": "ARRAY", "items": { "type": "STRING" } }
        },
        "required": ["summary", "realWorldAnalogy", "imagePrompt", "inDepthInfo",
                     "diyExperiments", "realWorldApplication", "relatedInventions"]
    })
}

fn experiments_list_schema() -> Value {
    json!({ "type": "ARRAY", "items": experiment_schema() })
}

fn quiz_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "scenario": { "type": "STRING" },
                "question": { "type": "STRING" },
                "options": { "type": "ARRAY", "items": { "type": "STRING" } },
                "correctAnswerIndex": { "type": "INTEGER" },
                "realLifeExplanation": { "type": "STRING" }
            },
            "required": ["scenario", "question", "options", "correctAnswerIndex", "realLifeExplanation"]
        }
    })
}

// ============================================================================
// Service Implementation
// ============================================================================

/// Content service backed by the Gemini API.
pub struct GeminiService {
    api_key: Option<String>,
    base_url: String,
    text_model: String,
    image_model: String,
    video_model: String,
    poll_interval: Duration,
    client: reqwest::Client,
}

impl GeminiService {
    /// Creates a new service. `base_url` defaults to the public API endpoint.
    /// A missing `api_key` is not an error here; every call checks it and
    /// fails with `ServiceError::Config` at call time.
    pub fn new(api_key: Option<String>, base_url: Option<String>) -> Self {
        Self {
            api_key,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            video_model: DEFAULT_VIDEO_MODEL.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            client: reqwest::Client::new(),
        }
    }

    pub fn with_models(mut self, text: String, image: String, video: String) -> Self {
        self.text_model = text;
        self.image_model = image;
        self.video_model = video;
        self
    }

    /// Overrides the video poll interval (tests use a few milliseconds).
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    fn key(&self) -> Result<&str, ServiceError> {
        self.api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ServiceError::Config("API key not found".to_string()))
    }

    async fn post_json(&self, url: &str, body: &Value) -> Result<Value, ServiceError> {
        let key = self.key()?;
        debug!("POST {url}");

        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", key)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| ServiceError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("Gemini API error: {status} - {message}");
            return Err(ServiceError::Api { status, message });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| ServiceError::Parse(e.to_string()))
    }

    /// Issues a `generateContent` call and returns the parsed response.
    async fn generate_content(
        &self,
        model: &str,
        prompt: &str,
        system_instruction: Option<&str>,
        generation_config: Option<Value>,
    ) -> Result<GenerateContentResponse, ServiceError> {
        let url = format!("{}/v1beta/models/{model}:generateContent", self.base_url);

        let mut body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });
        if let Some(sys) = system_instruction {
            body["systemInstruction"] = json!({ "parts": [{ "text": sys }] });
        }
        if let Some(config) = generation_config {
            body["generationConfig"] = config;
        }

        let value = self.post_json(&url, &body).await?;
        serde_json::from_value(value).map_err(|e| ServiceError::Parse(e.to_string()))
    }

    /// Structured-output variant: declares the response schema and parses
    /// the returned JSON text into `T`.
    async fn generate_structured<T: serde::de::DeserializeOwned>(
        &self,
        prompt: &str,
        schema: Value,
    ) -> Result<T, ServiceError> {
        let config = json!({
            "responseMimeType": "application/json",
            "responseSchema": schema,
        });
        let response = self
            .generate_content(&self.text_model, prompt, Some(SYSTEM_INSTRUCTION), Some(config))
            .await?;
        let text = response
            .first_text()
            .ok_or_else(|| ServiceError::Empty("no response from AI".to_string()))?;
        serde_json::from_str(&text).map_err(|e| ServiceError::Parse(e.to_string()))
    }

    async fn try_more_experiments(
        &self,
        topic: &str,
        level: StudentLevel,
        exclude_titles: &[String],
    ) -> Result<Vec<Experiment>, ServiceError> {
        let prompt = more_experiments_prompt(topic, level, exclude_titles);
        self.generate_structured(&prompt, experiments_list_schema())
            .await
    }

    async fn try_quiz(
        &self,
        topic: &str,
        level: StudentLevel,
    ) -> Result<Vec<QuizQuestion>, ServiceError> {
        let questions: Vec<QuizQuestion> = self
            .generate_structured(&quiz_prompt(topic, level), quiz_schema())
            .await?;
        // Drop questions whose answer index falls outside their options.
        let (valid, invalid): (Vec<_>, Vec<_>) =
            questions.into_iter().partition(QuizQuestion::is_valid);
        if !invalid.is_empty() {
            warn!("Dropped {} quiz question(s) with out-of-range answer index", invalid.len());
        }
        Ok(valid)
    }
}

#[async_trait]
impl ContentService for GeminiService {
    async fn concept_details(
        &self,
        topic: &str,
        level: StudentLevel,
    ) -> Result<ConceptDetails, ServiceError> {
        info!("Fetching concept details: topic={topic:?}, level={level:?}");
        let details: ConceptDetails = self
            .generate_structured(&details_prompt(topic, level), details_schema())
            .await?;
        info!(
            "Concept details ready: {} experiment(s), {} related invention(s)",
            details.experiments.len(),
            details.related_inventions.len()
        );
        Ok(details)
    }

    async fn concept_image(&self, exhibit_prompt: &str) -> Result<ImageHandle, ServiceError> {
        let config = json!({ "imageConfig": { "aspectRatio": "4:3" } });
        let response = self
            .generate_content(&self.image_model, &image_prompt(exhibit_prompt), None, Some(config))
            .await?;

        let inline = response
            .first_inline()
            .ok_or_else(|| ServiceError::Empty("no image generated".to_string()))?;
        info!(
            "Exhibit image ready: {} ({} base64 bytes)",
            inline.mime_type,
            inline.data.len()
        );
        Ok(ImageHandle {
            mime_type: inline.mime_type.clone(),
            data: inline.data.clone(),
        })
    }

    async fn more_experiments(
        &self,
        topic: &str,
        level: StudentLevel,
        exclude_titles: &[String],
    ) -> Vec<Experiment> {
        match self.try_more_experiments(topic, level, exclude_titles).await {
            Ok(experiments) => experiments,
            Err(e) => {
                warn!("Loading more experiments failed: {e}");
                Vec::new()
            }
        }
    }

    async fn experiment_video(&self, video_prompt: &str) -> Result<VideoHandle, ServiceError> {
        let key = self.key()?.to_string();
        let submit_url = format!(
            "{}/v1beta/models/{}:predictLongRunning",
            self.base_url, self.video_model
        );
        let body = json!({
            "instances": [{ "prompt": video_prompt }],
            "parameters": {
                "sampleCount": 1,
                "resolution": "720p",
                "aspectRatio": "16:9"
            }
        });

        let value = self.post_json(&submit_url, &body).await?;
        let mut operation: VideoOperation =
            serde_json::from_value(value).map_err(|e| ServiceError::Parse(e.to_string()))?;
        info!("Video job submitted: {}", operation.name);

        // Poll at a fixed interval until the job reports completion.
        while !operation.done {
            tokio::time::sleep(self.poll_interval).await;
            let poll_url = format!("{}/v1beta/{}", self.base_url, operation.name);
            debug!("Polling video operation: {}", operation.name);
            let response = self
                .client
                .get(&poll_url)
                .header("x-goog-api-key", &key)
                .send()
                .await
                .map_err(|e| ServiceError::Network(e.to_string()))?;
            if !response.status().is_success() {
                let status = response.status().as_u16();
                let message = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "unknown error".to_string());
                return Err(ServiceError::Api { status, message });
            }
            operation = response
                .json()
                .await
                .map_err(|e| ServiceError::Parse(e.to_string()))?;
        }

        let uri = operation
            .response
            .and_then(|r| r.generate_video_response)
            .and_then(|r| r.generated_samples.into_iter().next())
            .and_then(|s| s.video)
            .map(|v| v.uri)
            .ok_or_else(|| ServiceError::Empty("video generation failed".to_string()))?;

        info!("Video ready: {uri}");
        // The player fetches the URI directly, so the key rides along.
        Ok(VideoHandle {
            uri: format!("{uri}&key={key}"),
        })
    }

    async fn quiz(&self, topic: &str, level: StudentLevel) -> Vec<QuizQuestion> {
        match self.try_quiz(topic, level).await {
            Ok(questions) => questions,
            Err(e) => {
                warn!("Quiz generation failed: {e}");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_details_prompt_mentions_topic_and_level() {
        let prompt = details_prompt("Gravity", StudentLevel::High);
        assert!(prompt.contains("Topic: Gravity"));
        assert!(prompt.contains("High School student"));
        assert!(prompt.contains("Kitchen Science"));
    }

    #[test]
    fn test_more_experiments_prompt_lists_exclusions() {
        let exclude = vec!["Balloon Rocket".to_string(), "Egg Drop".to_string()];
        let prompt = more_experiments_prompt("Inertia", StudentLevel::Middle, &exclude);
        assert!(prompt.contains("Balloon Rocket"));
        assert!(prompt.contains("Egg Drop"));
        assert!(prompt.contains("3 NEW, DISTINCT"));
    }

    #[test]
    fn test_image_prompt_appends_style_directive() {
        let prompt = image_prompt("diagram of a lever");
        assert!(prompt.starts_with("diagram of a lever"));
        assert!(prompt.contains("3D Educational Render"));
        assert!(prompt.contains("No text overlay"));
    }

    #[test]
    fn test_details_schema_declares_all_sections() {
        let schema = details_schema();
        let required = schema["required"].as_array().unwrap();
        for field in [
            "summary",
            "realWorldAnalogy",
            "imagePrompt",
            "inDepthInfo",
            "diyExperiments",
            "realWorldApplication",
            "relatedInventions",
        ] {
            assert!(required.iter().any(|v| v == field), "missing {field}");
        }
        assert_eq!(schema["properties"]["diyExperiments"]["type"], "ARRAY");
    }

    #[test]
    fn test_quiz_schema_is_array_of_scenarios() {
        let schema = quiz_schema();
        assert_eq!(schema["type"], "ARRAY");
        assert_eq!(
            schema["items"]["properties"]["correctAnswerIndex"]["type"],
            "INTEGER"
        );
    }

    #[test]
    fn test_first_text_concatenates_parts() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{ "content": { "parts": [
                { "text": "Hello" },
                { "text": " world" }
            ]}}]
        }))
        .unwrap();
        assert_eq!(response.first_text().as_deref(), Some("Hello world"));
    }

    #[test]
    fn test_first_text_empty_candidates() {
        let response: GenerateContentResponse =
            serde_json::from_value(json!({ "candidates": [] })).unwrap();
        assert!(response.first_text().is_none());
    }

    #[test]
    fn test_first_inline_skips_text_parts() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{ "content": { "parts": [
                { "text": "caption" },
                { "inlineData": { "mimeType": "image/png", "data": "QUJD" } }
            ]}}]
        }))
        .unwrap();
        let inline = response.first_inline().unwrap();
        assert_eq!(inline.mime_type, "image/png");
        assert_eq!(inline.data, "QUJD");
    }

    #[test]
    fn test_video_operation_parses_completed_shape() {
        let op: VideoOperation = serde_json::from_value(json!({
            "name": "operations/abc",
            "done": true,
            "response": { "generateVideoResponse": { "generatedSamples": [
                { "video": { "uri": "https://example.com/v.mp4?alt=media" } }
            ]}}
        }))
        .unwrap();
        assert!(op.done);
        let uri = op
            .response
            .unwrap()
            .generate_video_response
            .unwrap()
            .generated_samples[0]
            .video
            .as_ref()
            .unwrap()
            .uri
            .clone();
        assert!(uri.ends_with("alt=media"));
    }

    #[tokio::test]
    async fn test_missing_key_is_config_error() {
        let service = GeminiService::new(None, None);
        let err = service.concept_details("Gravity", StudentLevel::Middle).await;
        assert!(matches!(err, Err(ServiceError::Config(_))));

        let err = service.concept_image("diagram").await;
        assert!(matches!(err, Err(ServiceError::Config(_))));

        let err = service.experiment_video("clip").await;
        assert!(matches!(err, Err(ServiceError::Config(_))));

        // Soft-fail operations degrade to empty rather than erroring.
        assert!(service.quiz("Gravity", StudentLevel::Middle).await.is_empty());
        assert!(
            service
                .more_experiments("Gravity", StudentLevel::Middle, &[])
                .await
                .is_empty()
        );
    }
}
