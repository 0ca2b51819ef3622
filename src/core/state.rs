//! # Application State
//!
//! Core business state for SciLife. This module contains domain logic only -
//! no TUI-specific types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── service: Arc<dyn ContentService>   // generative API
//! ├── level: StudentLevel                // audience for future requests
//! ├── mode: Mode                         // which screen we are on
//! │     Idle ── search ──> Loading ── details ──> Exhibit
//! │       ^                   │                     │  ^
//! │       │<── failure ───────┘        start quiz   │  │ quiz empty
//! │       │                                         v  │
//! │       │<─── complete ─── Quiz <── questions ── LoadingQuiz
//! ├── error: Option<String>              // user-visible banner
//! ├── status_message: String             // status bar text
//! └── active_seq: u64                    // stale-result guard
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.
//! Every background fetch is tagged with the `active_seq` it was issued for;
//! results whose tag no longer matches are discarded, which is how a reset
//! "cancels" work that is still in flight.

use std::sync::Arc;

use crate::content::{
    ConceptDetails, ContentService, DeepDive, Experiment, ImageHandle, QuizQuestion,
    RealWorldApplication, StudentLevel, VideoHandle,
};

/// Experiment count at which the load-more affordance disappears.
pub const MAX_EXPERIMENTS: usize = 10;

/// Per-card demonstration video state. Each card owns its own slot; one
/// card's outcome never affects a sibling.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum VideoSlot {
    #[default]
    Hidden,
    Loading,
    Ready(VideoHandle),
    Failed(String),
}

/// An experiment plus its ephemeral per-card UI state.
#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentCard {
    pub details: Experiment,
    pub video: VideoSlot,
}

impl ExperimentCard {
    pub fn new(details: Experiment) -> Self {
        Self {
            details,
            video: VideoSlot::Hidden,
        }
    }
}

/// The in-memory representation of the currently displayed exhibit.
/// Created fresh on each search and replaced wholesale, except for two
/// controlled partial updates: the image arrives after the text, and
/// experiments accumulate through load-more.
#[derive(Debug, Clone, PartialEq)]
pub struct ExhibitRecord {
    /// Tag of the search that produced this record; completion actions
    /// carrying a different tag are stale and must be dropped.
    pub seq: u64,
    pub topic: String,
    /// Level the record was generated at. Changing the app level later
    /// does not touch this.
    pub level: StudentLevel,
    pub summary: String,
    pub analogy: String,
    pub image_prompt: String,
    pub image: Option<ImageHandle>,
    /// True once the image fetch has failed; stops the placeholder spinner.
    pub image_failed: bool,
    pub deep_dive: DeepDive,
    pub experiments: Vec<ExperimentCard>,
    pub application: RealWorldApplication,
    pub related_inventions: Vec<String>,
    /// True while a load-more fetch is in flight.
    pub loading_more: bool,
}

impl ExhibitRecord {
    pub fn new(seq: u64, topic: String, level: StudentLevel, details: ConceptDetails) -> Self {
        Self {
            seq,
            topic,
            level,
            summary: details.summary,
            analogy: details.analogy,
            image_prompt: details.image_prompt,
            image: None,
            image_failed: false,
            deep_dive: details.deep_dive,
            experiments: details
                .experiments
                .into_iter()
                .map(ExperimentCard::new)
                .collect(),
            application: details.application,
            related_inventions: details.related_inventions,
            loading_more: false,
        }
    }

    pub fn experiment_titles(&self) -> Vec<String> {
        self.experiments
            .iter()
            .map(|card| card.details.title.clone())
            .collect()
    }

    /// Load-more is available below the cap and while no fetch is running.
    pub fn can_load_more(&self) -> bool {
        self.experiments.len() < MAX_EXPERIMENTS && !self.loading_more
    }

    pub fn append_experiments(&mut self, experiments: Vec<Experiment>) {
        self.experiments
            .extend(experiments.into_iter().map(ExperimentCard::new));
    }

    /// Clickable chips: key terms first, then related inventions. Selecting
    /// one re-enters the search flow with that term as the new topic.
    pub fn chips(&self) -> Vec<&str> {
        self.deep_dive
            .key_terms
            .iter()
            .chain(self.related_inventions.iter())
            .map(String::as_str)
            .collect()
    }
}

/// Progress through one quiz pass. The score only ever increments.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizState {
    pub questions: Vec<QuizQuestion>,
    pub current: usize,
    pub selected: Option<usize>,
    pub revealed: bool,
    pub score: usize,
    pub finished: bool,
}

impl QuizState {
    pub fn new(questions: Vec<QuizQuestion>) -> Self {
        Self {
            questions,
            current: 0,
            selected: None,
            revealed: false,
            score: 0,
            finished: false,
        }
    }

    pub fn current_question(&self) -> Option<&QuizQuestion> {
        self.questions.get(self.current)
    }

    /// Locks in an answer and reveals the result. Ignored once revealed or
    /// when the index doesn't name an option.
    pub fn select(&mut self, index: usize) {
        if self.revealed || self.finished {
            return;
        }
        let Some(question) = self.questions.get(self.current) else {
            return;
        };
        if index >= question.options.len() {
            return;
        }
        self.selected = Some(index);
        self.revealed = true;
        if index == question.correct_index {
            self.score += 1;
        }
    }

    /// Moves to the next question, or to the results screen after the last.
    pub fn advance(&mut self) {
        if !self.revealed || self.finished {
            return;
        }
        if self.current + 1 < self.questions.len() {
            self.current += 1;
            self.selected = None;
            self.revealed = false;
        } else {
            self.finished = true;
        }
    }
}

/// Top-level view state. The record is part of the variant, so a quiz
/// without questions or an exhibit without a record cannot be expressed.
#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Idle,
    /// Search submitted, no record yet.
    Loading { topic: String },
    /// The gallery screen.
    Exhibit(ExhibitRecord),
    LoadingQuiz(ExhibitRecord),
    Quiz {
        record: ExhibitRecord,
        quiz: QuizState,
    },
}

pub struct App {
    pub service: Arc<dyn ContentService>,
    pub level: StudentLevel,
    pub mode: Mode,
    pub error: Option<String>,
    pub status_message: String,
    /// Bumped on every search and reset; the stale-result guard.
    pub active_seq: u64,
}

impl App {
    pub fn new(service: Arc<dyn ContentService>, level: StudentLevel) -> Self {
        Self {
            service,
            level,
            mode: Mode::Idle,
            error: None,
            status_message: String::from("Welcome to the SciLife Museum!"),
            active_seq: 0,
        }
    }

    /// The current record, if any mode carries one.
    pub fn record(&self) -> Option<&ExhibitRecord> {
        match &self.mode {
            Mode::Exhibit(record) | Mode::LoadingQuiz(record) | Mode::Quiz { record, .. } => {
                Some(record)
            }
            Mode::Idle | Mode::Loading { .. } => None,
        }
    }

    pub fn record_mut(&mut self) -> Option<&mut ExhibitRecord> {
        match &mut self.mode {
            Mode::Exhibit(record) | Mode::LoadingQuiz(record) | Mode::Quiz { record, .. } => {
                Some(record)
            }
            Mode::Idle | Mode::Loading { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{test_app, test_details, test_question};

    #[test]
    fn test_app_new_defaults() {
        let app = test_app();
        assert_eq!(app.mode, Mode::Idle);
        assert_eq!(app.level, StudentLevel::Middle);
        assert!(app.error.is_none());
        assert_eq!(app.active_seq, 0);
    }

    #[test]
    fn test_record_from_details_has_no_image() {
        let record = ExhibitRecord::new(1, "Gravity".into(), StudentLevel::High, test_details(2));
        assert_eq!(record.seq, 1);
        assert!(record.image.is_none());
        assert_eq!(record.experiments.len(), 2);
        assert!(
            record
                .experiments
                .iter()
                .all(|c| c.video == VideoSlot::Hidden)
        );
    }

    #[test]
    fn test_can_load_more_respects_cap_and_inflight() {
        let mut record =
            ExhibitRecord::new(1, "Gravity".into(), StudentLevel::Middle, test_details(2));
        assert!(record.can_load_more());

        record.loading_more = true;
        assert!(!record.can_load_more());
        record.loading_more = false;

        let filler: Vec<_> = (0..8)
            .map(|i| {
                let mut e = test_details(1).experiments.remove(0);
                e.title = format!("Filler {i}");
                e
            })
            .collect();
        record.append_experiments(filler);
        assert_eq!(record.experiments.len(), 10);
        assert!(!record.can_load_more());
    }

    #[test]
    fn test_chips_combine_key_terms_and_inventions() {
        let record =
            ExhibitRecord::new(1, "Pressure".into(), StudentLevel::Middle, test_details(2));
        let chips = record.chips();
        assert_eq!(
            chips.len(),
            record.deep_dive.key_terms.len() + record.related_inventions.len()
        );
        assert_eq!(chips[0], record.deep_dive.key_terms[0]);
    }

    #[test]
    fn test_quiz_scoring_counts_correct_answers() {
        let mut quiz = QuizState::new(vec![test_question(0), test_question(2), test_question(1)]);

        quiz.select(0); // correct
        assert_eq!(quiz.score, 1);
        quiz.advance();

        quiz.select(3); // wrong
        assert_eq!(quiz.score, 1);
        quiz.advance();

        quiz.select(1); // correct
        assert_eq!(quiz.score, 2);
        quiz.advance();

        assert!(quiz.finished);
        assert_eq!(quiz.score, 2);
    }

    #[test]
    fn test_quiz_score_is_monotonic_and_locked_after_reveal() {
        let mut quiz = QuizState::new(vec![test_question(1)]);
        quiz.select(1);
        assert_eq!(quiz.score, 1);
        // Second select on the same question must not change anything.
        quiz.select(0);
        assert_eq!(quiz.score, 1);
        assert_eq!(quiz.selected, Some(1));
    }

    #[test]
    fn test_quiz_advance_requires_reveal() {
        let mut quiz = QuizState::new(vec![test_question(0), test_question(0)]);
        quiz.advance();
        assert_eq!(quiz.current, 0);
        quiz.select(0);
        quiz.advance();
        assert_eq!(quiz.current, 1);
        assert!(!quiz.revealed);
    }

    #[test]
    fn test_quiz_select_out_of_range_ignored() {
        let mut quiz = QuizState::new(vec![test_question(0)]);
        quiz.select(7);
        assert!(!quiz.revealed);
        assert_eq!(quiz.score, 0);
    }
}
