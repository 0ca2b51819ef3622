//! # Actions
//!
//! Everything that can happen in SciLife becomes an `Action`.
//! User submits a topic? That's `Action::Search`.
//! The detail fetch resolves? That's `Action::DetailsReady`.
//!
//! The `update()` function takes the current state and an action, mutates
//! the state, and returns the `Effect` the caller must perform. No I/O
//! happens here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! Completion actions carry the `seq` tag of the search they belong to.
//! `update()` drops any completion whose tag no longer matches
//! `App::active_seq` — that is the whole cancellation story: work is never
//! aborted, its result is just ignored on late arrival.

use log::{debug, warn};

use crate::content::{ConceptDetails, Experiment, ImageHandle, QuizQuestion, VideoHandle};
use crate::core::state::{App, ExhibitRecord, Mode, QuizState, VideoSlot};

#[derive(Debug)]
pub enum Action {
    /// User submitted a topic (search box, sample topic, or chip).
    Search(String),
    DetailsReady {
        seq: u64,
        details: ConceptDetails,
    },
    DetailsFailed {
        seq: u64,
        message: String,
    },
    ImageReady {
        seq: u64,
        image: ImageHandle,
    },
    ImageFailed {
        seq: u64,
        message: String,
    },
    StartQuiz,
    /// Quiz fetch finished; an empty list means it soft-failed.
    QuizReady {
        seq: u64,
        questions: Vec<QuizQuestion>,
    },
    LoadMoreExperiments,
    MoreExperimentsReady {
        seq: u64,
        experiments: Vec<Experiment>,
    },
    RequestVideo(usize),
    VideoReady {
        seq: u64,
        card: usize,
        video: VideoHandle,
    },
    VideoFailed {
        seq: u64,
        card: usize,
        message: String,
    },
    /// Open a YouTube search for the given experiment card.
    OpenYoutube(usize),
    SelectAnswer(usize),
    NextQuestion,
    CompleteQuiz,
    CycleLevel,
    Reset,
    Quit,
}

/// I/O the event loop must perform after an update. The reducer names the
/// work; the TUI spawns it.
#[derive(Debug, PartialEq)]
pub enum Effect {
    None,
    Quit,
    FetchDetails {
        seq: u64,
        topic: String,
        level: crate::content::StudentLevel,
    },
    FetchImage {
        seq: u64,
        prompt: String,
    },
    FetchQuiz {
        seq: u64,
        topic: String,
        level: crate::content::StudentLevel,
    },
    FetchMoreExperiments {
        seq: u64,
        topic: String,
        level: crate::content::StudentLevel,
        exclude_titles: Vec<String>,
    },
    FetchVideo {
        seq: u64,
        card: usize,
        prompt: String,
    },
    OpenUrl(String),
}

/// Minimal percent-encoding for a YouTube search query.
fn encode_query(query: &str) -> String {
    let mut out = String::with_capacity(query.len());
    for c in query.chars() {
        match c {
            ' ' => out.push('+'),
            '&' => out.push_str("%26"),
            '#' => out.push_str("%23"),
            '?' => out.push_str("%3F"),
            '+' => out.push_str("%2B"),
            '=' => out.push_str("%3D"),
            other => out.push(other),
        }
    }
    out
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::Search(topic) => {
            let topic = topic.trim().to_string();
            if topic.is_empty() {
                return Effect::None;
            }
            // New search discards the previous record entirely and
            // invalidates everything still in flight.
            app.active_seq += 1;
            app.error = None;
            app.status_message = format!("Curating exhibit: {topic}");
            app.mode = Mode::Loading {
                topic: topic.clone(),
            };
            Effect::FetchDetails {
                seq: app.active_seq,
                topic,
                level: app.level,
            }
        }

        Action::DetailsReady { seq, details } => {
            if seq != app.active_seq {
                debug!("Discarding stale concept details (seq {seq})");
                return Effect::None;
            }
            let Mode::Loading { topic } = &app.mode else {
                return Effect::None;
            };
            let record = ExhibitRecord::new(seq, topic.clone(), app.level, details);
            let prompt = record.image_prompt.clone();
            app.status_message = format!("Exhibit ready: {}", record.topic);
            app.mode = Mode::Exhibit(record);
            // Detached background update: text is already visible, the
            // image merges in whenever it arrives.
            Effect::FetchImage { seq, prompt }
        }

        Action::DetailsFailed { seq, message } => {
            if seq != app.active_seq {
                return Effect::None;
            }
            warn!("Concept fetch failed: {message}");
            app.error = Some("Failed to generate exhibit. Please try again.".to_string());
            app.status_message = String::new();
            app.mode = Mode::Idle;
            Effect::None
        }

        Action::ImageReady { seq, image } => {
            match app.record_mut() {
                Some(record) if record.seq == seq => record.image = Some(image),
                _ => debug!("Discarding stale exhibit image (seq {seq})"),
            }
            Effect::None
        }

        Action::ImageFailed { seq, message } => {
            // Partial-content failure: the exhibit stays usable without it.
            if let Some(record) = app.record_mut()
                && record.seq == seq
            {
                warn!("Image generation failed silently: {message}");
                record.image_failed = true;
            }
            Effect::None
        }

        Action::StartQuiz => {
            if !matches!(app.mode, Mode::Exhibit(_)) {
                return Effect::None;
            }
            let Mode::Exhibit(record) = std::mem::replace(&mut app.mode, Mode::Idle) else {
                unreachable!("matched Exhibit above");
            };
            let effect = Effect::FetchQuiz {
                seq: record.seq,
                topic: record.topic.clone(),
                level: record.level,
            };
            app.status_message = String::from("Preparing real-world scenarios");
            app.mode = Mode::LoadingQuiz(record);
            effect
        }

        Action::QuizReady { seq, questions } => {
            if seq != app.active_seq || !matches!(app.mode, Mode::LoadingQuiz(_)) {
                debug!("Discarding stale quiz (seq {seq})");
                return Effect::None;
            }
            let Mode::LoadingQuiz(record) = std::mem::replace(&mut app.mode, Mode::Idle) else {
                unreachable!("matched LoadingQuiz above");
            };
            if questions.is_empty() {
                // Soft-fail: silently return to the untouched exhibit.
                app.status_message = String::new();
                app.mode = Mode::Exhibit(record);
            } else {
                app.status_message = format!("Quiz: {} scenarios", questions.len());
                app.mode = Mode::Quiz {
                    record,
                    quiz: QuizState::new(questions),
                };
            }
            Effect::None
        }

        Action::LoadMoreExperiments => {
            let Mode::Exhibit(record) = &mut app.mode else {
                return Effect::None;
            };
            if !record.can_load_more() {
                return Effect::None;
            }
            record.loading_more = true;
            Effect::FetchMoreExperiments {
                seq: record.seq,
                topic: record.topic.clone(),
                level: record.level,
                exclude_titles: record.experiment_titles(),
            }
        }

        Action::MoreExperimentsReady { seq, experiments } => {
            match app.record_mut() {
                Some(record) if record.seq == seq => {
                    record.loading_more = false;
                    if experiments.is_empty() {
                        debug!("Load-more yielded nothing this round");
                    }
                    record.append_experiments(experiments);
                }
                _ => debug!("Discarding stale experiments (seq {seq})"),
            }
            Effect::None
        }

        Action::RequestVideo(card) => {
            let Mode::Exhibit(record) = &mut app.mode else {
                return Effect::None;
            };
            let seq = record.seq;
            let Some(slot) = record.experiments.get_mut(card) else {
                return Effect::None;
            };
            if slot.video == VideoSlot::Loading {
                return Effect::None;
            }
            slot.video = VideoSlot::Loading;
            Effect::FetchVideo {
                seq,
                card,
                prompt: slot.details.video_prompt.clone(),
            }
        }

        Action::VideoReady { seq, card, video } => {
            if let Some(record) = app.record_mut()
                && record.seq == seq
                && let Some(slot) = record.experiments.get_mut(card)
            {
                slot.video = VideoSlot::Ready(video);
            } else {
                debug!("Discarding stale video (seq {seq}, card {card})");
            }
            Effect::None
        }

        Action::VideoFailed { seq, card, message } => {
            if let Some(record) = app.record_mut()
                && record.seq == seq
                && let Some(slot) = record.experiments.get_mut(card)
            {
                warn!("Video generation failed for card {card}: {message}");
                slot.video = VideoSlot::Failed("Failed to generate video. Try YouTube.".to_string());
            }
            Effect::None
        }

        Action::OpenYoutube(card) => match app.record().and_then(|r| r.experiments.get(card)) {
            Some(slot) => Effect::OpenUrl(format!(
                "https://www.youtube.com/results?search_query={}",
                encode_query(&slot.details.youtube_query)
            )),
            None => Effect::None,
        },

        Action::SelectAnswer(index) => {
            if let Mode::Quiz { quiz, .. } = &mut app.mode {
                quiz.select(index);
            }
            Effect::None
        }

        Action::NextQuestion => {
            if let Mode::Quiz { quiz, .. } = &mut app.mode {
                quiz.advance();
            }
            Effect::None
        }

        Action::CompleteQuiz => {
            if let Mode::Quiz { quiz, .. } = &app.mode
                && quiz.finished
            {
                app.active_seq += 1;
                app.status_message = String::from("Explore another topic!");
                app.mode = Mode::Idle;
            }
            Effect::None
        }

        Action::CycleLevel => {
            // Takes effect on the next generation request only.
            app.level = app.level.next();
            app.status_message = format!("Level: {}", app.level.label());
            Effect::None
        }

        Action::Reset => {
            if app.mode != Mode::Idle {
                // Invalidate outstanding async work before dropping the record.
                app.active_seq += 1;
                app.mode = Mode::Idle;
                app.error = None;
                app.status_message = String::from("Welcome back to the lobby.");
            }
            Effect::None
        }

        Action::Quit => Effect::Quit,
    }
}
