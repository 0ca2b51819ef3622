//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI, and
//! translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm; the core
//! never touches a terminal.
//!
//! ## Redraw Strategy
//!
//! The event loop uses conditional redraw to avoid unnecessary work:
//!
//! - **Animating** (lobby pulse, any spinner): draws every ~80ms.
//! - **Idle** (static exhibit or quiz): sleeps up to 500ms, only redraws on
//!   events or terminal resize.
//!
//! ## Background Work
//!
//! Effects returned by `update()` are spawned as tokio tasks that send their
//! completion back over an mpsc channel as tagged Actions. Nothing is ever
//! aborted; the reducer discards completions whose tag is stale.

mod component;
mod components;
mod event;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use tui_scrollview::ScrollViewState;

use crate::content::{ContentService, GeminiService};
use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::state::{App, Mode, VideoSlot};
use crate::tui::components::SAMPLE_TOPICS;
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// TUI-specific presentation state (not part of core business logic).
pub struct TuiState {
    /// Search box contents on the lobby screen.
    pub input: String,
    /// Index of the highlighted experiment card.
    pub selected_card: usize,
    /// Index into `record.chips()`, if a chip is highlighted.
    pub selected_chip: Option<usize>,
    pub deep_dive_open: bool,
    pub scroll: ScrollViewState,
    /// Animation state for the lobby title.
    pub pulse_value: f32,
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            input: String::new(),
            selected_card: 0,
            selected_chip: None,
            deep_dive_open: false,
            scroll: ScrollViewState::default(),
            pulse_value: 0.0,
        }
    }

    /// Clears per-record presentation state. Called whenever a new search
    /// begins, so the next exhibit starts at the top with nothing selected.
    fn reset_presentation(&mut self) {
        self.selected_card = 0;
        self.selected_chip = None;
        self.deep_dive_open = false;
        self.scroll = ScrollViewState::default();
    }
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(stdout(), EnableMouseCapture)?;
        info!("Terminal modes enabled (mouse capture for scrolling)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableMouseCapture);
    }
}

/// Build the content service from resolved configuration.
pub fn build_service(config: &ResolvedConfig) -> Arc<dyn ContentService> {
    Arc::new(
        GeminiService::new(config.api_key.clone(), Some(config.base_url.clone())).with_models(
            config.text_model.clone(),
            config.image_model.clone(),
            config.video_model.clone(),
        ),
    )
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let service = build_service(&config);
    let mut app = App::new(service, config.level);
    let mut tui = TuiState::new();

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();

    // Animation timer
    let start_time = std::time::Instant::now();
    let mut needs_redraw = true; // Force first frame

    loop {
        let animating = is_animating(&app);
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            let elapsed = start_time.elapsed().as_secs_f32();
            tui.pulse_value = (elapsed * 5.0).sin() * 0.5 + 0.5;
            let spinner_frame = (elapsed * 12.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, spinner_frame))?;
            needs_redraw = false;
        }

        // Dynamic poll timeout: short when animating (~12fps), long when idle
        let timeout = if animating {
            std::time::Duration::from_millis(80)
        } else {
            std::time::Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);

        // Process first event + drain ALL pending events before next draw
        let mut should_quit = false;
        if first_event.is_some() {
            needs_redraw = true;
        }
        for tui_event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if matches!(tui_event, TuiEvent::Resize) {
                continue;
            }
            if let Some(action) = handle_event(tui_event, &app, &mut tui) {
                let effect = update(&mut app, action);
                if effect == Effect::Quit {
                    should_quit = true;
                    continue;
                }
                if matches!(effect, Effect::FetchDetails { .. }) {
                    tui.reset_presentation();
                }
                dispatch_effect(effect, app.service.clone(), tx.clone());
            }
        }

        if should_quit {
            break;
        }

        // Handle completions from background tasks
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            let effect = update(&mut app, action);
            if effect == Effect::Quit {
                should_quit = true;
                break;
            }
            dispatch_effect(effect, app.service.clone(), tx.clone());
        }

        if should_quit {
            break;
        }
    }

    ratatui::restore();
    Ok(())
}

/// True when something on screen is moving and the loop should run hot.
fn is_animating(app: &App) -> bool {
    match &app.mode {
        // Lobby title pulses
        Mode::Idle => true,
        Mode::Loading { .. } | Mode::LoadingQuiz(_) => true,
        Mode::Exhibit(record) => {
            (record.image.is_none() && !record.image_failed)
                || record.loading_more
                || record
                    .experiments
                    .iter()
                    .any(|card| card.video == VideoSlot::Loading)
        }
        Mode::Quiz { .. } => false,
    }
}

/// Translates a low-level terminal event into a core Action, updating
/// presentation state along the way. Returns None when the event was
/// consumed by the view layer (scrolling, card selection, typing).
fn handle_event(tui_event: TuiEvent, app: &App, tui: &mut TuiState) -> Option<Action> {
    // Global bindings first
    match tui_event {
        TuiEvent::ForceQuit => return Some(Action::Quit),
        TuiEvent::CycleLevel => return Some(Action::CycleLevel),
        TuiEvent::Escape => {
            return if app.mode == Mode::Idle {
                tui.input.clear();
                None
            } else {
                Some(Action::Reset)
            };
        }
        _ => {}
    }

    match &app.mode {
        Mode::Idle => match tui_event {
            // Digits pick a sample topic while the search box is empty
            TuiEvent::InputChar(c @ '1'..='5') if tui.input.is_empty() => {
                let index = c as usize - '1' as usize;
                Some(Action::Search(SAMPLE_TOPICS[index].to_string()))
            }
            TuiEvent::InputChar(c) => {
                tui.input.push(c);
                None
            }
            TuiEvent::Backspace => {
                tui.input.pop();
                None
            }
            TuiEvent::Submit => Some(Action::Search(std::mem::take(&mut tui.input))),
            _ => None,
        },

        Mode::Loading { .. } | Mode::LoadingQuiz(_) => None,

        Mode::Exhibit(record) => match tui_event {
            TuiEvent::Left => {
                tui.selected_card = tui.selected_card.saturating_sub(1);
                None
            }
            TuiEvent::Right => {
                if tui.selected_card + 1 < record.experiments.len() {
                    tui.selected_card += 1;
                }
                None
            }
            TuiEvent::InputChar('[') => {
                let chips = record.chips().len();
                if chips > 0 {
                    tui.selected_chip = Some(match tui.selected_chip {
                        Some(0) | None => chips - 1,
                        Some(i) => i - 1,
                    });
                }
                None
            }
            TuiEvent::InputChar(']') => {
                let chips = record.chips().len();
                if chips > 0 {
                    tui.selected_chip = Some(match tui.selected_chip {
                        None => 0,
                        Some(i) => (i + 1) % chips,
                    });
                }
                None
            }
            // Enter on a highlighted chip re-enters the search flow
            TuiEvent::Submit => tui
                .selected_chip
                .and_then(|i| record.chips().get(i).map(|chip| chip.to_string()))
                .map(Action::Search),
            TuiEvent::InputChar('d') => {
                tui.deep_dive_open = !tui.deep_dive_open;
                None
            }
            TuiEvent::InputChar('m') => Some(Action::LoadMoreExperiments),
            TuiEvent::InputChar('v') => Some(Action::RequestVideo(tui.selected_card)),
            TuiEvent::InputChar('y') => Some(Action::OpenYoutube(tui.selected_card)),
            TuiEvent::InputChar('q') => Some(Action::StartQuiz),
            TuiEvent::ScrollUp => {
                tui.scroll.scroll_up();
                None
            }
            TuiEvent::ScrollDown => {
                tui.scroll.scroll_down();
                None
            }
            TuiEvent::ScrollPageUp => {
                tui.scroll.scroll_page_up();
                None
            }
            TuiEvent::ScrollPageDown => {
                tui.scroll.scroll_page_down();
                None
            }
            _ => None,
        },

        Mode::Quiz { quiz, .. } => match tui_event {
            TuiEvent::InputChar(c @ '1'..='4') => {
                Some(Action::SelectAnswer(c as usize - '1' as usize))
            }
            TuiEvent::Submit => {
                if quiz.finished {
                    Some(Action::CompleteQuiz)
                } else if quiz.revealed {
                    Some(Action::NextQuestion)
                } else {
                    None
                }
            }
            _ => None,
        },
    }
}

/// Spawns the async work an effect names, reporting back as tagged Actions.
fn dispatch_effect(effect: Effect, service: Arc<dyn ContentService>, tx: mpsc::Sender<Action>) {
    match effect {
        Effect::None | Effect::Quit => {}

        Effect::FetchDetails { seq, topic, level } => {
            info!("Spawning detail fetch: {topic:?} (seq {seq})");
            tokio::spawn(async move {
                let action = match service.concept_details(&topic, level).await {
                    Ok(details) => Action::DetailsReady { seq, details },
                    Err(e) => Action::DetailsFailed {
                        seq,
                        message: e.to_string(),
                    },
                };
                send(&tx, action);
            });
        }

        Effect::FetchImage { seq, prompt } => {
            tokio::spawn(async move {
                let action = match service.concept_image(&prompt).await {
                    Ok(image) => Action::ImageReady { seq, image },
                    Err(e) => Action::ImageFailed {
                        seq,
                        message: e.to_string(),
                    },
                };
                send(&tx, action);
            });
        }

        Effect::FetchQuiz { seq, topic, level } => {
            info!("Spawning quiz fetch: {topic:?} (seq {seq})");
            tokio::spawn(async move {
                let questions = service.quiz(&topic, level).await;
                send(&tx, Action::QuizReady { seq, questions });
            });
        }

        Effect::FetchMoreExperiments {
            seq,
            topic,
            level,
            exclude_titles,
        } => {
            tokio::spawn(async move {
                let experiments = service.more_experiments(&topic, level, &exclude_titles).await;
                send(&tx, Action::MoreExperimentsReady { seq, experiments });
            });
        }

        Effect::FetchVideo { seq, card, prompt } => {
            info!("Spawning video generation for card {card} (seq {seq})");
            tokio::spawn(async move {
                let action = match service.experiment_video(&prompt).await {
                    Ok(video) => Action::VideoReady { seq, card, video },
                    Err(e) => Action::VideoFailed {
                        seq,
                        card,
                        message: e.to_string(),
                    },
                };
                send(&tx, action);
            });
        }

        Effect::OpenUrl(url) => open_external(&url),
    }
}

fn send(tx: &mpsc::Sender<Action>, action: Action) {
    if tx.send(action).is_err() {
        warn!("Failed to send action: receiver dropped");
    }
}

/// Hands a URL to the platform opener. Fire-and-forget; a missing opener
/// is logged, not surfaced.
fn open_external(url: &str) {
    info!("Opening externally: {url}");
    #[cfg(target_os = "macos")]
    let result = std::process::Command::new("open").arg(url).spawn();
    #[cfg(target_os = "windows")]
    let result = std::process::Command::new("cmd")
        .args(["/C", "start", "", url])
        .spawn();
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    let result = std::process::Command::new("xdg-open").arg(url).spawn();

    if let Err(e) = result {
        warn!("Failed to open URL: {e}");
    }
}
