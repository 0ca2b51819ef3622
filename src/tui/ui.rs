//! Top-level frame composition: picks the screen for the current
//! [`Mode`](crate::core::state::Mode) and frames it with the title bar and
//! the per-screen key hints.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::core::state::{App, Mode};
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::exhibit::spinner;
use crate::tui::components::{ExhibitView, LandingPage, QuizView, TitleBar};

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    use Constraint::{Length, Min};
    let layout = Layout::vertical([Length(1), Min(0), Length(1)]);
    let [title_area, main_area, hint_area] = layout.areas(frame.area());

    let mut title_bar = TitleBar {
        level_label: app.level.label(),
        status_message: app.status_message.clone(),
    };
    title_bar.render(frame, title_area);

    match &app.mode {
        Mode::Idle => {
            let mut landing = LandingPage {
                input: &tui.input,
                level_label: app.level.label(),
                error: app.error.as_deref(),
                pulse: tui.pulse_value,
            };
            landing.render(frame, main_area);
        }
        Mode::Loading { topic } => draw_loading_view(frame, main_area, topic, spinner_frame),
        Mode::Exhibit(record) => {
            let mut view = ExhibitView {
                record,
                selected_card: tui.selected_card,
                selected_chip: tui.selected_chip,
                deep_dive_open: tui.deep_dive_open,
                quiz_loading: false,
                spinner_frame,
                scroll: &mut tui.scroll,
            };
            view.render(frame, main_area);
        }
        Mode::LoadingQuiz(record) => {
            let mut view = ExhibitView {
                record,
                selected_card: tui.selected_card,
                selected_chip: tui.selected_chip,
                deep_dive_open: tui.deep_dive_open,
                quiz_loading: true,
                spinner_frame,
                scroll: &mut tui.scroll,
            };
            view.render(frame, main_area);
        }
        Mode::Quiz { record, quiz } => {
            let mut view = QuizView {
                topic: &record.topic,
                quiz,
            };
            view.render(frame, main_area);
        }
    }

    frame.render_widget(
        Paragraph::new(Span::styled(
            key_hints(&app.mode),
            Style::default().fg(Color::DarkGray),
        )),
        hint_area,
    );
}

fn draw_loading_view(frame: &mut Frame, area: Rect, topic: &str, spinner_frame: usize) {
    let lines = vec![
        Line::from(Span::styled(
            format!("{} Curating your exhibit...", spinner(spinner_frame)),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from(Span::styled(
            format!("\"{topic}\""),
            Style::default().fg(Color::Cyan),
        )),
    ];
    let [center] = Layout::vertical([Constraint::Length(lines.len() as u16)])
        .flex(Flex::Center)
        .areas(area);
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), center);
}

fn key_hints(mode: &Mode) -> &'static str {
    match mode {
        Mode::Idle => "Enter search · 1-5 sample topics · Ctrl+L level · Ctrl+C quit",
        Mode::Loading { .. } | Mode::LoadingQuiz(_) => "Esc back to lobby · Ctrl+C quit",
        Mode::Exhibit(_) => {
            "←/→ card · [ ] chip · Enter chip · d details · m more · v video · y YouTube · q quiz · Esc lobby"
        }
        Mode::Quiz { .. } => "1-4 answer · Enter continue · Esc lobby · Ctrl+C quit",
    }
}
