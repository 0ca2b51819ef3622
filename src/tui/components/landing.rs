//! # Landing Page Component
//!
//! The museum lobby: a search box, a handful of sample topics, and the
//! current student level. Shown whenever no exhibit is on display.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use crate::tui::component::Component;

/// Topics offered on the lobby screen; digits 1-5 pick one directly.
pub const SAMPLE_TOPICS: [&str; 5] = [
    "Newton's Third Law",
    "Photosynthesis",
    "Compound Interest",
    "Doppler Effect",
    "Thermodynamics",
];

pub struct LandingPage<'a> {
    pub input: &'a str,
    pub level_label: &'static str,
    pub error: Option<&'a str>,
    /// 0.0..=1.0 brightness for the pulsing title.
    pub pulse: f32,
}

impl Component for LandingPage<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();

        let title_color = if self.pulse > 0.5 {
            Color::Cyan
        } else {
            Color::LightCyan
        };
        lines.push(Line::from(Span::styled(
            "SciLife Museum",
            Style::default()
                .fg(title_color)
                .add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            "Where every concept becomes an exhibit",
            Style::default().fg(Color::DarkGray),
        )));
        lines.push(Line::default());

        if let Some(error) = self.error {
            lines.push(Line::from(Span::styled(
                error,
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::default());
        }

        lines.push(Line::from(vec![
            Span::styled("Audience: ", Style::default().fg(Color::DarkGray)),
            Span::styled(self.level_label, Style::default().fg(Color::Yellow)),
            Span::styled("  (Ctrl+L to change)", Style::default().fg(Color::DarkGray)),
        ]));
        lines.push(Line::default());

        for (i, topic) in SAMPLE_TOPICS.iter().enumerate() {
            lines.push(Line::from(vec![
                Span::styled(format!("[{}] ", i + 1), Style::default().fg(Color::Cyan)),
                Span::raw(*topic),
            ]));
        }

        let text_height = lines.len() as u16;
        let vertical_layout = Layout::vertical([
            Constraint::Length(text_height),
            Constraint::Length(1), // Spacer
            Constraint::Length(3), // Search box
        ])
        .flex(Flex::Center)
        .split(area);

        frame.render_widget(
            Paragraph::new(lines).alignment(Alignment::Center),
            vertical_layout[0],
        );

        let search_width = area.width.clamp(20, 60);
        let [search_area] = Layout::horizontal([Constraint::Length(search_width)])
            .flex(Flex::Center)
            .areas(vertical_layout[2]);

        let display = if self.input.is_empty() {
            Span::styled(
                "Type a concept and press Enter...",
                Style::default().fg(Color::DarkGray),
            )
        } else {
            Span::raw(self.input)
        };
        frame.render_widget(
            Paragraph::new(Line::from(display)).block(Block::bordered().title("Search")),
            search_area,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_landing_shows_samples_and_placeholder() {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut landing = LandingPage {
            input: "",
            level_label: "Middle School",
            error: None,
            pulse: 0.0,
        };
        terminal.draw(|f| landing.render(f, f.area())).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("SciLife Museum"));
        assert!(text.contains("Newton's Third Law"));
        assert!(text.contains("Middle School"));
        assert!(text.contains("Type a concept"));
    }

    #[test]
    fn test_landing_shows_error_and_input() {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut landing = LandingPage {
            input: "gravity",
            level_label: "High School",
            error: Some("Failed to generate exhibit. Please try again."),
            pulse: 1.0,
        };
        terminal.draw(|f| landing.render(f, f.area())).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Failed to generate exhibit"));
        assert!(text.contains("gravity"));
        assert!(!text.contains("Type a concept"));
    }
}
