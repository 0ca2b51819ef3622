//! # Quiz Component
//!
//! The field-test wing: one scenario at a time, four possible actions,
//! immediate reveal with the real-life explanation, and a results screen
//! once the last scenario is answered.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Wrap};

use crate::core::state::QuizState;
use crate::tui::component::Component;

pub struct QuizView<'a> {
    pub topic: &'a str,
    pub quiz: &'a QuizState,
}

impl QuizView<'_> {
    fn render_results(&self, frame: &mut Frame, area: Rect) {
        let quiz = self.quiz;
        let verdict = if quiz.score == quiz.questions.len() {
            "Perfect run! You are ready for the field."
        } else if quiz.score * 2 >= quiz.questions.len() {
            "Solid instincts. Review the misses and go again."
        } else {
            "The science is sneaky. Revisit the exhibit and retry!"
        };

        let lines = vec![
            Line::from(Span::styled(
                "Simulation Complete",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::default(),
            Line::from(format!("Score: {} / {}", quiz.score, quiz.questions.len())),
            Line::default(),
            Line::from(Span::styled(verdict, Style::default().fg(Color::Yellow))),
            Line::default(),
            Line::from(Span::styled(
                "Press Enter to return to the lobby",
                Style::default().fg(Color::DarkGray),
            )),
        ];

        let [center] = Layout::vertical([Constraint::Length(lines.len() as u16)])
            .flex(Flex::Center)
            .areas(area);
        frame.render_widget(
            Paragraph::new(lines).alignment(Alignment::Center),
            center,
        );
    }

    fn render_question(&self, frame: &mut Frame, area: Rect) {
        let quiz = self.quiz;
        let Some(question) = quiz.current_question() else {
            return;
        };

        let mut lines = vec![
            Line::from(Span::styled(
                format!(
                    "Field Test: {}  —  scenario {} of {}",
                    self.topic,
                    quiz.current + 1,
                    quiz.questions.len()
                ),
                Style::default().fg(Color::DarkGray),
            )),
            Line::default(),
            Line::from(Span::styled(
                question.scenario.as_str(),
                Style::default().add_modifier(Modifier::ITALIC),
            )),
            Line::default(),
            Line::from(Span::styled(
                question.question.as_str(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::default(),
        ];

        for (index, option) in question.options.iter().enumerate() {
            let style = if quiz.revealed {
                if index == question.correct_index {
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
                } else if quiz.selected == Some(index) {
                    Style::default().fg(Color::Red)
                } else {
                    Style::default().add_modifier(Modifier::DIM)
                }
            } else {
                Style::default()
            };
            lines.push(Line::from(Span::styled(
                format!("  [{}] {}", index + 1, option),
                style,
            )));
        }
        lines.push(Line::default());

        if quiz.revealed {
            lines.push(Line::from(Span::styled(
                "Why this works:",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(question.explanation.as_str()));
            lines.push(Line::default());
            lines.push(Line::from(Span::styled(
                if quiz.current + 1 < quiz.questions.len() {
                    "Press Enter for the next scenario"
                } else {
                    "Press Enter for your results"
                },
                Style::default().fg(Color::DarkGray),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Pick an action: 1-4",
                Style::default().fg(Color::DarkGray),
            )));
        }

        frame.render_widget(
            Paragraph::new(lines)
                .block(Block::bordered().title("Daily Encounter"))
                .wrap(Wrap { trim: true }),
            area,
        );
    }
}

impl Component for QuizView<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        if self.quiz.finished {
            self.render_results(frame, area);
        } else {
            self.render_question(frame, area);
        }
    }
}
