//! # Exhibit Component
//!
//! The main gallery screen: summary, analogy, illustration status, the
//! collapsible "Under the Hood" panel, experiment cards, the Tech Spotlight,
//! and the explore-next chips.
//!
//! Sections are rendered as paragraphs inside a `ScrollView`, with heights
//! measured per frame so the scroll range always matches the content.

use ratatui::Frame;
use ratatui::layout::{Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Wrap};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::state::{ExhibitRecord, VideoSlot};
use crate::tui::component::Component;

pub const SPINNER_FRAMES: [&str; 4] = ["|", "/", "-", "\\"];

pub fn spinner(frame: usize) -> &'static str {
    SPINNER_FRAMES[frame % SPINNER_FRAMES.len()]
}

pub struct ExhibitView<'a> {
    pub record: &'a ExhibitRecord,
    pub selected_card: usize,
    pub selected_chip: Option<usize>,
    pub deep_dive_open: bool,
    /// True while the quiz fetch is in flight (dims the whole gallery).
    pub quiz_loading: bool,
    pub spinner_frame: usize,
    pub scroll: &'a mut ScrollViewState,
}

/// A measured section ready to be placed in the scroll view.
struct Section<'a> {
    paragraph: Paragraph<'a>,
    height: u16,
}

impl<'a> Section<'a> {
    fn new(paragraph: Paragraph<'a>, width: u16) -> Self {
        let height = paragraph.line_count(width) as u16;
        Self { paragraph, height }
    }
}

impl ExhibitView<'_> {
    fn sections(&self, width: u16) -> Vec<Section<'_>> {
        let record = self.record;
        let mut sections = Vec::new();

        let header = Line::from(vec![
            Span::styled(
                record.topic.as_str(),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  ({} exhibit)", record.level.label()),
                Style::default().fg(Color::DarkGray),
            ),
        ]);
        sections.push(Section::new(Paragraph::new(header), width));

        sections.push(Section::new(
            Paragraph::new(record.summary.as_str())
                .block(Block::bordered().title("In a Nutshell"))
                .wrap(Wrap { trim: true }),
            width,
        ));

        sections.push(Section::new(
            Paragraph::new(Span::styled(
                record.analogy.as_str(),
                Style::default().add_modifier(Modifier::ITALIC),
            ))
            .block(Block::bordered().title("Think of it like..."))
            .wrap(Wrap { trim: true }),
            width,
        ));

        sections.push(self.illustration_section(width));
        sections.push(self.deep_dive_section(width));
        sections.push(Section::new(
            Paragraph::new(Span::styled(
                format!("Kitchen Science ({} experiments)", record.experiments.len()),
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )),
            width,
        ));
        for index in 0..record.experiments.len() {
            sections.push(self.experiment_section(index, width));
        }
        sections.push(self.load_more_section(width));
        sections.push(Section::new(
            Paragraph::new(vec![
                Line::from(Span::styled(
                    record.application.product_name.as_str(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(record.application.description.as_str()),
                Line::from(Span::styled(
                    record.application.citation_url.as_str(),
                    Style::default().fg(Color::Blue),
                )),
            ])
            .block(Block::bordered().title("Tech Spotlight"))
            .wrap(Wrap { trim: true }),
            width,
        ));
        sections.push(self.chips_section(width));

        sections
    }

    fn illustration_section(&self, width: u16) -> Section<'_> {
        let line = match &self.record.image {
            Some(image) => Line::from(vec![
                Span::styled("Illustration ready: ", Style::default().fg(Color::Green)),
                Span::raw(format!(
                    "{} ({} KB, base64)",
                    image.mime_type,
                    image.data.len() / 1024
                )),
            ]),
            None if self.record.image_failed => Line::from(Span::styled(
                "Illustration unavailable, but the exhibit stands on its own",
                Style::default().fg(Color::DarkGray),
            )),
            None => Line::from(Span::styled(
                format!("{} Generating exhibit illustration...", spinner(self.spinner_frame)),
                Style::default().fg(Color::DarkGray),
            )),
        };
        Section::new(
            Paragraph::new(vec![
                line,
                Line::from(Span::styled(
                    self.record.image_prompt.as_str(),
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::ITALIC),
                )),
            ])
            .block(Block::bordered().title("Exhibit Poster"))
            .wrap(Wrap { trim: true }),
            width,
        )
    }

    fn deep_dive_section(&self, width: u16) -> Section<'_> {
        let deep_dive = &self.record.deep_dive;
        let paragraph = if self.deep_dive_open {
            let mut lines = vec![Line::from(deep_dive.detailed_text.as_str())];
            lines.push(Line::default());
            lines.push(Line::from(vec![
                Span::styled("Formula: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    deep_dive.formula.as_str(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
            ]));
            lines.push(Line::from(deep_dive.formula_explanation.as_str()));
            if !deep_dive.key_terms.is_empty() {
                lines.push(Line::from(vec![
                    Span::styled("Key terms: ", Style::default().fg(Color::Yellow)),
                    Span::raw(deep_dive.key_terms.join(", ")),
                ]));
            }
            Paragraph::new(lines)
                .block(Block::bordered().title("Under the Hood [d to collapse]"))
                .wrap(Wrap { trim: true })
        } else {
            Paragraph::new(Span::styled(
                "Press d for the technical deep dive",
                Style::default().fg(Color::DarkGray),
            ))
            .block(Block::bordered().title("Under the Hood"))
        };
        Section::new(paragraph, width)
    }

    fn experiment_section(&self, index: usize, width: u16) -> Section<'_> {
        let card = &self.record.experiments[index];
        let selected = index == self.selected_card;
        let border_style = if selected {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().add_modifier(Modifier::DIM)
        };

        let mut lines = Vec::new();
        if !card.details.materials.is_empty() {
            lines.push(Line::from(vec![
                Span::styled("Materials: ", Style::default().fg(Color::Yellow)),
                Span::raw(card.details.materials.join(", ")),
            ]));
        }
        for (step, text) in card.details.steps.iter().enumerate() {
            lines.push(Line::from(format!("  {}. {}", step + 1, text)));
        }
        lines.push(Line::from(Span::styled(
            card.details.scientific_principle.as_str(),
            Style::default().add_modifier(Modifier::ITALIC),
        )));
        lines.push(match &card.video {
            VideoSlot::Hidden => Line::from(Span::styled(
                if selected {
                    "[v] generate video   [y] find on YouTube"
                } else {
                    "select this card for video options"
                },
                Style::default().fg(Color::DarkGray),
            )),
            VideoSlot::Loading => Line::from(Span::styled(
                format!(
                    "{} Generating demonstration video (this can take a minute)...",
                    spinner(self.spinner_frame)
                ),
                Style::default().fg(Color::Yellow),
            )),
            VideoSlot::Ready(video) => Line::from(vec![
                Span::styled("Video: ", Style::default().fg(Color::Green)),
                Span::styled(video.uri.as_str(), Style::default().fg(Color::Blue)),
            ]),
            VideoSlot::Failed(message) => Line::from(Span::styled(
                message.as_str(),
                Style::default().fg(Color::Red),
            )),
        });

        let title = format!(
            "{} {} ({})",
            if selected { ">" } else { " " },
            card.details.title,
            card.details.duration
        );
        Section::new(
            Paragraph::new(lines)
                .block(
                    Block::bordered()
                        .title(title)
                        .border_style(border_style)
                        .title_style(border_style),
                )
                .wrap(Wrap { trim: true }),
            width,
        )
    }

    fn load_more_section(&self, width: u16) -> Section<'_> {
        let line = if self.record.loading_more {
            Span::styled(
                format!("{} Brewing up new experiments...", spinner(self.spinner_frame)),
                Style::default().fg(Color::Yellow),
            )
        } else if self.record.can_load_more() {
            Span::styled("[m] Suggest more experiments", Style::default().fg(Color::Cyan))
        } else {
            Span::styled(
                "The lab bench is full — try them out!",
                Style::default().fg(Color::DarkGray),
            )
        };
        Section::new(Paragraph::new(line), width)
    }

    fn chips_section(&self, width: u16) -> Section<'_> {
        let chips = self.record.chips();
        let mut spans = vec![Span::styled(
            "Explore next: ",
            Style::default().fg(Color::DarkGray),
        )];
        for (index, chip) in chips.iter().enumerate() {
            let style = if self.selected_chip == Some(index) {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Cyan)
            };
            spans.push(Span::styled(format!("[{chip}]"), style));
            spans.push(Span::raw(" "));
        }
        Section::new(
            Paragraph::new(Line::from(spans)).wrap(Wrap { trim: true }),
            width,
        )
    }
}

impl Component for ExhibitView<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1);
        let sections = self.sections(content_width);
        let total_height: u16 = sections.iter().map(|s| s.height).sum();

        let mut scroll_view = ScrollView::new(Size::new(content_width, total_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Always)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let mut y_offset: u16 = 0;
        for section in &sections {
            let rect = Rect::new(0, y_offset, content_width, section.height);
            scroll_view.render_widget(section.paragraph.clone(), rect);
            y_offset += section.height;
        }

        frame.render_stateful_widget(scroll_view, area, self.scroll);

        if self.quiz_loading {
            // One-line overlay at the bottom of the gallery.
            let overlay = Rect::new(area.x, area.y + area.height.saturating_sub(1), area.width, 1);
            frame.render_widget(
                Paragraph::new(Span::styled(
                    format!("{} Preparing real-world scenarios...", spinner(self.spinner_frame)),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                )),
                overlay,
            );
        }
    }
}
