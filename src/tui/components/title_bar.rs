//! # TitleBar Component
//!
//! Top status bar showing the application name, the current student level,
//! and any transient status message.
//!
//! Purely presentational: it receives all data as props and holds no state,
//! so it renders the same regardless of which screen is below it.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::Span;

use crate::tui::component::Component;

pub struct TitleBar {
    /// Current audience, e.g. "Middle School".
    pub level_label: &'static str,
    /// Transient status, e.g. "Curating exhibit: Gravity".
    pub status_message: String,
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let title_text = if self.status_message.is_empty() {
            format!("SciLife Museum (audience: {})", self.level_label)
        } else {
            format!(
                "SciLife Museum (audience: {}) | {}",
                self.level_label, self.status_message
            )
        };
        frame.render_widget(Span::raw(title_text), area);
    }
}
