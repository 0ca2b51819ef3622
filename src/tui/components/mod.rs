//! # TUI Components
//!
//! One file per screen element, with state types, rendering logic, and tests
//! co-located:
//!
//! ```text
//! components/
//! ├── mod.rs       (this file)
//! ├── title_bar.rs (top status bar)
//! ├── landing.rs   (lobby: search box + sample topics)
//! ├── exhibit.rs   (scrollable gallery screen)
//! └── quiz.rs      (field-test scenarios + results)
//! ```
//!
//! All components receive external data as props rather than reading global
//! state, which keeps dependencies explicit and rendering testable with
//! `TestBackend`.

pub mod exhibit;
pub mod landing;
pub mod quiz;
pub mod title_bar;

pub use exhibit::ExhibitView;
pub use landing::{LandingPage, SAMPLE_TOPICS};
pub use quiz::QuizView;
pub use title_bar::TitleBar;
