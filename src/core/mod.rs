//! # Core
//!
//! Business logic, state management, and configuration. Nothing in here
//! draws to a terminal or talks to the network directly.
//!
//! ```text
//! ┌─────────┐   Action    ┌──────────┐   Effect   ┌─────────────┐
//! │   TUI   │ ──────────> │ update() │ ─────────> │ async fetch │
//! │  (view) │ <────────── │ (state)  │ <───────── │ (service)   │
//! └─────────┘   render    └──────────┘   Action   └─────────────┘
//! ```
//!
//! - [`state`]: the [`App`](state::App) struct and screen [`Mode`](state::Mode)
//! - [`action`]: every [`Action`](action::Action) and the reducer
//! - [`config`]: layered TOML/env/CLI configuration

pub mod action;
pub mod config;
pub mod state;
