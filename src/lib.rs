//! # StudyGuard - Study Session Engagement Monitoring
//!
//! Client-side core of an online-learning proctoring tool. It watches page
//! visibility, window focus and user input during a study session, turns
//! those signals into classified events and accumulates active time.
//!
//! ## Features
//!
//! - **Session Tracking**: tab switches, focus losses, total and active time
//! - **Scoring**: engagement and attention scores clamped to 0..=100
//! - **Event Delivery**: one subscriber per session, safe against re-entry
//! - **Recording**: best-effort persistence of violations to a REST endpoint
//! - **Extension Host**: tab switch tracking for a browser extension
//!
//! ## Usage
//!
//! ```rust,no_run
//! use studyguard::commands::Cli;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Cli::menu().await
//! }
//! ```

pub mod api;
pub mod commands;
pub mod libs;
