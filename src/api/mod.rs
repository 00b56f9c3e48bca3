//! API client modules for the study platform backend.
//!
//! The monitoring core never talks to the network itself. Subscribers use
//! these clients to persist events, and every failure stays on their side.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use studyguard::api::{EventRecord, MonitoringApi};
//! use studyguard::libs::config::ServerConfig;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let api = MonitoringApi::new(&ServerConfig::default())?;
//!
//! // Events for an existing study session
//! api.record_event(&EventRecord::new("study-42", "focus_lost", serde_json::Value::Null)).await?;
//!
//! // Events for a monitoring session opened here
//! let monitoring_id = api.start_session("content-7").await?;
//! api.track_event(&monitoring_id, "focus_lost", &serde_json::Value::Null).await?;
//! api.end_session(&monitoring_id).await?;
//! # Ok(())
//! # }
//! ```

pub mod monitoring;

pub use monitoring::{ApiError, EventRecord, MonitoringApi};
