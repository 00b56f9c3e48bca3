//! Core library of studyguard.
//!
//! The monitoring pipeline, bottom-up:
//!
//! - [`session`]: counters of one monitoring session
//! - [`observer`] and [`accumulator`]: pure transitions on a session
//! - [`score`]: engagement and attention scoring
//! - [`emitter`] and [`event`]: classified events and their single subscriber
//! - [`tracker`]: lifecycle controller tying the pieces to async tasks
//! - [`signals`]: signal bus and native input capture
//! - [`recorder`]: fire-and-forget persistence of events
//! - [`extension`]: tab switch monitor of the browser extension
//!
//! Supporting modules cover configuration, storage paths, formatting, tables
//! and user-facing messages.

pub mod accumulator;
pub mod config;
pub mod data_storage;
pub mod emitter;
pub mod event;
pub mod extension;
pub mod formatter;
pub mod messages;
pub mod observer;
pub mod recorder;
pub mod score;
pub mod session;
pub mod signals;
pub mod tracker;
pub mod view;
