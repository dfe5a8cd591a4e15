//! FocusStudy - flashcards with a simple spaced repetition scheduler.
//!
//! Cards live in a [`collection::Collection`] backed by any
//! [`storage::CardStore`]; [`scheduler`] holds the review rule.

pub mod collection;
pub mod config;
pub mod logging;
pub mod models;
pub mod scheduler;
pub mod storage;
pub mod ui;
