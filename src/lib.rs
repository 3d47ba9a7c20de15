//! # Universe Signs Bot
//!
//! A Telegram bot for recording the "signs of the Universe" a user notices,
//! such as a time like `11:11` or a number like `222`, and for reviewing
//! statistics of them.
//!
//! ## Features
//! - Record time and number signs and read their interpretations
//! - All-time statistics per kind of sign
//! - Statistics for a period, picked from presets or an inline calendar
//! - Persistent storage with SQLite

/// Bot commands, callback decoding, keyboards and the statistics conversation
pub mod bot;
/// Configuration management and environment variables
pub mod config;
/// Database models, connections, and migrations
pub mod database;
/// Domain errors of the statistics flow
pub mod error;
/// Reports, session storage, and background services
pub mod services;
/// Utility functions for calendar math, dates, HTML, and logging
pub mod utils;
