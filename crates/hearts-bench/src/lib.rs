//! Seeded AI-versus-AI Hearts tournaments with JSONL and Markdown reports.

pub mod analytics;
pub mod config;
pub mod logging;
pub mod tournament;
