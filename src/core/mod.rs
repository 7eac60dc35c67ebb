//! Core building blocks: run configuration, structured context values, and
//! the text renderer used by formatting loggers.
pub mod config;
pub mod context;
pub mod render;
