//! choralith: a local audio library indexer.
//!
//! Scans a folder for audio files, extracts their tags and keeps a snapshot
//! per folder keyed by file modification times, so rescanning a mostly
//! unchanged folder only reads the files that changed.

pub mod app;
pub mod cache;
pub mod config;
pub mod library;
