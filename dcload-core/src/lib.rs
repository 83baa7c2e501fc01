//! SEGA Dreamcast RAM Dump Loader
//!
//! This crate recognizes raw Dreamcast RAM dumps (16 MiB or 32 MiB images)
//! and annotates a host analysis database with the SH7750 on-chip memory map:
//! peripheral register segments, typed register items with names and comments,
//! a user-selected RAM window with the file bytes mapped in, and the
//! auto-analysis options a fresh Dreamcast database should start with.
//!
//! The host database is an external capability behind the
//! [`loader::database::AnalysisHost`] trait; an in-memory implementation is
//! provided for the CLI and for tests.

pub mod loader;
