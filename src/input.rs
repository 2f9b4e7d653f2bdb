//! Translation data read from disk.
pub mod translation;
