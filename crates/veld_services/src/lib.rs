//! Veld Services Layer
//!
//! Platform-facing odds and ends for the binaries: settings files and
//! snapshot save-file locations.

pub mod save;
pub mod settings;
