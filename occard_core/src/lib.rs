#![forbid(unsafe_code)]

//! Core domain model and business logic for the Occard image-occlusion
//! flashcard system.
//!
//! This crate provides:
//! - Domain types (cards, occlusion areas, study sessions)
//! - Durable record store (per-table JSON files with locking)
//! - Card and study services
//! - Export serializers (Anki-style archive, JSON, CSV)
//! - OCR result adapter

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod store;
pub mod cards;
pub mod study;
pub mod media;
pub mod ocr;
pub mod export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use store::{Store, Table};
pub use cards::CardService;
pub use study::StudyService;
pub use media::DataUri;
pub use export::{export_to_anki, export_to_csv, export_to_json};
