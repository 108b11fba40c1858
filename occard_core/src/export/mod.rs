//! Export serializers.
//!
//! Pure transformations from an already-loaded card collection plus options
//! into one of three byte formats. None of these touch the record store; a
//! card with unreadable image data degrades (its media entry is omitted)
//! instead of failing the export.

pub mod anki;
pub mod csv;
pub mod json;

pub use anki::export_to_anki;
pub use csv::export_to_csv;
pub use json::export_to_json;
