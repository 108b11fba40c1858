//! Core domain types for the Occard system.
//!
//! This module defines the fundamental types used throughout the system:
//! - Occlusion cards and their masked areas
//! - Study sessions
//! - Creation/update payloads for the card service
//! - Export options
//!
//! All persisted and exported records use camelCase field names on the wire,
//! matching the stored schema (`imageData`, `createdAt`, ...).

use crate::store::Record;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Occlusion Types
// ============================================================================

/// Shape of a masked region
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OcclusionShape {
    Rectangle,
    Ellipse,
    Polygon,
}

/// One masked region overlaid on a card's image.
///
/// Geometry is in the pixel coordinate space of the card's image, values
/// non-negative. The `id` is generated client-side (not by the store) and is
/// unique within its parent card.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OcclusionArea {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(rename = "type")]
    pub shape: OcclusionShape,
    pub revealed: bool,
}

// ============================================================================
// Card Types
// ============================================================================

/// A flashcard: base image, its occlusion areas, and its answer text.
///
/// `id` is absent before persistence and immutable once assigned by the
/// store. `created_at` is fixed at creation; `updated_at` is refreshed on
/// every mutation and never precedes `created_at`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcclusionCard {
    pub id: Option<u64>,
    pub title: String,
    /// Source image as a self-describing data URI (mime + base64 payload)
    pub image_data: String,
    pub occlusions: Vec<OcclusionArea>,
    pub answer: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for OcclusionCard {
    fn id(&self) -> Option<u64> {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = Some(id);
    }
}

/// Payload for creating a card. The service stamps id and timestamps.
#[derive(Clone, Debug)]
pub struct NewCard {
    pub title: String,
    pub image_data: String,
    pub occlusions: Vec<OcclusionArea>,
    pub answer: String,
    pub tags: Vec<String>,
}

/// Partial update for a card. Absent fields are left untouched.
///
/// Deliberately has no id or timestamp fields: `updated_at` is always
/// stamped by the service and `id`/`created_at` are immutable.
#[derive(Clone, Debug, Default)]
pub struct CardPatch {
    pub title: Option<String>,
    pub image_data: Option<String>,
    pub occlusions: Option<Vec<OcclusionArea>>,
    pub answer: Option<String>,
    pub tags: Option<Vec<String>>,
}

// ============================================================================
// Study Session Types
// ============================================================================

/// One study attempt against a card.
///
/// `card_id` is a foreign reference to an `OcclusionCard`; the store does
/// not enforce referential integrity, so dangling references after a card
/// deletion are an accepted state. `score` is meaningful only once
/// `end_time` is set.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySession {
    pub id: Option<u64>,
    pub card_id: u64,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub score: f64,
    pub attempts: u32,
}

impl Record for StudySession {
    fn id(&self) -> Option<u64> {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = Some(id);
    }
}

// ============================================================================
// Export Options
// ============================================================================

/// Options shared by the export serializers
#[derive(Clone, Debug)]
pub struct ExportOptions {
    /// Embed image data in the output (media files, JSON/CSV image columns)
    pub include_images: bool,
    /// Deck name used in the Anki-style manifest
    pub deck_name: String,
    /// Deck description used in the Anki-style manifest
    pub deck_description: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            include_images: true,
            deck_name: "Image Occlusion Cards".into(),
            deck_description: "Exported from Occard".into(),
        }
    }
}
