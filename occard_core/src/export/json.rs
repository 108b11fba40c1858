//! JSON snapshot export.
//!
//! Whole-collection snapshot with a version tag and export timestamp. When
//! `include_images` is off, every card's `imageData` is nulled; all other
//! fields are unchanged.

use crate::types::{ExportOptions, OcclusionArea, OcclusionCard};
use crate::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

const EXPORT_VERSION: &str = "1.0";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonExport<'a> {
    version: &'static str,
    exported_at: String,
    cards: Vec<ExportedCard<'a>>,
}

/// Card snapshot whose image field can be nulled without touching the model
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportedCard<'a> {
    id: Option<u64>,
    title: &'a str,
    image_data: Option<&'a str>,
    occlusions: &'a [OcclusionArea],
    answer: &'a str,
    tags: &'a [String],
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Serialize cards into a pretty-printed JSON blob
pub fn export_to_json(cards: &[OcclusionCard], options: &ExportOptions) -> Result<Vec<u8>> {
    let export = JsonExport {
        version: EXPORT_VERSION,
        exported_at: Utc::now().to_rfc3339(),
        cards: cards
            .iter()
            .map(|card| ExportedCard {
                id: card.id,
                title: &card.title,
                image_data: options.include_images.then_some(card.image_data.as_str()),
                occlusions: &card.occlusions,
                answer: &card.answer,
                tags: &card.tags,
                created_at: card.created_at,
                updated_at: card.updated_at,
            })
            .collect(),
    };

    let bytes = serde_json::to_vec_pretty(&export)?;
    tracing::info!("Exported {} cards to JSON", cards.len());
    Ok(bytes)
}
