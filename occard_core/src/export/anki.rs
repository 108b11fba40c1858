//! Anki-style package export.
//!
//! Produces a zip archive holding a JSON `collection.anki2` manifest plus a
//! `media/` directory of per-card images. The manifest carries one note per
//! card with a freshly generated v4 guid and the occlusion overlay rendered
//! as HTML.
//!
//! Every occlusion is drawn as a filled rectangle at its stored geometry,
//! whatever its shape; ellipse and polygon areas are not rendered as such
//! in this format.

use crate::media::parse_data_uri;
use crate::types::{ExportOptions, OcclusionCard};
use crate::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{Cursor, Write};
use uuid::Uuid;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Manifest stored as `collection.anki2` inside the archive
#[derive(Debug, Serialize)]
struct AnkiManifest {
    decks: BTreeMap<String, AnkiDeck>,
    notes: Vec<AnkiNote>,
    media: BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
struct AnkiDeck {
    name: String,
    desc: String,
}

/// One note: `fields` is `[title, occlusion HTML, answer, tags joined by ", "]`
#[derive(Debug, Serialize)]
struct AnkiNote {
    guid: String,
    model: String,
    fields: Vec<String>,
    tags: Vec<String>,
}

/// Serialize cards into an Anki-style archive blob
pub fn export_to_anki(cards: &[OcclusionCard], options: &ExportOptions) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let file_options =
        SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut manifest = AnkiManifest {
        decks: BTreeMap::new(),
        notes: Vec::new(),
        media: BTreeMap::new(),
    };
    manifest.decks.insert(
        "1".into(),
        AnkiDeck {
            name: options.deck_name.clone(),
            desc: options.deck_description.clone(),
        },
    );

    for (index, card) in cards.iter().enumerate() {
        let media_id = index + 1;

        if options.include_images {
            // Unreadable image data degrades to a missing media entry
            match parse_data_uri(&card.image_data) {
                Ok(image) => {
                    let file_name = format!("image_{}.png", media_id);
                    zip.start_file(format!("media/{}", file_name), file_options)?;
                    zip.write_all(&image.bytes)?;
                    manifest.media.insert(media_id.to_string(), file_name);
                }
                Err(e) => {
                    tracing::warn!(
                        "Skipping media for card {:?}: {}",
                        card.id,
                        e
                    );
                }
            }
        }

        manifest.notes.push(AnkiNote {
            guid: Uuid::new_v4().to_string(),
            model: "Basic".into(),
            fields: vec![
                card.title.clone(),
                occlusion_html(card),
                card.answer.clone(),
                card.tags.join(", "),
            ],
            tags: card.tags.clone(),
        });
    }

    zip.start_file("collection.anki2", file_options)?;
    zip.write_all(&serde_json::to_vec(&manifest)?)?;

    let cursor = zip.finish()?;
    tracing::info!("Exported {} cards to Anki archive", cards.len());
    Ok(cursor.into_inner())
}

/// Render the card image with its occlusions as absolutely-positioned divs
fn occlusion_html(card: &OcclusionCard) -> String {
    let overlays: String = card
        .occlusions
        .iter()
        .map(|occ| {
            format!(
                "<div class=\"occlusion\" style=\"position: absolute; \
                 left: {}px; top: {}px; width: {}px; height: {}px; \
                 background-color: black; border: 1px solid #333;\"></div>",
                occ.x, occ.y, occ.width, occ.height
            )
        })
        .collect();

    format!(
        "<div style=\"position: relative; display: inline-block;\">\
         <img src=\"{}\" alt=\"{}\" style=\"max-width: 100%;\" />{}</div>",
        card.image_data,
        html_escape::encode_double_quoted_attribute(&card.title),
        overlays
    )
}
