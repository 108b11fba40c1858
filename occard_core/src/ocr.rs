//! Typed adapter for OCR engine results.
//!
//! Text recognition itself is an external engine's job. Engines return
//! loosely-shaped JSON whose fields drift between versions, so this module
//! maps that output onto well-typed records with a defined default for
//! every absent field, and turns confident word boxes into suggested
//! occlusion areas for the authoring flow.

use crate::types::{OcclusionArea, OcclusionShape};
use serde::Deserialize;
use uuid::Uuid;

/// Default font size assumed when the engine reports none
const DEFAULT_FONT_SIZE: f64 = 12.0;

/// Languages the bundled recognition models cover, English first
pub const SUPPORTED_LANGUAGES: &[&str] = &[
    "eng", "spa", "fra", "deu", "ita", "por", "rus", "jpn", "chi_sim", "chi_tra", "kor",
];

/// Axis-aligned bounding box in image pixel space
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct OcrBox {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

/// One recognized word
#[derive(Clone, Debug, PartialEq)]
pub struct OcrWord {
    pub text: String,
    pub confidence: f64,
    pub bbox: OcrBox,
    pub baseline: f64,
    pub font_size: f64,
}

/// One recognized line of words
#[derive(Clone, Debug, PartialEq)]
pub struct OcrLine {
    pub text: String,
    pub confidence: f64,
    pub words: Vec<OcrWord>,
    pub bbox: OcrBox,
}

/// Whole-image recognition result
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OcrResult {
    pub text: String,
    pub confidence: f64,
    pub words: Vec<OcrWord>,
    pub lines: Vec<OcrLine>,
}

// Raw mirror of the engine output. Every field defaults so that absent or
// renamed fields degrade to empty values instead of failing the mapping.

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawWord {
    text: String,
    confidence: f64,
    bbox: OcrBox,
    baseline: f64,
    font_size: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawLine {
    text: String,
    confidence: f64,
    words: Vec<RawWord>,
    bbox: OcrBox,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawResult {
    text: String,
    confidence: f64,
    words: Vec<RawWord>,
    lines: Vec<RawLine>,
}

impl From<RawWord> for OcrWord {
    fn from(raw: RawWord) -> Self {
        OcrWord {
            text: raw.text,
            confidence: raw.confidence,
            bbox: raw.bbox,
            baseline: raw.baseline,
            font_size: raw.font_size.unwrap_or(DEFAULT_FONT_SIZE),
        }
    }
}

impl From<RawLine> for OcrLine {
    fn from(raw: RawLine) -> Self {
        OcrLine {
            text: raw.text,
            confidence: raw.confidence,
            words: raw.words.into_iter().map(OcrWord::from).collect(),
            bbox: raw.bbox,
        }
    }
}

/// Map a loosely-shaped engine result onto [`OcrResult`]
///
/// Absent fields take their defaults; a value that is not even an object
/// maps to the empty result. This never fails: a degraded result is more
/// useful to the authoring flow than an error.
pub fn map_engine_result(raw: serde_json::Value) -> OcrResult {
    let raw: RawResult = match serde_json::from_value(raw) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!("Unrecognized OCR result shape, using empty result: {}", e);
            RawResult::default()
        }
    };

    OcrResult {
        text: raw.text,
        confidence: raw.confidence,
        words: raw.words.into_iter().map(OcrWord::from).collect(),
        lines: raw.lines.into_iter().map(OcrLine::from).collect(),
    }
}

/// Suggest rectangle occlusions for words at or above the confidence cutoff
///
/// Empty and zero-area words are skipped; geometry is clamped to
/// non-negative values. Area ids are generated client-side, as during
/// manual authoring.
pub fn suggest_occlusions(result: &OcrResult, min_confidence: f64) -> Vec<OcclusionArea> {
    result
        .words
        .iter()
        .filter(|w| w.confidence >= min_confidence && !w.text.trim().is_empty())
        .filter_map(|w| {
            let width = w.bbox.x1 - w.bbox.x0;
            let height = w.bbox.y1 - w.bbox.y0;
            if width <= 0.0 || height <= 0.0 {
                return None;
            }

            Some(OcclusionArea {
                id: Uuid::new_v4().to_string(),
                x: w.bbox.x0.max(0.0),
                y: w.bbox.y0.max(0.0),
                width,
                height,
                shape: OcclusionShape::Rectangle,
                revealed: false,
            })
        })
        .collect()
}
