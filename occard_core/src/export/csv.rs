//! CSV export.
//!
//! Header `Title,Answer,Tags,Created At,Updated At[,Image Data]`, one row
//! per card. Tags are joined with `;` so they survive the comma delimiter;
//! fields containing a comma, double quote, or newline are wrapped in
//! double quotes with internal quotes doubled (the csv crate's
//! quote-when-necessary behavior). Timestamps are RFC 3339.

use crate::types::{ExportOptions, OcclusionCard};
use crate::Result;

/// Separator used inside the Tags field
const TAG_SEPARATOR: &str = ";";

/// Serialize cards into a CSV blob
pub fn export_to_csv(cards: &[OcclusionCard], options: &ExportOptions) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());

    let mut header = vec!["Title", "Answer", "Tags", "Created At", "Updated At"];
    if options.include_images {
        header.push("Image Data");
    }
    writer.write_record(&header)?;

    for card in cards {
        let mut row = vec![
            card.title.clone(),
            card.answer.clone(),
            card.tags.join(TAG_SEPARATOR),
            card.created_at.to_rfc3339(),
            card.updated_at.to_rfc3339(),
        ];

        if options.include_images {
            row.push(card.image_data.clone());
        }

        writer.write_record(&row)?;
    }

    writer.flush()?;
    let bytes = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    tracing::info!("Exported {} cards to CSV", cards.len());
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn card(title: &str, answer: &str, tags: &[&str]) -> OcclusionCard {
        let now = Utc::now();
        OcclusionCard {
            id: Some(1),
            title: title.into(),
            image_data: "data:image/png;base64,AAAA".into(),
            occlusions: vec![],
            answer: answer.into(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            created_at: now,
            updated_at: now,
        }
    }

    fn as_text(bytes: Vec<u8>) -> String {
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_header_without_images() {
        let options = ExportOptions {
            include_images: false,
            ..Default::default()
        };
        let text = as_text(export_to_csv(&[], &options).unwrap());
        assert_eq!(text.trim_end(), "Title,Answer,Tags,Created At,Updated At");
    }

    #[test]
    fn test_header_with_images() {
        let text = as_text(export_to_csv(&[], &ExportOptions::default()).unwrap());
        assert_eq!(
            text.trim_end(),
            "Title,Answer,Tags,Created At,Updated At,Image Data"
        );
    }

    #[test]
    fn test_tags_joined_with_semicolon() {
        let options = ExportOptions {
            include_images: false,
            ..Default::default()
        };
        let text = as_text(
            export_to_csv(&[card("t", "a", &["alpha", "beta"])], &options).unwrap(),
        );
        let row = text.lines().nth(1).unwrap();
        assert!(row.contains("alpha;beta"));
        // No quoting needed for plain tag lists
        assert!(!row.contains("\"alpha;beta\""));
    }

    #[test]
    fn test_quoting_of_embedded_quote_and_comma() {
        // A tag containing a comma forces the joined field into quotes,
        // while the semicolon separator itself needs none
        let options = ExportOptions {
            include_images: false,
            ..Default::default()
        };
        let text = as_text(
            export_to_csv(
                &[card("He said \"go\"", "a,b answer", &["a,b", "c"])],
                &options,
            )
            .unwrap(),
        );
        let row = text.lines().nth(1).unwrap();

        assert!(row.starts_with("\"He said \"\"go\"\"\","));
        assert!(row.contains("\"a,b answer\""));
        assert!(row.contains("\"a,b;c\""));
    }

    #[test]
    fn test_newline_in_field_is_quoted() {
        let options = ExportOptions {
            include_images: false,
            ..Default::default()
        };
        let text = as_text(
            export_to_csv(&[card("line1\nline2", "a", &[])], &options).unwrap(),
        );
        assert!(text.contains("\"line1\nline2\""));
    }

    #[test]
    fn test_image_column_carries_data_uri() {
        let text = as_text(
            export_to_csv(&[card("t", "a", &[])], &ExportOptions::default()).unwrap(),
        );
        let row = text.lines().nth(1).unwrap();
        // Data URIs contain commas, so the field arrives quoted
        assert!(row.contains("\"data:image/png;base64,AAAA\""));
    }

    #[test]
    fn test_timestamps_are_rfc3339() {
        let options = ExportOptions {
            include_images: false,
            ..Default::default()
        };
        let c = card("t", "a", &[]);
        let text = as_text(export_to_csv(std::slice::from_ref(&c), &options).unwrap());
        assert!(text.contains(&c.created_at.to_rfc3339()));
    }

    #[test]
    fn test_one_row_per_card() {
        let options = ExportOptions {
            include_images: false,
            ..Default::default()
        };
        let cards = vec![card("a", "x", &[]), card("b", "y", &[]), card("c", "z", &[])];
        let text = as_text(export_to_csv(&cards, &options).unwrap());
        assert_eq!(text.trim_end().lines().count(), 4); // header + 3 rows
    }
}
