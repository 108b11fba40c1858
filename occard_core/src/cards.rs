//! Card service: business operations over the card table.
//!
//! Stamps timestamps, defaults, and the search predicate on top of the raw
//! record store. The store handle is injected at construction so callers
//! and tests can run against isolated data directories.

use crate::store::{Store, Table};
use crate::types::{CardPatch, NewCard, OcclusionCard};
use crate::Result;
use chrono::Utc;

/// Name of the card table file (`cards.json`)
pub const CARD_TABLE: &str = "cards";

/// Business operations for occlusion cards
#[derive(Clone, Debug)]
pub struct CardService {
    table: Table<OcclusionCard>,
}

impl CardService {
    pub fn new(store: &Store) -> Self {
        Self {
            table: store.table(CARD_TABLE),
        }
    }

    /// Create a card, stamping `created_at = updated_at = now`
    ///
    /// Returns the store-assigned id.
    pub fn create_card(&self, new: NewCard) -> Result<u64> {
        let now = Utc::now();
        let card = OcclusionCard {
            id: None,
            title: new.title,
            image_data: new.image_data,
            occlusions: new.occlusions,
            answer: new.answer,
            tags: new.tags,
            created_at: now,
            updated_at: now,
        };

        let id = self.table.add(card)?;
        tracing::info!("Created card {}", id);
        Ok(id)
    }

    pub fn get_card(&self, id: u64) -> Result<Option<OcclusionCard>> {
        self.table.get(id)
    }

    /// All cards, most recently updated first
    pub fn all_cards(&self) -> Result<Vec<OcclusionCard>> {
        self.table.sorted_by_key_desc(|c| c.updated_at)
    }

    /// Merge the supplied fields into the card and stamp `updated_at`
    ///
    /// The patch carries no timestamp fields, so callers cannot override
    /// `updated_at` or `created_at`. Updating a missing id is a silent
    /// no-op, matching the store contract.
    pub fn update_card(&self, id: u64, patch: CardPatch) -> Result<()> {
        self.table.update(id, |card| {
            if let Some(title) = patch.title {
                card.title = title;
            }
            if let Some(image_data) = patch.image_data {
                card.image_data = image_data;
            }
            if let Some(occlusions) = patch.occlusions {
                card.occlusions = occlusions;
            }
            if let Some(answer) = patch.answer {
                card.answer = answer;
            }
            if let Some(tags) = patch.tags {
                card.tags = tags;
            }
            card.updated_at = Utc::now();
        })
    }

    /// Delete a card. Study sessions referencing it are left in place;
    /// dangling references are an accepted state, not an error.
    pub fn delete_card(&self, id: u64) -> Result<()> {
        self.table.delete(id)
    }

    /// Case-insensitive substring search against title or any tag
    ///
    /// An empty query matches everything. Full scan; no index.
    pub fn search_cards(&self, query: &str) -> Result<Vec<OcclusionCard>> {
        let needle = query.to_lowercase();
        self.table.find_where(|card| {
            card.title.to_lowercase().contains(&needle)
                || card.tags.iter().any(|t| t.to_lowercase().contains(&needle))
        })
    }
}
