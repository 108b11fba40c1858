//! Study service: session lifecycle over the session table.

use crate::store::{Store, Table};
use crate::types::StudySession;
use crate::Result;
use chrono::Utc;

/// Name of the session table file (`sessions.json`)
pub const SESSION_TABLE: &str = "sessions";

/// Business operations for study sessions
#[derive(Clone, Debug)]
pub struct StudyService {
    table: Table<StudySession>,
}

impl StudyService {
    pub fn new(store: &Store) -> Self {
        Self {
            table: store.table(SESSION_TABLE),
        }
    }

    /// Open a session against a card
    ///
    /// Does not verify that `card_id` refers to an existing card; the store
    /// enforces no referential integrity.
    pub fn start_session(&self, card_id: u64) -> Result<u64> {
        let session = StudySession {
            id: None,
            card_id,
            start_time: Utc::now(),
            end_time: None,
            score: 0.0,
            attempts: 0,
        };

        let id = self.table.add(session)?;
        tracing::info!("Started study session {} for card {}", id, card_id);
        Ok(id)
    }

    /// Close a session, recording `end_time = now` and the score
    ///
    /// Ending an already-ended session silently overwrites both fields.
    pub fn end_session(&self, id: u64, score: f64) -> Result<()> {
        self.table.update(id, |session| {
            session.end_time = Some(Utc::now());
            session.score = score;
        })
    }

    /// All sessions for a card, most recent first
    pub fn sessions_for_card(&self, card_id: u64) -> Result<Vec<StudySession>> {
        let mut sessions = self.table.find_where(|s| s.card_id == card_id)?;
        sessions.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        Ok(sessions)
    }
}
