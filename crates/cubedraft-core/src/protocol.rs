// Wire shapes: the pick submission sent after every human pick and the
// persisted record of a finished draft.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::card::{ColorSet, PersistedCard};

/// Report of a single human pick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickSubmission {
    pub draft_id: String,
    /// Name of the chosen card.
    pub pick: String,
    /// Names of every card that was in the pack, the pick included.
    pub pack: Vec<String>,
    /// 1-indexed.
    #[serde(rename = "packNum")]
    pub pack_number: usize,
    /// 1-indexed within the pack.
    #[serde(rename = "pickNum")]
    pub pick_number: usize,
}

/// One seat of a finished draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeatRecord {
    pub name: String,
    pub description: String,
    pub bot: bool,
    pub colors: ColorSet,
    pub deck: Vec<Vec<PersistedCard>>,
    pub sideboard: Vec<Vec<PersistedCard>>,
    /// Picks in the order they were made.
    pub pick_order: Vec<PersistedCard>,
}

/// Everything that survives a draft once its working state is discarded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftRecord {
    pub id: String,
    pub cube_id: String,
    pub seats: Vec<SeatRecord>,
    /// Pack composition, indexed `[seat][pack][card]`.
    pub initial_state: Vec<Vec<Vec<PersistedCard>>>,
    pub completed_at: DateTime<Utc>,
}
