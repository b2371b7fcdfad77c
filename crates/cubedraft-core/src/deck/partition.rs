// Deck partitioning into curve/type buckets for presentation.

use crate::card::Card;

/// Main-deck buckets: 8 creature/basic columns by mana value, then 8 for
/// everything else.
pub const MAIN_BUCKETS: usize = 16;
/// Sideboard buckets by mana value.
pub const SIDEBOARD_BUCKETS: usize = 8;
/// Highest mana-value column; larger values share it.
const CURVE_CAP: usize = 7;

/// Main-deck column: `min(mana_value, 7)`, offset by 8 for cards that are
/// neither creatures nor basic lands.
pub fn main_bucket(card: &Card) -> usize {
    let slot = (card.mana_value.floor() as usize).min(CURVE_CAP);
    if card.is_creature() || card.is_basic() {
        slot
    } else {
        slot + CURVE_CAP + 1
    }
}

/// Sideboard column: `min(round(mana_value), 7)`.
pub fn sideboard_bucket(card: &Card) -> usize {
    (card.mana_value.round() as usize).min(CURVE_CAP)
}

fn name_order(a: &Card, b: &Card) -> std::cmp::Ordering {
    a.name
        .to_lowercase()
        .cmp(&b.name.to_lowercase())
        .then_with(|| a.name.cmp(&b.name))
}

/// Bucket the main deck. Cards are sorted alphabetically first so each column
/// reads in name order.
pub fn partition_main(mut main: Vec<Card>) -> Vec<Vec<Card>> {
    main.sort_by(name_order);
    let mut deck: Vec<Vec<Card>> = vec![Vec::new(); MAIN_BUCKETS];
    for card in main {
        let idx = main_bucket(&card);
        deck[idx].push(card);
    }
    // Basic lands land in column 0 alongside zero-drops.
    deck[0].sort_by(|a, b| a.name.cmp(&b.name));
    deck
}

/// Bucket the sideboard, dropping synthetic basics and special-zone cards.
pub fn partition_sideboard(side: Vec<Card>) -> Vec<Vec<Card>> {
    let mut sideboard: Vec<Vec<Card>> = vec![Vec::new(); SIDEBOARD_BUCKETS];
    for card in side {
        if card.is_unlimited || card.is_special_zone() {
            continue;
        }
        let idx = sideboard_bucket(&card);
        sideboard[idx].push(card);
    }
    sideboard
}
