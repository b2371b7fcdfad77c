// Rating oracle: the scoring collaborator consulted by the bots and the deck
// builder. The engine only depends on the trait; `HeuristicOracle` is a
// self-contained implementation for offline simulation.

pub mod heuristic;

use serde::{Deserialize, Serialize};

use crate::card::{Card, ColorSet};
use crate::draft::seen::{ColorAccumulator, LandMix};

pub use heuristic::HeuristicOracle;

/// Casting probability below which a card is considered out of color.
pub const PROB_TO_INCLUDE: f64 = 0.4;

/// Base rating assigned to cards the oracle has never scored.
pub const DEFAULT_RATING: f64 = 1200.0;

// ---------------------------------------------------------------------------
// Context and results
// ---------------------------------------------------------------------------

/// Shape of the draft: how many cards each pack round holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackLayout {
    pub seats: usize,
    /// Card count of each pack, in opening order.
    pub pack_sizes: Vec<usize>,
}

impl PackLayout {
    pub fn total_picks(&self) -> usize {
        self.pack_sizes.iter().sum()
    }
}

/// Everything the oracle may look at when judging a pick.
#[derive(Debug, Clone, Copy)]
pub struct PickContext<'a> {
    pub picked: &'a ColorAccumulator,
    pub seen: Option<&'a ColorAccumulator>,
    pub layout: Option<&'a PackLayout>,
    /// Cards currently in the pack being picked from.
    pub pack_size: usize,
    /// 1-indexed pack number.
    pub pack_number: usize,
}

impl<'a> PickContext<'a> {
    /// Context with only a picked pool, as used when building a deck.
    pub fn for_pool(picked: &'a ColorAccumulator) -> Self {
        Self {
            picked,
            seen: None,
            layout: None,
            pack_size: 0,
            pack_number: 0,
        }
    }
}

/// The oracle's verdict on a candidate pick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BotEvaluation {
    pub rating: f64,
    /// Preferred color combination given the context.
    pub colors: ColorSet,
    /// Suggested mana base for that combination.
    pub lands: LandMix,
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Scoring primitives consumed by the bot pick engine and the deck builder.
pub trait RatingOracle {
    /// Base quality of a card, independent of context.
    fn rate(&self, card: &Card) -> f64;

    /// Rate a candidate against the seat's context. With `card == None` only
    /// the color preference and land mix are meaningful.
    fn rate_with_color_preference(&self, card: Option<&Card>, ctx: &PickContext<'_>) -> BotEvaluation;

    /// How much `candidate` adds to the already chosen cards.
    fn synergy(&self, chosen: &[Card], candidate: &Card, played: &ColorAccumulator) -> f64;

    /// Probability in `[0, 1]` that `card` is castable on curve with `lands`.
    fn casting_probability(&self, card: &Card, lands: &LandMix) -> f64;

    fn is_playable_land(&self, colors: ColorSet, land: &Card) -> bool {
        is_playable_land(colors, land)
    }
}

/// A land is playable in `colors` when it produces nothing colored, produces
/// only colors of the combination, or can fetch at least one of them.
pub fn is_playable_land(colors: ColorSet, land: &Card) -> bool {
    if !land.is_land() {
        return false;
    }
    if let Some(fetches) = land.fetches {
        return fetches.is_empty() || fetches.intersects(colors);
    }
    colors.contains_all(land.colors)
}
