// Deck construction from a drafted pool.
//
// Pipeline: split the pool by color fit, carve a clustered core out of the
// in-color spells, top it up greedily, add lands for the color demand, then
// lay the result out in presentation buckets.

pub mod cluster;
pub mod filler;
pub mod mana;
pub mod partition;

use thiserror::Error;
use tracing::info;

use crate::card::{Card, ColorSet};
use crate::config::DeckConfig;
use crate::draft::seen::{ColorAccumulator, LandMix};
use crate::oracle::{PickContext, RatingOracle, PROB_TO_INCLUDE};

pub use cluster::InsufficientPoolError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeckError {
    #[error("cannot build a deck from an empty pool")]
    EmptyPool,

    #[error(transparent)]
    InsufficientPool(#[from] InsufficientPoolError),
}

/// A constructed deck, laid out for display.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltDeck {
    /// [`partition::MAIN_BUCKETS`] columns.
    pub deck: Vec<Vec<Card>>,
    /// [`partition::SIDEBOARD_BUCKETS`] columns.
    pub sideboard: Vec<Vec<Card>>,
    pub colors: ColorSet,
    /// Cards that belong in neither the main deck nor the sideboard.
    pub special_zone: Vec<Card>,
}

impl BuiltDeck {
    pub fn main_count(&self) -> usize {
        self.deck.iter().map(Vec::len).sum()
    }

    pub fn sideboard_count(&self) -> usize {
        self.sideboard.iter().map(Vec::len).sum()
    }
}

/// Build a deck from a seat's picks.
///
/// `basic_copies` unlimited copies of every basic in `basics` join the pool
/// as land filler; they never show up in the sideboard. Colors and the target
/// mana base come from the oracle, judging the limited cards alone.
pub fn build_deck<O>(cards: Vec<Card>, basics: &[Card], oracle: &O, cfg: &DeckConfig) -> Result<BuiltDeck, DeckError>
where
    O: RatingOracle + ?Sized,
{
    if cards.is_empty() {
        return Err(DeckError::EmptyPool);
    }

    let mut picked = ColorAccumulator::new();
    picked.add_seen(cards.iter());
    let eval = oracle.rate_with_color_preference(None, &PickContext::for_pool(&picked));

    let mut pool = cards;
    for basic in basics {
        for _ in 0..cfg.basic_copies {
            let mut copy = basic.clone();
            copy.is_unlimited = true;
            pool.push(copy);
        }
    }

    build(pool, &eval.lands, eval.colors, oracle, cfg)
}

/// Run the construction pipeline over `pool` for a fixed color choice.
pub fn build<O>(
    pool: Vec<Card>,
    lands: &LandMix,
    colors: ColorSet,
    oracle: &O,
    cfg: &DeckConfig,
) -> Result<BuiltDeck, DeckError>
where
    O: RatingOracle + ?Sized,
{
    let mut land_cards = Vec::new();
    let mut special_zone = Vec::new();
    let mut nonlands = Vec::new();
    for card in pool {
        if card.is_land() {
            land_cards.push(card);
        } else if card.is_special_zone() {
            special_zone.push(card);
        } else {
            nonlands.push(card);
        }
    }

    land_cards.sort_by(|a, b| oracle.rate(b).total_cmp(&oracle.rate(a)));
    let (mut playable, unplayable): (Vec<Card>, Vec<Card>) = land_cards
        .into_iter()
        .partition(|land| oracle.is_playable_land(colors, land));

    let (mut candidates, mut out_of_color): (Vec<Card>, Vec<Card>) = nonlands
        .into_iter()
        .partition(|card| oracle.casting_probability(card, lands) >= PROB_TO_INCLUDE);

    if candidates.len() < cfg.nonland_target {
        out_of_color.sort_by(|a, b| oracle.rate(b).total_cmp(&oracle.rate(a)));
        let short = (cfg.nonland_target - candidates.len()).min(out_of_color.len());
        candidates.extend(out_of_color.drain(..short));
    }

    let mut chosen = cluster::select_core(&mut candidates, cfg.core_size, cfg.core_kernels)?;
    filler::fill_greedy(oracle, &mut chosen, &mut candidates, cfg.nonland_target, lands);
    mana::select_mana_base(oracle, &mut chosen, &mut playable, cfg.deck_size);

    info!(
        colors = %colors,
        main = chosen.len(),
        special = special_zone.len(),
        "deck built"
    );

    let mut side = out_of_color;
    side.extend(candidates);
    side.extend(playable);
    side.extend(unplayable);

    Ok(BuiltDeck {
        deck: partition::partition_main(chosen),
        sideboard: partition::partition_sideboard(side),
        colors,
        special_zone,
    })
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
