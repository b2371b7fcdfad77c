// Mana base selection.
//
// Lands are added greedily, each time favoring the land whose colors relieve
// the largest gap between how many spells need a color and how many lands
// already provide it.

use crate::card::{Card, Color, ColorSet};
use crate::oracle::RatingOracle;

/// Per-color demand (spells) and supply (lands). Both start at 1 so the
/// ratio is always defined.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorDemand {
    counts: [u32; 5],
    provides: [u32; 5],
}

impl Default for ColorDemand {
    fn default() -> Self {
        Self {
            counts: [1; 5],
            provides: [1; 5],
        }
    }
}

impl ColorDemand {
    /// Demand from the color identities of the chosen spells.
    pub fn from_spells<'a, I>(spells: I) -> Self
    where
        I: IntoIterator<Item = &'a Card>,
    {
        let mut demand = Self::default();
        for card in spells {
            for color in card.colors.colors() {
                demand.counts[color.index()] += 1;
            }
        }
        demand
    }

    pub fn count(&self, color: Color) -> u32 {
        self.counts[color.index()]
    }

    pub fn provides(&self, color: Color) -> u32 {
        self.provides[color.index()]
    }

    /// Record a land added to the deck.
    pub fn supply(&mut self, colors: ColorSet) {
        for color in colors.colors() {
            self.provides[color.index()] += 1;
        }
    }

    /// `quality * prod(count / provides)` over the land's colors.
    pub fn score_land(&self, quality: f64, colors: ColorSet) -> f64 {
        colors.colors().fold(quality, |score, c| {
            score * f64::from(self.count(c)) / f64::from(self.provides(c))
        })
    }
}

/// Move playable lands into `chosen` until it reaches `deck_size` or no
/// playable land is left.
pub fn select_mana_base<O>(oracle: &O, chosen: &mut Vec<Card>, playable: &mut Vec<Card>, deck_size: usize)
where
    O: RatingOracle + ?Sized,
{
    let mut demand = ColorDemand::from_spells(chosen.iter());
    while !playable.is_empty() && chosen.len() < deck_size {
        let mut best = 0;
        let mut best_score = f64::NEG_INFINITY;
        for (idx, land) in playable.iter().enumerate() {
            let score = demand.score_land(oracle.rate(land), land.mana_production());
            if score > best_score {
                best = idx;
                best_score = score;
            }
        }
        let land = playable.remove(best);
        demand.supply(land.mana_production());
        chosen.push(land);
    }
}
