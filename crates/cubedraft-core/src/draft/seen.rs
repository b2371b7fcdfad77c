// Seen/picked accumulators.
//
// Tracks, for every color combination, the total rating of the cards a seat
// has been exposed to (or has taken) and which of those cards would be
// playable in that combination. Also tracks a per-color land budget that
// shrinks as lands are observed.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::card::{Card, Color, ColorSet};
use crate::oracle::is_playable_land;

/// Total number of lands a 40-card deck is budgeted for.
pub const LAND_BUDGET: u32 = 17;

// ---------------------------------------------------------------------------
// Land mix
// ---------------------------------------------------------------------------

/// Per-color land counts, indexed in color enumeration order.
///
/// Used both as the remaining land-slot budget of an accumulator and as the
/// oracle's suggested mana base for a seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LandMix([u32; 5]);

impl LandMix {
    pub const fn new(counts: [u32; 5]) -> Self {
        Self(counts)
    }

    /// The starting budget: 17 lands split so earlier colors get the larger
    /// shares (W 4, U 4, B 3, R 3, G 3).
    pub fn default_budget() -> Self {
        let mut counts = [0u32; 5];
        let mut remaining = LAND_BUDGET;
        for (i, slot) in counts.iter_mut().enumerate() {
            let colors_left = (Color::ALL.len() - i) as u32;
            *slot = remaining.div_ceil(colors_left);
            remaining -= *slot;
        }
        Self(counts)
    }

    /// Split `total` lands evenly across `colors`, earlier colors taking the
    /// remainder. A colorless set yields the default budget.
    pub fn split_evenly(colors: ColorSet, total: u32) -> Self {
        let n = colors.count();
        if n == 0 {
            return Self::default_budget();
        }
        let mut counts = [0u32; 5];
        let mut remaining = total;
        for (i, color) in colors.colors().enumerate() {
            let share = remaining.div_ceil(n - i as u32);
            counts[color.index()] = share;
            remaining -= share;
        }
        Self(counts)
    }

    pub fn get(&self, color: Color) -> u32 {
        self.0[color.index()]
    }

    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }

    pub fn counts(&self) -> [u32; 5] {
        self.0
    }

    /// Take one slot from `color` if it has any left.
    fn take(&mut self, color: Color) -> bool {
        let slot = &mut self.0[color.index()];
        if *slot > 0 {
            *slot -= 1;
            true
        } else {
            false
        }
    }
}

// ---------------------------------------------------------------------------
// Accumulator
// ---------------------------------------------------------------------------

/// Compact snapshot of a card recorded in a combination's eligibility list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeenCard {
    pub id: String,
    pub name: String,
    pub colors: ColorSet,
    pub rating: f64,
}

/// Running aggregate of a set of cards, keyed by color combination.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorAccumulator {
    values: Vec<f64>,
    cards: Vec<Vec<SeenCard>>,
    lands: LandMix,
    land_sources: HashMap<ColorSet, u32>,
    rated_count: usize,
}

impl Default for ColorAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorAccumulator {
    /// A fresh accumulator: zero values, empty lists, default land budget.
    pub fn new() -> Self {
        Self {
            values: vec![0.0; ColorSet::COMBINATIONS],
            cards: vec![Vec::new(); ColorSet::COMBINATIONS],
            lands: LandMix::default_budget(),
            land_sources: HashMap::new(),
            rated_count: 0,
        }
    }

    /// Fold a batch of newly visible (or newly owned) cards into the totals.
    ///
    /// Lands consume one slot of the land budget: the first of their own
    /// producible colors that still has room, else the first color with room,
    /// else nothing. Rated cards join every combination they are eligible for
    /// and, when colored, add their rating to that combination's value.
    pub fn add_seen<'a, I>(&mut self, cards: I)
    where
        I: IntoIterator<Item = &'a Card>,
    {
        for card in cards {
            if card.is_land() {
                self.record_land(card);
            }
            let Some(rating) = card.rating else {
                continue;
            };
            self.rated_count += 1;
            for combination in ColorSet::all_combinations() {
                if !is_eligible(combination, card) {
                    continue;
                }
                let idx = combination.index();
                self.cards[idx].push(SeenCard {
                    id: card.id.clone(),
                    name: card.name.clone(),
                    colors: card.colors,
                    rating,
                });
                // Colorless cards are in every combination and would only
                // dilute the comparison between strategies.
                if !card.colors.is_empty() {
                    self.values[idx] += rating;
                }
            }
        }
    }

    fn record_land(&mut self, land: &Card) {
        let produces = land.mana_production();
        *self.land_sources.entry(produces).or_insert(0) += 1;

        let taken = produces.colors().any(|c| self.lands.take(c));
        if !taken {
            if let Some(color) = Color::ALL.into_iter().find(|&c| self.lands.get(c) > 0) {
                self.lands.take(color);
            }
        }
    }

    /// Replace the land budget with an oracle-suggested mana base.
    pub fn adopt_land_mix(&mut self, lands: LandMix) {
        self.lands = lands;
    }

    /// Accumulated rating total for a combination.
    pub fn value(&self, combination: ColorSet) -> f64 {
        self.values[combination.index()]
    }

    /// Cards eligible for a combination, in the order they were added.
    pub fn cards(&self, combination: ColorSet) -> &[SeenCard] {
        &self.cards[combination.index()]
    }

    /// Remaining land budget / preferred mana base.
    pub fn lands(&self) -> &LandMix {
        &self.lands
    }

    /// How many lands producing exactly `colors` have been recorded.
    pub fn land_sources(&self, colors: ColorSet) -> u32 {
        self.land_sources.get(&colors).copied().unwrap_or(0)
    }

    /// Number of rated cards folded in so far.
    pub fn rated_count(&self) -> usize {
        self.rated_count
    }
}

/// Inclusion rule: the card's colors fit inside the combination, or it is a
/// land playable in that combination.
pub fn is_eligible(combination: ColorSet, card: &Card) -> bool {
    combination.contains_all(card.colors) || (card.is_land() && is_playable_land(combination, card))
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn spell(name: &str, colors: ColorSet, rating: f64) -> Card {
        Card::new(name, name, "Sorcery").with_colors(colors).with_rating(rating)
    }

    fn basic(name: &str, color: ColorSet) -> Card {
        Card::new(name, name, "Basic Land").with_colors(color)
    }

    #[test]
    fn default_budget_splits_seventeen_front_loaded() {
        let budget = LandMix::default_budget();
        assert_eq!(budget.counts(), [4, 4, 3, 3, 3]);
        assert_eq!(budget.total(), LAND_BUDGET);
    }

    #[test]
    fn split_evenly_over_two_colors() {
        let mix = LandMix::split_evenly(ColorSet::BLUE.union(ColorSet::RED), 17);
        assert_eq!(mix.get(Color::Blue), 9);
        assert_eq!(mix.get(Color::Red), 8);
        assert_eq!(mix.get(Color::White), 0);
        assert_eq!(mix.total(), 17);
    }

    #[test]
    fn fresh_accumulator_is_empty() {
        let acc = ColorAccumulator::new();
        for combination in ColorSet::all_combinations() {
            assert_eq!(acc.value(combination), 0.0);
            assert!(acc.cards(combination).is_empty());
        }
        assert_eq!(acc.rated_count(), 0);
    }

    #[test]
    fn colored_card_adds_value_to_supersets_only() {
        let mut acc = ColorAccumulator::new();
        let bolt = spell("Bolt", ColorSet::RED, 1500.0);
        acc.add_seen([&bolt]);

        assert_eq!(acc.value(ColorSet::RED), 1500.0);
        assert_eq!(acc.value(ColorSet::RED.union(ColorSet::GREEN)), 1500.0);
        assert_eq!(acc.value(ColorSet::GREEN), 0.0);
        assert_eq!(acc.value(ColorSet::COLORLESS), 0.0);
        assert_eq!(acc.cards(ColorSet::RED).len(), 1);
        assert!(acc.cards(ColorSet::BLUE).is_empty());
    }

    #[test]
    fn colorless_card_is_eligible_everywhere_but_adds_no_value() {
        let mut acc = ColorAccumulator::new();
        let signet = spell("Mind Stone", ColorSet::COLORLESS, 1300.0);
        acc.add_seen([&signet]);

        for combination in ColorSet::all_combinations() {
            assert_eq!(acc.cards(combination).len(), 1);
            assert_eq!(acc.value(combination), 0.0);
        }
    }

    #[test]
    fn unrated_cards_do_not_join_lists() {
        let mut acc = ColorAccumulator::new();
        let card = Card::new("x", "X", "Instant").with_colors(ColorSet::BLUE);
        acc.add_seen([&card]);
        assert!(acc.cards(ColorSet::BLUE).is_empty());
        assert_eq!(acc.rated_count(), 0);
    }

    #[test]
    fn land_takes_from_own_color_first() {
        let mut acc = ColorAccumulator::new();
        acc.add_seen([&basic("Swamp", ColorSet::BLACK)]);
        assert_eq!(acc.lands().get(Color::Black), 2);
        assert_eq!(acc.lands().get(Color::White), 4);
        assert_eq!(acc.land_sources(ColorSet::BLACK), 1);
    }

    #[test]
    fn land_falls_back_to_first_color_with_budget() {
        let mut acc = ColorAccumulator::new();
        let swamps: Vec<Card> = (0..4).map(|i| basic(&format!("Swamp {i}"), ColorSet::BLACK)).collect();
        acc.add_seen(swamps.iter());
        // Three slots of black, then the fourth spills to white.
        assert_eq!(acc.lands().get(Color::Black), 0);
        assert_eq!(acc.lands().get(Color::White), 3);
        assert_eq!(acc.land_sources(ColorSet::BLACK), 4);
    }

    #[test]
    fn exhausted_budget_is_a_no_op() {
        let mut acc = ColorAccumulator::new();
        let wastes: Vec<Card> = (0..20).map(|i| basic(&format!("Wastes {i}"), ColorSet::COLORLESS)).collect();
        acc.add_seen(wastes.iter());
        assert_eq!(acc.lands().total(), 0);
        assert_eq!(acc.land_sources(ColorSet::COLORLESS), 20);
    }

    #[test]
    fn fetch_land_charges_fetchable_colors() {
        let mut acc = ColorAccumulator::new();
        acc.adopt_land_mix(LandMix::new([0, 2, 0, 0, 0]));
        let strand = Card::new("fs", "Flooded Strand", "Land")
            .with_fetches(ColorSet::WHITE.union(ColorSet::BLUE));
        acc.add_seen([&strand]);
        assert_eq!(acc.lands().get(Color::Blue), 1);
        assert_eq!(acc.land_sources(ColorSet::WHITE.union(ColorSet::BLUE)), 1);
    }

    #[test]
    fn rated_land_is_listed_where_playable() {
        let mut acc = ColorAccumulator::new();
        let plains = basic("Plains", ColorSet::WHITE).with_rating(1000.0);
        acc.add_seen([&plains]);
        assert_eq!(acc.cards(ColorSet::WHITE).len(), 1);
        assert_eq!(acc.cards(ColorSet::WHITE.union(ColorSet::RED)).len(), 1);
        assert!(acc.cards(ColorSet::RED).is_empty());
    }

    #[test]
    fn values_never_decrease_and_budget_never_underflows() {
        let mut acc = ColorAccumulator::new();
        let batches: Vec<Vec<Card>> = (0..10)
            .map(|i| {
                vec![
                    spell(&format!("W{i}"), ColorSet::WHITE, 1200.0 + i as f64),
                    spell(&format!("UB{i}"), ColorSet::BLUE.union(ColorSet::BLACK), 900.0),
                    basic(&format!("Mountain{i}"), ColorSet::RED),
                    basic(&format!("Forest{i}"), ColorSet::GREEN),
                ]
            })
            .collect();

        let mut previous = vec![0.0; ColorSet::COMBINATIONS];
        for batch in &batches {
            acc.add_seen(batch.iter());
            for combination in ColorSet::all_combinations() {
                let v = acc.value(combination);
                assert!(v >= previous[combination.index()]);
                previous[combination.index()] = v;
            }
            assert!(acc.lands().total() <= LAND_BUDGET);
        }
        assert_eq!(acc.lands().total(), 0);
    }
}
