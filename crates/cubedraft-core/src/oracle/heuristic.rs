// Heuristic rating oracle.
//
// Scores picks from the cached base rating, discounted by how poorly the card
// fits the seat's strongest color pair once the seat has committed. Synergy is
// the mean embedding similarity to the cards already chosen.

use crate::card::{Card, ColorSet};
use crate::deck::cluster::cosine_similarity;
use crate::draft::seen::{ColorAccumulator, LandMix, LAND_BUDGET};

use super::{BotEvaluation, PickContext, RatingOracle, DEFAULT_RATING};

/// Tunable weights for [`HeuristicOracle`].
#[derive(Debug, Clone, PartialEq)]
pub struct HeuristicOracle {
    /// Largest color combination a bot will settle into.
    pub max_colors: u32,
    /// Weight of the seen accumulator relative to the picked one.
    pub seen_weight: f64,
    /// Scale applied to mean embedding similarity.
    pub synergy_weight: f64,
    /// Sources of a color at which a single pip is considered reliable.
    pub sources_for_certainty: f64,
    /// Rated picks after which color fit counts fully.
    pub commitment_picks: f64,
}

impl Default for HeuristicOracle {
    fn default() -> Self {
        Self {
            max_colors: 2,
            seen_weight: 0.25,
            synergy_weight: 250.0,
            sources_for_certainty: 8.0,
            commitment_picks: 15.0,
        }
    }
}

impl HeuristicOracle {
    /// Strongest combination of at most `max_colors` colors. Colorless wins
    /// only while nothing colored has been observed.
    pub fn preferred_colors(&self, ctx: &PickContext<'_>) -> ColorSet {
        let mut best = ColorSet::COLORLESS;
        let mut best_score = 0.0;
        for combination in ColorSet::all_combinations() {
            if combination.is_empty() || combination.count() > self.max_colors {
                continue;
            }
            let mut score = ctx.picked.value(combination);
            if let Some(seen) = ctx.seen {
                score += self.seen_weight * seen.value(combination);
            }
            if score > best_score {
                best = combination;
                best_score = score;
            }
        }
        best
    }

    fn commitment(&self, picked: &ColorAccumulator) -> f64 {
        if self.commitment_picks <= 0.0 {
            return 1.0;
        }
        (picked.rated_count() as f64 / self.commitment_picks).min(1.0)
    }
}

impl RatingOracle for HeuristicOracle {
    fn rate(&self, card: &Card) -> f64 {
        card.rating.unwrap_or(DEFAULT_RATING)
    }

    fn rate_with_color_preference(&self, card: Option<&Card>, ctx: &PickContext<'_>) -> BotEvaluation {
        let colors = self.preferred_colors(ctx);
        let lands = LandMix::split_evenly(colors, LAND_BUDGET);
        let rating = match card {
            None => 0.0,
            Some(card) => {
                let fit = if card.is_land() {
                    if self.is_playable_land(colors, card) { 1.0 } else { 0.0 }
                } else {
                    self.casting_probability(card, &lands)
                };
                let commitment = self.commitment(ctx.picked);
                self.rate(card) * ((1.0 - commitment) + commitment * fit)
            }
        };
        BotEvaluation { rating, colors, lands }
    }

    fn synergy(&self, chosen: &[Card], candidate: &Card, _played: &ColorAccumulator) -> f64 {
        let Some(embedding) = candidate.embedding() else {
            return 0.0;
        };
        let similarities: Vec<f64> = chosen
            .iter()
            .filter_map(|c| c.embedding())
            .filter_map(|other| cosine_similarity(embedding, other))
            .collect();
        if similarities.is_empty() {
            return 0.0;
        }
        let mean = similarities.iter().sum::<f64>() / similarities.len() as f64;
        mean * self.synergy_weight
    }

    fn casting_probability(&self, card: &Card, lands: &LandMix) -> f64 {
        if card.is_land() {
            return 1.0;
        }
        card.colors
            .colors()
            .map(|c| (lands.get(c) as f64 / self.sources_for_certainty).min(1.0))
            .product()
    }
}
