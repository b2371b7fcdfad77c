// Greedy synergy filler: grows the clustered core one card at a time.

use tracing::debug;

use crate::card::Card;
use crate::draft::seen::{ColorAccumulator, LandMix};
use crate::oracle::RatingOracle;

/// Score of adding `card` to `chosen` under the current mana base.
pub fn fill_score<O>(oracle: &O, chosen: &[Card], card: &Card, played: &ColorAccumulator, lands: &LandMix) -> f64
where
    O: RatingOracle + ?Sized,
{
    (oracle.synergy(chosen, card, played) + oracle.rate(card)) * oracle.casting_probability(card, lands)
}

/// Move the best-scoring candidates into `chosen` until it holds `target`
/// cards or the candidates run out.
///
/// Each addition is folded into a running "played" accumulator so later
/// synergy checks see it.
pub fn fill_greedy<O>(
    oracle: &O,
    chosen: &mut Vec<Card>,
    candidates: &mut Vec<Card>,
    target: usize,
    lands: &LandMix,
) where
    O: RatingOracle + ?Sized,
{
    let mut played = ColorAccumulator::new();
    played.add_seen(chosen.iter());

    let additions = target.saturating_sub(chosen.len()).min(candidates.len());
    for _ in 0..additions {
        let mut best = 0;
        let mut best_score = f64::NEG_INFINITY;
        for (idx, card) in candidates.iter().enumerate() {
            let score = fill_score(oracle, chosen, card, &played, lands);
            if score > best_score {
                best = idx;
                best_score = score;
            }
        }
        let card = candidates.remove(best);
        debug!(card = %card.name, score = best_score, "filler added card");
        played.add_seen([&card]);
        chosen.push(card);
    }
}
