// Bot pick engine.

use tracing::debug;

use crate::oracle::{BotEvaluation, PackLayout, PickContext, RatingOracle};

use super::state::Seat;

/// Have the bot at `seat` take one card from its current pack.
///
/// Unrated cards in the pack get `default_rating` first. Every card is
/// evaluated against the seat's picked and seen accumulators and the highest
/// rating wins, the earliest card on ties. The pick moves into the seat's
/// pick order and picked accumulator, and the oracle's suggested land mix
/// replaces the seat's mana base.
///
/// Returns the index the card was taken from, or `None` for an empty pack.
pub fn bot_pick<O>(
    seat: &mut Seat,
    oracle: &O,
    layout: &PackLayout,
    pack_number: usize,
    default_rating: f64,
) -> Option<usize>
where
    O: RatingOracle + ?Sized,
{
    let Seat {
        name,
        pack_backlog,
        pick_order,
        seen,
        picked,
        ..
    } = seat;
    let pack = pack_backlog.front_mut().filter(|p| !p.is_empty())?;

    for card in pack.iter_mut() {
        if card.rating.is_none() {
            card.rating = Some(default_rating);
        }
    }

    let ctx = PickContext {
        picked: &*picked,
        seen: Some(&*seen),
        layout: Some(layout),
        pack_size: pack.len(),
        pack_number,
    };
    let mut best: Option<(usize, BotEvaluation)> = None;
    for (idx, card) in pack.iter().enumerate() {
        let eval = oracle.rate_with_color_preference(Some(card), &ctx);
        if best.map_or(true, |(_, b)| eval.rating > b.rating) {
            best = Some((idx, eval));
        }
    }
    let (idx, eval) = best?;

    let card = pack.remove(idx);
    debug!(
        seat = %name,
        card = %card.name,
        rating = eval.rating,
        colors = %eval.colors,
        "bot pick"
    );
    picked.adopt_land_mix(eval.lands);
    picked.add_seen([&card]);
    pick_order.push(card);
    Some(idx)
}
