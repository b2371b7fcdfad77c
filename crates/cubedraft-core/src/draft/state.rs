// Draft session: seats, pack backlogs, and the rotation state machine.

use std::collections::VecDeque;

use chrono::Utc;
use tracing::{debug, info};

use crate::card::{persist_buckets, Card, ColorSet, PersistedCard};
use crate::config::DeckConfig;
use crate::deck::{build_deck, partition};
use crate::oracle::{PackLayout, PickContext, RatingOracle};
use crate::protocol::{DraftRecord, PickSubmission, SeatRecord};

use super::bot::bot_pick;
use super::pick::{PassDirection, PickPosition};
use super::seen::ColorAccumulator;
use super::DraftError;

/// Who sits at a seat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatSpec {
    pub name: String,
    pub bot: bool,
}

impl SeatSpec {
    pub fn bot(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bot: true,
        }
    }

    pub fn human(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bot: false,
        }
    }
}

/// Working state of one seat while the draft runs.
#[derive(Debug, Clone)]
pub struct Seat {
    pub name: String,
    pub bot: bool,
    /// Packs waiting at this seat; the front is the one being picked from.
    pub pack_backlog: VecDeque<Vec<Card>>,
    pub pick_order: Vec<Card>,
    /// Everything this seat has been shown.
    pub seen: ColorAccumulator,
    /// Everything this seat has taken.
    pub picked: ColorAccumulator,
    /// Deck layout set by the seat's owner, if any.
    pub drafted: Option<Vec<Vec<Card>>>,
}

impl Seat {
    pub fn new(name: impl Into<String>, bot: bool) -> Self {
        Self {
            name: name.into(),
            bot,
            pack_backlog: VecDeque::new(),
            pick_order: Vec::new(),
            seen: ColorAccumulator::new(),
            picked: ColorAccumulator::new(),
            drafted: None,
        }
    }

    /// The pack this seat is picking from, if it has one.
    pub fn current_pack(&self) -> Option<&[Card]> {
        self.pack_backlog.front().map(Vec::as_slice)
    }

    fn has_cards(&self) -> bool {
        self.current_pack().is_some_and(|p| !p.is_empty())
    }
}

/// A single draft, from opened packs to the persisted record.
///
/// Seat 0 is the human seat when there is one.
#[derive(Debug, Clone)]
pub struct DraftSession {
    pub id: String,
    pub cube_id: String,
    pub seats: Vec<Seat>,
    /// Pack composition at the start, `[seat][pack][card]`.
    initial_state: Vec<Vec<Vec<Card>>>,
    /// Packs not yet opened, per seat.
    unopened_packs: Vec<VecDeque<Vec<Card>>>,
    /// Basic lands offered to every seat at deck construction.
    pub basics: Vec<Card>,
    pub default_rating: f64,
}

impl DraftSession {
    /// Seat everyone and open the first pack at each seat.
    ///
    /// `packs[seat]` lists that seat's packs in opening order; every seat must
    /// have the same number.
    pub fn new(
        id: impl Into<String>,
        cube_id: impl Into<String>,
        specs: Vec<SeatSpec>,
        packs: Vec<Vec<Vec<Card>>>,
        basics: Vec<Card>,
        default_rating: f64,
    ) -> Result<Self, DraftError> {
        if specs.is_empty() {
            return Err(DraftError::NoSeats);
        }
        if packs.len() != specs.len() {
            return Err(DraftError::SeatCountMismatch {
                seats: specs.len(),
                packs: packs.len(),
            });
        }
        let rounds = packs[0].len();
        if let Some((seat, got)) = packs
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|&(_, n)| n != rounds || n == 0)
        {
            return Err(DraftError::PackCountMismatch {
                seat,
                expected: rounds.max(1),
                got,
            });
        }

        let initial_state = packs.clone();
        let mut seats = Vec::with_capacity(specs.len());
        let mut unopened_packs = Vec::with_capacity(specs.len());
        for (spec, seat_packs) in specs.into_iter().zip(packs) {
            let mut seat = Seat::new(spec.name, spec.bot);
            let mut queue: VecDeque<Vec<Card>> = seat_packs.into();
            if let Some(first) = queue.pop_front() {
                seat.seen.add_seen(first.iter());
                seat.pack_backlog.push_back(first);
            }
            seats.push(seat);
            unopened_packs.push(queue);
        }

        let session = Self {
            id: id.into(),
            cube_id: cube_id.into(),
            seats,
            initial_state,
            unopened_packs,
            basics,
            default_rating,
        };
        info!(
            draft = %session.id,
            seats = session.seats.len(),
            packs = rounds,
            "draft started"
        );
        Ok(session)
    }

    pub fn initial_state(&self) -> &[Vec<Vec<Card>>] {
        &self.initial_state
    }

    /// Seat count and the first seat's pack sizes.
    pub fn layout(&self) -> PackLayout {
        PackLayout {
            seats: self.seats.len(),
            pack_sizes: self.initial_state[0].iter().map(Vec::len).collect(),
        }
    }

    /// The first seat's current pack, or nothing.
    pub fn pack(&self) -> &[Card] {
        self.seats[0].current_pack().unwrap_or(&[])
    }

    /// Position of the next pick, from the last seat's pick count.
    pub fn pack_pick_number(&self) -> PickPosition {
        let picks_made = self.seats.last().map_or(0, |s| s.pick_order.len());
        PickPosition::from_picks_made(&self.layout().pack_sizes, picks_made)
    }

    /// Terminal once the first seat has nothing left to pick from.
    pub fn is_complete(&self) -> bool {
        !self.seats[0].has_cards()
    }

    /// Packs still unopened at the first seat.
    pub fn unopened_remaining(&self) -> usize {
        self.unopened_packs[0].len()
    }

    /// One pick for every bot seat holding a nonempty pack.
    pub fn bot_picks<O>(&mut self, oracle: &O)
    where
        O: RatingOracle + ?Sized,
    {
        let layout = self.layout();
        let pack_number = self.pack_pick_number().pack;
        let default_rating = self.default_rating;
        for seat in self.seats.iter_mut().filter(|s| s.bot) {
            bot_pick(seat, oracle, &layout, pack_number, default_rating);
        }
    }

    /// Run one round: bots pick, then packs move on.
    ///
    /// When every current pack is empty, each seat drops it and opens its next
    /// unopened pack if there is one. Otherwise packs rotate. Either way every
    /// seat then sees its new current pack.
    pub fn pass_pack<O>(&mut self, oracle: &O)
    where
        O: RatingOracle + ?Sized,
    {
        self.bot_picks(oracle);

        if self.seats.iter().all(|s| !s.has_cards()) {
            for (seat, unopened) in self.seats.iter_mut().zip(self.unopened_packs.iter_mut()) {
                seat.pack_backlog.pop_front();
                if let Some(next) = unopened.pop_front() {
                    seat.pack_backlog.push_back(next);
                }
            }
            debug!(draft = %self.id, unopened = self.unopened_remaining(), "opened next packs");
        } else {
            let direction = PassDirection::for_unopened(self.unopened_remaining());
            rotate(&mut self.seats, direction);
            debug!(draft = %self.id, ?direction, "packs passed");
        }

        for seat in &mut self.seats {
            if let Some(pack) = seat.pack_backlog.front() {
                seat.seen.add_seen(pack.iter());
            }
        }
    }

    /// Take `card_index` from the first seat's pack on behalf of its human
    /// owner, then run the round.
    ///
    /// The returned submission describes the pack as it was before the pick.
    pub fn apply_human_pick<O>(&mut self, card_index: usize, oracle: &O) -> Result<PickSubmission, DraftError>
    where
        O: RatingOracle + ?Sized,
    {
        if self.seats[0].bot {
            return Err(DraftError::NoHumanSeat);
        }
        if self.is_complete() {
            return Err(DraftError::DraftComplete);
        }
        let position = self.pack_pick_number();

        let seat = &mut self.seats[0];
        let pack = seat.pack_backlog.front_mut().ok_or(DraftError::DraftComplete)?;
        if card_index >= pack.len() {
            return Err(DraftError::CardIndexOutOfRange {
                index: card_index,
                len: pack.len(),
            });
        }
        let names: Vec<String> = pack.iter().map(|c| c.name.clone()).collect();
        let card = pack.remove(card_index);
        debug!(seat = %seat.name, card = %card.name, %position, "human pick");
        seat.picked.add_seen([&card]);
        let submission = PickSubmission {
            draft_id: self.id.clone(),
            pick: card.name.clone(),
            pack: names,
            pack_number: position.pack,
            pick_number: position.pick,
        };
        seat.pick_order.push(card);

        self.pass_pack(oracle);
        Ok(submission)
    }

    /// Replace the first seat's deck layout with `buckets`.
    pub fn arrange_picks(&mut self, buckets: Vec<Vec<Card>>) -> Result<(), DraftError> {
        if buckets.len() != partition::MAIN_BUCKETS {
            return Err(DraftError::BadArrangement { got: buckets.len() });
        }
        self.seats[0].drafted = Some(buckets);
        Ok(())
    }

    /// Hand every seat to a bot and run rounds until the draft is complete.
    pub fn all_bots_draft<O>(&mut self, oracle: &O)
    where
        O: RatingOracle + ?Sized,
    {
        for seat in &mut self.seats {
            seat.bot = true;
        }
        while !self.is_complete() {
            self.pass_pack(oracle);
        }
        info!(draft = %self.id, "all-bot draft complete");
    }

    /// Build decks, name seats, and reduce the session to its record.
    pub fn finish<O>(self, oracle: &O, deck: &DeckConfig) -> Result<DraftRecord, DraftError>
    where
        O: RatingOracle + ?Sized,
    {
        let initial_state = self.initial_state.iter().map(|packs| persist_buckets(packs)).collect();
        let mut records = Vec::with_capacity(self.seats.len());
        let mut bot_index = 1;

        for seat in self.seats {
            let pick_order: Vec<PersistedCard> = seat.pick_order.iter().map(Card::persisted).collect();
            if seat.bot {
                let built = build_deck(seat.pick_order, &self.basics, oracle, deck)?;
                records.push(SeatRecord {
                    name: format!("Bot {bot_index}: {}", color_label(built.colors, ", ")),
                    description: format!(
                        "This deck was drafted by a bot with color preference for {}.",
                        color_label(built.colors, "")
                    ),
                    bot: true,
                    colors: built.colors,
                    deck: persist_buckets(&built.deck),
                    sideboard: persist_buckets(&built.sideboard),
                    pick_order,
                });
                bot_index += 1;
            } else {
                let colors = oracle
                    .rate_with_color_preference(None, &PickContext::for_pool(&seat.picked))
                    .colors;
                let main = match seat.drafted {
                    Some(buckets) => buckets,
                    None => partition::partition_main(seat.pick_order),
                };
                records.push(SeatRecord {
                    name: format!("{}: {}", seat.name, color_label(colors, ", ")),
                    description: String::new(),
                    bot: false,
                    colors,
                    deck: persist_buckets(&main),
                    sideboard: vec![Vec::new(); partition::SIDEBOARD_BUCKETS],
                    pick_order,
                });
            }
        }

        info!(draft = %self.id, seats = records.len(), "draft finished");
        Ok(DraftRecord {
            id: self.id,
            cube_id: self.cube_id,
            seats: records,
            initial_state,
            completed_at: Utc::now(),
        })
    }
}

/// Move every seat's current pack to its neighbor in `direction`.
pub fn rotate(seats: &mut [Seat], direction: PassDirection) {
    let n = seats.len();
    let passed: Vec<Option<Vec<Card>>> = seats.iter_mut().map(|s| s.pack_backlog.pop_front()).collect();
    for (from, pack) in passed.into_iter().enumerate() {
        if let Some(pack) = pack {
            seats[direction.target(from, n)].pack_backlog.push_back(pack);
        }
    }
}

/// Symbols joined by `sep`, or "C" for colorless.
fn color_label(colors: ColorSet, sep: &str) -> String {
    if colors.is_empty() {
        "C".to_string()
    } else {
        colors.join(sep)
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
