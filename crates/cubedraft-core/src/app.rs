// Draft runner: drives a session against an oracle and reports progress to a
// notifier.
//
// Local state always advances first; notifications run afterwards and their
// failures are only logged.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::card::Card;
use crate::config::DeckConfig;
use crate::draft::{DraftError, DraftSession};
use crate::notify::Notifier;
use crate::oracle::RatingOracle;
use crate::protocol::DraftRecord;

/// Result of an all-bot draft.
pub enum DraftOutcome<O> {
    /// Decks built and the record submitted.
    Finished(DraftRecord),
    /// Picks done, finishing deferred to the caller.
    Pending(DraftRunner<O>),
}

pub struct DraftRunner<O> {
    session: DraftSession,
    oracle: O,
    notifier: Arc<dyn Notifier>,
    deck: DeckConfig,
}

impl<O> DraftRunner<O>
where
    O: RatingOracle,
{
    pub fn new(session: DraftSession, oracle: O, notifier: Arc<dyn Notifier>, deck: DeckConfig) -> Self {
        Self {
            session,
            oracle,
            notifier,
            deck,
        }
    }

    pub fn session(&self) -> &DraftSession {
        &self.session
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Apply a human pick from the first seat's pack and run the round.
    ///
    /// Yields once before touching state. The pick submission is sent on a
    /// spawned task; the returned handle resolves once it has been attempted.
    pub async fn pick(&mut self, card_index: usize) -> Result<JoinHandle<()>, DraftError> {
        tokio::task::yield_now().await;
        let submission = self.session.apply_human_pick(card_index, &self.oracle)?;

        let notifier = Arc::clone(&self.notifier);
        Ok(tokio::spawn(async move {
            if let Err(e) = notifier.submit_pick(&submission).await {
                warn!(
                    draft = %submission.draft_id,
                    pick = %submission.pick,
                    "pick submission failed: {e}"
                );
            }
        }))
    }

    pub fn arrange_picks(&mut self, buckets: Vec<Vec<Card>>) -> Result<(), DraftError> {
        self.session.arrange_picks(buckets)
    }

    /// Let bots take every seat and draft to the end. Unless `no_finish` is
    /// set the draft is then finished and submitted.
    pub async fn all_bots_draft(mut self, no_finish: bool) -> Result<DraftOutcome<O>, DraftError> {
        self.session.all_bots_draft(&self.oracle);
        if no_finish {
            return Ok(DraftOutcome::Pending(self));
        }
        self.finish().await.map(DraftOutcome::Finished)
    }

    /// Build decks, produce the record, and submit it.
    pub async fn finish(self) -> Result<DraftRecord, DraftError> {
        let record = self.session.finish(&self.oracle, &self.deck)?;
        match self.notifier.submit_draft(&record).await {
            Ok(()) => info!(draft = %record.id, "draft submitted"),
            Err(e) => warn!(draft = %record.id, "draft submission failed: {e}"),
        }
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::draft::SeatSpec;
    use crate::notify::{DraftNotifier, NotifyError};
    use crate::oracle::HeuristicOracle;
    use crate::protocol::PickSubmission;

    #[derive(Default)]
    struct Recorder {
        picks: Mutex<Vec<PickSubmission>>,
        drafts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Notifier for Recorder {
        async fn submit_pick(&self, submission: &PickSubmission) -> Result<(), NotifyError> {
            self.picks.lock().unwrap().push(submission.clone());
            Ok(())
        }

        async fn submit_draft(&self, record: &DraftRecord) -> Result<(), NotifyError> {
            self.drafts.lock().unwrap().push(record.id.clone());
            Ok(())
        }
    }

    struct Unreachable;

    #[async_trait]
    impl Notifier for Unreachable {
        async fn submit_pick(&self, _: &PickSubmission) -> Result<(), NotifyError> {
            Err(NotifyError::Status {
                status: 503,
                url: "pick".into(),
            })
        }

        async fn submit_draft(&self, _: &DraftRecord) -> Result<(), NotifyError> {
            Err(NotifyError::Status {
                status: 503,
                url: "draft".into(),
            })
        }
    }

    fn session(human: bool) -> DraftSession {
        let packs: Vec<Vec<Vec<Card>>> = (0..2)
            .map(|s| {
                vec![(0..3)
                    .map(|c| Card::new(format!("s{s}c{c}"), format!("Card {s}-{c}"), "Instant").with_rating(1000.0 + c as f64))
                    .collect()]
            })
            .collect();
        let first = if human { SeatSpec::human("You") } else { SeatSpec::bot("Bot 1") };
        DraftSession::new("draft-1", "cube", vec![first, SeatSpec::bot("Bot 2")], packs, Vec::new(), 1200.0).unwrap()
    }

    #[tokio::test]
    async fn pick_submits_in_background() {
        let recorder = Arc::new(Recorder::default());
        let mut runner = DraftRunner::new(session(true), HeuristicOracle::default(), recorder.clone(), DeckConfig::default());

        let handle = runner.pick(2).await.unwrap();
        handle.await.unwrap();

        let picks = recorder.picks.lock().unwrap();
        assert_eq!(picks.len(), 1);
        assert_eq!(picks[0].pick, "Card 0-2");
        assert_eq!(picks[0].pack.len(), 3);
        assert_eq!(runner.session().seats[0].pick_order.len(), 1);
    }

    #[tokio::test]
    async fn failed_submission_does_not_roll_back() {
        let mut runner = DraftRunner::new(session(true), HeuristicOracle::default(), Arc::new(Unreachable), DeckConfig::default());
        for _ in 0..3 {
            runner.pick(0).await.unwrap().await.unwrap();
        }
        assert!(runner.session().is_complete());
        let record = runner.finish().await.unwrap();
        assert_eq!(record.seats[0].pick_order.len(), 3);
    }

    #[tokio::test]
    async fn pick_errors_leave_state_untouched() {
        let mut runner = DraftRunner::new(
            session(true),
            HeuristicOracle::default(),
            Arc::new(DraftNotifier::Disabled),
            DeckConfig::default(),
        );
        assert!(matches!(
            runner.pick(9).await,
            Err(DraftError::CardIndexOutOfRange { index: 9, len: 3 })
        ));
        assert_eq!(runner.session().pack().len(), 3);
    }

    #[tokio::test]
    async fn all_bots_draft_finishes_and_submits() {
        let recorder = Arc::new(Recorder::default());
        let runner = DraftRunner::new(session(true), HeuristicOracle::default(), recorder.clone(), DeckConfig::default());
        let outcome = runner.all_bots_draft(false).await.unwrap();
        let record = match outcome {
            DraftOutcome::Finished(record) => record,
            DraftOutcome::Pending(_) => panic!("expected a finished draft"),
        };
        assert!(record.seats.iter().all(|s| s.bot));
        assert!(record.seats[0].name.starts_with("Bot 1: "));
        assert_eq!(recorder.drafts.lock().unwrap().as_slice(), ["draft-1".to_string()]);
    }

    #[tokio::test]
    async fn all_bots_draft_can_defer_finish() {
        let recorder = Arc::new(Recorder::default());
        let runner = DraftRunner::new(session(false), HeuristicOracle::default(), recorder.clone(), DeckConfig::default());
        let runner = match runner.all_bots_draft(true).await.unwrap() {
            DraftOutcome::Pending(runner) => runner,
            DraftOutcome::Finished(_) => panic!("expected a pending draft"),
        };
        assert!(runner.session().is_complete());
        assert!(recorder.drafts.lock().unwrap().is_empty());
        runner.finish().await.unwrap();
        assert_eq!(recorder.drafts.lock().unwrap().len(), 1);
    }
}
