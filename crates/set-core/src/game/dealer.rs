use crate::config::{ConfigError, GameConfig};
use crate::game::keypad::{Companion, KeyPad};
use crate::game::link::DealerLink;
use crate::game::outcome::{GameOutcome, PlayerScore};
use crate::game::participant::{FreezeTimes, Participant};
use crate::game::seat::{InvalidReason, Seat, Verdict};
use crate::model::{Card, Deck, PlayerId, Slot, Table};
use crate::oracle::SetOracle;
use crate::sync::Wait;
use crate::view::TableView;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Longest the dealer parks on the submission queue outside the warning window.
const SUBMISSION_WAIT: Duration = Duration::from_secs(1);
/// Countdown cadence once the warning window is reached.
///
/// A short timed wait on the submission queue rather than a non-blocking
/// poll: a submission still wakes the dealer at once, the countdown is
/// redrawn at least every tick, and the wait is capped by the time left.
const WARNING_TICK: Duration = Duration::from_millis(10);

/// Cloneable handle that asks a running game to stop.
#[derive(Debug, Clone)]
pub struct Terminator {
    flag: Arc<AtomicBool>,
    link: Arc<DealerLink>,
}

impl Terminator {
    pub fn request(&self) {
        self.flag.store(true, Ordering::SeqCst);
        self.link.submissions.wake();
    }

    pub fn is_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Owns the deck and the turn timer, seats the participants and judges
/// their candidates in arrival order.
pub struct Dealer {
    config: GameConfig,
    table: Arc<Table>,
    oracle: Arc<dyn SetOracle>,
    link: Arc<DealerLink>,
    seats: Vec<Arc<Seat>>,
    idle: Vec<Participant>,
    workers: Vec<(Arc<Seat>, JoinHandle<()>)>,
    deck: Deck,
    rng: StdRng,
    pending_removal: Option<Vec<Slot>>,
    reshuffle_deadline: Instant,
    terminate: Arc<AtomicBool>,
    rounds: u32,
    sets_collected: u32,
    discarded: usize,
}

impl Dealer {
    pub fn new(
        config: GameConfig,
        oracle: Arc<dyn SetOracle>,
        view: Arc<dyn TableView>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let table = Arc::new(Table::new(config.table_size, view));
        let link = Arc::new(DealerLink::new(config.table_size));
        let freeze = FreezeTimes {
            point: config.point_freeze,
            penalty: config.penalty_freeze,
        };

        let mut seats = Vec::with_capacity(config.players());
        let mut idle = Vec::with_capacity(config.players());
        for index in 0..config.players() {
            let seat = Arc::new(Seat::new(
                PlayerId::new(index),
                config.is_human(index),
                config.feature_size,
            ));
            idle.push(Participant::new(
                Arc::clone(&seat),
                Arc::clone(&table),
                Arc::clone(&link),
                config.feature_size,
                freeze,
            ));
            seats.push(seat);
        }

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            deck: Deck::full(config.deck_size),
            reshuffle_deadline: Instant::now() + config.turn_timeout,
            config,
            table,
            oracle,
            link,
            seats,
            idle,
            workers: Vec::new(),
            rng,
            pending_removal: None,
            terminate: Arc::new(AtomicBool::new(false)),
            rounds: 0,
            sets_collected: 0,
            discarded: 0,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn table(&self) -> Arc<Table> {
        Arc::clone(&self.table)
    }

    pub fn terminator(&self) -> Terminator {
        Terminator {
            flag: Arc::clone(&self.terminate),
            link: Arc::clone(&self.link),
        }
    }

    pub fn keypad(&self, player: PlayerId) -> Option<KeyPad> {
        self.seat(player).map(|seat| {
            KeyPad::new(
                Arc::clone(seat),
                Arc::clone(&self.table),
                Arc::clone(&self.link),
            )
        })
    }

    pub fn keypads(&self) -> Vec<KeyPad> {
        self.seats
            .iter()
            .filter_map(|seat| self.keypad(seat.id()))
            .collect()
    }

    /// Gives `player` an input task that starts and stops with it. Returns
    /// `false` for unknown players or once the game has started.
    pub fn attach_companion(&mut self, player: PlayerId, companion: Box<dyn Companion>) -> bool {
        match self
            .idle
            .iter_mut()
            .find(|participant| participant.seat().id() == player)
        {
            Some(participant) => {
                participant.set_companion(companion);
                true
            }
            None => false,
        }
    }

    pub fn spawn(self) -> io::Result<JoinHandle<GameOutcome>> {
        thread::Builder::new()
            .name("dealer".to_string())
            .spawn(move || self.run())
    }

    /// Plays rounds until the game is over and returns the standings.
    pub fn run(mut self) -> GameOutcome {
        info!("dealer thread starting");
        self.start_participants();
        while !self.should_finish() {
            self.begin_round();
            self.reset_timer();
            self.link.set_updating(false);
            self.link.thaw_all();
            self.timer_loop();
            self.link.set_updating(true);
            self.reset_timer();
            self.clear_table();
        }
        self.terminate_participants();
        let outcome = self.announce_winners();
        info!(
            rounds = outcome.rounds,
            sets = outcome.sets_collected,
            "dealer thread terminated"
        );
        outcome
    }

    fn seat(&self, player: PlayerId) -> Option<&Arc<Seat>> {
        self.seats.get(player.index())
    }

    fn start_participants(&mut self) {
        for participant in std::mem::take(&mut self.idle) {
            let seat = Arc::clone(participant.seat());
            match participant.spawn() {
                Ok(handle) => self.workers.push((seat, handle)),
                Err(err) => {
                    error!(player = %seat.id(), %err, "failed to start participant");
                    seat.request_stop();
                }
            }
        }
    }

    /// Stops participants newest first, joining each before moving on.
    fn terminate_participants(&mut self) {
        while let Some((seat, handle)) = self.workers.pop() {
            seat.request_stop();
            if handle.join().is_err() {
                warn!(player = %seat.id(), "participant thread panicked");
            }
            info!(player = %seat.id(), "participant joined");
        }
    }

    fn is_terminating(&self) -> bool {
        self.terminate.load(Ordering::SeqCst)
    }

    fn request_termination(&self) {
        self.terminate.store(true, Ordering::SeqCst);
    }

    fn should_finish(&self) -> bool {
        self.is_terminating() || !self.any_set_left()
    }

    fn any_set_left(&self) -> bool {
        let mut remaining: Vec<Card> = self.deck.cards().to_vec();
        remaining.extend(self.table.cards_on_table().into_iter().map(|(_, card)| card));
        self.oracle.has_set(&remaining)
    }

    /// Deals, resets every participant and drops leftover submissions.
    fn begin_round(&mut self) {
        let table = Arc::clone(&self.table);
        let _bulk = table.lock_bulk();
        self.rounds += 1;
        self.place_cards_on_table();
        for seat in &self.seats {
            seat.actions.clear();
            self.discard_tokens(seat);
        }
        for player in self.link.submissions.clear() {
            if let Some(seat) = self.seat(player) {
                self.deliver(seat, Verdict::Invalidated(InvalidReason::RoundOver));
            }
        }
        debug_assert!((0..table.size()).all(|slot| table.tokens_at(slot).is_empty()));
        debug!(
            round = self.rounds,
            cards = table.count_cards(),
            deck = self.deck.len(),
            "round dealt"
        );
    }

    fn timer_loop(&mut self) {
        while !self.is_terminating() && Instant::now() < self.reshuffle_deadline {
            self.sleep_until_woken_or_timeout();
            self.refresh_timer();
            self.remove_pending_cards();
            if !self.any_set_left() {
                info!("no sets left");
                self.request_termination();
            }
            self.place_cards_on_table();
            self.link.thaw_all();
        }
    }

    fn sleep_until_woken_or_timeout(&mut self) {
        let wait = self.wait_budget(Instant::now());
        if let Some(player) = self.link.submissions.take(Wait::For(wait)) {
            self.adjudicate(player);
        }
    }

    /// How long the next wait on the submission queue may last; never past
    /// the reshuffle deadline.
    fn wait_budget(&self, now: Instant) -> Duration {
        let left = self.reshuffle_deadline.saturating_duration_since(now);
        if left > self.config.turn_timeout_warning {
            SUBMISSION_WAIT.min(left)
        } else {
            WARNING_TICK.min(left)
        }
    }

    fn reset_timer(&mut self) {
        self.reshuffle_deadline = Instant::now() + self.config.turn_timeout;
        self.table
            .view()
            .set_countdown(self.config.turn_timeout, false);
    }

    fn refresh_timer(&self) {
        let left = self
            .reshuffle_deadline
            .saturating_duration_since(Instant::now());
        self.table
            .view()
            .set_countdown(left, left < self.config.turn_timeout_warning);
    }

    fn adjudicate(&mut self, player: PlayerId) {
        let Some(seat) = self.seat(player).cloned() else {
            warn!(%player, "submission from unknown player");
            return;
        };
        let slots = seat.tokens();
        if slots.len() != self.config.feature_size {
            debug!(%player, held = slots.len(), "stale submission");
            self.deliver(&seat, Verdict::Invalidated(InvalidReason::Stale));
            return;
        }
        seat.actions.clear();

        let cards: Option<Vec<Card>> = slots.iter().map(|&slot| self.table.card_at(slot)).collect();
        let Some(cards) = cards else {
            debug!(%player, ?slots, "candidate references an empty slot");
            self.deliver(&seat, Verdict::Invalidated(InvalidReason::Stale));
            return;
        };

        if self.oracle.test_set(&cards) {
            for &slot in &slots {
                if let Ok(mut guard) = self.table.lock_slot(slot) {
                    guard.remove_token(player);
                    seat.lock_tokens().retain(|&held| held != slot);
                }
            }
            seat.lock_tokens().clear();
            self.pending_removal
                .get_or_insert_with(Vec::new)
                .extend(slots.iter().copied());
            self.sets_collected += 1;
            self.reset_timer();
            info!(%player, ?slots, ?cards, "set collected");
            self.deliver(&seat, Verdict::Point);
        } else {
            info!(%player, ?slots, ?cards, "not a set");
            self.deliver(&seat, Verdict::Penalty);
        }
    }

    fn deliver(&self, seat: &Seat, verdict: Verdict) {
        seat.begin_serving(verdict);
        if !seat.inbox.offer(verdict) {
            warn!(player = %seat.id(), ?verdict, "verdict inbox unavailable");
            seat.finish_serving();
        }
    }

    /// Clears the slots of the last collected set, releasing every token on
    /// them and invalidating queued candidates that relied on them.
    fn remove_pending_cards(&mut self) {
        let Some(slots) = self.pending_removal.take() else {
            return;
        };
        let table = Arc::clone(&self.table);
        for slot in slots {
            self.link.freeze(slot);
            let Ok(mut guard) = table.lock_slot(slot) else {
                continue;
            };
            for owner in guard.tokens() {
                guard.remove_token(owner);
                let Some(seat) = self.seat(owner) else {
                    continue;
                };
                seat.lock_tokens().retain(|&held| held != slot);
                if self.link.submissions.remove(&owner) {
                    debug!(player = %owner, slot, "candidate lost a card");
                    self.deliver(seat, Verdict::Invalidated(InvalidReason::CardsRemoved));
                }
            }
            for seat in &self.seats {
                seat.actions.remove(&slot);
            }
            if guard.remove_card().is_some() {
                self.discarded += 1;
            }
        }
    }

    fn place_cards_on_table(&mut self) {
        self.deck.shuffle_in_place(&mut self.rng);
        for slot in self.table.empty_slots() {
            let Some(card) = self.deck.draw() else {
                break;
            };
            if let Err(err) = self.table.place_card(card, slot) {
                warn!(%err, "could not deal card");
                self.deck.put_back(card);
            }
        }
    }

    /// Returns every table card to the deck and strips all tokens.
    fn clear_table(&mut self) {
        let table = Arc::clone(&self.table);
        let _bulk = table.lock_bulk();
        for slot in 0..table.size() {
            self.link.freeze(slot);
            let Ok(mut guard) = table.lock_slot(slot) else {
                continue;
            };
            for owner in guard.tokens() {
                guard.remove_token(owner);
                if let Some(seat) = self.seat(owner) {
                    seat.lock_tokens().retain(|&held| held != slot);
                }
            }
            if let Some(card) = guard.remove_card() {
                self.deck.put_back(card);
            }
        }
        table.view().remove_tokens();
        self.deck.shuffle_in_place(&mut self.rng);
        debug!(deck = self.deck.len(), "table cleared");
    }

    fn discard_tokens(&self, seat: &Seat) {
        for slot in seat.tokens() {
            if let Ok(mut guard) = self.table.lock_slot(slot) {
                guard.remove_token(seat.id());
                seat.lock_tokens().retain(|&held| held != slot);
            }
        }
        seat.lock_tokens().clear();
    }

    fn announce_winners(&self) -> GameOutcome {
        let scores = self
            .seats
            .iter()
            .map(|seat| PlayerScore {
                player: seat.id(),
                score: seat.score(),
            })
            .collect();
        let outcome = GameOutcome::from_scores(scores, self.rounds, self.sets_collected);
        self.table.view().announce_winner(&outcome.winners);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::{Dealer, SUBMISSION_WAIT, WARNING_TICK};
    use crate::config::GameConfig;
    use crate::game::seat::{InvalidReason, Verdict};
    use crate::model::{Card, PlayerId, Slot};
    use crate::oracle::SetOracle;
    use crate::sync::Wait;
    use crate::view::NullView;
    use std::collections::BTreeSet;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::{Duration, Instant};

    /// Oracle with a fixed answer that counts how often it was asked.
    struct Scripted {
        legal: AtomicBool,
        sets_left: AtomicBool,
        tests: AtomicUsize,
    }

    impl Scripted {
        fn new(legal: bool) -> Arc<Self> {
            Arc::new(Self {
                legal: AtomicBool::new(legal),
                sets_left: AtomicBool::new(true),
                tests: AtomicUsize::new(0),
            })
        }
    }

    impl SetOracle for Scripted {
        fn test_set(&self, _cards: &[Card]) -> bool {
            self.tests.fetch_add(1, Ordering::SeqCst);
            self.legal.load(Ordering::SeqCst)
        }

        fn find_sets(&self, cards: &[Card], _cap: usize) -> Vec<Vec<Card>> {
            if self.sets_left.load(Ordering::SeqCst) && cards.len() >= 3 {
                vec![cards[..3].to_vec()]
            } else {
                Vec::new()
            }
        }
    }

    fn dealer(players: usize, oracle: Arc<Scripted>) -> Dealer {
        let config = GameConfig {
            human: vec![true; players],
            seed: Some(7),
            turn_timeout: Duration::from_secs(60),
            ..GameConfig::default()
        };
        Dealer::new(config, oracle, Arc::new(NullView)).expect("valid config")
    }

    /// Places tokens the way a participant thread would.
    fn hold(dealer: &Dealer, player: usize, slots: &[Slot]) {
        let seat = dealer.seat(PlayerId::new(player)).unwrap();
        for &slot in slots {
            let mut guard = dealer.table.lock_slot(slot).unwrap();
            guard.place_token(seat.id());
            seat.lock_tokens().push(slot);
        }
    }

    fn submit(dealer: &Dealer, player: usize) {
        assert!(dealer.link.submit(PlayerId::new(player)));
    }

    fn verdict(dealer: &Dealer, player: usize) -> Option<Verdict> {
        dealer
            .seat(PlayerId::new(player))
            .unwrap()
            .inbox
            .take(Wait::Poll)
    }

    fn assert_tokens_agree(dealer: &Dealer) {
        for seat in &dealer.seats {
            let held = seat.tokens();
            let unique: BTreeSet<Slot> = held.iter().copied().collect();
            assert_eq!(unique.len(), held.len(), "duplicate tokens");
            assert!(held.len() <= dealer.config.feature_size);
            for slot in 0..dealer.table.size() {
                assert_eq!(
                    dealer.table.tokens_at(slot).contains(&seat.id()),
                    held.contains(&slot),
                    "{} disagrees on slot {slot}",
                    seat.id()
                );
            }
        }
    }

    fn assert_cards_conserved(dealer: &Dealer) {
        let mut all: Vec<Card> = dealer.deck.cards().to_vec();
        all.extend(dealer.table.cards_on_table().into_iter().map(|(_, c)| c));
        let unique: BTreeSet<Card> = all.iter().copied().collect();
        assert_eq!(unique.len(), all.len(), "card dealt twice");
        assert_eq!(all.len() + dealer.discarded, dealer.config.deck_size);
    }

    #[test]
    fn first_round_fills_every_slot() {
        let mut dealer = dealer(1, Scripted::new(true));
        dealer.begin_round();
        assert_eq!(dealer.table.count_cards(), 12);
        assert_eq!(dealer.deck.len(), 69);
        assert_cards_conserved(&dealer);
    }

    #[test]
    fn valid_set_scores_and_clears_slots() {
        let oracle = Scripted::new(true);
        let mut dealer = dealer(1, Arc::clone(&oracle));
        dealer.begin_round();
        hold(&dealer, 0, &[0, 1, 2]);
        submit(&dealer, 0);

        dealer.sleep_until_woken_or_timeout();
        assert_eq!(verdict(&dealer, 0), Some(Verdict::Point));
        assert_eq!(oracle.tests.load(Ordering::SeqCst), 1);
        assert!(dealer.seats[0].tokens().is_empty());
        assert_eq!(dealer.pending_removal, Some(vec![0, 1, 2]));

        dealer.remove_pending_cards();
        assert_eq!(dealer.table.count_cards(), 9);
        assert!(dealer.link.is_frozen(1));
        dealer.place_cards_on_table();
        assert_eq!(dealer.table.count_cards(), 12);
        assert_eq!(dealer.sets_collected, 1);
        assert_tokens_agree(&dealer);
        assert_cards_conserved(&dealer);
    }

    #[test]
    fn invalid_set_penalizes_and_keeps_tokens() {
        let mut dealer = dealer(1, Scripted::new(false));
        dealer.begin_round();
        let before: Vec<_> = dealer.table.cards_on_table();
        hold(&dealer, 0, &[3, 4, 5]);
        submit(&dealer, 0);
        let deadline = dealer.reshuffle_deadline;

        dealer.sleep_until_woken_or_timeout();
        dealer.remove_pending_cards();

        assert_eq!(verdict(&dealer, 0), Some(Verdict::Penalty));
        assert!(dealer.seats[0].is_serving());
        assert_eq!(dealer.seats[0].tokens(), vec![3, 4, 5]);
        assert_eq!(dealer.table.cards_on_table(), before);
        assert_eq!(dealer.reshuffle_deadline, deadline);
        assert_tokens_agree(&dealer);
    }

    #[test]
    fn overlapping_candidate_is_invalidated_and_pruned() {
        let mut dealer = dealer(2, Scripted::new(true));
        dealer.begin_round();
        hold(&dealer, 0, &[0, 1, 2]);
        submit(&dealer, 0);
        hold(&dealer, 1, &[2, 7, 8]);
        submit(&dealer, 1);

        dealer.sleep_until_woken_or_timeout();
        assert_eq!(verdict(&dealer, 0), Some(Verdict::Point));
        dealer.remove_pending_cards();

        assert_eq!(
            verdict(&dealer, 1),
            Some(Verdict::Invalidated(InvalidReason::CardsRemoved))
        );
        assert_eq!(dealer.seats[1].tokens(), vec![7, 8]);
        assert!(dealer.link.submissions.is_empty());
        assert_tokens_agree(&dealer);
    }

    #[test]
    fn candidate_on_empty_slots_skips_the_oracle() {
        let oracle = Scripted::new(true);
        let dealer_config = GameConfig {
            human: vec![true],
            ..GameConfig::default()
        };
        let mut dealer = Dealer::new(dealer_config, oracle.clone(), Arc::new(NullView)).unwrap();
        hold(&dealer, 0, &[0, 1, 2]);
        submit(&dealer, 0);

        dealer.sleep_until_woken_or_timeout();

        assert_eq!(
            verdict(&dealer, 0),
            Some(Verdict::Invalidated(InvalidReason::Stale))
        );
        assert_eq!(oracle.tests.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn short_candidate_is_stale() {
        let oracle = Scripted::new(true);
        let mut dealer = dealer(1, Arc::clone(&oracle));
        dealer.begin_round();
        hold(&dealer, 0, &[0, 1]);
        submit(&dealer, 0);
        dealer.sleep_until_woken_or_timeout();
        assert_eq!(
            verdict(&dealer, 0),
            Some(Verdict::Invalidated(InvalidReason::Stale))
        );
        assert_eq!(oracle.tests.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn round_end_returns_every_card_and_invalidates_queue() {
        let mut dealer = dealer(2, Scripted::new(true));
        dealer.begin_round();
        hold(&dealer, 0, &[4, 5, 6]);
        submit(&dealer, 0);
        hold(&dealer, 1, &[9]);

        dealer.link.set_updating(true);
        dealer.clear_table();
        assert_eq!(dealer.table.count_cards(), 0);
        assert_eq!(dealer.deck.len(), 81);
        assert!(dealer.seats.iter().all(|seat| seat.tokens().is_empty()));
        assert_tokens_agree(&dealer);

        dealer.begin_round();
        assert_eq!(
            verdict(&dealer, 0),
            Some(Verdict::Invalidated(InvalidReason::RoundOver))
        );
        assert_eq!(verdict(&dealer, 1), None);
        assert!(dealer.link.submissions.is_empty());
        assert_eq!(dealer.table.count_cards(), 12);
        assert_eq!(dealer.rounds, 2);
        assert_cards_conserved(&dealer);
    }

    #[test]
    fn begin_round_clears_queued_actions() {
        let mut dealer = dealer(1, Scripted::new(true));
        dealer.begin_round();
        dealer.link.set_updating(false);
        let keys = dealer.keypad(PlayerId::new(0)).unwrap();
        assert!(keys.key_pressed(3));
        assert_eq!(keys.queued_actions(), 1);
        dealer.begin_round();
        assert_eq!(keys.queued_actions(), 0);
    }

    #[test]
    fn exhausted_oracle_finishes_the_game() {
        let oracle = Scripted::new(true);
        let dealer = dealer(2, Arc::clone(&oracle));
        assert!(!dealer.should_finish());
        oracle.sets_left.store(false, Ordering::SeqCst);
        assert!(dealer.should_finish());
    }

    #[test]
    fn terminator_flags_the_dealer() {
        let dealer = dealer(1, Scripted::new(true));
        let terminator = dealer.terminator();
        assert!(!terminator.is_requested());
        terminator.request();
        assert!(dealer.should_finish());
    }

    #[test]
    fn winners_share_the_top_score() {
        let dealer = dealer(3, Scripted::new(true));
        dealer.seats[0].add_point();
        dealer.seats[2].add_point();
        let outcome = dealer.announce_winners();
        assert_eq!(outcome.winners, vec![PlayerId::new(0), PlayerId::new(2)]);
    }

    #[test]
    fn wait_budget_never_passes_the_deadline() {
        let mut dealer = dealer(1, Scripted::new(true));
        dealer.config.turn_timeout_warning = Duration::from_secs(5);
        let now = Instant::now();

        dealer.reshuffle_deadline = now + Duration::from_secs(30);
        assert_eq!(dealer.wait_budget(now), SUBMISSION_WAIT);
        dealer.reshuffle_deadline = now + Duration::from_secs(4);
        assert_eq!(dealer.wait_budget(now), WARNING_TICK);
        dealer.reshuffle_deadline = now + Duration::from_millis(3);
        assert_eq!(dealer.wait_budget(now), Duration::from_millis(3));
        dealer.reshuffle_deadline = now;
        assert_eq!(dealer.wait_budget(now + Duration::from_millis(1)), Duration::ZERO);
    }

    #[test]
    fn warning_window_sleep_ends_at_the_deadline() {
        let mut dealer = dealer(1, Scripted::new(true));
        dealer.begin_round();
        dealer.config.turn_timeout_warning = Duration::from_secs(5);
        let start = Instant::now();
        dealer.reshuffle_deadline = start + Duration::from_millis(3);

        dealer.sleep_until_woken_or_timeout();

        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(3), "woke early: {elapsed:?}");
        assert!(elapsed < WARNING_TICK, "slept past the deadline: {elapsed:?}");
        assert!(dealer.link.submissions.is_empty());
    }
}
