use crate::events::{CompletedTrick, GameEvents, NoEvents};
use crate::projection::TableView;
use hearts_bot::bot::UnseenTracker;
use hearts_bot::policy::{Difficulty, PlayContext, Strategies, create_strategies};
use hearts_core::error::GameError;
use hearts_core::game::state::{GameState, Phase};
use hearts_core::game::transitions::{
    apply_passes, apply_play, apply_round_scoring, deal_shuffled_round, new_game,
};
use hearts_core::model::card::Card;
use hearts_core::model::player::PlayerPosition;
use hearts_core::model::score::moon_shooter;
use hearts_core::model::trick::Play;
use hearts_core::rules::{is_valid_pass, trick_points};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use tracing::{Level, event};

/// The seat driven by the person at the keyboard.
pub const HUMAN_SEAT: PlayerPosition = PlayerPosition::North;

pub const DEFAULT_SEAT_NAMES: [&str; 4] = ["You", "AI 1", "AI 2", "AI 3"];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RunnerError {
    #[error(transparent)]
    Game(#[from] GameError),
    #[error("the game is over")]
    GameOver,
}

/// Drives one game: the human at [`HUMAN_SEAT`] against three computer seats
/// sharing one difficulty.
pub struct GameRunner {
    pub(crate) state: GameState,
    pub(crate) seat_names: [String; 4],
    pub(crate) difficulty: Difficulty,
    pub(crate) worlds: Option<usize>,
    pub(crate) strategies: Strategies,
    pub(crate) rng: ChaCha8Rng,
    pub(crate) tracker: UnseenTracker,
    pub(crate) human_moon_shots: u32,
    last_play_events: Vec<Play>,
    last_round_ended: bool,
}

impl GameRunner {
    /// Shuffles and deals round one. Missing seat names fall back to the
    /// defaults; extra names are ignored.
    pub fn new_game(
        difficulty: Difficulty,
        worlds: Option<usize>,
        seat_names: Option<Vec<String>>,
        mut rng: ChaCha8Rng,
    ) -> Result<Self, RunnerError> {
        let state = new_game(&mut rng)?;
        let mut tracker = UnseenTracker::new();
        tracker.reset_for_round(state.round());
        Ok(Self::assemble(
            state,
            resolve_names(seat_names),
            difficulty,
            worlds,
            rng,
            tracker,
            0,
        ))
    }

    pub(crate) fn assemble(
        state: GameState,
        seat_names: [String; 4],
        difficulty: Difficulty,
        worlds: Option<usize>,
        rng: ChaCha8Rng,
        tracker: UnseenTracker,
        human_moon_shots: u32,
    ) -> Self {
        Self {
            state,
            seat_names,
            difficulty,
            worlds,
            strategies: create_strategies(difficulty, worlds),
            rng,
            tracker,
            human_moon_shots,
            last_play_events: Vec::new(),
            last_round_ended: false,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn worlds(&self) -> Option<usize> {
        self.worlds
    }

    pub fn seat_names(&self) -> &[String; 4] {
        &self.seat_names
    }

    /// Rounds in which the human took all 26 points.
    pub fn human_moon_shots(&self) -> u32 {
        self.human_moon_shots
    }

    /// Every card played by the last `submit_play` or `advance`, in order.
    pub fn last_play_events(&self) -> &[Play] {
        &self.last_play_events
    }

    /// Whether the last call finished a round.
    pub fn last_round_ended(&self) -> bool {
        self.last_round_ended
    }

    pub fn view(&self) -> TableView {
        TableView::project(&self.state, HUMAN_SEAT, &self.seat_names)
    }

    /// Takes the human's three cards, picks the computer passes, exchanges
    /// them all and runs computer turns until the human is on lead or follows.
    pub fn submit_pass(
        &mut self,
        cards: &[Card],
        events: Option<&mut dyn GameEvents>,
    ) -> Result<(), RunnerError> {
        self.ensure_live()?;
        if self.state.phase() != Phase::Passing {
            return Err(GameError::WrongPhase {
                expected: Phase::Passing.as_str(),
                actual: self.state.phase().as_str(),
            }
            .into());
        }
        let hand = self.state.hand(HUMAN_SEAT);
        if !is_valid_pass(hand, cards) {
            return Err(GameError::InvalidPass { seat: HUMAN_SEAT }.into());
        }

        let direction = self.state.pass_direction();
        let mut passes = [[cards[0], cards[1], cards[2]]; 4];
        for seat in PlayerPosition::LOOP {
            if seat == HUMAN_SEAT {
                continue;
            }
            passes[seat.index()] = self.strategies.pass.choose_pass(
                seat,
                self.state.hand(seat),
                direction,
                &mut self.rng,
            );
        }
        self.state = apply_passes(&self.state, &passes)?;
        event!(
            target: "hearts_app::runner",
            Level::DEBUG,
            round = self.state.round(),
            direction = direction.as_str(),
            "passes exchanged"
        );

        self.begin_call();
        self.run_to_decision(events)
    }

    /// Plays the human's card, then computer turns until the human is on
    /// turn again or the round ends.
    pub fn submit_play(
        &mut self,
        card: Card,
        events: Option<&mut dyn GameEvents>,
    ) -> Result<(), RunnerError> {
        self.ensure_live()?;
        let mut silent = NoEvents;
        let sink: &mut dyn GameEvents = match events {
            Some(sink) => sink,
            None => &mut silent,
        };

        let next = apply_play(&self.state, HUMAN_SEAT, card)?;

        self.begin_call();
        self.commit_play(HUMAN_SEAT, card, next, sink)?;
        self.run_to_decision(Some(sink))
    }

    /// Runs computer turns without human input, e.g. when a computer seat
    /// holds the two of clubs after the deal.
    pub fn advance(&mut self, events: Option<&mut dyn GameEvents>) -> Result<(), RunnerError> {
        self.begin_call();
        self.run_to_decision(events)
    }

    fn ensure_live(&self) -> Result<(), RunnerError> {
        if self.state.is_game_over() {
            Err(RunnerError::GameOver)
        } else {
            Ok(())
        }
    }

    fn begin_call(&mut self) {
        self.last_play_events.clear();
        self.last_round_ended = false;
    }

    fn run_to_decision(&mut self, events: Option<&mut dyn GameEvents>) -> Result<(), RunnerError> {
        let mut silent = NoEvents;
        let sink: &mut dyn GameEvents = match events {
            Some(sink) => sink,
            None => &mut silent,
        };

        while !self.last_round_ended
            && !self.state.is_game_over()
            && self.state.phase() == Phase::Playing
            && self.state.whose_turn() != HUMAN_SEAT
        {
            let seat = self.state.whose_turn();
            let legal = self.state.legal_plays_for(seat);
            let ctx = PlayContext {
                state: &self.state,
                seat,
                legal: &legal,
                tracker: &self.tracker,
            };
            let card = self.strategies.play.choose_play(&ctx, &mut self.rng);
            let next = apply_play(&self.state, seat, card)?;
            self.commit_play(seat, card, next, sink)?;
        }

        sink.on_done(&self.view(), self.last_round_ended);
        Ok(())
    }

    /// Records a validated play and handles trick and round completion.
    fn commit_play(
        &mut self,
        seat: PlayerPosition,
        card: Card,
        next: GameState,
        sink: &mut dyn GameEvents,
    ) -> Result<(), RunnerError> {
        let finished_trick = (self.state.current_trick().len() == 3)
            .then(|| self.state.current_trick().with_play(seat, card));
        self.tracker.observe_play(&self.state, seat, card);
        self.state = next;

        let play = Play::new(seat, card);
        self.last_play_events.push(play);
        sink.on_play(&play);

        if let Some(trick) = finished_trick {
            let completed = CompletedTrick {
                points: trick_points(&trick),
                plays: trick.plays().to_vec(),
                winner: self.state.whose_turn(),
            };
            sink.on_trick_complete(&completed);
        }

        if self.state.is_round_complete() {
            self.finish_round()?;
        }
        Ok(())
    }

    fn finish_round(&mut self) -> Result<(), RunnerError> {
        let round_scores = *self.state.round_scores();
        let shooter = moon_shooter(&round_scores);
        if shooter == Some(HUMAN_SEAT) {
            self.human_moon_shots += 1;
        }
        self.state = apply_round_scoring(&self.state);
        self.last_round_ended = true;
        event!(
            target: "hearts_app::runner",
            Level::INFO,
            round = self.state.round(),
            round_scores = ?round_scores,
            totals = ?self.state.scores(),
            moon = ?shooter,
            "round scored"
        );

        if self.state.is_game_over() {
            event!(
                target: "hearts_app::runner",
                Level::INFO,
                winner = ?self.state.winner(),
                totals = ?self.state.scores(),
                "game over"
            );
            return Ok(());
        }

        let round = self.state.round() + 1;
        self.state = deal_shuffled_round(*self.state.scores(), round, &mut self.rng)?;
        self.tracker.reset_for_round(round);
        Ok(())
    }
}

fn resolve_names(names: Option<Vec<String>>) -> [String; 4] {
    let mut given = names.unwrap_or_default().into_iter();
    DEFAULT_SEAT_NAMES.map(|fallback| given.next().unwrap_or_else(|| fallback.to_string()))
}
