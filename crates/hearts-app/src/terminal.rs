use hearts_app::events::{CompletedTrick, GameEvents};
use hearts_app::projection::TableView;
use hearts_app::runner::HUMAN_SEAT;
use hearts_core::game::state::Phase;
use hearts_core::model::player::PlayerPosition;
use hearts_core::model::score::Winner;
use hearts_core::model::trick::Play;

/// Prints plays and tricks as the runner reports them.
pub struct TerminalEvents {
    pub names: [String; 4],
}

impl TerminalEvents {
    fn name(&self, seat: PlayerPosition) -> &str {
        &self.names[seat.index()]
    }
}

impl GameEvents for TerminalEvents {
    fn on_play(&mut self, play: &Play) {
        println!("  {:>8} plays {}", self.name(play.seat), play.card);
    }

    fn on_trick_complete(&mut self, trick: &CompletedTrick) {
        match trick.points {
            0 => println!("  {} takes the trick", self.name(trick.winner)),
            1 => println!("  {} takes the trick (1 point)", self.name(trick.winner)),
            points => println!(
                "  {} takes the trick ({points} points)",
                self.name(trick.winner)
            ),
        }
    }

    fn on_done(&mut self, view: &TableView, round_ended: bool) {
        if round_ended {
            println!();
            println!("Round over. Scores:");
            for seat in &view.seats {
                println!("  {:>8} {:>4}", seat.name, seat.score);
            }
        }
        if !view.game_over {
            render(view);
        }
    }
}

pub fn render(view: &TableView) {
    println!();
    println!(
        "Round {} | passing {} | hearts {}",
        view.round,
        view.pass_direction.as_str(),
        if view.hearts_broken { "broken" } else { "unbroken" }
    );
    for (index, seat) in view.seats.iter().enumerate() {
        let marker = if view.whose_turn.index() == index && view.phase == Phase::Playing {
            '>'
        } else {
            ' '
        };
        println!(
            "{marker} {:>8}  score {:>3}  cards {:>2}",
            seat.name, seat.score, seat.card_count
        );
    }
    if !view.current_trick.is_empty() {
        let trick: Vec<String> = view
            .current_trick
            .iter()
            .map(|card| format!("{} {}", view.seats[card.seat.index()].name, card.card))
            .collect();
        println!("Trick: {}", trick.join(", "));
    }
    println!("Your hand: {}", view.human_hand.join(" "));
    match view.phase {
        Phase::Passing => println!(
            "Choose three cards to pass {}.",
            view.pass_direction.as_str()
        ),
        Phase::Playing if view.whose_turn == HUMAN_SEAT => {
            println!("Legal: {}", view.legal_plays.join(" "));
        }
        Phase::Playing => {}
    }
}

pub fn announce_result(view: &TableView, moon_shots: u32) {
    println!();
    println!("Game over.");
    for seat in &view.seats {
        println!("  {:>8} {:>4}", seat.name, seat.score);
    }
    match view.winner {
        Some(Winner::Seat(seat)) => println!("Winner: {}", view.seats[seat.index()].name),
        Some(Winner::Tie) | None => println!("No single winner: the lowest score is shared."),
    }
    if moon_shots > 0 {
        println!("You shot the moon {moon_shots} time(s).");
    }
}
