use crate::projection::TableView;
use hearts_core::model::player::PlayerPosition;
use hearts_core::model::trick::Play;
use serde::{Deserialize, Serialize};

/// A trick that just resolved, as it looked with all four cards down.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedTrick {
    pub plays: Vec<Play>,
    pub winner: PlayerPosition,
    pub points: u32,
}

/// Observer for the intermediate steps of a runner call.
///
/// Every call reports its plays in order, each trick right after its fourth
/// card, and finishes with exactly one `on_done`.
pub trait GameEvents {
    fn on_play(&mut self, _play: &Play) {}

    fn on_trick_complete(&mut self, _trick: &CompletedTrick) {}

    fn on_done(&mut self, _view: &TableView, _round_ended: bool) {}
}

/// Sink that ignores everything.
pub struct NoEvents;

impl GameEvents for NoEvents {}

/// Records every callback in order; handy for hosts that replay events later.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RecordedEvents {
    pub log: Vec<RecordedEvent>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecordedEvent {
    Play(Play),
    TrickComplete(CompletedTrick),
    Done { view: Box<TableView>, round_ended: bool },
}

impl GameEvents for RecordedEvents {
    fn on_play(&mut self, play: &Play) {
        self.log.push(RecordedEvent::Play(*play));
    }

    fn on_trick_complete(&mut self, trick: &CompletedTrick) {
        self.log.push(RecordedEvent::TrickComplete(trick.clone()));
    }

    fn on_done(&mut self, view: &TableView, round_ended: bool) {
        self.log.push(RecordedEvent::Done {
            view: Box::new(view.clone()),
            round_ended,
        });
    }
}
