use std::io::{self, BufRead};

use bevy::{app::AppExit, prelude::*};
use tracing::{debug, info};

use crate::snake::{Direction, Game, TickOutcome};

use self::{
    events::{FoodAteEvent, GameOverEvent, GameTick, KeyInputEvent},
    resources::{BoardFrame, SessionOutcome},
};

#[derive(SystemLabel, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SnakeSystem {
    Input,
    Play,
}

/// Drives a [`Game`] from key events. The game itself must be inserted as a
/// non-send resource before the app runs.
pub struct SnakePlugin;

impl Plugin for SnakePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(BoardFrame::default())
            .insert_resource(SessionOutcome::default())
            .add_event::<KeyInputEvent>()
            .add_event::<GameTick>()
            .add_event::<GameOverEvent>()
            .add_event::<FoodAteEvent>()
            .add_startup_system(draw_board)
            .add_system(change_direction.label(SnakeSystem::Input))
            .add_system(play.label(SnakeSystem::Play).after(SnakeSystem::Input))
            .add_system(game_over.after(SnakeSystem::Play));
    }
}

fn draw_board(game: NonSend<Game>, mut frame: ResMut<BoardFrame>) {
    frame.0 = game.board().to_string();
}

/// Maps an input line to a direction. Anything but a single movement key
/// ends the session.
fn parse_key(line: &str) -> Option<Direction> {
    let mut chars = line.trim().chars();
    match (chars.next(), chars.next()) {
        (Some(key), None) => Direction::from_key(key),
        _ => None,
    }
}

fn change_direction(
    mut key_input_events: EventReader<KeyInputEvent>,
    mut tick_event_writer: EventWriter<GameTick>,
    mut exit_event_writer: EventWriter<AppExit>,
) {
    for KeyInputEvent(line) in key_input_events.iter() {
        match parse_key(line) {
            Some(direction) => tick_event_writer.send(GameTick(direction)),
            None => {
                info!("input {:?} ends the session", line);
                exit_event_writer.send(AppExit);
                return;
            }
        }
    }
}

fn play(
    mut tick_event: EventReader<GameTick>,
    mut game: NonSendMut<Game>,
    mut frame: ResMut<BoardFrame>,
    mut game_over_event_writer: EventWriter<GameOverEvent>,
    mut food_ate_event_writer: EventWriter<FoodAteEvent>,
) {
    for GameTick(direction) in tick_event.iter() {
        match game.next_tick(*direction) {
            Ok(TickOutcome::Moved { .. }) => {}
            Ok(TickOutcome::Ate { .. }) => food_ate_event_writer.send(FoodAteEvent),
            Err(error) => {
                game_over_event_writer.send(GameOverEvent { error });
                return;
            }
        }
        frame.0 = game.board().to_string();
    }
}

fn game_over(
    mut game_over_event_reader: EventReader<GameOverEvent>,
    mut outcome: ResMut<SessionOutcome>,
    mut exit_event_writer: EventWriter<AppExit>,
) {
    let error = match game_over_event_reader.iter().last() {
        None => return,
        Some(event) => event.error.clone(),
    };

    outcome.0 = Some(error);
    exit_event_writer.send(AppExit);
}

/// Blocks until a line arrives on stdin. End of input reads as an empty
/// line, which ends the session.
pub fn read_stdin(
    mut exit_event_reader: EventReader<AppExit>,
    mut key_input_event_writer: EventWriter<KeyInputEvent>,
) {
    if exit_event_reader.iter().next().is_some() {
        return;
    }

    let mut line = String::new();
    if let Err(error) = io::stdin().lock().read_line(&mut line) {
        info!("cannot read stdin: {}", error);
        line.clear();
    }
    debug!("read {:?}", line);

    key_input_event_writer.send(KeyInputEvent(line));
}

pub mod resources {
    use crate::snake::SnakeError;

    /// The latest rendering of the board.
    #[derive(Default)]
    pub struct BoardFrame(pub String);

    /// Set once the game ends on an error.
    #[derive(Default)]
    pub struct SessionOutcome(pub Option<SnakeError>);
}

pub mod events {
    use crate::snake::{Direction, SnakeError};

    /// One line typed by the player.
    pub struct KeyInputEvent(pub String);

    pub struct GameTick(pub Direction);

    pub struct GameOverEvent {
        pub error: SnakeError,
    }
    pub struct FoodAteEvent;
}
