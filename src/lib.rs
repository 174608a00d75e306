use std::io::{self, Write};

use bevy::prelude::*;
use snake::Game;
use snake_plugin::{
    events::{FoodAteEvent, GameOverEvent},
    resources::BoardFrame,
    SnakePlugin, SnakeSystem,
};
use tracing::{info, warn};

pub mod configuration;
pub mod logging;
pub mod snake;
pub mod snake_plugin;

/// Terminal front end: prints every new frame to stdout and reports the
/// end of the game.
pub struct MainPlugin;
impl Plugin for MainPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugin(SnakePlugin)
            .add_system(print_frame.after(SnakeSystem::Play))
            .add_system(show_game_over.after(SnakeSystem::Play))
            .add_system(log_food_eaten.after(SnakeSystem::Play));
    }
}

/// A headless app running `game`. Nothing feeds it input yet: add
/// [`snake_plugin::read_stdin`] or send key events directly.
pub fn create_app(game: Game) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_non_send_resource(game)
        .add_plugin(MainPlugin);
    app
}

fn print_frame(frame: Res<BoardFrame>) {
    if !frame.is_changed() {
        return;
    }

    let mut stdout = io::stdout().lock();
    if let Err(error) = stdout
        .write_all(frame.0.as_bytes())
        .and_then(|_| stdout.flush())
    {
        warn!("cannot print the board: {}", error);
    }
}

fn show_game_over(mut game_over_event_reader: EventReader<GameOverEvent>) {
    for event in game_over_event_reader.iter() {
        warn!("Game over! {}", event.error);
    }
}

fn log_food_eaten(mut food_ate_event_reader: EventReader<FoodAteEvent>, game: NonSend<Game>) {
    if food_ate_event_reader.iter().count() == 0 {
        return;
    }

    let length = game.board().occupied_count();
    info!("food eaten, snake is {} long", length);
}
