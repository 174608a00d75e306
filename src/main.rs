use std::process::ExitCode;

use bevy::{app::AppExit, ecs::event::ManualEventReader, prelude::*};
use clap::Parser;
use tracing::error;

use terminal_snake::{
    configuration::{GameConfig, ReversalPolicy},
    create_app, logging,
    snake::Game,
    snake_plugin::{read_stdin, resources::SessionOutcome},
};

/// Snake on the terminal: type w/a/s/d and enter to move, anything else quits.
#[derive(Parser)]
#[command(name = "terminal_snake", version)]
struct Cli {
    /// Number of rows
    #[arg(long, default_value = "10")]
    width: usize,

    /// Number of columns
    #[arg(long, default_value = "10")]
    height: usize,

    /// Seed for snake and food placement
    #[arg(long)]
    seed: Option<u64>,

    /// What a 180 degree turn does
    #[arg(long, value_enum, default_value_t = ReversalPolicy::Collide)]
    reversal: ReversalPolicy,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.log_json);

    let config = GameConfig {
        width: cli.width,
        height: cli.height,
        seed: cli.seed,
        reversal: cli.reversal,
    };
    let game = match Game::with_config(&config) {
        Ok(game) => game,
        Err(e) => {
            error!("cannot start the game: {}", e);
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut app = create_app(game);
    // reading at the end of the frame lets the board show up before we block
    app.add_system_to_stage(CoreStage::Last, read_stdin);

    let mut exit_reader = ManualEventReader::<AppExit>::default();
    loop {
        app.update();
        let exits = app.world.resource::<Events<AppExit>>();
        if exit_reader.iter(exits).last().is_some() {
            break;
        }
    }

    match &app.world.resource::<SessionOutcome>().0 {
        None => ExitCode::SUCCESS,
        Some(e) => {
            eprintln!("Game over! {}", e);
            ExitCode::FAILURE
        }
    }
}
