use std::fs::File;
use std::io::{self, Stdout};
use std::sync::Mutex;

use anyhow::{Context, Result};
use crossterm::terminal;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::info;
use tracing_subscriber::EnvFilter;

use pacman_grid::config::Config;
use pacman_grid::game::{Ending, GameState};
use pacman_grid::render::Layout;
use pacman_grid::runner::{FrameClock, GameContext};
use pacman_grid::terminal::{enter_screen, leave_screen, TerminalCanvas, TerminalInput};

const LOG_ENV: &str = "PACMAN_LOG";

fn main() -> Result<()> {
    init_tracing()?;
    let config = Config::from_env();
    config.validate().context("invalid configuration")?;

    let mut stdout = io::stdout();
    let result = enter_screen(&mut stdout, terminal::enable_raw_mode)
        .context("preparing the terminal")
        .and_then(|()| run(&config));
    let restored = leave_screen(&mut stdout, terminal::disable_raw_mode);

    let (ending, score) = result?;
    restored.context("restoring the terminal")?;
    match ending {
        Ending::Caught { .. } => println!("GAME OVER - Final Score: {score}"),
        Ending::Cleared => println!("Board cleared - Final Score: {score}"),
        Ending::Quit => println!("Final Score: {score}"),
    }
    Ok(())
}

fn run(config: &Config) -> Result<(Ending, u32)> {
    let seed = config.seed.unwrap_or_else(|| rand::thread_rng().gen());
    info!(seed, "seeding game");
    let mut rng = SmallRng::seed_from_u64(seed);

    let mut game = GameState::new(config, &mut rng)?;
    let canvas: TerminalCanvas<Stdout> =
        TerminalCanvas::new(io::stdout(), config.rows(), config.cols(), config.cell_size);
    let mut ctx = GameContext::new(
        canvas,
        TerminalInput,
        FrameClock::new(config.tick_period()),
        Layout::new(config.cell_size),
    );
    let ending = ctx.run(&mut game, &mut rng)?;
    Ok((ending, game.score))
}

fn init_tracing() -> Result<()> {
    let Some(path) = std::env::var_os(LOG_ENV).filter(|p| !p.is_empty()) else {
        return Ok(());
    };
    let file = File::create(&path)
        .with_context(|| format!("opening log file {}", path.to_string_lossy()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
    Ok(())
}
