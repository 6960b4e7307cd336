use std::fs::File;
use std::io::{self, Stdout};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use log::{info, LevelFilter};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use simplelog::{ConfigBuilder, WriteLogger};

use gloomtrail::config::{self, GameConfig, MapConfig};
use gloomtrail::game::{Command, Game, Outcome};
use gloomtrail::input::{self, Action, INVALID_KEY_NOTICE, QUIT_CANCELED, QUIT_PROMPT};
use gloomtrail::render::Renderer;

/// Escape a procedurally generated dungeon before its keeper follows your
/// trail to you.
#[derive(Parser, Debug)]
#[command(name = "gloomtrail", version, about, long_about = None)]
struct Args {
    /// Map width in tiles
    #[arg(long, env = "GLOOMTRAIL_WIDTH", default_value_t = config::DEFAULT_MAP_W)]
    width: usize,

    /// Map height in tiles
    #[arg(long, env = "GLOOMTRAIL_HEIGHT", default_value_t = config::DEFAULT_MAP_H)]
    height: usize,

    /// Seed for a reproducible dungeon
    #[arg(long, env = "GLOOMTRAIL_SEED")]
    seed: Option<u64>,

    /// Room placement attempts
    #[arg(long, env = "GLOOMTRAIL_ROOMS", default_value_t = config::DEFAULT_MAX_ROOMS)]
    rooms: usize,

    /// Smallest room side
    #[arg(long, env = "GLOOMTRAIL_ROOM_MIN", default_value_t = config::DEFAULT_ROOM_MIN)]
    room_min: usize,

    /// Largest room side
    #[arg(long, env = "GLOOMTRAIL_ROOM_MAX", default_value_t = config::DEFAULT_ROOM_MAX)]
    room_max: usize,

    /// How far the adversary looks for your trail
    #[arg(long, env = "GLOOMTRAIL_VISION", default_value_t = config::DEFAULT_VISION_RADIUS)]
    vision: usize,

    /// Show the whole map, ignoring fog of war
    #[arg(short = 'D', long, env = "GLOOMTRAIL_DEBUG")]
    debug: bool,

    /// Write a debug log to this file
    #[arg(long, env = "GLOOMTRAIL_LOG")]
    log_file: Option<PathBuf>,
}

impl Args {
    fn game_config(&self) -> GameConfig {
        GameConfig {
            width: self.width,
            height: self.height,
            map: MapConfig {
                room_min: self.room_min,
                room_max: self.room_max,
                max_rooms: self.rooms,
                seed: self.seed,
                ..MapConfig::default()
            },
            vision_radius: self.vision,
            debug: self.debug,
            ..GameConfig::default()
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    setup_logging(args.log_file.as_ref())?;

    let config = args.game_config();
    config.validate()?;
    let mut rng = match config.map.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    let game = Game::new(&config, &mut rng)?;
    info!(
        "new {}x{} game, spawn {}, exit {}",
        config.width,
        config.height,
        game.spawn(),
        game.exit()
    );

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(Hide)?;

    let result = run(&mut stdout, game, &mut rng, config.debug);

    stdout.execute(Show)?;
    stdout.execute(LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    result
}

fn setup_logging(path: Option<&PathBuf>) -> anyhow::Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("could not create log file {}", path.display()))?;
    WriteLogger::init(
        LevelFilter::Debug,
        ConfigBuilder::new().set_target_level(LevelFilter::Error).build(),
        file,
    )?;
    Ok(())
}

fn run(
    stdout: &mut Stdout,
    mut game: Game,
    rng: &mut ChaCha8Rng,
    debug: bool,
) -> anyhow::Result<()> {
    let mut renderer = Renderer::new(debug);
    while game.outcome() == Outcome::Running {
        renderer.render(stdout, &game)?;
        let command = match input::action_for(read_key()?) {
            Action::Play(command) => command,
            Action::RequestQuit => {
                game.say(QUIT_PROMPT);
                renderer.render(stdout, &game)?;
                if input::confirms_quit(read_key()?) {
                    Command::Quit
                } else {
                    game.say(QUIT_CANCELED);
                    continue;
                }
            }
            Action::Unknown => {
                game.say(INVALID_KEY_NOTICE);
                continue;
            }
        };
        game.tick(command, rng);
    }

    renderer.render_final(stdout, &game)?;
    if game.outcome() != Outcome::Quit {
        read_key()?;
    }
    Ok(())
}

/// Blocks until a key is pressed.
fn read_key() -> io::Result<KeyCode> {
    loop {
        if let Event::Key(key) = event::read()? {
            if matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
                return Ok(key.code);
            }
        }
    }
}
