use std::fs::File;
use std::io::{self, Stdout, stdout};
use std::time::Instant;

use anyhow::{Context, Result};
use crossterm::{cursor, event, execute, terminal};
use flappy_tick::audio::{CuePlayer, Silent, Sounds};
use flappy_tick::input::{Command, map_event};
use flappy_tick::render::{self, PixelBuf};
use flappy_tick::{Config, Game};
use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Raw mode, alternate screen and mouse capture for as long as it lives.
struct Terminal;

impl Terminal {
    fn enter(out: &mut Stdout) -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(
            out,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::DisableLineWrap,
            event::EnableMouseCapture,
        )?;
        Ok(Self)
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            event::DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show,
            terminal::EnableLineWrap,
        );
        let _ = terminal::disable_raw_mode();
    }
}

fn init_logging(config: &Config) -> Result<()> {
    let Some(path) = &config.log_file else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("cannot open log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn open_player(config: &Config) -> Box<dyn CuePlayer> {
    if config.mute {
        info!("audio muted");
        return Box::new(Silent);
    }
    match Sounds::open() {
        Some(sounds) => Box::new(sounds),
        None => Box::new(Silent),
    }
}

fn main() -> Result<()> {
    let config = Config::from_env().context("invalid configuration")?;
    init_logging(&config)?;

    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut game = Game::new(config.rules.clone(), rng);
    let mut player = open_player(&config);

    let mut out = stdout();
    let _terminal = Terminal::enter(&mut out).context("cannot set up terminal")?;

    let mut size = terminal::size()?;
    let mut buf = PixelBuf::for_terminal(size.0, size.1);
    let mut last = Instant::now();

    loop {
        // Input
        while event::poll(std::time::Duration::ZERO)? {
            let ev = event::read()?;
            match map_event(&ev, game.snapshot().status, game.rules(), size) {
                Command::Quit => {
                    info!("quit with score {}", game.snapshot().score);
                    return Ok(());
                }
                Command::Jump => {
                    for cue in game.jump() {
                        player.play(cue);
                    }
                }
                Command::Reset => {
                    if game.reset() {
                        last = Instant::now();
                    }
                }
                Command::Resize(cols, rows) => {
                    size = (cols, rows);
                    buf.resize(cols, rows);
                }
                Command::None => {}
            }
        }

        // Update
        let now = Instant::now();
        for cue in game.advance(now - last) {
            player.play(cue);
        }
        last = now;

        // Render
        render::draw(&mut buf, &game.snapshot(), game.rules());
        buf.present(&mut out)?;

        // Wait for the next tick, waking early on input
        event::poll(game.until_next_tick())?;
    }
}
