//! BLOCKFALL - a falling-block puzzle game for the terminal

mod audio;
mod bag;
mod board;
mod game;
mod input;
mod piece;
mod score;
mod settings;
mod tetromino;
mod ui;

use audio::AudioManager;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use game::{Game, GameState};
use input::{Command, InputHandler};
use ratatui::{Terminal, backend::CrosstermBackend};
use settings::Settings;
use std::{
    io::{self, stdout},
    time::Duration,
};

/// Target frame rate
const TARGET_FPS: u64 = 60;
const FRAME_DURATION: Duration = Duration::from_micros(1_000_000 / TARGET_FPS);

fn main() -> io::Result<()> {
    // Session id for this instance, used to name the log file
    let session_id: u32 = rand::random();

    let log_dir = std::env::temp_dir().join("blockfall");
    let _ = std::fs::create_dir_all(&log_dir);
    let log_file = format!("{:08x}.log", session_id);

    let file_appender = tracing_appender::rolling::never(&log_dir, &log_file);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("blockfall=debug".parse().unwrap()),
        )
        .with_ansi(false)
        .init();

    tracing::info!(
        "blockfall starting up, session={:08x}, log={}",
        session_id,
        log_dir.join(&log_file).display()
    );

    let mut settings = Settings::load();

    // Audio is optional; the game runs silently without a device
    let mut audio = AudioManager::new();
    match &mut audio {
        Some(a) => {
            a.set_bgm_volume(settings.audio.bgm_volume as f32 / 100.0);
            a.set_sfx_volume(settings.audio.sfx_volume as f32 / 100.0);
        }
        None => tracing::warn!("no audio output device, sound disabled"),
    }

    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut settings, &mut audio);

    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;

    if let Ok(game) = &result {
        println!("Thanks for playing BLOCKFALL!");
        println!(
            "Final Score: {} | Lines: {} | Best: {}",
            game.score.points,
            game.score.lines,
            settings.high_score.max(game.score.points)
        );
    }

    result.map(|_| ())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    settings: &mut Settings,
    audio: &mut Option<AudioManager>,
) -> io::Result<Game> {
    let input = InputHandler::from_settings(settings);
    let mut game = Game::new(settings.high_score);
    let mut high_score_saved = false;

    loop {
        // Session state drives everything: gravity, highlight expiry, and
        // (below) which audio timers are allowed to exist
        game.update();

        let locked = game.take_lock_event();
        if let Some(audio) = audio {
            match game.state {
                GameState::Running if settings.audio.bgm_enabled => audio.start_bgm(),
                _ => audio.stop_bgm(),
            }
            audio.tick();
            if locked {
                audio.play_lock();
            }
        }

        // Persist the high score exactly once, on the game-over transition
        if game.state == GameState::GameOver && !high_score_saved {
            high_score_saved = true;
            if game.score.is_new_high() {
                settings.update_high_score(game.score.points);
                tracing::info!(high_score = settings.high_score, "new high score");
                if let Err(e) = settings.save() {
                    tracing::warn!("could not save settings: {}", e);
                }
            }
        }

        terminal.draw(|frame| ui::render_game(frame, &game, settings))?;

        if event::poll(FRAME_DURATION)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match input.map(key) {
                    Some(Command::Quit) => return Ok(game),
                    Some(Command::Restart) => {
                        // Restart discards the finished session wholesale
                        if game.state == GameState::GameOver {
                            game = Game::new(settings.high_score);
                            high_score_saved = false;
                            tracing::info!("session restarted");
                        }
                    }
                    Some(Command::Game(action)) => game.process_action(action),
                    None => {}
                }
            }
        }
    }
}
