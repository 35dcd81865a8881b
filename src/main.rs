//! Terminal frontend: owns the frame scheduler, keyboard capture and the
//! terminal lifecycle.  The simulation itself lives in the library and
//! only ever sees abstract key codes and the drawing capability.

use std::collections::HashMap;
use std::io::{stdout, BufWriter};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};

use space_invaders::game::{Game, Key};
use space_invaders::terminal::TerminalSurface;
use space_invaders::GameConfig;

/// Virtual surface the game renders onto; the play field is centered in it.
const SURFACE_WIDTH: f32 = 480.0;
const SURFACE_HEIGHT: f32 = 360.0;

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// the OS key-repeat rate is ≥ 15 Hz, so a window of 4 frames (≈80 ms at
/// 50 FPS) is always refreshed before expiry.
const HOLD_WINDOW: u64 = 4;

/// Map physical keys onto the game's abstract input vocabulary.
fn map_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Key::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Key::Right),
        KeyCode::Char(' ') => Some(Key::Fire),
        KeyCode::Char('p') | KeyCode::Char('P') => Some(Key::Pause),
        _ => None,
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until the player quits.
///
/// Input model: a `key_frame` map records the frame number of the last
/// press/repeat event for every recognized key.  A key entering the map
/// becomes a `key_down` to the game; leaving it (explicit release, or
/// expiry after `HOLD_WINDOW` frames of silence on terminals without
/// release events) becomes a `key_up`.  This keeps the game's pressed-key
/// set faithful on both keyboard-enhancement terminals and classic ones.
fn game_loop<W: std::io::Write>(
    game: &mut Game,
    surface: &mut TerminalSurface<W>,
    rx: &mpsc::Receiver<Event>,
) -> anyhow::Result<()> {
    let dt = game.session.config.dt();
    let frame_duration = Duration::from_secs_f32(dt);

    let mut key_frame: HashMap<Key, u64> = HashMap::new();
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            let Event::Key(KeyEvent {
                code,
                kind,
                modifiers,
                ..
            }) = ev
            else {
                continue;
            };
            match kind {
                KeyEventKind::Press | KeyEventKind::Repeat => {
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                            return Ok(());
                        }
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(());
                        }
                        _ => {}
                    }
                    if let Some(key) = map_key(code) {
                        // Newly held → forward the press; refresh otherwise.
                        if key_frame.insert(key, frame).is_none() {
                            game.key_down(key);
                        }
                    }
                }
                KeyEventKind::Release => {
                    if let Some(key) = map_key(code) {
                        if key_frame.remove(&key).is_some() {
                            game.key_up(key);
                        }
                    }
                }
            }
        }

        // ── Expire keys that stopped repeating (classic-terminal path) ────────
        let expired: Vec<Key> = key_frame
            .iter()
            .filter(|(_, &last)| frame.saturating_sub(last) > HOLD_WINDOW)
            .map(|(&key, _)| key)
            .collect();
        for key in expired {
            key_frame.remove(&key);
            game.key_up(key);
        }

        game.tick(dt, surface);
        surface.present().context("failed to present frame")?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_duration {
            thread::sleep(frame_duration - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let config = GameConfig {
        debug: std::env::args().any(|arg| arg == "--debug"),
        ..GameConfig::default()
    };

    let mut game = Game::new(config, SURFACE_WIDTH, SURFACE_HEIGHT)?;
    game.start();

    terminal::enable_raw_mode().context("failed to enable raw mode")?;
    let mut setup = stdout();
    setup
        .execute(terminal::EnterAlternateScreen)
        .context("failed to enter alternate screen")?;
    setup.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back to the
    // hold-window model.
    let keyboard_enhanced = setup
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.  The
    // loop drains the channel before every tick, so any key event delivered
    // before a tick boundary is visible to that tick's update.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let (cols, rows) = terminal::size().context("failed to query terminal size")?;
    let mut surface = TerminalSurface::new(
        BufWriter::new(stdout()),
        cols,
        rows,
        SURFACE_WIDTH,
        SURFACE_HEIGHT,
    );

    let result = game_loop(&mut game, &mut surface, &rx);

    // Always restore the terminal
    let mut teardown = stdout();
    if keyboard_enhanced {
        let _ = teardown.execute(PopKeyboardEnhancementFlags);
    }
    let _ = teardown.execute(cursor::Show);
    let _ = teardown.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}
