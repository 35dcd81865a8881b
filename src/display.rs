//! Rendering layer.
//!
//! The simulation draws against the abstract [`Surface`] capability —
//! clear, filled rectangle, stroked rectangle and text are the only
//! operations it needs.  No game logic is performed here; this module
//! only translates the current state into drawing commands.

use crate::entities::{Bomb, Invader, Rect, Rocket, Ship};
use crate::game::{Game, Session};
use crate::play::PlayState;
use crate::state::{LevelIntroState, State};

/// Flat RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// Text styling understood by every surface.  Terminal cells quantize the
/// font size away; alignment is always honored.
#[derive(Clone, Copy, Debug)]
pub struct TextStyle {
    pub color: Color,
    pub size: f32,
    pub align: TextAlign,
}

/// Abstract 2D drawing capability the core renders against.
pub trait Surface {
    fn clear(&mut self);
    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn stroke_rect(&mut self, rect: Rect, color: Color);
    fn text(&mut self, text: &str, x: f32, y: f32, style: &TextStyle);
}

// ── Palette ───────────────────────────────────────────────────────────────────

const C_TEXT: Color = Color::rgb(0xff, 0xff, 0xff);
const C_SHIP: Color = Color::rgb(0x99, 0x99, 0x99);
const C_INVADER: Color = Color::rgb(0x00, 0x66, 0x00);
const C_BOMB: Color = Color::rgb(0xff, 0x55, 0x55);
const C_ROCKET: Color = Color::rgb(0xff, 0x00, 0x00);
const C_DEBUG: Color = Color::rgb(0xff, 0x00, 0x00);

fn style(size: f32, align: TextAlign) -> TextStyle {
    TextStyle {
        color: C_TEXT,
        size,
        align,
    }
}

// ── Frame entry point ─────────────────────────────────────────────────────────

/// Draw one frame: the top-of-stack state owns the whole surface.
pub fn render<S: Surface>(game: &Game, surface: &mut S) {
    surface.clear();
    match game.current_state() {
        Some(State::Welcome(_)) => draw_welcome(&game.session, surface),
        Some(State::LevelIntro(intro)) => draw_level_intro(intro, &game.session, surface),
        Some(State::Play(play)) => draw_play(play, &game.session, surface),
        Some(State::Pause(_)) => draw_pause(&game.session, surface),
        Some(State::GameOver(_)) => draw_game_over(&game.session, surface),
        None => {}
    }
}

// ── Flow states ───────────────────────────────────────────────────────────────

fn draw_welcome<S: Surface>(session: &Session, surface: &mut S) {
    let cx = session.width / 2.0;
    let cy = session.height / 2.0;
    surface.text(
        "Space Invaders",
        cx,
        cy - 40.0,
        &style(30.0, TextAlign::Center),
    );
    surface.text(
        "Press 'Space' or touch to start.",
        cx,
        cy,
        &style(16.0, TextAlign::Center),
    );
}

fn draw_level_intro<S: Surface>(intro: &LevelIntroState, session: &Session, surface: &mut S) {
    let cx = session.width / 2.0;
    let cy = session.height / 2.0;
    surface.text(
        &format!("Level {}", intro.level),
        cx,
        cy,
        &style(36.0, TextAlign::Center),
    );
    surface.text(
        &format!("Ready in {}", intro.label),
        cx,
        cy + 36.0,
        &style(24.0, TextAlign::Center),
    );
}

fn draw_pause<S: Surface>(session: &Session, surface: &mut S) {
    surface.text(
        "Paused",
        session.width / 2.0,
        session.height / 2.0,
        &style(14.0, TextAlign::Center),
    );
}

fn draw_game_over<S: Surface>(session: &Session, surface: &mut S) {
    let cx = session.width / 2.0;
    let cy = session.height / 2.0;
    surface.text("Game Over!", cx, cy - 40.0, &style(30.0, TextAlign::Center));
    surface.text(
        &format!(
            "You scored {} and got to level {}",
            session.score, session.level
        ),
        cx,
        cy,
        &style(16.0, TextAlign::Center),
    );
    surface.text(
        "Press 'Space' to play again.",
        cx,
        cy + 40.0,
        &style(16.0, TextAlign::Center),
    );
}

// ── Play state ────────────────────────────────────────────────────────────────

fn draw_play<S: Surface>(play: &PlayState, session: &Session, surface: &mut S) {
    draw_ship(&play.ship, surface);
    for invader in &play.invaders {
        draw_invader(invader, surface);
    }
    for bomb in &play.bombs {
        draw_bomb(bomb, surface);
    }
    for rocket in &play.rockets {
        draw_rocket(rocket, surface);
    }
    draw_hud(session, surface);

    if session.config.debug {
        surface.stroke_rect(
            Rect::new(0.0, 0.0, session.width, session.height),
            C_DEBUG,
        );
        surface.stroke_rect(session.bounds, C_DEBUG);
    }
}

fn draw_ship<S: Surface>(ship: &Ship, surface: &mut S) {
    surface.fill_rect(ship.bounds(), C_SHIP);
}

fn draw_invader<S: Surface>(invader: &Invader, surface: &mut S) {
    surface.fill_rect(invader.bounds(), C_INVADER);
}

fn draw_bomb<S: Surface>(bomb: &Bomb, surface: &mut S) {
    surface.fill_rect(bomb.bounds(), C_BOMB);
}

fn draw_rocket<S: Surface>(rocket: &Rocket, surface: &mut S) {
    surface.fill_rect(
        Rect::new(rocket.x, rocket.y - 2.0, rocket.x + 1.0, rocket.y + 2.0),
        C_ROCKET,
    );
}

// ── HUD (below the play field) ────────────────────────────────────────────────

fn draw_hud<S: Surface>(session: &Session, surface: &mut S) {
    let text_y = session.bounds.bottom
        + (session.height - session.bounds.bottom) / 2.0
        + 14.0 / 2.0;
    surface.text(
        &format!("Lives: {}", session.lives),
        session.bounds.left,
        text_y,
        &style(14.0, TextAlign::Left),
    );
    surface.text(
        &format!("Score: {}, Level: {}", session.score, session.level),
        session.bounds.right,
        text_y,
        &style(14.0, TextAlign::Right),
    );
}
