//! Game-flow state machine.
//!
//! `State` is a sum type over the four flow states plus the Pause overlay.
//! Hooks never touch the state stack themselves: they return a
//! [`Transition`] description and the session context applies it, which
//! keeps each state's logic testable in isolation.

use rand::Rng;

use crate::game::{Key, Session};
use crate::play::PlayState;

/// Seconds of countdown shown before a level starts.
const INTRO_COUNTDOWN: f32 = 3.0;

/// A state's request to alter the state stack.
#[derive(Debug)]
pub enum Transition {
    /// Leave and pop the current state, enter and push the new one.
    Replace(State),
    /// Stack an overlay above the current state without disturbing it.
    Push(State),
    /// Remove the current overlay, re-exposing the state beneath.
    Pop,
}

/// Title screen; waits for the fire key.
#[derive(Clone, Debug)]
pub struct WelcomeState;

/// Countdown interstitial shown before `level` begins.
#[derive(Clone, Debug)]
pub struct LevelIntroState {
    pub level: u32,
    pub countdown: f32,
    /// Displayed whole-second label, stepped at the <2 / <1 thresholds.
    pub label: &'static str,
}

impl LevelIntroState {
    pub fn new(level: u32) -> Self {
        LevelIntroState {
            level,
            countdown: INTRO_COUNTDOWN,
            label: "3",
        }
    }
}

/// Overlay stacked above Play; the episode underneath is untouched.
#[derive(Clone, Debug)]
pub struct PauseState;

/// Final-score screen; waits for the fire key to restart.
#[derive(Clone, Debug)]
pub struct GameOverState;

/// One entry of the session's state stack.
#[derive(Debug)]
pub enum State {
    Welcome(WelcomeState),
    LevelIntro(LevelIntroState),
    Play(PlayState),
    Pause(PauseState),
    GameOver(GameOverState),
}

impl State {
    /// Hook invoked when the state is pushed onto the stack.
    pub fn enter(&mut self, session: &Session) {
        match self {
            State::Play(play) => play.enter(session),
            State::Welcome(_)
            | State::LevelIntro(_)
            | State::Pause(_)
            | State::GameOver(_) => {}
        }
    }

    /// Hook invoked when the state is removed from the stack.  No variant
    /// currently needs teardown beyond dropping its owned collections, but
    /// the stack machinery calls through here on every pop and replace.
    pub fn leave(&mut self, _session: &Session) {}

    /// Per-tick update.  Only LevelIntro (countdown) and Play (the
    /// formation simulator) advance with time.
    pub fn update(
        &mut self,
        session: &mut Session,
        rng: &mut impl Rng,
        dt: f32,
    ) -> Option<Transition> {
        match self {
            State::LevelIntro(intro) => {
                intro.countdown -= dt;
                if intro.countdown < 2.0 {
                    intro.label = "2";
                }
                if intro.countdown < 1.0 {
                    intro.label = "1";
                }
                if intro.countdown <= 0.0 {
                    return Some(Transition::Replace(State::Play(PlayState::new(
                        intro.level,
                    ))));
                }
                None
            }
            State::Play(play) => play.update(session, rng, dt),
            State::Welcome(_) | State::Pause(_) | State::GameOver(_) => None,
        }
    }

    /// Key-press hook, invoked after the session records the key as held.
    pub fn key_down(&mut self, session: &mut Session, key: Key) -> Option<Transition> {
        match self {
            State::Welcome(_) | State::GameOver(_) => {
                if key == Key::Fire {
                    session.reset();
                    Some(Transition::Replace(State::LevelIntro(
                        LevelIntroState::new(1),
                    )))
                } else {
                    None
                }
            }
            State::Play(play) => match key {
                Key::Fire => {
                    play.fire_rocket(std::time::Instant::now());
                    None
                }
                Key::Pause => Some(Transition::Push(State::Pause(PauseState))),
                Key::Left | Key::Right => None,
            },
            State::Pause(_) => {
                if key == Key::Pause {
                    Some(Transition::Pop)
                } else {
                    None
                }
            }
            State::LevelIntro(_) => None,
        }
    }

    /// Key-release hook.  No state reacts to releases; held-key effects
    /// are read from the session's pressed set during update.
    pub fn key_up(&mut self, _session: &mut Session, _key: Key) -> Option<Transition> {
        None
    }
}
