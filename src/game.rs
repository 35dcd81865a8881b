//! Game session context: configuration, global counters, the state stack
//! and the per-tick / input dispatch into the active state.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::{GameConfig, GameError};
use crate::display::{self, Surface};
use crate::entities::Rect;
use crate::state::{State, Transition, WelcomeState};

/// Lives granted at the start of every run.
const INITIAL_LIVES: u32 = 3;

/// Abstract input vocabulary.  The frontend maps physical keys and touch
/// gestures onto these four codes; nothing else is semantically recognized.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Key {
    Left,
    Right,
    Fire,
    Pause,
}

/// Mutable session aggregate shared with the active state: counters, the
/// play-field bounds and the pressed-key set.
#[derive(Clone, Debug)]
pub struct Session {
    pub config: GameConfig,
    pub lives: u32,
    pub score: u32,
    pub level: u32,
    /// Rendering-surface size; the play field is centered within it.
    pub width: f32,
    pub height: f32,
    pub bounds: Rect,
    pub pressed: HashSet<Key>,
}

impl Session {
    /// Reset the run counters to their starting values.
    pub fn reset(&mut self) {
        self.lives = INITIAL_LIVES;
        self.score = 0;
        self.level = 1;
    }
}

/// The session context.  Owns the state stack; states request stack
/// changes by returning [`Transition`] values which are applied here, at
/// the single dispatch site.
#[derive(Debug)]
pub struct Game {
    pub session: Session,
    states: Vec<State>,
    rng: StdRng,
    previous_touch_x: Option<f32>,
}

impl Game {
    /// Create a session over a surface of the given size.  Fails fast on
    /// non-positive surface dimensions or a malformed configuration;
    /// afterwards nothing in the session can fail.
    pub fn new(config: GameConfig, width: f32, height: f32) -> Result<Self, GameError> {
        Self::with_rng(config, width, height, StdRng::from_entropy())
    }

    /// Like [`Game::new`] with a fixed RNG seed, for deterministic runs.
    pub fn from_seed(
        config: GameConfig,
        width: f32,
        height: f32,
        seed: u64,
    ) -> Result<Self, GameError> {
        Self::with_rng(config, width, height, StdRng::seed_from_u64(seed))
    }

    fn with_rng(
        config: GameConfig,
        width: f32,
        height: f32,
        rng: StdRng,
    ) -> Result<Self, GameError> {
        if width <= 0.0 || height <= 0.0 {
            return Err(GameError::InvalidSurface { width, height });
        }
        config.validate()?;

        let bounds = Rect::new(
            width / 2.0 - config.game_width / 2.0,
            height / 2.0 - config.game_height / 2.0,
            width / 2.0 + config.game_width / 2.0,
            height / 2.0 + config.game_height / 2.0,
        );
        Ok(Game {
            session: Session {
                config,
                lives: INITIAL_LIVES,
                score: 0,
                level: 1,
                width,
                height,
                bounds,
                pressed: HashSet::new(),
            },
            states: Vec::new(),
            rng,
            previous_touch_x: None,
        })
    }

    /// Reset the counters and move to the Welcome state.  The periodic
    /// tick itself is driven by the host scheduler.
    pub fn start(&mut self) {
        self.session.reset();
        self.apply(Transition::Replace(State::Welcome(WelcomeState)));
    }

    /// One scheduler-driven step: update the current state, then draw it.
    /// `dt` is the fixed frame duration (`1 / fps`), never wall-clock
    /// measured, so the simulation is deterministic per tick count.
    pub fn tick<S: Surface>(&mut self, dt: f32, surface: &mut S) {
        self.update(dt);
        display::render(self, surface);
    }

    /// Update half of [`Game::tick`], separated so headless callers can
    /// advance the simulation without a surface.
    pub fn update(&mut self, dt: f32) {
        let Some(mut state) = self.states.pop() else {
            return;
        };
        let transition = state.update(&mut self.session, &mut self.rng, dt);
        self.states.push(state);
        if let Some(transition) = transition {
            self.apply(transition);
        }
    }

    pub fn current_state(&self) -> Option<&State> {
        self.states.last()
    }

    /// The whole stack, innermost first.  Exposed for the renderer and
    /// for inspection in tests.
    pub fn states(&self) -> &[State] {
        &self.states
    }

    // ── Input intake ──────────────────────────────────────────────────────────

    /// Record a key as held, then forward the press to the current state.
    pub fn key_down(&mut self, key: Key) {
        self.session.pressed.insert(key);
        self.dispatch_key_down(key);
    }

    /// Release a key, then forward the release to the current state.
    pub fn key_up(&mut self, key: Key) {
        self.session.pressed.remove(&key);
        let Some(mut state) = self.states.pop() else {
            return;
        };
        let transition = state.key_up(&mut self.session, key);
        self.states.push(state);
        if let Some(transition) = transition {
            self.apply(transition);
        }
    }

    /// A tap synthesizes a fire key-down.  The key is forwarded but not
    /// recorded as held, so a tap can never wedge autofire on.
    pub fn touch_start(&mut self, x: f32) {
        self.previous_touch_x = Some(x);
        self.dispatch_key_down(Key::Fire);
    }

    /// Horizontal drag holds the movement key matching the delta since the
    /// previous sample.
    pub fn touch_move(&mut self, x: f32) {
        if let Some(previous) = self.previous_touch_x {
            if x > previous {
                self.session.pressed.remove(&Key::Left);
                self.session.pressed.insert(Key::Right);
            } else if x < previous {
                self.session.pressed.remove(&Key::Right);
                self.session.pressed.insert(Key::Left);
            }
        }
        self.previous_touch_x = Some(x);
    }

    /// Releasing the touch clears both movement keys.
    pub fn touch_end(&mut self) {
        self.session.pressed.remove(&Key::Left);
        self.session.pressed.remove(&Key::Right);
        self.previous_touch_x = None;
    }

    fn dispatch_key_down(&mut self, key: Key) {
        let Some(mut state) = self.states.pop() else {
            return;
        };
        let transition = state.key_down(&mut self.session, key);
        self.states.push(state);
        if let Some(transition) = transition {
            self.apply(transition);
        }
    }

    // ── Transition application ────────────────────────────────────────────────

    fn apply(&mut self, transition: Transition) {
        match transition {
            Transition::Replace(mut next) => {
                if let Some(mut current) = self.states.pop() {
                    current.leave(&self.session);
                }
                next.enter(&self.session);
                self.states.push(next);
            }
            Transition::Push(mut next) => {
                next.enter(&self.session);
                self.states.push(next);
            }
            Transition::Pop => {
                if let Some(mut current) = self.states.pop() {
                    current.leave(&self.session);
                }
            }
        }
    }
}
