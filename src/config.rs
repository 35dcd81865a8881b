//! Session configuration — tunable rates and dimensions, set once at
//! session start and read-only afterwards.

use thiserror::Error;

/// Errors raised when a session is created with unusable parameters.
/// Nothing else in the library fails: running out of lives or clearing a
/// formation are state transitions, not errors.
#[derive(Debug, Error, PartialEq)]
pub enum GameError {
    #[error("surface dimensions must be positive, got {width}x{height}")]
    InvalidSurface { width: f32, height: f32 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}

/// All tunable rates, speeds and dimensions for one session.
#[derive(Clone, Debug)]
pub struct GameConfig {
    /// Per-second probability that an eligible invader file drops a bomb.
    pub bomb_rate: f32,
    pub bomb_min_velocity: f32,
    pub bomb_max_velocity: f32,
    /// Horizontal speed of the formation on level 1.
    pub invader_initial_velocity: f32,
    /// Speed gained each time the formation bounces off a horizontal bound.
    pub invader_acceleration: f32,
    /// Vertical distance the formation descends after a bounce.
    pub invader_drop_distance: f32,
    pub rocket_velocity: f32,
    /// Maximum player shots per second, gated against wall-clock time.
    pub rocket_max_fire_rate: f32,
    /// Play-field size, centered in the rendering surface.
    pub game_width: f32,
    pub game_height: f32,
    /// Fixed tick rate; every tick advances the simulation by `1 / fps`.
    pub fps: u32,
    /// Base formation size before difficulty scaling.
    pub invader_ranks: u32,
    pub invader_files: u32,
    pub ship_speed: f32,
    /// Scales speed, bomb rate and bomb velocity per level.
    pub level_difficulty_multiplier: f32,
    pub points_per_invader: u32,
    /// Level beyond which formation size and fire-rate cap stop growing.
    pub limit_level_increase: u32,
    /// Stroke the surface and play-field outlines while playing.
    pub debug: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            bomb_rate: 0.05,
            bomb_min_velocity: 50.0,
            bomb_max_velocity: 50.0,
            invader_initial_velocity: 25.0,
            invader_acceleration: 0.0,
            invader_drop_distance: 20.0,
            rocket_velocity: 120.0,
            rocket_max_fire_rate: 2.0,
            game_width: 400.0,
            game_height: 300.0,
            fps: 50,
            invader_ranks: 5,
            invader_files: 10,
            ship_speed: 120.0,
            level_difficulty_multiplier: 0.2,
            points_per_invader: 5,
            limit_level_increase: 25,
            debug: false,
        }
    }
}

impl GameConfig {
    /// Fail-fast precondition check, run once when the session is created.
    pub fn validate(&self) -> Result<(), GameError> {
        if self.game_width <= 0.0 || self.game_height <= 0.0 {
            return Err(GameError::InvalidConfig(
                "play-field dimensions must be positive",
            ));
        }
        if self.fps == 0 {
            return Err(GameError::InvalidConfig("fps must be at least 1"));
        }
        if self.invader_ranks == 0 || self.invader_files == 0 {
            return Err(GameError::InvalidConfig(
                "base formation must have at least one rank and one file",
            ));
        }
        if self.bomb_min_velocity > self.bomb_max_velocity {
            return Err(GameError::InvalidConfig(
                "bomb velocity range is inverted",
            ));
        }
        if self.rocket_max_fire_rate <= 0.0 {
            return Err(GameError::InvalidConfig(
                "rocket fire rate must be positive",
            ));
        }
        Ok(())
    }

    /// Duration of one tick in seconds.
    pub fn dt(&self) -> f32 {
        1.0 / self.fps as f32
    }
}
