//! Active-gameplay state: the formation simulator.
//!
//! One `PlayState` drives one level.  It exclusively owns the ship, the
//! invader formation and both projectile collections; everything is
//! discarded when the state leaves the stack.  All randomness comes
//! through the injected RNG handle so callers control determinism.

use std::collections::BTreeMap;
use std::mem;
use std::time::{Duration, Instant};

use rand::Rng;

use crate::entities::{Bomb, Invader, Rocket, Ship, Vec2};
use crate::game::{Key, Session};
use crate::state::{GameOverState, LevelIntroState, State, Transition};

/// Vertical spacing between invader ranks at spawn.
const RANK_SPACING: f32 = 20.0;
/// Total horizontal span of the formation at spawn.
const FORMATION_SPAN: f32 = 200.0;
/// Rockets leave the ship this far above its center.
const ROCKET_MUZZLE_OFFSET: f32 = 12.0;

/// Per-level gameplay state and simulation driver.
#[derive(Clone, Debug)]
pub struct PlayState {
    pub level: u32,

    // Level-scaled tuning, fixed on enter.
    pub ship_speed: f32,
    pub rocket_velocity: f32,
    pub rocket_max_fire_rate: f32,
    pub bomb_rate: f32,
    pub bomb_min_velocity: f32,
    pub bomb_max_velocity: f32,

    // Formation movement.  The whole surviving formation shares one
    // velocity vector; `formation_speed` is the scalar it returns to after
    // a drop, growing with each bounce.
    pub formation_velocity: Vec2,
    pub formation_speed: f32,
    pub queued_velocity: Option<Vec2>,
    pub dropping: bool,
    pub drop_traveled: f32,

    pub last_rocket_time: Option<Instant>,

    pub ship: Ship,
    pub invaders: Vec<Invader>,
    pub rockets: Vec<Rocket>,
    pub bombs: Vec<Bomb>,
}

impl PlayState {
    /// A fresh play episode for `level`.  Collections stay empty until
    /// [`PlayState::enter`] builds the formation from the session bounds.
    pub fn new(level: u32) -> Self {
        PlayState {
            level,
            ship_speed: 0.0,
            rocket_velocity: 0.0,
            rocket_max_fire_rate: 0.0,
            bomb_rate: 0.0,
            bomb_min_velocity: 0.0,
            bomb_max_velocity: 0.0,
            formation_velocity: Vec2::new(0.0, 0.0),
            formation_speed: 0.0,
            queued_velocity: None,
            dropping: false,
            drop_traveled: 0.0,
            last_rocket_time: None,
            ship: Ship::new(0.0, 0.0),
            invaders: Vec::new(),
            rockets: Vec::new(),
            bombs: Vec::new(),
        }
    }

    /// Apply difficulty scaling and spawn the ship and formation.
    ///
    /// Formation size and the fire-rate cap stop growing past
    /// `limit_level_increase`; speed and bomb scaling continue unbounded.
    pub fn enter(&mut self, session: &Session) {
        let config = &session.config;
        let level_multiplier = self.level as f32 * config.level_difficulty_multiplier;
        let limit_level = self.level.min(config.limit_level_increase) as f32;

        self.ship_speed = config.ship_speed;
        self.rocket_velocity = config.rocket_velocity;
        self.rocket_max_fire_rate = config.rocket_max_fire_rate + 0.4 * limit_level;
        self.bomb_rate = config.bomb_rate * (1.0 + level_multiplier);
        self.bomb_min_velocity = config.bomb_min_velocity * (1.0 + level_multiplier);
        self.bomb_max_velocity = config.bomb_max_velocity * (1.0 + level_multiplier);

        let speed =
            config.invader_initial_velocity * (1.0 + 1.5 * level_multiplier);
        self.formation_speed = speed;
        self.formation_velocity = Vec2::new(-speed, 0.0);
        self.queued_velocity = None;
        self.dropping = false;
        self.drop_traveled = 0.0;
        self.last_rocket_time = None;

        self.ship = Ship::new(session.width / 2.0, session.bounds.bottom);

        let ranks = (config.invader_ranks as f32 + 0.1 * limit_level).floor() as u32;
        let files = (config.invader_files as f32 + 0.2 * limit_level).floor() as u32;
        let mut invaders = Vec::with_capacity((ranks * files) as usize);
        for rank in 0..ranks {
            for file in 0..files {
                invaders.push(Invader::new(
                    session.width / 2.0
                        + (files as f32 / 2.0 - file as f32) * (FORMATION_SPAN / files as f32),
                    session.bounds.top + rank as f32 * RANK_SPACING,
                    rank,
                    file,
                ));
            }
        }
        self.invaders = invaders;
        self.rockets = Vec::new();
        self.bombs = Vec::new();
    }

    /// Advance the episode by one tick.  Phase order matters: movement
    /// before spawning, spawning before collision, collision before the
    /// outcome check.
    pub fn update(
        &mut self,
        session: &mut Session,
        rng: &mut impl Rng,
        dt: f32,
    ) -> Option<Transition> {
        let bounds = session.bounds;
        let acceleration = session.config.invader_acceleration;
        let drop_distance = session.config.invader_drop_distance;
        let points_per_invader = session.config.points_per_invader;

        // 1. Held movement keys, clamped to the play field; held fire is
        //    rate-limited inside fire_rocket.
        if session.pressed.contains(&Key::Left) {
            self.ship.x -= self.ship_speed * dt;
        }
        if session.pressed.contains(&Key::Right) {
            self.ship.x += self.ship_speed * dt;
        }
        if session.pressed.contains(&Key::Fire) {
            self.fire_rocket(Instant::now());
        }
        self.ship.x = self.ship.x.clamp(bounds.left, bounds.right);

        // 2. Bombs fall; cull past the surface bottom.
        let surface_bottom = session.height;
        for bomb in &mut self.bombs {
            bomb.y += bomb.velocity * dt;
        }
        self.bombs.retain(|bomb| bomb.y <= surface_bottom);

        // 3. Rockets climb; cull above the surface top.
        for rocket in &mut self.rockets {
            rocket.y -= rocket.velocity * dt;
        }
        self.rockets.retain(|rocket| rocket.y >= 0.0);

        // 4. Propose the formation's next position.  Each invader latches
        //    at most one bound (left over right over bottom); if anything
        //    latched, nobody moves this tick.
        let mut hit_left = false;
        let mut hit_right = false;
        let mut hit_bottom = false;
        for invader in &self.invaders {
            let new_x = invader.x + self.formation_velocity.x * dt;
            let new_y = invader.y + self.formation_velocity.y * dt;
            if !hit_left && new_x < bounds.left {
                hit_left = true;
            } else if !hit_right && new_x > bounds.right {
                hit_right = true;
            } else if !hit_bottom && new_y > bounds.bottom {
                hit_bottom = true;
            }
        }
        if !hit_left && !hit_right && !hit_bottom {
            for invader in &mut self.invaders {
                invader.x += self.formation_velocity.x * dt;
                invader.y += self.formation_velocity.y * dt;
            }
        }

        // 5. Drop-phase accounting: once the configured distance has been
        //    descended, resume horizontal motion in the queued direction.
        if self.dropping {
            self.drop_traveled += self.formation_velocity.y * dt;
            if self.drop_traveled >= drop_distance {
                self.dropping = false;
                if let Some(next) = self.queued_velocity.take() {
                    self.formation_velocity = next;
                }
                self.drop_traveled = 0.0;
            }
        }

        // 6. Bound hits: horizontal bounces accelerate, descend, and queue
        //    the reversed direction.  The bottom bound is the player's
        //    line — reaching it is an instant loss.
        if hit_left {
            self.formation_speed += acceleration;
            self.formation_velocity = Vec2::new(0.0, self.formation_speed);
            self.dropping = true;
            self.queued_velocity = Some(Vec2::new(self.formation_speed, 0.0));
        }
        if hit_right {
            self.formation_speed += acceleration;
            self.formation_velocity = Vec2::new(0.0, self.formation_speed);
            self.dropping = true;
            self.queued_velocity = Some(Vec2::new(-self.formation_speed, 0.0));
        }
        if hit_bottom {
            session.lives = 0;
        }

        // 7. Rockets vs invaders.  Survivors are accumulated into a fresh
        //    collection; each invader takes at most one rocket and each
        //    rocket destroys at most one invader.
        let mut survivors = Vec::with_capacity(self.invaders.len());
        for invader in mem::take(&mut self.invaders) {
            let invader_box = invader.bounds();
            match self
                .rockets
                .iter()
                .position(|rocket| invader_box.contains(rocket.x, rocket.y))
            {
                Some(index) => {
                    self.rockets.remove(index);
                    session.score += points_per_invader;
                }
                None => survivors.push(invader),
            }
        }
        self.invaders = survivors;

        // 8. Bomb spawning from the frontmost surviving invader of each
        //    file.  The scratch map is rebuilt every tick; file order keeps
        //    seeded runs reproducible.
        let mut front_of_file: BTreeMap<u32, usize> = BTreeMap::new();
        for (index, invader) in self.invaders.iter().enumerate() {
            match front_of_file.get(&invader.file) {
                Some(&leader) if self.invaders[leader].rank >= invader.rank => {}
                _ => {
                    front_of_file.insert(invader.file, index);
                }
            }
        }
        for &index in front_of_file.values() {
            if rng.gen::<f32>() < self.bomb_rate * dt {
                let invader = &self.invaders[index];
                let velocity = rng.gen_range(self.bomb_min_velocity..=self.bomb_max_velocity);
                self.bombs.push(Bomb::new(
                    invader.x,
                    invader.y + Invader::HEIGHT / 2.0,
                    velocity,
                ));
            }
        }

        // 9. Bombs vs ship: each overlapping bomb is spent and costs a life.
        let ship_box = self.ship.bounds();
        let mut hits = 0u32;
        self.bombs.retain(|bomb| {
            if bomb.bounds().intersects(&ship_box) {
                hits += 1;
                false
            } else {
                true
            }
        });
        session.lives = session.lives.saturating_sub(hits);

        // 10. An invader overlapping the ship ends the game regardless of
        //     remaining lives.
        if self
            .invaders
            .iter()
            .any(|invader| invader.bounds().intersects(&ship_box))
        {
            session.lives = 0;
        }

        // 11. Outcome.
        if session.lives == 0 {
            return Some(Transition::Replace(State::GameOver(GameOverState)));
        }
        if self.invaders.is_empty() {
            session.score += self.level * 50;
            session.level = self.level + 1;
            return Some(Transition::Replace(State::LevelIntro(
                LevelIntroState::new(self.level + 1),
            )));
        }
        None
    }

    /// Spawn a rocket unless one was spawned within the rate-limit window.
    ///
    /// This is the one place the simulation consults wall-clock time: the
    /// gate is measured from the previous successful spawn so fire rate
    /// stays constant under frame-rate drift.  Returns whether a rocket
    /// was spawned.
    pub fn fire_rocket(&mut self, now: Instant) -> bool {
        let window = Duration::from_secs_f32(1.0 / self.rocket_max_fire_rate);
        let ready = match self.last_rocket_time {
            None => true,
            Some(previous) => now.duration_since(previous) > window,
        };
        if ready {
            self.rockets.push(Rocket::new(
                self.ship.x,
                self.ship.y - ROCKET_MUZZLE_OFFSET,
                self.rocket_velocity,
            ));
            self.last_rocket_time = Some(now);
        }
        ready
    }
}
