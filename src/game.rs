//! Simulation controller: owns the session and advances it one tick at a time.
//!
//! Every transition returns the [`Cue`]s it produced instead of playing them,
//! so the state machine runs the same with or without an audio device.

use std::time::Duration;

use log::{debug, info};
use rand::Rng;

use crate::clock::FixedClock;
use crate::config::Rules;
use crate::session::{Session, Status};

/// Side effects emitted by a transition. The caller decides what to do with them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    Jump,
    Score,
    GameOver,
}

pub struct Game<R: Rng> {
    rules: Rules,
    session: Session,
    clock: FixedClock,
    rng: R,
}

impl<R: Rng> Game<R> {
    pub fn new(rules: Rules, rng: R) -> Self {
        let session = Session::new(&rules);
        Self::with_session(rules, session, rng)
    }

    /// Starts from an arbitrary session, e.g. a scenario set up by a test.
    pub fn with_session(rules: Rules, session: Session, rng: R) -> Self {
        info!(
            "session started: bird_y={} pipe_x={} gap_top={}",
            session.bird_y, session.pipe_x, session.pipe_gap_top
        );
        Self {
            clock: FixedClock::new(rules.tick_interval()),
            rules,
            session,
            rng,
        }
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn snapshot(&self) -> Session {
        self.session
    }

    /// Time until the next tick falls due.
    pub fn until_next_tick(&self) -> Duration {
        self.clock.until_next()
    }

    /// Feeds elapsed wall time to the clock and runs every tick that is due.
    pub fn advance(&mut self, dt: Duration) -> Vec<Cue> {
        let mut cues = Vec::new();
        if self.session.is_over() {
            return cues;
        }
        let ticks = self.clock.advance(dt);
        for _ in 0..ticks {
            cues.extend(self.step());
            if self.session.is_over() {
                self.clock.reset();
                break;
            }
        }
        cues
    }

    /// One fixed tick: bird falls, pipe scrolls (or respawns), collisions checked
    /// after each move. Frozen once the game is over.
    pub fn step(&mut self) -> Vec<Cue> {
        let mut cues = Vec::new();
        if self.session.is_over() {
            return cues;
        }

        if !self.session.hits_ground(&self.rules) {
            self.session.bird_y += self.rules.gravity_step;
        }
        self.evaluate(&mut cues);
        if self.session.is_over() {
            return cues;
        }

        self.session.pipe_x -= self.rules.pipe_speed;
        if self.session.pipe_x < -self.rules.pipe_width {
            self.respawn_pipe(&mut cues);
        }
        self.evaluate(&mut cues);
        cues
    }

    /// Upward impulse. Ignored after game over or when it would push the bird
    /// past the top of the field.
    pub fn jump(&mut self) -> Vec<Cue> {
        let mut cues = Vec::new();
        if self.session.is_over() || self.session.bird_y <= self.rules.jump_delta {
            return cues;
        }
        self.session.bird_y -= self.rules.jump_delta;
        cues.push(Cue::Jump);
        self.evaluate(&mut cues);
        cues
    }

    /// Replaces the session with a fresh one. Only allowed after game over.
    pub fn reset(&mut self) -> bool {
        if !self.session.is_over() {
            return false;
        }
        info!("session reset after score {}", self.session.score);
        self.session = Session::new(&self.rules);
        self.clock.reset();
        true
    }

    fn respawn_pipe(&mut self, cues: &mut Vec<Cue>) {
        let span = self.rules.max_gap_top();
        self.session.pipe_x = self.rules.game_width;
        self.session.pipe_gap_top = if span > 0 {
            self.rng.gen_range(0..span)
        } else {
            0
        };
        self.session.score += 1;
        debug!(
            "pipe respawned: gap_top={} score={}",
            self.session.pipe_gap_top, self.session.score
        );
        if self.session.status == Status::Playing {
            cues.push(Cue::Score);
        }
    }

    fn evaluate(&mut self, cues: &mut Vec<Cue>) {
        if self.session.is_over() || !self.session.is_colliding(&self.rules) {
            return;
        }
        self.session.status = Status::GameOver;
        info!(
            "game over: score={} bird_y={} pipe_x={}",
            self.session.score, self.session.bird_y, self.session.pipe_x
        );
        cues.push(Cue::GameOver);
    }
}
