//! Fixed-tick Flappy Bird: one bird, one recycled pipe, and a terminal front end.
//!
//! The simulation lives in [`game`] and [`session`]. It does no I/O. Audio,
//! input and rendering read its snapshots or consume the [`Cue`]s it returns.

pub mod audio;
pub mod clock;
pub mod config;
pub mod game;
pub mod input;
pub mod render;
pub mod session;

pub use config::{Config, ConfigError, Rules};
pub use game::{Cue, Game};
pub use session::{Session, Status};
