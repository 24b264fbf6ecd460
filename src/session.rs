//! The live game attempt and the collision predicates over it.

use crate::config::Rules;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Playing,
    GameOver,
}

/// One game attempt. Also the snapshot the renderer reads each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    /// Top edge of the bird, world pixels from the top.
    pub bird_y: i32,
    /// Left edge of the pipe.
    pub pipe_x: i32,
    /// Where the gap begins; the gap spans `pipe_gap` pixels down from here.
    pub pipe_gap_top: i32,
    pub score: u32,
    pub status: Status,
}

impl Session {
    pub fn new(rules: &Rules) -> Self {
        Self {
            bird_y: rules.initial_bird_y,
            pipe_x: rules.initial_pipe_x,
            pipe_gap_top: rules.initial_gap_top,
            score: 0,
            status: Status::Playing,
        }
    }

    pub fn is_over(&self) -> bool {
        self.status == Status::GameOver
    }

    /// Bird's reference point lies outside the gap band. Ignores bird height on purpose.
    pub fn hits_pipe_vertically(&self, rules: &Rules) -> bool {
        self.bird_y < self.pipe_gap_top || self.bird_y > self.pipe_gap_top + rules.pipe_gap
    }

    pub fn hits_ground(&self, rules: &Rules) -> bool {
        self.bird_y >= rules.ground_line()
    }

    pub fn pipe_in_window(&self, rules: &Rules) -> bool {
        let (lo, hi) = rules.collision_window;
        (lo..=hi).contains(&self.pipe_x)
    }

    pub fn is_colliding(&self, rules: &Rules) -> bool {
        self.hits_ground(rules) || (self.pipe_in_window(rules) && self.hits_pipe_vertically(rules))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(bird_y: i32, pipe_x: i32, pipe_gap_top: i32) -> Session {
        Session {
            bird_y,
            pipe_x,
            pipe_gap_top,
            score: 0,
            status: Status::Playing,
        }
    }

    #[test]
    fn test_initial_values() {
        let s = Session::new(&Rules::default());
        assert_eq!(s, at(250, 500, 200));
        assert!(!s.is_over());
    }

    #[test]
    fn test_gap_band_is_inclusive() {
        let rules = Rules::default();
        assert!(!at(200, 30, 200).hits_pipe_vertically(&rules));
        assert!(!at(390, 30, 200).hits_pipe_vertically(&rules));
        assert!(at(199, 30, 200).hits_pipe_vertically(&rules));
        assert!(at(391, 30, 200).hits_pipe_vertically(&rules));
    }

    #[test]
    fn test_window_edges() {
        let rules = Rules::default();
        assert!(at(0, 0, 0).pipe_in_window(&rules));
        assert!(at(0, 50, 0).pipe_in_window(&rules));
        assert!(!at(0, -1, 0).pipe_in_window(&rules));
        assert!(!at(0, 51, 0).pipe_in_window(&rules));
    }

    #[test]
    fn test_pipe_outside_window_never_collides() {
        let rules = Rules::default();
        let s = at(100, 300, 400);
        assert!(s.hits_pipe_vertically(&rules));
        assert!(!s.is_colliding(&rules));
    }

    #[test]
    fn test_ground_ignores_pipe() {
        let rules = Rules::default();
        assert!(at(880, 300, 200).is_colliding(&rules));
        assert!(!at(879, 300, 200).is_colliding(&rules));
    }
}
