//! Sound cues, synthesized with fundsp and played through rodio.
//!
//! Playback is best effort: no device, no sound, and the game carries on.

use std::collections::HashMap;

use fundsp::prelude::*;
use log::{debug, warn};
use rodio::{OutputStream, OutputStreamBuilder, Sink, buffer::SamplesBuffer};

use crate::game::Cue;

pub const SAMPLE_RATE: u32 = 44_100;

/// Anything that can react to a cue. Must never fail the caller.
pub trait CuePlayer {
    fn play(&mut self, cue: Cue);
}

/// Drops every cue. Used when muted or when no output device exists.
#[derive(Debug, Default)]
pub struct Silent;

impl CuePlayer for Silent {
    fn play(&mut self, cue: Cue) {
        debug!("cue {cue:?} dropped (silent)");
    }
}

pub struct Sounds {
    stream: OutputStream,
    clips: HashMap<Cue, Vec<f32>>,
}

impl Sounds {
    /// Opens the default output device and pre-renders every cue.
    pub fn open() -> Option<Self> {
        let mut stream = match OutputStreamBuilder::open_default_stream() {
            Ok(stream) => stream,
            Err(err) => {
                warn!("audio output unavailable, cues will be dropped: {err}");
                return None;
            }
        };
        // The drop notice goes to stderr, which belongs to the terminal UI.
        stream.log_on_drop(false);
        let clips = [Cue::Jump, Cue::Score, Cue::GameOver]
            .into_iter()
            .map(|cue| (cue, synth(cue)))
            .collect();
        Some(Self { stream, clips })
    }
}

impl CuePlayer for Sounds {
    fn play(&mut self, cue: Cue) {
        let Some(samples) = self.clips.get(&cue) else {
            return;
        };
        let sink = Sink::connect_new(self.stream.mixer());
        sink.append(SamplesBuffer::new(1, SAMPLE_RATE, samples.clone()));
        sink.detach(); // Play in background
    }
}

#[derive(Clone, Copy)]
enum Osc {
    Sine,
    Square,
    Saw,
}

/// Mono samples for a cue.
pub fn synth(cue: Cue) -> Vec<f32> {
    match cue {
        // Quick upward chirp
        Cue::Jump => render(Osc::Sine, 0.12, |t| {
            (lerp(520.0, 880.0, t / 0.12), lerp(0.25, 0.0, t / 0.12))
        }),
        // Two-note blip, second note higher
        Cue::Score => render(Osc::Square, 0.2, |t| {
            let freq = if t < 0.06 { 988.0 } else { 1319.0 };
            (freq, lerp(0.12, 0.0, t / 0.2))
        }),
        // 400Hz down to 80Hz over 0.4s, gain 0.15 to silence over 0.5s
        Cue::GameOver => render(Osc::Saw, 0.5, |t| {
            (lerp(400.0, 80.0, t / 0.4), lerp(0.15, 0.0, t / 0.5))
        }),
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

/// Runs an oscillator for `secs`, with frequency and gain as functions of time.
fn render(osc_kind: Osc, secs: f32, shape: impl Fn(f32) -> (f32, f32)) -> Vec<f32> {
    let freq = shared(0.0);
    let mut osc: Box<dyn AudioUnit> = match osc_kind {
        Osc::Sine => Box::new(var(&freq) >> sine::<f32>()),
        Osc::Square => Box::new(var(&freq) >> square()),
        Osc::Saw => Box::new(var(&freq) >> saw()),
    };
    osc.set_sample_rate(SAMPLE_RATE as f64);

    let len = (secs * SAMPLE_RATE as f32) as usize;
    (0..len)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE as f32;
            let (hz, gain) = shape(t);
            freq.set_value(hz);
            (osc.get_mono() * gain).clamp(-1.0, 1.0)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_lengths() {
        assert_eq!(synth(Cue::Jump).len(), (0.12 * SAMPLE_RATE as f32) as usize);
        assert_eq!(synth(Cue::GameOver).len(), SAMPLE_RATE as usize / 2);
    }

    #[test]
    fn test_clips_are_audible_and_bounded() {
        for cue in [Cue::Jump, Cue::Score, Cue::GameOver] {
            let clip = synth(cue);
            assert!(clip.iter().all(|s| s.abs() <= 1.0), "{cue:?} clipped");
            assert!(clip.iter().any(|s| s.abs() > 0.01), "{cue:?} is silent");
        }
    }

    /// Sign changes in a slice, a rough stand-in for pitch.
    fn crossings(samples: &[f32]) -> usize {
        samples
            .windows(2)
            .filter(|w| (w[0] < 0.0) != (w[1] < 0.0))
            .count()
    }

    #[test]
    fn test_jump_chirp_rises() {
        let clip = synth(Cue::Jump);
        let quarter = clip.len() / 4;
        let early = crossings(&clip[..quarter]);
        let late = crossings(&clip[clip.len() - quarter..]);
        // 520Hz at the start, close to 880Hz at the end
        assert!(late > early, "early={early} late={late}");
        assert!(clip.iter().fold(0.0f32, |m, s| m.max(s.abs())) <= 0.25);
    }

    #[test]
    fn test_game_over_fades_out() {
        let clip = synth(Cue::GameOver);
        let tail = &clip[clip.len() - 100..];
        assert!(tail.iter().all(|s| s.abs() < 0.01));
    }

    #[test]
    fn test_silent_accepts_everything() {
        let mut player = Silent;
        player.play(Cue::Jump);
        player.play(Cue::Score);
        player.play(Cue::GameOver);
    }

    #[test]
    fn test_lerp_clamps() {
        assert_eq!(lerp(400.0, 80.0, 2.0), 80.0);
        assert_eq!(lerp(400.0, 80.0, -1.0), 400.0);
        assert_eq!(lerp(0.0, 10.0, 0.5), 5.0);
    }
}
