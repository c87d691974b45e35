//! Tone description and envelope rendering
//!
//! A tone is a sine carrier shaped by an exponential attack up to the peak
//! gain followed by an exponential decay to near silence. Exponential ramps
//! cannot start or end at zero, so both ends sit at [`GAIN_FLOOR`].

use std::f32::consts::PI;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Gain at the start of the attack and the end of the decay
pub const GAIN_FLOOR: f32 = 0.0001;

/// Longest attack phase; shorter tones use a quarter of their length
const MAX_ATTACK_MS: u64 = 10;

/// Longest tone accepted; feedback cues are well under a second
pub const MAX_TONE_DURATION_MS: u64 = 10_000;

/// A short synthesized cue
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tone {
    pub frequency_hz: f32,
    pub duration_ms: u64,
    pub peak_gain: f32,
}

impl Tone {
    pub const fn new(frequency_hz: f32, duration_ms: u64, peak_gain: f32) -> Self {
        Self {
            frequency_hz,
            duration_ms,
            peak_gain,
        }
    }

    /// Reject tones that cannot be rendered sensibly
    pub fn validate(&self) -> Result<()> {
        if !(self.frequency_hz.is_finite() && self.frequency_hz > 0.0) {
            return Err(Error::InvalidInput(format!(
                "tone frequency must be positive, got {}",
                self.frequency_hz
            )));
        }
        if self.duration_ms == 0 || self.duration_ms > MAX_TONE_DURATION_MS {
            return Err(Error::InvalidInput(format!(
                "tone duration must be in 1..={} ms, got {}",
                MAX_TONE_DURATION_MS, self.duration_ms
            )));
        }
        if !(self.peak_gain > GAIN_FLOOR && self.peak_gain <= 1.0) {
            return Err(Error::InvalidInput(format!(
                "tone peak gain must be in ({}, 1.0], got {}",
                GAIN_FLOOR, self.peak_gain
            )));
        }
        Ok(())
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    pub fn envelope(&self) -> ToneEnvelope {
        ToneEnvelope::new(self.duration_ms, self.peak_gain)
    }

    /// Render mono samples at `sample_rate`
    ///
    /// Durations past [`MAX_TONE_DURATION_MS`] are truncated to it.
    pub fn render(&self, sample_rate: u32) -> Vec<f32> {
        let envelope = self.envelope();
        let duration_ms = self.duration_ms.min(MAX_TONE_DURATION_MS);
        let total = (u64::from(sample_rate).saturating_mul(duration_ms) / 1000) as usize;
        let rate = sample_rate as f32;

        (0..total)
            .map(|i| {
                let t_ms = i as f32 * 1000.0 / rate;
                let carrier = (2.0 * PI * self.frequency_hz * i as f32 / rate).sin();
                carrier * envelope.gain_at(t_ms)
            })
            .collect()
    }
}

/// Exponential attack/decay gain curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneEnvelope {
    attack_ms: f32,
    total_ms: f32,
    peak_gain: f32,
}

impl ToneEnvelope {
    pub fn new(duration_ms: u64, peak_gain: f32) -> Self {
        let attack_ms = (duration_ms / 4).clamp(1, MAX_ATTACK_MS) as f32;
        Self {
            attack_ms: attack_ms.min(duration_ms as f32),
            total_ms: duration_ms as f32,
            peak_gain: peak_gain.max(GAIN_FLOOR),
        }
    }

    pub fn attack_ms(&self) -> f32 {
        self.attack_ms
    }

    /// Gain at `t_ms` from tone start
    ///
    /// Rises from the floor to the peak over the attack, then falls back to
    /// the floor at the end of the tone. Outside the tone the gain is zero.
    pub fn gain_at(&self, t_ms: f32) -> f32 {
        if !(0.0..=self.total_ms).contains(&t_ms) {
            return 0.0;
        }

        let ratio = self.peak_gain / GAIN_FLOOR;
        if t_ms <= self.attack_ms {
            let position = t_ms / self.attack_ms;
            GAIN_FLOOR * ratio.powf(position)
        } else {
            let decay_ms = (self.total_ms - self.attack_ms).max(f32::EPSILON);
            let position = (t_ms - self.attack_ms) / decay_ms;
            self.peak_gain * ratio.powf(-position)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_bounds() {
        let envelope = ToneEnvelope::new(180, 0.08);
        assert!((envelope.gain_at(0.0) - GAIN_FLOOR).abs() < 1e-6);
        assert!((envelope.gain_at(envelope.attack_ms()) - 0.08).abs() < 1e-4);
        assert!((envelope.gain_at(180.0) - GAIN_FLOOR).abs() < 1e-5);
        assert_eq!(envelope.gain_at(-1.0), 0.0);
        assert_eq!(envelope.gain_at(181.0), 0.0);
    }

    #[test]
    fn test_envelope_rises_then_falls() {
        let envelope = ToneEnvelope::new(180, 0.08);
        let attack = envelope.attack_ms();
        assert!(envelope.gain_at(attack / 2.0) < envelope.gain_at(attack));
        assert!(envelope.gain_at(100.0) < envelope.gain_at(attack));
        assert!(envelope.gain_at(150.0) < envelope.gain_at(100.0));
    }

    #[test]
    fn test_short_tone_attack_scales() {
        let envelope = ToneEnvelope::new(20, 0.5);
        assert_eq!(envelope.attack_ms(), 5.0);
        let envelope = ToneEnvelope::new(2, 0.5);
        assert_eq!(envelope.attack_ms(), 1.0);
    }

    #[test]
    fn test_render_length_and_peak() {
        let tone = Tone::new(880.0, 100, 0.1);
        let samples = tone.render(48_000);
        assert_eq!(samples.len(), 4_800);
        let peak = samples.iter().fold(0.0f32, |m, s| m.max(s.abs()));
        assert!(peak <= 0.1 + 1e-6);
        assert!(peak > 0.05);
    }

    #[test]
    fn test_validate() {
        assert!(Tone::new(880.0, 180, 0.08).validate().is_ok());
        assert!(Tone::new(0.0, 180, 0.08).validate().is_err());
        assert!(Tone::new(880.0, 0, 0.08).validate().is_err());
        assert!(Tone::new(880.0, 180, 1.5).validate().is_err());
        assert!(Tone::new(880.0, MAX_TONE_DURATION_MS, 0.08).validate().is_ok());
        assert!(Tone::new(880.0, MAX_TONE_DURATION_MS + 1, 0.08).validate().is_err());
    }

    #[test]
    fn test_render_caps_oversized_duration() {
        let samples = Tone::new(880.0, 18_446_744_073_709_551, 0.5).render(48_000);
        assert_eq!(samples.len() as u64, 48 * MAX_TONE_DURATION_MS);
    }
}
