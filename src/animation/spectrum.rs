use std::f32::consts::PI;

use crate::assets::AudioClip;
use crate::graph::Transform;

pub const FFT_SIZE: usize = 64;
pub const BIN_COUNT: usize = FFT_SIZE / 2;
pub const SMOOTHING: f32 = 0.8;
pub const MIN_DECIBELS: f32 = -100.0;
pub const MAX_DECIBELS: f32 = -30.0;

const MIN_BAR_SCALE: f32 = 0.1;
const BIN_DIVISOR: f32 = 64.0;

/// Vertical scale of a bar driven by one frequency bin
pub fn bar_scale(value: u8) -> f32 {
    (value as f32 / BIN_DIVISOR).max(MIN_BAR_SCALE)
}

/// Scales a unit-height bar and lifts it so its base stays on y = 0
pub fn apply_bar_scale(transform: &mut Transform, value: u8) {
    let scale = bar_scale(value);
    transform.scale.y = scale;
    transform.translation.y = scale / 2.0;
}

/// Anything that can report byte frequency data, one byte per bin
pub trait FrequencySource {
    fn frequency_data(&self) -> &[u8];
}

/// Byte-spectrum analyser over an unsigned 8-bit PCM clip
#[derive(Debug, Clone)]
pub struct SpectrumAnalyser {
    clip: AudioClip,
    position: f64,
    playing: bool,
    smoothed: [f32; BIN_COUNT],
    bytes: [u8; BIN_COUNT],
    window: [f32; FFT_SIZE],
}

impl SpectrumAnalyser {
    pub fn new(clip: AudioClip) -> Self {
        let mut window = [0.0; FFT_SIZE];
        for (i, w) in window.iter_mut().enumerate() {
            *w = 0.5 * (1.0 - (2.0 * PI * i as f32 / (FFT_SIZE - 1) as f32).cos());
        }
        Self {
            clip,
            position: 0.0,
            playing: false,
            smoothed: [0.0; BIN_COUNT],
            bytes: [0; BIN_COUNT],
            window,
        }
    }

    pub fn play(&mut self) {
        self.playing = true;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Returns the new playing state
    pub fn toggle(&mut self) -> bool {
        self.playing = !self.playing;
        self.playing
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Playback position in seconds
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Advances playback and recomputes the spectrum. Paused analysers decay
    /// toward silence through the smoothing filter.
    pub fn advance(&mut self, delta: f32) {
        let mut frame = [0.0f32; FFT_SIZE];
        if self.playing && !self.clip.samples.is_empty() {
            self.position = (self.position + delta as f64) % self.clip.duration().max(f64::EPSILON);
            let start = (self.position * self.clip.sample_rate as f64) as usize;
            let len = self.clip.samples.len();
            for (i, sample) in frame.iter_mut().enumerate() {
                let raw = self.clip.samples[(start + i) % len];
                *sample = (raw as f32 - 128.0) / 128.0 * self.window[i];
            }
        }

        for k in 0..BIN_COUNT {
            let (mut re, mut im) = (0.0f32, 0.0f32);
            for (n, sample) in frame.iter().enumerate() {
                let angle = -2.0 * PI * (k * n) as f32 / FFT_SIZE as f32;
                re += sample * angle.cos();
                im += sample * angle.sin();
            }
            let magnitude = (re * re + im * im).sqrt() / FFT_SIZE as f32;
            self.smoothed[k] = SMOOTHING * self.smoothed[k] + (1.0 - SMOOTHING) * magnitude;
            self.bytes[k] = to_byte(self.smoothed[k]);
        }
    }
}

fn to_byte(magnitude: f32) -> u8 {
    if magnitude <= 0.0 {
        return 0;
    }
    let db = 20.0 * magnitude.log10();
    let scaled = (db - MIN_DECIBELS) / (MAX_DECIBELS - MIN_DECIBELS) * 255.0;
    scaled.clamp(0.0, 255.0) as u8
}

impl FrequencySource for SpectrumAnalyser {
    fn frequency_data(&self) -> &[u8] {
        &self.bytes
    }
}

impl FrequencySource for Vec<u8> {
    fn frequency_data(&self) -> &[u8] {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tone(frequency: f32, sample_rate: u32, seconds: f32) -> AudioClip {
        let count = (sample_rate as f32 * seconds) as usize;
        let samples = (0..count)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                (128.0 + 8.0 * (2.0 * PI * frequency * t).sin()).round() as u8
            })
            .collect();
        AudioClip {
            sample_rate,
            samples,
        }
    }

    #[test]
    fn test_bar_scale_bounds() {
        assert_eq!(bar_scale(0), 0.1);
        assert!((bar_scale(255) - 3.984375).abs() < 1e-6);
        assert_eq!(bar_scale(64), 1.0);
    }

    #[test]
    fn test_apply_bar_scale_keeps_base_on_ground() {
        let mut transform = Transform::IDENTITY;
        apply_bar_scale(&mut transform, 128);
        assert_eq!(transform.scale.y, 2.0);
        assert_eq!(transform.translation.y, 1.0);
    }

    #[test]
    fn test_paused_analyser_stays_silent() {
        let mut analyser = SpectrumAnalyser::new(tone(1000.0, 8000, 1.0));
        for _ in 0..10 {
            analyser.advance(0.016);
        }
        assert_eq!(analyser.position(), 0.0);
        assert!(analyser.frequency_data().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_tone_peaks_in_matching_bin() {
        // 1000 Hz at 8 kHz with 64-point frames lands in bin 8
        let mut analyser = SpectrumAnalyser::new(tone(1000.0, 8000, 1.0));
        analyser.play();
        for _ in 0..30 {
            analyser.advance(0.016);
        }
        let data = analyser.frequency_data();
        assert_eq!(data.len(), BIN_COUNT);
        let peak = (0..BIN_COUNT).max_by_key(|&k| data[k]).unwrap();
        assert_eq!(peak, 8);
        assert!(data[8] > data[20]);
    }

    #[test]
    fn test_playback_loops() {
        let mut analyser = SpectrumAnalyser::new(tone(440.0, 8000, 0.05));
        analyser.play();
        for _ in 0..10 {
            analyser.advance(0.016);
        }
        assert!(analyser.position() < 0.05);
    }

    #[test]
    fn test_toggle() {
        let mut analyser = SpectrumAnalyser::new(AudioClip::default());
        assert!(analyser.toggle());
        assert!(!analyser.toggle());
        analyser.play();
        analyser.advance(0.1);
        assert!(analyser.frequency_data().iter().all(|&b| b == 0));
    }
}
