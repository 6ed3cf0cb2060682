//! Procedural effect synthesizer
//!
//! One voice, one envelope: an effect is armed with a start frequency and
//! amplitude plus per-sample decay factors, and every rendered sample
//! multiplies both down. Nothing re-idles the voice; a decayed envelope just
//! keeps producing near-silent output until the next effect is armed.
//!
//! The [`Synth`] belongs to whatever thread pulls audio. The tick loop holds a
//! [`SynthHandle`] and arms effects through it. The handle publishes the whole
//! patch through atomics and bumps a generation counter; the synth checks the
//! counter once per sample. There is no lock: a sample rendered while an arm is
//! in progress uses either the old or the new patch, which is fine for one-shot
//! effects.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, AtomicU32, AtomicU64, Ordering};

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::SAMPLE_RATE;

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Waveform {
    /// Not armed yet; outputs silence
    #[default]
    Silent = 0,
    Noise = 1,
    Square = 2,
}

impl Waveform {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => Waveform::Noise,
            2 => Waveform::Square,
            _ => Waveform::Silent,
        }
    }
}

/// Everything `arm` needs to start an effect
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Patch {
    pub waveform: Waveform,
    pub freq_start: f32,
    pub freq_decay: f32,
    pub amp_start: f32,
    pub amp_decay: f32,
}

impl Patch {
    pub const fn new(
        waveform: Waveform,
        freq_start: f32,
        freq_decay: f32,
        amp_start: f32,
        amp_decay: f32,
    ) -> Self {
        Self {
            waveform,
            freq_start,
            freq_decay,
            amp_start,
            amp_decay,
        }
    }

    /// Player shot - falling square tone
    pub const SHOT: Patch = Patch::new(Waveform::Square, 440.0, 0.99999, 0.85, 0.9995);
    /// Enemy or player destroyed - noise burst
    pub const EXPLOSION: Patch = Patch::new(Waveform::Noise, 440.0, 0.99999, 0.85, 0.9995);
}

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player shot launched
    Shot,
    /// Enemy destroyed or player hit
    Explosion,
}

impl SoundEffect {
    pub fn patch(self) -> Patch {
        match self {
            SoundEffect::Shot => Patch::SHOT,
            SoundEffect::Explosion => Patch::EXPLOSION,
        }
    }
}

/// Anything the simulation can arm effects on
pub trait SoundSink {
    fn arm(&mut self, patch: Patch);

    fn play(&mut self, effect: SoundEffect) {
        self.arm(effect.patch());
    }
}

/// Discards every effect (headless runs, tests)
impl SoundSink for () {
    fn arm(&mut self, _patch: Patch) {}
}

/// Live envelope state, owned by the audio thread
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Envelope {
    pub waveform: Waveform,
    pub sample_index: u64,
    pub freq_current: f32,
    pub freq_decay: f32,
    pub amp_current: f32,
    pub amp_decay: f32,
}

impl Envelope {
    fn armed(patch: Patch) -> Self {
        Self {
            waveform: patch.waveform,
            sample_index: 0,
            freq_current: patch.freq_start,
            freq_decay: patch.freq_decay,
            amp_current: patch.amp_start,
            amp_decay: patch.amp_decay,
        }
    }

    fn advance(&mut self) {
        self.sample_index += 1;
        self.freq_current *= self.freq_decay;
        self.amp_current *= self.amp_decay;
    }
}

/// Last published patch. f32 fields are stored as raw bits.
#[derive(Debug, Default)]
struct SharedPatch {
    generation: AtomicU64,
    waveform: AtomicU8,
    freq_start: AtomicU32,
    freq_decay: AtomicU32,
    amp_start: AtomicU32,
    amp_decay: AtomicU32,
}

impl SharedPatch {
    fn publish(&self, patch: Patch) {
        self.waveform.store(patch.waveform as u8, Ordering::Relaxed);
        self.freq_start.store(patch.freq_start.to_bits(), Ordering::Relaxed);
        self.freq_decay.store(patch.freq_decay.to_bits(), Ordering::Relaxed);
        self.amp_start.store(patch.amp_start.to_bits(), Ordering::Relaxed);
        self.amp_decay.store(patch.amp_decay.to_bits(), Ordering::Relaxed);
        self.generation.fetch_add(1, Ordering::Release);
    }

    fn load(&self) -> Patch {
        Patch {
            waveform: Waveform::from_u8(self.waveform.load(Ordering::Relaxed)),
            freq_start: f32::from_bits(self.freq_start.load(Ordering::Relaxed)),
            freq_decay: f32::from_bits(self.freq_decay.load(Ordering::Relaxed)),
            amp_start: f32::from_bits(self.amp_start.load(Ordering::Relaxed)),
            amp_decay: f32::from_bits(self.amp_decay.load(Ordering::Relaxed)),
        }
    }
}

/// Cloneable, thread-safe way to arm a [`Synth`] owned elsewhere
#[derive(Debug, Clone)]
pub struct SynthHandle {
    shared: Arc<SharedPatch>,
}

impl SynthHandle {
    /// Replace the current effect; picked up at the synth's next sample
    pub fn arm(&self, patch: Patch) {
        self.shared.publish(patch);
    }
}

impl SoundSink for SynthHandle {
    fn arm(&mut self, patch: Patch) {
        SynthHandle::arm(self, patch);
    }
}

/// Single-voice effect synthesizer
#[derive(Debug)]
pub struct Synth {
    envelope: Envelope,
    sample_rate: f32,
    gain: f32,
    rng: Pcg32,
    shared: Arc<SharedPatch>,
    seen_generation: u64,
}

impl Default for Synth {
    fn default() -> Self {
        Self::new(SAMPLE_RATE, 0)
    }
}

impl Synth {
    /// `seed` drives the noise generator
    pub fn new(sample_rate: u32, seed: u64) -> Self {
        Self {
            envelope: Envelope::default(),
            sample_rate: sample_rate as f32,
            gain: 1.0,
            rng: Pcg32::seed_from_u64(seed),
            shared: Arc::new(SharedPatch::default()),
            seen_generation: 0,
        }
    }

    /// Handle for arming this synth from another thread
    pub fn handle(&self) -> SynthHandle {
        SynthHandle {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Restart the envelope with a new patch
    pub fn arm(&mut self, patch: Patch) {
        self.envelope = Envelope::armed(patch);
    }

    /// Output scale (master volume); does not touch the envelope
    pub fn set_gain(&mut self, gain: f32) {
        self.gain = gain.clamp(0.0, 1.0);
    }

    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Render one mono sample and advance the envelope
    pub fn next_sample(&mut self) -> f32 {
        self.poll_handle();

        let env = &self.envelope;
        let value = match env.waveform {
            Waveform::Silent => 0.0,
            Waveform::Noise => env.amp_current * self.rng.random_range(-1.0f32..=1.0),
            Waveform::Square => {
                let period = f64::from(self.sample_rate) / f64::from(env.freq_current);
                let phase = env.sample_index as f64 % period;
                let sign = if phase < period / 2.0 { -1.0 } else { 1.0 };
                env.amp_current * sign
            }
        };

        self.envelope.advance();
        value * self.gain
    }

    /// Fill an output block, as an audio device callback would
    pub fn fill(&mut self, buf: &mut [f32]) {
        for sample in buf.iter_mut() {
            *sample = self.next_sample();
        }
    }

    fn poll_handle(&mut self) {
        let generation = self.shared.generation.load(Ordering::Acquire);
        if generation != self.seen_generation {
            self.seen_generation = generation;
            self.arm(self.shared.load());
        }
    }
}

impl SoundSink for Synth {
    fn arm(&mut self, patch: Patch) {
        Synth::arm(self, patch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silent_until_armed() {
        let mut synth = Synth::default();
        let mut buf = [1.0f32; 64];
        synth.fill(&mut buf);
        assert!(buf.iter().all(|&s| s == 0.0));
        assert_eq!(synth.envelope().waveform, Waveform::Silent);
    }

    #[test]
    fn test_square_envelope_decays() {
        let mut synth = Synth::new(48_000, 1);
        synth.arm(Patch::new(Waveform::Square, 440.0, 0.99999, 0.85, 0.9995));

        let mut last = f32::INFINITY;
        for _ in 0..100 {
            let level = synth.next_sample().abs();
            assert!(level <= last);
            last = level;
        }

        let expected = 0.85 * 0.9995f32.powi(100);
        assert!((synth.envelope().amp_current - expected).abs() < 1e-4);
        assert_eq!(synth.envelope().sample_index, 100);
    }

    #[test]
    fn test_square_sign_flips_at_half_period() {
        // 480 Hz at 48 kHz: 100-sample period
        let mut synth = Synth::new(48_000, 1);
        synth.arm(Patch::new(Waveform::Square, 480.0, 1.0, 0.5, 1.0));
        let samples: Vec<f32> = (0..200).map(|_| synth.next_sample()).collect();

        assert!(samples[..50].iter().all(|&s| s == -0.5));
        assert!(samples[50..100].iter().all(|&s| s == 0.5));
        assert!(samples[100..150].iter().all(|&s| s == -0.5));
    }

    #[test]
    fn test_noise_bounded_and_seeded() {
        let render = |seed| {
            let mut synth = Synth::new(48_000, seed);
            synth.arm(Patch::EXPLOSION);
            (0..256).map(|_| synth.next_sample()).collect::<Vec<f32>>()
        };
        let a = render(7);
        assert_eq!(a, render(7));
        assert_ne!(a, render(8));
        assert!(a.iter().all(|s| s.abs() <= 0.85));
        assert!(a.iter().any(|&s| s > 0.0) && a.iter().any(|&s| s < 0.0));
    }

    #[test]
    fn test_rearm_resets_envelope() {
        let mut synth = Synth::default();
        synth.arm(Patch::SHOT);
        for _ in 0..1000 {
            synth.next_sample();
        }
        synth.arm(Patch::EXPLOSION);
        let env = synth.envelope();
        assert_eq!(env.sample_index, 0);
        assert_eq!(env.amp_current, 0.85);
        assert_eq!(env.waveform, Waveform::Noise);
    }

    #[test]
    fn test_envelope_never_reidles() {
        let mut synth = Synth::default();
        synth.arm(Patch::SHOT);
        for _ in 0..48_000 {
            synth.next_sample();
        }
        assert_eq!(synth.envelope().waveform, Waveform::Square);
        assert!(synth.envelope().amp_current < 1e-6);
    }

    #[test]
    fn test_gain_scales_output_only() {
        let mut synth = Synth::default();
        synth.set_gain(0.5);
        synth.arm(Patch::new(Waveform::Square, 480.0, 1.0, 0.8, 1.0));
        assert_eq!(synth.next_sample(), -0.4);
        assert_eq!(synth.envelope().amp_current, 0.8);
    }

    #[test]
    fn test_handle_arms_from_other_thread() {
        let mut synth = Synth::default();
        let handle = synth.handle();
        std::thread::spawn(move || handle.arm(Patch::SHOT))
            .join()
            .unwrap();

        synth.next_sample();
        let env = synth.envelope();
        assert_eq!(env.waveform, Waveform::Square);
        assert_eq!(env.sample_index, 1);

        // No new arm: the envelope keeps running
        synth.next_sample();
        assert_eq!(synth.envelope().sample_index, 2);
    }

    #[test]
    fn test_sound_effect_patches() {
        let mut synth = Synth::default();
        synth.play(SoundEffect::Shot);
        assert_eq!(synth.envelope().waveform, Waveform::Square);
        synth.play(SoundEffect::Explosion);
        assert_eq!(synth.envelope().waveform, Waveform::Noise);
        assert_eq!(synth.envelope().freq_current, 440.0);
    }
}
