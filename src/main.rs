//! Pixel Invaders headless runner
//!
//! Drives the simulation with demo input at 60 Hz, draws every frame into the
//! software frame buffer and pulls audio blocks on a separate thread the way a
//! device callback would. Window and audio device setup belong to the host.
//!
//! Usage: `pixel-invaders [settings.json]`

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use pixel_invaders::sim::{GamePhase, GameState, demo_input};
use pixel_invaders::{FrameBuffer, Palette, Settings, Synth};

/// Samples per audio pull
const AUDIO_BLOCK: usize = 4096;
const TICK: Duration = Duration::from_micros(16_667);

#[derive(Debug, Default)]
struct AudioStats {
    blocks: u64,
    peak: f32,
}

/// Audio producer: renders blocks at roughly real-time pace until stopped
fn run_audio(mut synth: Synth, running: &AtomicBool) -> AudioStats {
    let block_time = Duration::from_secs_f32(AUDIO_BLOCK as f32 / synth.sample_rate());
    let mut buf = vec![0.0f32; AUDIO_BLOCK];
    let mut stats = AudioStats::default();

    while running.load(Ordering::Relaxed) {
        synth.fill(&mut buf);
        stats.blocks += 1;
        stats.peak = buf.iter().fold(stats.peak, |peak, s| peak.max(s.abs()));
        thread::sleep(block_time);
    }
    stats
}

fn main() {
    env_logger::init();
    log::info!("Pixel Invaders (headless) starting...");

    let settings = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .map(|path| Settings::load(&path))
        .unwrap_or_default();

    let mut synth = Synth::new(settings.sample_rate, settings.noise_seed);
    synth.set_gain(settings.effective_volume());
    let mut sound = synth.handle();

    let running = Arc::new(AtomicBool::new(true));
    let audio = {
        let running = Arc::clone(&running);
        thread::spawn(move || run_audio(synth, &running))
    };

    let mut state = GameState::new();
    let palette = Palette::new();
    let mut frame = FrameBuffer::new();
    let mut last_phase = state.phase;
    let started = Instant::now();

    for _ in 0..settings.demo_ticks {
        let tick_start = Instant::now();

        let input = demo_input(&state);
        state.step(input, &mut sound);
        frame.render(&state.pool, &palette);

        if state.phase != last_phase {
            log::info!("Phase {:?} -> {:?}", last_phase, state.phase);
            last_phase = state.phase;
        }
        if state.phase == GamePhase::GameOver {
            break;
        }

        if let Some(rest) = TICK.checked_sub(tick_start.elapsed()) {
            thread::sleep(rest);
        }
    }

    running.store(false, Ordering::Relaxed);
    match audio.join() {
        Ok(stats) => log::info!(
            "Audio: {} blocks rendered, peak level {:.3}",
            stats.blocks,
            stats.peak
        ),
        Err(_) => log::error!("Audio thread panicked"),
    }

    log::info!(
        "Finished after {} ticks ({:.1}s): {} enemies left, {} lives, {} pixels lit",
        state.time_ticks,
        started.elapsed().as_secs_f32(),
        state.formation.alive_count,
        state.lives,
        frame.lit_pixels()
    );
}
