//! Bubble Joy entry point
//!
//! Runs a headless session on a watch-sized screen: a scripted player holds a
//! random bubble once a second and the log shows what the game did.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use bubble_joy::Game;
use bubble_joy::Settings;
use bubble_joy::audio::AudioManager;
use bubble_joy::consts::FRAME_DT;
use bubble_joy::haptics::LogHaptics;
use bubble_joy::input::{PointerEvent, PointerId};
use bubble_joy::platform::FixedBounds;
use bubble_joy::renderer::build_mesh;

const SCREEN_WIDTH: f32 = 184.0;
const SCREEN_HEIGHT: f32 = 224.0;
const SESSION_SECONDS: u32 = 20;
/// Longer than the long-press threshold, so every hold pops
const HOLD_SECONDS: f64 = 0.4;

/// Play one scripted session and return (pops, refills)
fn run_session(settings: Settings, audio: AudioManager) -> (usize, usize) {
    let mut game = Game::new(
        settings,
        audio,
        Box::new(LogHaptics),
        Box::new(FixedBounds::new(SCREEN_WIDTH, SCREEN_HEIGHT)),
    );
    game.start();
    let initial = game.state().bubbles.len();
    let mut player = Pcg32::seed_from_u64(game.state().seed.wrapping_add(1));
    let mut seen_revision = game.revision();
    let mut redraws = 0usize;

    let frames_per_second = (1.0 / FRAME_DT).round() as u32;
    let hold_frames = (HOLD_SECONDS / FRAME_DT).round() as u32;
    let mut held: Option<PointerId> = None;

    for frame in 0..SESSION_SECONDS * frames_per_second {
        if frame % frames_per_second == 0 {
            let targets: Vec<Vec2> = game
                .state()
                .active_bubbles()
                .filter(|b| b.can_pop())
                .map(|b| b.pos)
                .collect();
            if !targets.is_empty() {
                let pos = targets[player.random_range(0..targets.len())];
                let pointer = PointerId(u64::from(frame / frames_per_second));
                game.handle_pointer(PointerEvent::Down { pointer, pos });
                held = Some(pointer);
            }
        }
        if frame % frames_per_second == hold_frames {
            if let Some(pointer) = held.take() {
                game.handle_pointer(PointerEvent::Up { pointer });
            }
        }

        game.advance(FRAME_DT);

        if game.needs_redraw(seen_revision) {
            seen_revision = game.revision();
            redraws += 1;
        }
        if (frame + 1) % frames_per_second == 0 {
            let mesh = build_mesh(&game.snapshot());
            log::info!(
                "t={:>5.2}s active={} particles={} waves={} vertices={}",
                game.now(),
                game.state().active_count(),
                game.state().particles.len(),
                game.state().waves.len(),
                mesh.len()
            );
        }
    }
    game.stop();

    let pops = game.state().bubbles.iter().filter(|b| b.is_popped()).count();
    let refills = game.state().bubbles.len().saturating_sub(initial);
    log::info!("Session over: {pops} pops, {refills} refills, {redraws} redrawn frames");
    (pops, refills)
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use bubble_joy::audio::FileAudioBackend;
    use std::path::PathBuf;

    env_logger::init();
    log::info!("Bubble Joy (native) starting...");

    let config = std::env::args_os().nth(1).map(PathBuf::from);
    let settings = Settings::load_or_default(config.as_deref());
    let audio = AudioManager::new(
        Box::new(FileAudioBackend::new(&settings.asset_dir)),
        &settings.sound_resource,
        settings.effective_volume(),
    );

    let (pops, refills) = run_session(settings, audio);
    println!("{pops} bubbles popped, {refills} refilled");
}

#[cfg(target_arch = "wasm32")]
fn main() {
    use bubble_joy::audio::WebAudioBackend;

    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        return;
    }
    log::info!("Bubble Joy (wasm) starting...");

    let settings = Settings::default();
    let audio = AudioManager::new(
        Box::new(WebAudioBackend::new()),
        &settings.sound_resource,
        settings.effective_volume(),
    );
    run_session(settings, audio);
}
