//! Game controller
//!
//! Owns the state, the timer queue and the platform collaborators. Every
//! mutation goes through a method here; the host only feeds pointer events,
//! advances the clock and reads snapshots.

use crate::audio::{AudioManager, SoundEffect};
use crate::consts::*;
use crate::haptics::{HapticDevice, HapticKind};
use crate::input::{PointerEvent, PointerId, Press, PressTracker, hit_test};
use crate::platform::ScreenBounds;
use crate::renderer::RenderSnapshot;
use crate::settings::Settings;
use crate::sim::effects::{prune_faded, spawn_particles, spawn_waves, start_wave};
use crate::sim::layout::place_detailed;
use crate::sim::state::{Bubble, BubblePhase, BubbleStyle, GameState};
use crate::sim::timer::{TimerId, TimerQueue};
use crate::sim::tween::Easing;

/// Deferred work scheduled on the timer queue
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimerEvent {
    /// Top the bubble set back up (recurring)
    Refill,
    /// Delayed haptic pulse of a pop
    Haptic(HapticKind),
    /// Second half of the pop animation
    ShrinkBubble(u32),
    /// Pop animation done; bubble leaves the screen
    FinishPop(u32),
    /// Staggered ring growth
    StartWave(u64),
    /// A press has been held long enough
    LongPress(PointerId),
}

pub struct Game {
    state: GameState,
    settings: Settings,
    timers: TimerQueue<TimerEvent>,
    presses: PressTracker,
    audio: AudioManager,
    haptics: Box<dyn HapticDevice>,
    bounds: Box<dyn ScreenBounds>,
    /// Clock in seconds since the game was created
    now: f64,
    refill_timer: Option<TimerId>,
    /// Bumped on every state change the renderer cares about
    revision: u64,
}

impl Game {
    pub fn new(
        settings: Settings,
        audio: AudioManager,
        haptics: Box<dyn HapticDevice>,
        bounds: Box<dyn ScreenBounds>,
    ) -> Self {
        let settings = settings.sanitized();
        let seed = settings.seed.unwrap_or_else(rand::random);
        let mut audio = audio;
        audio.set_volume(settings.effective_volume());
        log::info!("Game created with seed {seed}");
        Self {
            state: GameState::new(seed),
            settings,
            timers: TimerQueue::new(),
            presses: PressTracker::new(),
            audio,
            haptics,
            bounds,
            now: 0.0,
            refill_timer: None,
            revision: 0,
        }
    }

    /// Place the initial bubbles and start the refill timer.
    /// Calling it on a running game does nothing.
    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }
        let target = self.settings.tuning.target_bubbles;
        while self.state.active_count() < target {
            self.spawn_bubble();
        }
        let interval = self.settings.tuning.refill_interval;
        self.refill_timer = Some(self.timers.schedule_repeating(
            self.now + interval,
            interval,
            TimerEvent::Refill,
        ));
        log::info!(
            "Game started with {} bubbles, refill every {:.2}s",
            self.state.active_count(),
            interval
        );
    }

    /// Cancel all pending work. Running tweens play out, but no further
    /// timed steps run: bubbles mid-pop finish at once and rings that never
    /// started growing are dropped.
    pub fn stop(&mut self) {
        if !self.is_running() {
            return;
        }
        self.presses.clear();
        self.timers.clear();
        self.refill_timer = None;
        self.state.pressed_bubble = None;
        for bubble in &mut self.state.bubbles {
            if bubble.phase == BubblePhase::Popping {
                bubble.phase = BubblePhase::Popped;
            }
        }
        self.state.waves.retain(|w| w.started);
        self.touch();
        log::info!("Game stopped at t={:.2}s", self.now);
    }

    pub fn is_running(&self) -> bool {
        self.refill_timer.is_some()
    }

    /// Advance the clock by `dt` seconds, running every timer that comes due.
    /// While a timer runs, the clock reads exactly its deadline.
    pub fn advance(&mut self, dt: f64) {
        if !dt.is_finite() {
            log::warn!("Ignoring non-finite time step {dt}");
            return;
        }
        let target = self.now + dt.max(0.0);
        while let Some(fired) = self.timers.pop_due(target) {
            self.now = self.now.max(fired.fire_at);
            self.handle_timer(fired.id, fired.event);
        }
        self.now = target;
    }

    /// Feed one pointer event from the host
    pub fn handle_pointer(&mut self, event: PointerEvent) {
        if !self.is_running() {
            return;
        }
        match event {
            PointerEvent::Down { pointer, pos } => {
                self.release(pointer);
                let Some(bubble_id) = hit_test(&self.state, pos, self.settings.tuning.bubble_size)
                else {
                    return;
                };
                let timer = self.timers.schedule_at(
                    self.now + self.settings.tuning.long_press_duration,
                    TimerEvent::LongPress(pointer),
                );
                self.presses.begin(
                    pointer,
                    Press {
                        bubble_id,
                        origin: pos,
                        timer: Some(timer),
                    },
                );
                self.state.pressed_bubble = Some(bubble_id);
                self.animate_press(bubble_id, self.settings.effective_press_scale());
            }
            PointerEvent::Move { pointer, pos } => {
                let max_drift = self.settings.tuning.long_press_max_drift;
                if let Some(timer) = self.presses.moved(pointer, pos, max_drift) {
                    self.timers.cancel(timer);
                    log::trace!("Long press cancelled by drift ({:?})", pointer);
                }
            }
            PointerEvent::Up { pointer } => self.release(pointer),
        }
    }

    /// Run the pop sequence for bubble `id`.
    ///
    /// Returns false (and does nothing) when the bubble is unknown or already
    /// popping/popped.
    pub fn pop_bubble(&mut self, id: u32) -> bool {
        let (pos, style) = match self.state.bubble(id) {
            Some(b) if b.can_pop() => (b.pos, b.style),
            _ => return false,
        };
        let now = self.now;
        log::debug!("Popping bubble {id} at ({:.1}, {:.1})", pos.x, pos.y);

        if self.settings.sound_enabled {
            self.audio.play(SoundEffect::Pop);
        }
        if self.settings.haptics_enabled {
            for offset in HAPTIC_OFFSETS {
                if offset <= 0.0 {
                    self.haptics.pulse(HapticKind::Click);
                } else {
                    self.timers
                        .schedule_at(now + offset, TimerEvent::Haptic(HapticKind::Click));
                }
            }
        }

        if self.settings.particles {
            let tuning = &self.settings.tuning;
            prune_faded(&mut self.state, now);
            spawn_particles(&mut self.state, pos, style, now, tuning);
            for wave in spawn_waves(&mut self.state, pos, style, tuning) {
                if wave.delay <= 0.0 {
                    start_wave(&mut self.state, wave.id, now);
                } else {
                    self.timers
                        .schedule_at(now + wave.delay, TimerEvent::StartWave(wave.id));
                }
            }
        }

        if let Some(bubble) = self.state.bubble_mut(id) {
            bubble.phase = BubblePhase::Popping;
            bubble
                .scale
                .retarget(now, POP_SWELL_SCALE, POP_SWELL_DURATION, Easing::EaseOut);
        }
        self.timers
            .schedule_at(now + POP_SWELL_DURATION, TimerEvent::ShrinkBubble(id));
        self.timers
            .schedule_at(now + POP_FINISH_DELAY, TimerEvent::FinishPop(id));
        self.touch();
        true
    }

    /// One refill step: add a single bubble if below the target count.
    /// Returns the id of the new bubble.
    pub fn refill(&mut self) -> Option<u32> {
        if self.state.active_count() >= self.settings.tuning.target_bubbles {
            return None;
        }
        let id = self.spawn_bubble();
        log::debug!(
            "Refilled bubble {id}, {} active",
            self.state.active_count()
        );
        Some(id)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Current clock time in seconds
    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Deadline of the next scheduled step, if any
    pub fn next_deadline(&mut self) -> Option<f64> {
        self.timers.next_deadline()
    }

    /// Whether anything on screen is still moving
    pub fn is_animating(&self) -> bool {
        let now = self.now;
        let breathing = self.settings.breathing_enabled() && self.state.active_count() > 0;
        breathing
            || self.state.active_bubbles().any(|b| {
                b.phase == BubblePhase::Popping || !b.press_scale.is_finished(now)
            })
            || self.state.particles.iter().any(|p| !p.opacity.is_finished(now))
            || self
                .state
                .waves
                .iter()
                .any(|w| !w.started || !w.opacity.is_finished(now))
    }

    /// Redraw when the state changed since `seen_revision` or an animation runs
    pub fn needs_redraw(&self, seen_revision: u64) -> bool {
        self.revision != seen_revision || self.is_animating()
    }

    /// Draw list for the current instant
    pub fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot::capture(
            &self.state,
            self.now,
            self.bounds.current_bounds(),
            &self.settings,
        )
    }

    fn handle_timer(&mut self, timer: TimerId, event: TimerEvent) {
        match event {
            TimerEvent::Refill => {
                self.refill();
            }
            TimerEvent::Haptic(kind) => {
                if self.settings.haptics_enabled {
                    self.haptics.pulse(kind);
                }
            }
            TimerEvent::ShrinkBubble(id) => {
                let now = self.now;
                if let Some(bubble) = self.state.bubble_mut(id) {
                    bubble
                        .scale
                        .retarget(now, POP_SHRINK_SCALE, POP_SHRINK_DURATION, Easing::EaseIn);
                    bubble
                        .opacity
                        .retarget(now, 0.0, POP_SHRINK_DURATION, Easing::EaseIn);
                }
                self.touch();
            }
            TimerEvent::FinishPop(id) => {
                if let Some(bubble) = self.state.bubble_mut(id) {
                    bubble.phase = BubblePhase::Popped;
                }
                if self.state.pressed_bubble == Some(id) {
                    self.state.pressed_bubble = None;
                }
                self.touch();
            }
            TimerEvent::StartWave(id) => {
                start_wave(&mut self.state, id, self.now);
                self.touch();
            }
            TimerEvent::LongPress(pointer) => {
                if let Some(bubble_id) = self.presses.fire(pointer, timer) {
                    self.pop_bubble(bubble_id);
                }
            }
        }
    }

    /// Place one new bubble against the active ones
    fn spawn_bubble(&mut self) -> u32 {
        let tuning = &self.settings.tuning;
        let id = self.state.next_bubble_id();
        let existing = self.state.active_positions();
        let screen = self.bounds.current_bounds();
        let placement = place_detailed(
            &existing,
            tuning.bubble_size,
            screen,
            tuning,
            &mut self.state.rng,
        );
        let style = BubbleStyle::random(&mut self.state.rng);
        log::trace!(
            "Placed bubble {id} after {} attempts{}",
            placement.attempts,
            if placement.overlapping { " (overlapping)" } else { "" }
        );
        self.state
            .bubbles
            .push(Bubble::new(id, placement.pos, style, self.now));
        self.touch();
        id
    }

    /// End the press held by `pointer`, if any
    fn release(&mut self, pointer: PointerId) {
        let Some(press) = self.presses.end(pointer) else {
            return;
        };
        if let Some(timer) = press.timer {
            self.timers.cancel(timer);
        }
        if self.state.pressed_bubble == Some(press.bubble_id) {
            self.state.pressed_bubble = None;
        }
        if !self.presses.is_pressing(press.bubble_id) {
            self.animate_press(press.bubble_id, 1.0);
        }
        self.touch();
    }

    fn animate_press(&mut self, bubble_id: u32, to: f32) {
        let now = self.now;
        if let Some(bubble) = self.state.bubble_mut(bubble_id) {
            bubble
                .press_scale
                .retarget(now, to, PRESS_SCALE_DURATION, Easing::EaseInOut);
        }
        self.touch();
    }

    fn touch(&mut self) {
        self.revision += 1;
    }
}

impl std::fmt::Debug for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("now", &self.now)
            .field("revision", &self.revision)
            .field("active", &self.state.active_count())
            .field("timers", &self.timers.len())
            .field("audio", &self.audio)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use proptest::prelude::*;

    use super::*;
    use crate::audio::SoundHandle;
    use crate::audio::testing::RecordingAudio;
    use crate::haptics::testing::RecordingHaptics;
    use crate::platform::{FixedBounds, SharedBounds};
    use crate::sim::layout::placement_bounds;
    use crate::tuning::Tuning;

    struct Harness {
        game: Game,
        pulses: Rc<RefCell<Vec<HapticKind>>>,
        plays: Rc<RefCell<Vec<(SoundHandle, f32)>>>,
    }

    fn harness_with(settings: Settings, sound_available: bool) -> Harness {
        harness_on(
            settings,
            sound_available,
            Box::new(FixedBounds::new(300.0, 340.0)),
        )
    }

    fn harness_on(
        settings: Settings,
        sound_available: bool,
        bounds: Box<dyn ScreenBounds>,
    ) -> Harness {
        let audio_backend = RecordingAudio {
            available: sound_available,
            ..Default::default()
        };
        let plays = audio_backend.plays.clone();
        let haptics = RecordingHaptics::default();
        let pulses = haptics.pulses.clone();
        let audio = AudioManager::new(Box::new(audio_backend), POP_SOUND, 1.0);
        let mut game = Game::new(
            settings,
            audio,
            Box::new(haptics),
            bounds,
        );
        game.start();
        Harness {
            game,
            pulses,
            plays,
        }
    }

    fn harness(seed: u64) -> Harness {
        let settings = Settings {
            seed: Some(seed),
            ..Default::default()
        };
        harness_with(settings, true)
    }

    fn first_active(game: &Game) -> u32 {
        game.state().active_bubbles().next().unwrap().id
    }

    #[test]
    fn test_start_places_four() {
        let h = harness(1);
        let ids: Vec<u32> = h.game.state().bubbles.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
        assert_eq!(h.game.state().active_count(), 4);
        assert!(h.game.is_running());
    }

    #[test]
    fn test_start_twice_is_noop() {
        let mut h = harness(1);
        h.game.start();
        assert_eq!(h.game.state().bubbles.len(), 4);
        assert_eq!(h.game.timers.len(), 1);
    }

    #[test]
    fn test_pop_spawns_effects() {
        let mut h = harness(2);
        let id = first_active(&h.game);
        assert!(h.game.pop_bubble(id));

        let state = h.game.state();
        assert!((8..=12).contains(&state.particles.len()));
        assert_eq!(state.waves.len(), 3);
        assert_eq!(state.bubble(id).unwrap().phase, BubblePhase::Popping);
        assert_eq!(h.plays.borrow().len(), 1);
        assert_eq!(h.pulses.borrow().len(), 1);
    }

    #[test]
    fn test_pop_timeline() {
        let mut h = harness(3);
        let id = first_active(&h.game);
        h.game.advance(0.5);
        let t0 = h.game.now();
        h.game.pop_bubble(id);

        // Swell
        h.game.advance(0.1);
        let scale = h.game.state().bubble(id).unwrap().scale.sample(h.game.now());
        assert!(scale > 1.0 && scale < 1.2);

        // Shrink begins at +0.2
        h.game.advance(0.11);
        let bubble = h.game.state().bubble(id).unwrap();
        assert_eq!(bubble.scale.start, t0 + 0.2);
        assert_eq!(bubble.scale.to, 0.1);
        assert_eq!(bubble.opacity.to, 0.0);

        // Not popped before +0.35
        h.game.advance(0.13);
        assert_eq!(h.game.state().bubble(id).unwrap().phase, BubblePhase::Popping);
        assert_eq!(h.game.state().active_count(), 4);

        h.game.advance(0.03);
        assert!(h.game.state().bubble(id).unwrap().is_popped());
        assert_eq!(h.game.state().active_count(), 3);
    }

    #[test]
    fn test_haptic_pulses_staggered() {
        let mut h = harness(4);
        let id = first_active(&h.game);
        h.game.pop_bubble(id);
        assert_eq!(h.pulses.borrow().len(), 1);

        h.game.advance(0.04);
        assert_eq!(h.pulses.borrow().len(), 1);
        h.game.advance(0.02);
        assert_eq!(h.pulses.borrow().len(), 2);
        h.game.advance(0.05);
        assert_eq!(h.pulses.borrow().len(), 3);
        h.game.advance(1.0);
        assert_eq!(h.pulses.borrow().as_slice(), &[HapticKind::Click; 3]);
    }

    #[test]
    fn test_waves_start_staggered() {
        let mut h = harness(5);
        let id = first_active(&h.game);
        h.game.pop_bubble(id);

        let started = |g: &Game| g.state().waves.iter().filter(|w| w.started).count();
        assert_eq!(started(&h.game), 1);
        h.game.advance(0.11);
        assert_eq!(started(&h.game), 2);
        h.game.advance(0.1);
        assert_eq!(started(&h.game), 3);
    }

    #[test]
    fn test_double_pop_is_noop() {
        let mut h = harness(6);
        let id = first_active(&h.game);
        assert!(h.game.pop_bubble(id));
        let particles = h.game.state().particles.len();

        // Racing second pop while still animating
        assert!(!h.game.pop_bubble(id));
        assert_eq!(h.game.state().particles.len(), particles);
        assert_eq!(h.game.state().waves.len(), 3);
        assert_eq!(h.plays.borrow().len(), 1);

        // And after it finished
        h.game.advance(0.5);
        assert!(!h.game.pop_bubble(id));
        assert!(!h.game.pop_bubble(999));
        assert_eq!(h.pulses.borrow().len(), 3);
    }

    #[test]
    fn test_prunes_before_next_batch() {
        let mut h = harness(7);
        let first = first_active(&h.game);
        h.game.pop_bubble(first);
        h.game.advance(1.0);

        let second = first_active(&h.game);
        h.game.pop_bubble(second);
        // Old particles and rings were fully faded and got dropped
        assert!(h.game.state().particles.len() <= 12);
        assert_eq!(h.game.state().waves.len(), 3);
    }

    #[test]
    fn test_refill_restores_count() {
        let mut h = harness(8);
        let id = first_active(&h.game);
        h.game.pop_bubble(id);
        h.game.advance(0.4);
        assert_eq!(h.game.state().active_count(), 3);

        h.game.advance(1.2);
        assert_eq!(h.game.state().active_count(), 4);
        let newest = h.game.state().bubbles.last().unwrap();
        assert_eq!(newest.id, 4);
        assert!(!newest.is_popped());
    }

    #[test]
    fn test_refill_adds_one_per_tick() {
        let mut h = harness(9);
        let ids: Vec<u32> = h.game.state().active_bubbles().map(|b| b.id).collect();
        for id in ids {
            h.game.pop_bubble(id);
        }
        h.game.advance(1.0);
        assert_eq!(h.game.state().active_count(), 0);

        h.game.advance(0.5);
        assert_eq!(h.game.state().active_count(), 1);
        h.game.advance(1.5);
        assert_eq!(h.game.state().active_count(), 2);
        h.game.advance(3.0);
        assert_eq!(h.game.state().active_count(), 4);
        h.game.advance(3.0);
        assert_eq!(h.game.state().active_count(), 4);
    }

    #[test]
    fn test_refill_manual() {
        let mut h = harness(10);
        assert_eq!(h.game.refill(), None);
        let id = first_active(&h.game);
        h.game.pop_bubble(id);
        // Still popping: counts as active
        assert_eq!(h.game.refill(), None);
        h.game.advance(0.4);
        assert_eq!(h.game.refill(), Some(4));
    }

    #[test]
    fn test_missing_sound_still_pops() {
        let settings = Settings {
            seed: Some(11),
            ..Default::default()
        };
        let mut h = harness_with(settings, false);
        let id = first_active(&h.game);
        assert!(h.game.pop_bubble(id));
        assert!(h.plays.borrow().is_empty());
        assert_eq!(h.pulses.borrow().len(), 1);
        h.game.advance(0.4);
        assert!(h.game.state().bubble(id).unwrap().is_popped());
    }

    #[test]
    fn test_feedback_switches() {
        let settings = Settings {
            seed: Some(12),
            sound_enabled: false,
            haptics_enabled: false,
            particles: false,
            ..Default::default()
        };
        let mut h = harness_with(settings, true);
        let id = first_active(&h.game);
        assert!(h.game.pop_bubble(id));
        h.game.advance(0.4);
        assert!(h.plays.borrow().is_empty());
        assert!(h.pulses.borrow().is_empty());
        assert!(h.game.state().particles.is_empty());
        assert!(h.game.state().waves.is_empty());
        assert!(h.game.state().bubble(id).unwrap().is_popped());
    }

    #[test]
    fn test_long_press_pops_once() {
        let mut h = harness(13);
        let bubble = h.game.state().active_bubbles().next().unwrap().clone();
        let finger = PointerId(1);

        h.game.handle_pointer(PointerEvent::Down {
            pointer: finger,
            pos: bubble.pos,
        });
        assert_eq!(h.game.state().pressed_bubble, Some(bubble.id));

        h.game.advance(0.29);
        assert!(h.game.state().bubble(bubble.id).unwrap().can_pop());
        h.game.advance(0.02);
        assert_eq!(
            h.game.state().bubble(bubble.id).unwrap().phase,
            BubblePhase::Popping
        );

        // Holding longer never pops again
        h.game.advance(1.0);
        assert_eq!(h.plays.borrow().len(), 1);
        h.game.handle_pointer(PointerEvent::Up { pointer: finger });
        assert_eq!(h.game.state().pressed_bubble, None);
    }

    #[test]
    fn test_short_tap_does_not_pop() {
        let mut h = harness(14);
        let bubble = h.game.state().active_bubbles().next().unwrap().clone();
        let finger = PointerId(1);

        h.game.handle_pointer(PointerEvent::Down {
            pointer: finger,
            pos: bubble.pos,
        });
        h.game.advance(0.2);
        h.game.handle_pointer(PointerEvent::Up { pointer: finger });
        h.game.advance(1.0);

        assert!(h.game.state().bubble(bubble.id).unwrap().can_pop());
        assert_eq!(h.game.state().pressed_bubble, None);
        let press = h.game.state().bubble(bubble.id).unwrap().press_scale;
        assert_eq!(press.sample(h.game.now()), 1.0);
    }

    #[test]
    fn test_drift_cancels_long_press() {
        let mut h = harness(15);
        let bubble = h.game.state().active_bubbles().next().unwrap().clone();
        let finger = PointerId(3);

        h.game.handle_pointer(PointerEvent::Down {
            pointer: finger,
            pos: bubble.pos,
        });
        h.game.handle_pointer(PointerEvent::Move {
            pointer: finger,
            pos: bubble.pos + Vec2::new(15.0, 0.0),
        });
        h.game.advance(0.5);
        assert!(h.game.state().bubble(bubble.id).unwrap().can_pop());
        // Visual press stays until release
        assert_eq!(h.game.state().pressed_bubble, Some(bubble.id));
    }

    #[test]
    fn test_concurrent_presses_are_independent() {
        let mut h = harness(16);
        let bubbles: Vec<_> = h.game.state().active_bubbles().take(2).cloned().collect();

        h.game.handle_pointer(PointerEvent::Down {
            pointer: PointerId(1),
            pos: bubbles[0].pos,
        });
        h.game.advance(0.1);
        h.game.handle_pointer(PointerEvent::Down {
            pointer: PointerId(2),
            pos: bubbles[1].pos,
        });
        // First finger lifts early, second holds
        h.game.handle_pointer(PointerEvent::Up {
            pointer: PointerId(1),
        });
        h.game.advance(0.35);

        assert!(h.game.state().bubble(bubbles[0].id).unwrap().can_pop());
        assert!(!h.game.state().bubble(bubbles[1].id).unwrap().can_pop());
    }

    #[test]
    fn test_press_on_empty_space_ignored() {
        let mut h = harness(17);
        // Far outside the placement area
        h.game.handle_pointer(PointerEvent::Down {
            pointer: PointerId(1),
            pos: Vec2::new(-500.0, -500.0),
        });
        h.game.advance(1.0);
        assert_eq!(h.game.state().pressed_bubble, None);
        assert!(h.game.state().particles.is_empty());
    }

    #[test]
    fn test_stop_cancels_pending_work() {
        let mut h = harness(18);
        let id = first_active(&h.game);
        h.game.pop_bubble(id);
        h.game.stop();
        assert!(!h.game.is_running());

        // The interrupted pop is finished on the spot; nothing else runs
        assert!(h.game.state().bubble(id).unwrap().is_popped());
        assert_eq!(h.game.state().waves.len(), 1);
        h.game.advance(10.0);
        assert_eq!(h.game.state().bubbles.len(), 4);
        assert_eq!(h.pulses.borrow().len(), 1);
        assert_eq!(h.game.next_deadline(), None);

        // Input is ignored once stopped
        let other = h.game.state().bubbles[1].clone();
        h.game.handle_pointer(PointerEvent::Down {
            pointer: PointerId(1),
            pos: other.pos,
        });
        assert_eq!(h.game.state().pressed_bubble, None);
    }

    #[test]
    fn test_redraw_settles_after_stop() {
        let settings = Settings {
            seed: Some(21),
            reduced_motion: true,
            ..Default::default()
        };
        let mut h = harness_with(settings, true);
        let id = first_active(&h.game);
        h.game.pop_bubble(id);
        h.game.advance(0.05);
        h.game.stop();

        h.game.advance(1.0);
        assert!(!h.game.is_animating());
        let seen = h.game.revision();
        h.game.advance(1.0);
        assert!(!h.game.needs_redraw(seen));
    }

    #[test]
    fn test_non_finite_step_ignored() {
        let mut h = harness(22);
        h.game.advance(0.5);
        h.game.advance(f64::INFINITY);
        h.game.advance(f64::NAN);
        assert_eq!(h.game.now(), 0.5);
        assert_eq!(h.game.next_deadline(), Some(1.5));

        // Negative steps don't rewind the clock
        h.game.advance(-1.0);
        assert_eq!(h.game.now(), 0.5);
    }

    #[test]
    fn test_unchecked_settings_are_repaired() {
        let settings = Settings {
            seed: Some(23),
            tuning: Tuning {
                particles_min: 12,
                particles_max: 8,
                refill_interval: 0.0,
                ..Default::default()
            },
            ..Default::default()
        };
        let mut h = harness_with(settings, true);
        assert_eq!(h.game.settings().tuning.refill_interval, REFILL_INTERVAL);
        assert_eq!(h.game.settings().tuning.particles_min, 8);

        let id = first_active(&h.game);
        assert!(h.game.pop_bubble(id));
        assert!((8..=12).contains(&h.game.state().particles.len()));

        // The refill timer keeps its normal pace instead of spinning
        h.game.advance(1.6);
        assert_eq!(h.game.state().active_count(), 4);
        assert_eq!(h.game.next_deadline(), Some(3.0));
    }

    #[test]
    fn test_refill_uses_resized_screen() {
        let bounds = SharedBounds::new(300.0, 340.0);
        let settings = Settings {
            seed: Some(24),
            ..Default::default()
        };
        let mut h = harness_on(settings, true, Box::new(bounds.clone()));

        // Rotate to a smaller watch screen before the next placement
        bounds.resize(184.0, 224.0);
        let id = first_active(&h.game);
        h.game.pop_bubble(id);
        h.game.advance(1.6);

        let newest = h.game.state().bubbles.last().unwrap();
        assert_eq!(newest.id, 4);
        let tuning = &h.game.settings().tuning;
        let (lo, hi) = placement_bounds(tuning.bubble_size, Vec2::new(184.0, 224.0), tuning);
        assert!(newest.pos.cmpge(lo).all() && newest.pos.cmple(hi).all());
        assert_eq!(h.game.snapshot().screen, Vec2::new(184.0, 224.0));
    }

    #[test]
    fn test_redraw_tracking() {
        let settings = Settings {
            seed: Some(19),
            reduced_motion: true,
            ..Default::default()
        };
        let mut h = harness_with(settings, true);
        let seen = h.game.revision();
        assert!(!h.game.needs_redraw(seen));

        let id = first_active(&h.game);
        h.game.pop_bubble(id);
        assert!(h.game.needs_redraw(seen));
        let seen = h.game.revision();
        assert!(h.game.is_animating());

        h.game.advance(1.0);
        let seen_after = h.game.revision();
        assert_ne!(seen, seen_after);
        assert!(!h.game.is_animating());
        assert!(!h.game.needs_redraw(seen_after));
    }

    #[test]
    fn test_same_seed_same_layout() {
        let a = harness(20);
        let b = harness(20);
        let pa: Vec<Vec2> = a.game.state().bubbles.iter().map(|b| b.pos).collect();
        let pb: Vec<Vec2> = b.game.state().bubbles.iter().map(|b| b.pos).collect();
        assert_eq!(pa, pb);
    }

    #[derive(Debug, Clone)]
    enum Step {
        Pop(usize),
        Advance(f64),
    }

    fn step() -> impl Strategy<Value = Step> {
        prop_oneof![
            (0usize..8).prop_map(Step::Pop),
            (0.0f64..2.0).prop_map(Step::Advance),
        ]
    }

    proptest! {
        #[test]
        fn prop_active_count_bounded_and_ids_increase(
            seed in any::<u64>(),
            steps in prop::collection::vec(step(), 1..60),
        ) {
            let mut h = harness(seed);
            let mut max_id = h.game.state().next_bubble_id();

            for step in steps {
                match step {
                    Step::Pop(i) => {
                        let ids: Vec<u32> = h.game.state().active_bubbles().map(|b| b.id).collect();
                        if let Some(id) = ids.get(i % ids.len().max(1)) {
                            h.game.pop_bubble(*id);
                        }
                    }
                    Step::Advance(dt) => h.game.advance(dt),
                }
                prop_assert!(h.game.state().active_count() <= 4);

                let next = h.game.state().next_bubble_id();
                prop_assert!(next >= max_id);
                max_id = next;
            }

            // Ids are unique and sorted by creation
            let ids: Vec<u32> = h.game.state().bubbles.iter().map(|b| b.id).collect();
            prop_assert!(ids.windows(2).all(|w| w[0] < w[1]));
        }

        #[test]
        fn prop_refill_recovers_within_one_tick(seed in any::<u64>(), pops in 1usize..4) {
            let mut h = harness(seed);
            let ids: Vec<u32> = h.game.state().active_bubbles().take(pops).map(|b| b.id).collect();
            for id in ids {
                h.game.pop_bubble(id);
            }
            h.game.advance(0.4);
            let before = h.game.state().active_count();
            prop_assert_eq!(before, 4 - pops);

            // Next refill tick is at t=1.5
            h.game.advance(1.2);
            prop_assert_eq!(h.game.state().active_count(), before + 1);
        }
    }
}
