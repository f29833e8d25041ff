//! Audio system
//!
//! The game plays a single bundled sound. Backends load resources by name and
//! play them; a failed load is logged and the game continues silently.
//! Native builds decode and play through rodio, the browser build synthesises
//! the pop with Web Audio.

#[cfg(not(target_arch = "wasm32"))]
use std::io::Cursor;
#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;

#[cfg(not(target_arch = "wasm32"))]
use rodio::buffer::SamplesBuffer;
#[cfg(not(target_arch = "wasm32"))]
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
#[cfg(target_arch = "wasm32")]
use web_sys::{AudioContext, OscillatorType};

use crate::error::AudioError;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Bubble popped
    Pop,
}

/// Opaque handle to a loaded sound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SoundHandle(pub u32);

/// Platform audio collaborator
pub trait AudioBackend {
    /// Load a bundled resource by name
    fn load_sound(&mut self, name: &str) -> Result<SoundHandle, AudioError>;

    /// Start playing a loaded sound (fire-and-forget)
    fn play(&mut self, handle: SoundHandle, volume: f32);
}

/// A decoded sound kept in memory
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
struct LoadedSound {
    name: String,
    channels: u16,
    sample_rate: u32,
    samples: Vec<f32>,
}

/// Native backend: reads resources from an asset directory, decodes them
/// with rodio and plays them on the default output device.
///
/// Without an output device the sounds still load; playback is skipped.
#[cfg(not(target_arch = "wasm32"))]
pub struct FileAudioBackend {
    root: PathBuf,
    sounds: Vec<LoadedSound>,
    output: Option<(OutputStream, OutputStreamHandle)>,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileAudioBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let output = match OutputStream::try_default() {
            Ok(pair) => {
                log::info!("Audio device initialized");
                Some(pair)
            }
            Err(e) => {
                log::warn!("No audio output device ({e}) - playback disabled");
                None
            }
        };
        Self {
            root: root.into(),
            sounds: Vec::new(),
            output,
        }
    }

    /// Loader with no output device; plays are only logged
    #[cfg(test)]
    pub(crate) fn without_output(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            sounds: Vec::new(),
            output: None,
        }
    }

    /// Decoded samples of a loaded sound
    pub fn samples(&self, handle: SoundHandle) -> Option<&[f32]> {
        self.sounds.get(handle.0 as usize).map(|s| s.samples.as_slice())
    }

    pub fn has_output(&self) -> bool {
        self.output.is_some()
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl std::fmt::Debug for FileAudioBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileAudioBackend")
            .field("root", &self.root)
            .field("sounds", &self.sounds.len())
            .field("output", &self.output.is_some())
            .finish()
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl AudioBackend for FileAudioBackend {
    fn load_sound(&mut self, name: &str) -> Result<SoundHandle, AudioError> {
        let path = self.root.join(name);
        if !path.is_file() {
            return Err(AudioError::NotFound {
                name: name.to_string(),
            });
        }
        let data = std::fs::read(&path).map_err(|source| AudioError::Io {
            path: path.clone(),
            source,
        })?;
        if data.is_empty() {
            return Err(AudioError::Empty {
                name: name.to_string(),
            });
        }
        let decoder = Decoder::new(Cursor::new(data)).map_err(|e| AudioError::Decode {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
        let channels = decoder.channels();
        let sample_rate = decoder.sample_rate();
        let samples: Vec<f32> = decoder.convert_samples::<f32>().collect();
        if samples.is_empty() {
            return Err(AudioError::Empty {
                name: name.to_string(),
            });
        }

        log::debug!(
            "Loaded {} ({} samples, {} Hz, {} ch)",
            path.display(),
            samples.len(),
            sample_rate,
            channels
        );
        self.sounds.push(LoadedSound {
            name: name.to_string(),
            channels,
            sample_rate,
            samples,
        });
        Ok(SoundHandle((self.sounds.len() - 1) as u32))
    }

    fn play(&mut self, handle: SoundHandle, volume: f32) {
        let Some(sound) = self.sounds.get(handle.0 as usize) else {
            log::warn!("Unknown sound handle {}", handle.0);
            return;
        };
        let Some((_, stream)) = &self.output else {
            log::debug!("Playing {} at volume {volume:.2} (no output)", sound.name);
            return;
        };
        let sink = match Sink::try_new(stream) {
            Ok(sink) => sink,
            Err(e) => {
                log::warn!("Failed to create sink for {}: {e}", sound.name);
                return;
            }
        };
        sink.set_volume(volume);
        sink.append(SamplesBuffer::new(
            sound.channels,
            sound.sample_rate,
            sound.samples.clone(),
        ));
        // Fire-and-forget: the sink keeps playing after it is dropped
        sink.detach();
        log::debug!("Playing {} at volume {volume:.2}", sound.name);
    }
}

/// Browser backend: the bundled pop is synthesised with the Web Audio API,
/// since there is no file system to load it from.
#[cfg(target_arch = "wasm32")]
pub struct WebAudioBackend {
    ctx: Option<AudioContext>,
    sounds: Vec<String>,
}

#[cfg(target_arch = "wasm32")]
impl Default for WebAudioBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_arch = "wasm32")]
impl WebAudioBackend {
    pub fn new() -> Self {
        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            sounds: Vec::new(),
        }
    }

    /// Short downward chirp with a fast decay
    fn play_pop(ctx: &AudioContext, vol: f32) -> Option<()> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;
        osc.set_type(OscillatorType::Sine);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        let t = ctx.current_time();
        osc.frequency().set_value_at_time(950.0, t).ok()?;
        osc.frequency()
            .exponential_ramp_to_value_at_time(180.0, t + 0.12)
            .ok()?;
        gain.gain().set_value_at_time(vol * 0.6, t).ok()?;
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.14)
            .ok()?;

        osc.start().ok()?;
        osc.stop_with_when(t + 0.15).ok()
    }
}

#[cfg(target_arch = "wasm32")]
impl AudioBackend for WebAudioBackend {
    fn load_sound(&mut self, name: &str) -> Result<SoundHandle, AudioError> {
        if name != crate::consts::POP_SOUND {
            return Err(AudioError::NotFound {
                name: name.to_string(),
            });
        }
        self.sounds.push(name.to_string());
        Ok(SoundHandle((self.sounds.len() - 1) as u32))
    }

    fn play(&mut self, handle: SoundHandle, volume: f32) {
        let Some(ctx) = &self.ctx else { return };
        if self.sounds.get(handle.0 as usize).is_none() {
            log::warn!("Unknown sound handle {}", handle.0);
            return;
        }
        // Browsers suspend the context until a user gesture
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }
        if Self::play_pop(ctx, volume).is_none() {
            log::warn!("Web Audio pop failed");
        }
    }
}

/// Audio manager for the game
pub struct AudioManager {
    backend: Box<dyn AudioBackend>,
    pop: Option<SoundHandle>,
    volume: f32,
}

impl AudioManager {
    /// Load the pop sound. Failure disables sound but is not an error.
    pub fn new(mut backend: Box<dyn AudioBackend>, resource: &str, volume: f32) -> Self {
        let pop = match backend.load_sound(resource) {
            Ok(handle) => Some(handle),
            Err(e) => {
                log::warn!("{e} - sound disabled");
                None
            }
        };
        Self {
            backend,
            pop,
            volume: volume.clamp(0.0, 1.0),
        }
    }

    /// Whether the bundled sound loaded
    pub fn is_loaded(&self) -> bool {
        self.pop.is_some()
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        if self.volume <= 0.0 {
            return;
        }
        let handle = match effect {
            SoundEffect::Pop => self.pop,
        };
        if let Some(handle) = handle {
            self.backend.play(handle, self.volume);
        }
    }
}

impl std::fmt::Debug for AudioManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioManager")
            .field("pop", &self.pop)
            .field("volume", &self.volume)
            .finish_non_exhaustive()
    }
}
