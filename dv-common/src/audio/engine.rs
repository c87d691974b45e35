//! Gesture-gated tone playback
//!
//! Browsers refuse to start audio until the visitor has interacted with the
//! page. [`GestureGatedAudio`] models that policy: it stays silent until the
//! first pointer-down or key-down, builds its audio context at that moment,
//! and ignores every later input event. Playback never fails outward and
//! never queues a tone for later.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, OnceLock};

use tracing::{debug, info, warn};

use super::envelope::Tone;
use crate::{Error, Result};

/// Default sample rate for contexts that do not care
pub const DEFAULT_SAMPLE_RATE: u32 = 48_000;

/// Input events the page forwards to the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    PointerDown,
    KeyDown,
    PointerMove,
    Scroll,
    Focus,
}

impl InputEvent {
    /// Whether the browser treats this event as user activation
    pub fn is_activation(&self) -> bool {
        matches!(self, InputEvent::PointerDown | InputEvent::KeyDown)
    }
}

/// Output side of the engine, created once after the unlocking gesture
pub trait AudioContext: Send + Sync {
    fn sample_rate(&self) -> u32;

    /// Schedule a rendered mono buffer for immediate playback
    fn play_buffer(&self, samples: Vec<f32>) -> Result<()>;
}

/// Builds the [`AudioContext`]; may fail when no output exists
pub trait AudioContextFactory: Send + Sync {
    fn create(&self) -> Result<Box<dyn AudioContext>>;
}

/// Shared, gesture-gated tone player
///
/// Hold it in an `Arc` and hand clones to every component that wants sound.
pub struct GestureGatedAudio {
    factory: Box<dyn AudioContextFactory>,
    listening: AtomicBool,
    unlocked: AtomicBool,
    context: OnceLock<Option<Box<dyn AudioContext>>>,
}

impl GestureGatedAudio {
    pub fn new(factory: Box<dyn AudioContextFactory>) -> Self {
        Self {
            factory,
            listening: AtomicBool::new(true),
            unlocked: AtomicBool::new(false),
            context: OnceLock::new(),
        }
    }

    /// Engine with no usable output; every tone is silent
    pub fn silent() -> Self {
        Self::new(Box::new(UnavailableAudio))
    }

    /// Forward an input event
    ///
    /// Returns `true` only for the event that unlocked the engine. After
    /// that the listener is detached and later events are ignored.
    pub fn on_input(&self, event: InputEvent) -> bool {
        if !event.is_activation() || !self.listening.load(Ordering::Acquire) {
            return false;
        }
        if self
            .listening
            .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return false;
        }

        self.unlocked.store(true, Ordering::Release);
        let available = self.context().is_some();
        info!(
            "Audio unlocked by {:?} (context {})",
            event,
            if available { "ready" } else { "unavailable" }
        );
        true
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked.load(Ordering::Acquire)
    }

    /// True once unlocked with a working context
    pub fn is_available(&self) -> bool {
        self.is_unlocked() && self.context.get().is_some_and(|ctx| ctx.is_some())
    }

    /// Play a tone if allowed; otherwise do nothing
    pub fn play(&self, tone: Tone) {
        if !self.is_unlocked() {
            debug!("Tone {:?} dropped: audio locked until first gesture", tone);
            return;
        }
        let Some(context) = self.context() else {
            debug!("Tone {:?} dropped: audio unavailable", tone);
            return;
        };
        if let Err(e) = tone.validate() {
            warn!("Tone rejected: {}", e);
            return;
        }

        let samples = tone.render(context.sample_rate());
        if let Err(e) = context.play_buffer(samples) {
            warn!("Tone playback failed: {}", e);
        }
    }

    fn context(&self) -> Option<&dyn AudioContext> {
        self.context
            .get_or_init(|| match self.factory.create() {
                Ok(ctx) => Some(ctx),
                Err(e) => {
                    warn!("Audio context construction failed: {}", e);
                    None
                }
            })
            .as_deref()
    }
}

impl std::fmt::Debug for GestureGatedAudio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GestureGatedAudio")
            .field("unlocked", &self.is_unlocked())
            .field("available", &self.is_available())
            .finish()
    }
}

/// Factory for hosts without audio output
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableAudio;

impl AudioContextFactory for UnavailableAudio {
    fn create(&self) -> Result<Box<dyn AudioContext>> {
        Err(Error::AudioUnavailable("no audio output on this host".to_string()))
    }
}

/// Context that renders into memory instead of a device
///
/// Useful for headless hosts and for checking what would have been played.
#[derive(Debug)]
pub struct OfflineContext {
    sample_rate: u32,
    rendered: std::sync::Arc<Mutex<Vec<Vec<f32>>>>,
}

impl AudioContext for OfflineContext {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn play_buffer(&self, samples: Vec<f32>) -> Result<()> {
        self.rendered
            .lock()
            .map_err(|_| Error::AudioUnavailable("render buffer poisoned".to_string()))?
            .push(samples);
        Ok(())
    }
}

/// Factory handing out [`OfflineContext`]s that share one render log
#[derive(Debug, Clone)]
pub struct OfflineAudio {
    sample_rate: u32,
    rendered: std::sync::Arc<Mutex<Vec<Vec<f32>>>>,
}

impl OfflineAudio {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            rendered: Default::default(),
        }
    }

    /// Number of buffers played so far
    pub fn played_count(&self) -> usize {
        self.rendered.lock().map(|r| r.len()).unwrap_or(0)
    }

    /// Copy of every buffer played so far
    pub fn rendered(&self) -> Vec<Vec<f32>> {
        self.rendered.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl Default for OfflineAudio {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_RATE)
    }
}

impl AudioContextFactory for OfflineAudio {
    fn create(&self) -> Result<Box<dyn AudioContext>> {
        Ok(Box::new(OfflineContext {
            sample_rate: self.sample_rate,
            rendered: std::sync::Arc::clone(&self.rendered),
        }))
    }
}
