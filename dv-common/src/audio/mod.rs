//! Audio feedback: synthesized tones behind the browser autoplay gate

pub mod engine;
pub mod envelope;

pub use engine::{
    AudioContext, AudioContextFactory, GestureGatedAudio, InputEvent, OfflineAudio,
    UnavailableAudio,
};
pub use envelope::{Tone, ToneEnvelope};
