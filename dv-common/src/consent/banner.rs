//! Consent banner state machine
//!
//! ```text
//! Hidden(NotStarted) --start--> Entering --frame--> Visible --accept--> Closing --timer--> Hidden(Accepted)
//!        \--start, already accepted--> Hidden(AlreadyAccepted)
//! ```
//!
//! The controller owns no timers. Each transition that needs one returns a
//! [`Wakeup`]; the caller (normally [`super::BannerDriver`]) waits and then
//! calls the matching handler.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::store::ConsentStore;
use crate::audio::{GestureGatedAudio, Tone};

/// Default length of the closing transition
pub const DEFAULT_CLOSE_DELAY: Duration = Duration::from_millis(260);

/// Default stand-in for one paint frame
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Notification cue played when the banner appears
pub const DEFAULT_NOTIFY_TONE: Tone = Tone::new(880.0, 180, 0.08);

/// Visible phase of the banner element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BannerPhase {
    Hidden,
    Entering,
    Visible,
    Closing,
}

impl std::fmt::Display for BannerPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BannerPhase::Hidden => write!(f, "hidden"),
            BannerPhase::Entering => write!(f, "entering"),
            BannerPhase::Visible => write!(f, "visible"),
            BannerPhase::Closing => write!(f, "closing"),
        }
    }
}

/// Why the banner is hidden
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HiddenReason {
    /// `start` has not run yet
    NotStarted,
    /// Consent was already on record at start
    AlreadyAccepted,
    /// Visitor accepted during this session
    Accepted,
}

/// Full controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerState {
    Hidden(HiddenReason),
    Entering,
    Visible,
    Closing,
}

impl BannerState {
    pub fn phase(&self) -> BannerPhase {
        match self {
            BannerState::Hidden(_) => BannerPhase::Hidden,
            BannerState::Entering => BannerPhase::Entering,
            BannerState::Visible => BannerPhase::Visible,
            BannerState::Closing => BannerPhase::Closing,
        }
    }

    /// Hidden for good: nothing can show the banner again this session
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            BannerState::Hidden(HiddenReason::AlreadyAccepted | HiddenReason::Accepted)
        )
    }
}

/// Callback the caller owes the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wakeup {
    /// Call [`BannerController::on_animation_frame`] at the next paint
    NextFrame,
    /// Call [`BannerController::on_close_timer`] after this long
    CloseAfter(Duration),
}

/// Timing and sound settings for the banner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BannerTiming {
    pub close_delay: Duration,
    pub frame_interval: Duration,
    pub notify_tone: Tone,
}

impl Default for BannerTiming {
    fn default() -> Self {
        Self {
            close_delay: DEFAULT_CLOSE_DELAY,
            frame_interval: DEFAULT_FRAME_INTERVAL,
            notify_tone: DEFAULT_NOTIFY_TONE,
        }
    }
}

/// One-per-session banner lifecycle
#[derive(Debug)]
pub struct BannerController {
    state: BannerState,
    started: bool,
    consent: ConsentStore,
    audio: Arc<GestureGatedAudio>,
    timing: BannerTiming,
}

impl BannerController {
    pub fn new(consent: ConsentStore, audio: Arc<GestureGatedAudio>, timing: BannerTiming) -> Self {
        Self {
            state: BannerState::Hidden(HiddenReason::NotStarted),
            started: false,
            consent,
            audio,
            timing,
        }
    }

    pub fn state(&self) -> BannerState {
        self.state
    }

    pub fn phase(&self) -> BannerPhase {
        self.state.phase()
    }

    pub fn timing(&self) -> BannerTiming {
        self.timing
    }

    /// Run the entry logic once
    ///
    /// The first call checks consent, shows the banner and plays the
    /// notification tone. Later calls (a remounted view) skip all of that
    /// and only report the wakeup still owed to the current state.
    pub fn start(&mut self) -> Option<Wakeup> {
        if self.started {
            debug!("Banner already started ({:?}), resuming", self.state);
            return self.pending_wakeup();
        }
        self.started = true;

        if self.consent.has_accepted() {
            self.state = BannerState::Hidden(HiddenReason::AlreadyAccepted);
            debug!("Consent on record, banner stays hidden");
            return None;
        }

        self.state = BannerState::Entering;
        info!("Showing consent banner");
        self.audio.play(self.timing.notify_tone);
        Some(Wakeup::NextFrame)
    }

    /// Paint boundary reached: `Entering -> Visible`
    pub fn on_animation_frame(&mut self) -> Option<Wakeup> {
        if self.state == BannerState::Entering {
            self.state = BannerState::Visible;
        }
        None
    }

    /// Visitor pressed accept: `Visible -> Closing`
    ///
    /// Ignored in every other state, so a double click cannot schedule a
    /// second close.
    pub fn accept(&mut self) -> Option<Wakeup> {
        if self.state != BannerState::Visible {
            debug!("Accept ignored in {:?}", self.state);
            return None;
        }
        self.state = BannerState::Closing;
        Some(Wakeup::CloseAfter(self.timing.close_delay))
    }

    /// Closing transition finished: persist, then `Closing -> Hidden`
    pub fn on_close_timer(&mut self) -> Option<Wakeup> {
        if self.state == BannerState::Closing {
            self.consent.mark_accepted();
            self.state = BannerState::Hidden(HiddenReason::Accepted);
            info!("Consent banner closed");
        }
        None
    }

    fn pending_wakeup(&self) -> Option<Wakeup> {
        match self.state {
            BannerState::Entering => Some(Wakeup::NextFrame),
            BannerState::Closing => Some(Wakeup::CloseAfter(self.timing.close_delay)),
            BannerState::Hidden(_) | BannerState::Visible => None,
        }
    }
}
