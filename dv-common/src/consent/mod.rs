//! Cookie-consent persistence and banner lifecycle
//!
//! - [`ConsentStore`]: one acceptance flag mirrored across several backends
//! - [`BannerController`]: Hidden/Entering/Visible/Closing state machine
//! - [`BannerDriver`]: tokio task supplying the frame and close timers

pub mod banner;
pub mod driver;
pub mod store;

pub use banner::{BannerController, BannerPhase, BannerState, BannerTiming, Wakeup};
pub use driver::BannerDriver;
pub use store::{ConsentStore, CONSENT_KEY, CONSENT_VALUE};
