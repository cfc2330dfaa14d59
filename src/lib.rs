//! Stagegate is a presentation sequencing engine for audio-gated intro
//! reveals.
//!
//! It coordinates three things the host renderer should not have to:
//!
//! - Browser-style autoplay negotiation, including the resume affordance and
//!   a continuity offset when playback starts late
//! - A timer-driven stage machine (`Gating -> Intro -> Revealed`) with a
//!   bit-exact reveal delay
//! - Pure evaluation of a z-ordered layer stack and the headline reveal as a
//!   function of `(stage, audio, elapsed)`
//!
//! The engine never touches a clock or a real timer: the host feeds
//! timestamps into every entry point, which keeps the whole sequence
//! deterministic under test.
#![forbid(unsafe_code)]

pub mod anim;
pub mod audio;
pub mod compose;
pub mod ease;
pub mod engine;
pub mod error;
pub mod model;
pub mod stage;
pub mod text;
pub mod time;

pub use anim::{Lerp, Tween};
pub use audio::{AudioGatePolicy, AudioSink, AudioState, Permission, PlayRejected};
pub use compose::{LayerFrame, LayerKind, LayerParams};
pub use ease::Ease;
pub use engine::{EngineEvent, IntroEngine, SceneFrame, Snapshot};
pub use error::{StagegateError, StagegateResult};
pub use model::{EngineConfig, EngineConfigBuilder};
pub use stage::{REVEAL_DELAY, Sequencer, Stage};
pub use text::{GateFrame, GateScreen, TextFrame, TextReveal};
pub use time::Millis;
