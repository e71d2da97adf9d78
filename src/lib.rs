//! Fae lip-sync: text and word timing → viseme animation.
//!
//! This crate turns what an avatar is saying into mouth shapes:
//! Text → Normalizer → Letter-to-sound rules → Word timeline →
//! Utterance sequence → Per-frame blend → Rig writes
//!
//! # Architecture
//!
//! - **Normalizer** (`lipsync::normalize`): symbols, numbers, diacritics, punctuation
//! - **Rule engine** (`lipsync::rules`, `lipsync::english`): context-sensitive
//!   letter-to-sound rules emitting Oculus viseme codes
//! - **Converter** (`lipsync::converter`): one word → relative viseme timeline
//! - **Generator** (`sequence`): relative timelines → absolute envelopes using
//!   per-word timing from the TTS engine or an aligner
//! - **Blender** (`blend`): per-frame dampening, attack and release
//! - **Rig adapter** (`rig`): fine or coarse rig, diff-minimized writes
//!
//! [`LipsyncDriver`] wires all of these together for a host animation loop.

pub mod blend;
pub mod config;
pub mod driver;
pub mod error;
pub mod lipsync;
pub mod rig;
pub mod sequence;
pub mod state;
pub mod viseme;

pub use config::VisemeConfig;
pub use driver::LipsyncDriver;
pub use error::{LipsyncError, Result};
pub use lipsync::{EnglishProcessor, LanguageRegistry, LipsyncProcessor, WordVisemeResult};
pub use rig::{RigMode, RigTarget};
pub use sequence::{VisemeSequenceItem, WhisperData};
pub use state::VisemeState;
pub use viseme::{CoarseViseme, VisemeCode};
