//! Per-avatar lip-sync driver.
//!
//! Wires the generator, blender and rig adapter together so a host only has
//! to hand over word timing when speech starts and call [`LipsyncDriver::tick`]
//! from its animation loop.

use std::sync::Arc;

use tracing::info;

use crate::blend;
use crate::config::VisemeConfig;
use crate::error::Result;
use crate::lipsync::{LanguageRegistry, LipsyncProcessor};
use crate::rig::{self, RigTarget};
use crate::sequence::{self, WhisperData};
use crate::state::VisemeState;

/// Shared, immutable lip-sync engine. One driver can serve many avatars;
/// each avatar keeps its own [`VisemeState`].
pub struct LipsyncDriver {
    config: VisemeConfig,
    registry: LanguageRegistry,
    processor: Arc<dyn LipsyncProcessor>,
}

impl LipsyncDriver {
    /// Create a driver with the built-in languages.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` is invalid or names an unknown language.
    pub fn new(config: VisemeConfig) -> Result<Self> {
        Self::with_registry(config, LanguageRegistry::with_defaults()?)
    }

    /// Create a driver with a caller-supplied language registry.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` is invalid or its language is not in `registry`.
    pub fn with_registry(config: VisemeConfig, registry: LanguageRegistry) -> Result<Self> {
        config.validate()?;
        let processor = registry.require(&config.lipsync.language)?;
        info!(language = %config.lipsync.language, "lip-sync driver ready");
        Ok(Self {
            config,
            registry,
            processor,
        })
    }

    /// The validated configuration.
    pub fn config(&self) -> &VisemeConfig {
        &self.config
    }

    /// Every registered language processor.
    pub fn registry(&self) -> &LanguageRegistry {
        &self.registry
    }

    /// The active language processor.
    pub fn processor(&self) -> &dyn LipsyncProcessor {
        self.processor.as_ref()
    }

    /// Probe an avatar's expression names and return a fresh state for it.
    pub fn attach<S: AsRef<str>>(&self, expression_names: &[S]) -> VisemeState {
        let mode = rig::probe(expression_names, &self.config.rig.fine_name_prefix);
        VisemeState::new(mode)
    }

    /// Start an utterance from word timing. Returns the number of visemes scheduled.
    pub fn speak(&self, state: &mut VisemeState, whisper: &WhisperData) -> usize {
        let sequence = sequence::generate(self.processor(), whisper, &self.config);
        let count = sequence.len();
        state.start_sequence(sequence);
        count
    }

    /// Start an utterance from text alone, estimating word timing.
    pub fn speak_text(&self, state: &mut VisemeState, text: &str) -> usize {
        let whisper = sequence::estimate_whisper_data(self.processor(), text, &self.config);
        if whisper.is_empty() {
            state.start_sequence(Vec::new());
            return 0;
        }
        self.speak(state, &whisper)
    }

    /// Run one animation frame at `now` (ms since utterance start) and write to `rig`.
    ///
    /// Returns the number of rig writes performed.
    pub fn tick<R: RigTarget + ?Sized>(
        &self,
        state: &mut VisemeState,
        now: f64,
        rig: &mut R,
    ) -> usize {
        blend::update(state, now, &self.config);
        rig::apply_to_rig(
            state,
            rig,
            self.config.rig.amplify,
            &self.config.rig.fine_name_prefix,
        )
    }

    /// Stop the current utterance.
    ///
    /// A hard interrupt zeroes the mouth on the next tick; a soft one lets it
    /// close through normal dampening.
    pub fn interrupt(&self, state: &mut VisemeState, hard: bool) {
        info!(hard, "interrupting lip-sync");
        if hard {
            state.reset();
        } else {
            state.cancel();
        }
    }
}

impl std::fmt::Debug for LipsyncDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LipsyncDriver")
            .field("language", &self.processor.language())
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
