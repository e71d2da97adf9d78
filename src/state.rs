//! Per-avatar runtime state shared by the blender and the rig adapter.

use std::collections::HashMap;

use crate::rig::RigMode;
use crate::sequence::VisemeSequenceItem;
use crate::viseme::VisemeCode;

/// Mutable lip-sync state for one avatar.
///
/// Owned by a single animation loop. Independent avatars hold independent
/// states and never need to synchronize.
#[derive(Debug, Clone, Default)]
pub struct VisemeState {
    /// Current blended intensity per fine-grained code.
    pub targets: HashMap<VisemeCode, f32>,
    /// Last value written to each rig destination name.
    pub previous_written: HashMap<String, f32>,
    /// Timeline of the utterance being spoken.
    pub sequence: Vec<VisemeSequenceItem>,
    /// Rig scheme, decided once when the avatar is attached.
    pub rig_mode: RigMode,
}

impl VisemeState {
    /// Create an idle state for a rig of the given kind.
    pub fn new(rig_mode: RigMode) -> Self {
        Self {
            rig_mode,
            ..Self::default()
        }
    }

    /// Replace the current timeline with a new utterance.
    pub fn start_sequence(&mut self, sequence: Vec<VisemeSequenceItem>) {
        tracing::debug!(visemes = sequence.len(), "starting viseme sequence");
        self.sequence = sequence;
    }

    /// Drop the current timeline and zero every target immediately.
    ///
    /// The rig adapter writes the zeros on its next pass.
    pub fn reset(&mut self) {
        self.sequence.clear();
        for value in self.targets.values_mut() {
            *value = 0.0;
        }
    }

    /// Drop the current timeline and let the targets decay through dampening.
    pub fn cancel(&mut self) {
        self.sequence.clear();
    }

    /// Whether there is no timeline and every target is at rest.
    pub fn is_idle(&self) -> bool {
        self.sequence.is_empty() && self.targets.values().all(|v| *v == 0.0)
    }

    /// Current target for `code` (0 when never driven).
    pub fn target(&self, code: VisemeCode) -> f32 {
        self.targets.get(&code).copied().unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    fn item(code: VisemeCode) -> VisemeSequenceItem {
        VisemeSequenceItem {
            viseme_code: code,
            ts: [0.0, 20.0, 40.0],
            intensity: 0.8,
            source_word: "X".into(),
            source_time: 0.0,
            source_duration: 40.0,
        }
    }

    #[test]
    fn new_state_is_idle() {
        let state = VisemeState::new(RigMode::Coarse5);
        assert!(state.is_idle());
        assert_eq!(state.rig_mode, RigMode::Coarse5);
        assert_eq!(state.target(VisemeCode::Aa), 0.0);
    }

    #[test]
    fn reset_clears_sequence_and_zeroes_targets() {
        let mut state = VisemeState::default();
        state.start_sequence(vec![item(VisemeCode::PP)]);
        state.targets.insert(VisemeCode::PP, 0.7);
        state.previous_written.insert("viseme_PP".into(), 0.7);
        assert!(!state.is_idle());

        state.reset();
        assert!(state.sequence.is_empty());
        assert_eq!(state.target(VisemeCode::PP), 0.0);
        assert!(state.is_idle());
        // The diff cache still holds the old value so the zero gets written.
        assert_eq!(state.previous_written["viseme_PP"], 0.7);
    }

    #[test]
    fn cancel_keeps_targets_for_decay() {
        let mut state = VisemeState::default();
        state.start_sequence(vec![item(VisemeCode::O)]);
        state.targets.insert(VisemeCode::O, 0.5);
        state.cancel();
        assert!(state.sequence.is_empty());
        assert_eq!(state.target(VisemeCode::O), 0.5);
        assert!(!state.is_idle());
    }
}
