//! Avatar rig adapter.
//!
//! Two rig schemes exist in the wild: per-viseme morph targets using the
//! 14-code Oculus alphabet, and VRM-style expression rigs that only expose
//! the five vowels `aa`/`ee`/`ih`/`oh`/`ou`. The scheme is probed once when
//! an avatar is attached and cached in [`VisemeState::rig_mode`].
//!
//! Writes go through the [`RigTarget`] trait. Two implementations ship here:
//! [`ExpressionSetter`] wraps a named-expression setter closure, and
//! [`MorphTargetRig`] writes straight into morph-target influence arrays.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{LipsyncError, Result};
use crate::state::VisemeState;
use crate::viseme::{CoarseViseme, VisemeCode};

/// Fine-grained names sampled by [`probe`] to rule out a coarse rig.
const FINE_PROBE_CODES: [VisemeCode; 3] = [VisemeCode::PP, VisemeCode::FF, VisemeCode::TH];

/// Which viseme alphabet the attached rig understands.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RigMode {
    /// 14 Oculus viseme targets.
    #[default]
    FineGrained14,
    /// 5 vowel expressions.
    Coarse5,
}

/// Decide the rig scheme from the expression names an avatar exposes.
///
/// Selects [`RigMode::Coarse5`] only when all five vowel names are present
/// and none of `PP`, `FF` or `TH` are (bare or with `fine_prefix`).
pub fn probe<S: AsRef<str>>(available: &[S], fine_prefix: &str) -> RigMode {
    let has = |name: &str| available.iter().any(|n| n.as_ref() == name);

    let all_coarse = CoarseViseme::ALL.iter().all(|c| has(c.as_str()));
    let any_fine = FINE_PROBE_CODES.iter().any(|code| {
        has(code.as_str()) || has(&fine_destination(*code, fine_prefix))
    });

    let mode = if all_coarse && !any_fine {
        RigMode::Coarse5
    } else {
        RigMode::FineGrained14
    };
    info!(?mode, expressions = available.len(), "probed avatar rig");
    mode
}

/// Destination name of a fine-grained code (`viseme_` + `PP` → `viseme_PP`).
pub fn fine_destination(code: VisemeCode, prefix: &str) -> String {
    format!("{prefix}{}", code.as_str())
}

/// Collapse fine-grained targets onto the coarse alphabet.
///
/// Several fine codes share one coarse shape; the strongest wins.
pub fn collapse_to_coarse(targets: &HashMap<VisemeCode, f32>) -> HashMap<CoarseViseme, f32> {
    let mut coarse: HashMap<CoarseViseme, f32> = HashMap::new();
    for (code, value) in targets {
        let slot = coarse.entry(code.coarse()).or_insert(*value);
        *slot = slot.max(*value);
    }
    coarse
}

/// Something expression values can be written to.
pub trait RigTarget {
    /// Write one value.
    ///
    /// # Errors
    ///
    /// Returns [`LipsyncError::Rig`] if the destination rejects the write.
    fn write(&mut self, name: &str, value: f32) -> Result<()>;
}

/// A named-expression rig driven by a setter closure.
pub struct ExpressionSetter<F> {
    setter: F,
}

impl<F> ExpressionSetter<F>
where
    F: FnMut(&str, f32) -> Result<()>,
{
    /// Wrap a `set_expression(name, value)` callback.
    pub fn new(setter: F) -> Self {
        Self { setter }
    }
}

impl<F> RigTarget for ExpressionSetter<F>
where
    F: FnMut(&str, f32) -> Result<()>,
{
    fn write(&mut self, name: &str, value: f32) -> Result<()> {
        (self.setter)(name, value)
    }
}

/// In-memory expression surface that accepts every name.
impl RigTarget for HashMap<String, f32> {
    fn write(&mut self, name: &str, value: f32) -> Result<()> {
        self.insert(name.to_owned(), value);
        Ok(())
    }
}

/// A mesh with a mutable morph-target influence array.
pub trait MorphMesh {
    /// The influence weights, indexed by morph-target slot.
    fn influences_mut(&mut self) -> &mut [f32];
}

impl MorphMesh for Vec<f32> {
    fn influences_mut(&mut self) -> &mut [f32] {
        self.as_mut_slice()
    }
}

/// Morph-target rig: each destination name maps to influence indices that
/// are written on every mesh.
pub struct MorphTargetRig<'a, M> {
    dictionary: &'a HashMap<String, Vec<usize>>,
    meshes: &'a mut [M],
}

impl<'a, M: MorphMesh> MorphTargetRig<'a, M> {
    /// Pair a name → slot dictionary with the meshes it indexes into.
    pub fn new(dictionary: &'a HashMap<String, Vec<usize>>, meshes: &'a mut [M]) -> Self {
        Self { dictionary, meshes }
    }
}

impl<M: MorphMesh> RigTarget for MorphTargetRig<'_, M> {
    /// Writes every in-range slot, then reports the first out-of-range index.
    fn write(&mut self, name: &str, value: f32) -> Result<()> {
        let indices = self
            .dictionary
            .get(name)
            .ok_or_else(|| LipsyncError::Rig(format!("no morph target named {name}")))?;

        let mut out_of_range = None;
        for mesh in self.meshes.iter_mut() {
            let influences = mesh.influences_mut();
            let len = influences.len();
            for &index in indices {
                match influences.get_mut(index) {
                    Some(slot) => *slot = value,
                    None if out_of_range.is_none() => out_of_range = Some((index, len)),
                    None => {}
                }
            }
        }

        match out_of_range {
            Some((index, len)) => Err(LipsyncError::Rig(format!(
                "morph index {index} out of range for {name} ({len} influences)"
            ))),
            None => Ok(()),
        }
    }
}

/// Write the current targets to the rig, skipping unchanged values.
///
/// On a coarse rig the targets are collapsed first. Each value is multiplied
/// by `amplify`. A failed write is logged and skipped; its diff-cache entry is
/// left alone so the write is retried next frame.
///
/// Returns the number of successful writes.
pub fn apply_to_rig<R: RigTarget + ?Sized>(
    state: &mut VisemeState,
    rig: &mut R,
    amplify: f32,
    fine_prefix: &str,
) -> usize {
    let destinations: Vec<(String, f32)> = match state.rig_mode {
        RigMode::FineGrained14 => VisemeCode::ALL
            .iter()
            .filter_map(|code| {
                let value = state.targets.get(code)?;
                Some((fine_destination(*code, fine_prefix), *value))
            })
            .collect(),
        RigMode::Coarse5 => {
            let coarse = collapse_to_coarse(&state.targets);
            CoarseViseme::ALL
                .iter()
                .filter_map(|c| Some((c.as_str().to_owned(), *coarse.get(c)?)))
                .collect()
        }
    };

    let mut written = 0;
    for (name, value) in destinations {
        let value = value * amplify;
        if state.previous_written.get(&name) == Some(&value) {
            continue;
        }
        match rig.write(&name, value) {
            Ok(()) => {
                state.previous_written.insert(name, value);
                written += 1;
            }
            Err(e) => debug!(destination = %name, error = %e, "rig write failed"),
        }
    }
    written
}
