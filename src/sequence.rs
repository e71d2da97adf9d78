//! Absolute viseme timeline generation.
//!
//! Maps each word's relative viseme timeline onto the externally supplied
//! per-word timing of one utterance, producing envelope entries the blender
//! scans every frame.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::VisemeConfig;
use crate::error::{LipsyncError, Result};
use crate::lipsync::LipsyncProcessor;
use crate::viseme::VisemeCode;

/// Longest allowed lead-in before a viseme's start (ms).
const MAX_RISE_MS: f64 = 60.0;
/// Longest allowed climb from start to peak (ms).
const MAX_PEAK_MS: f64 = 25.0;
/// Longest allowed tail after a viseme's end (ms).
const MAX_FALL_MS: f64 = 60.0;

/// Per-word timing for one utterance, as produced by a TTS engine or aligner.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WhisperData {
    /// Word texts, in spoken order.
    pub words: Vec<String>,
    /// Word start times (ms from utterance start).
    pub wtimes: Vec<f64>,
    /// Word durations (ms).
    pub wdurations: Vec<f64>,
}

impl WhisperData {
    /// Parse from JSON (`{"words": [...], "wtimes": [...], "wdurations": [...]}`).
    ///
    /// # Errors
    ///
    /// Returns [`LipsyncError::InvalidInput`] if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| LipsyncError::InvalidInput(e.to_string()))
    }

    /// Number of words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether there are no words.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Check that the word list is non-empty and all three arrays line up.
    ///
    /// # Errors
    ///
    /// Returns [`LipsyncError::InvalidInput`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.words.is_empty() {
            return Err(LipsyncError::InvalidInput("empty word list".into()));
        }
        if self.wtimes.len() != self.words.len() || self.wdurations.len() != self.words.len() {
            return Err(LipsyncError::InvalidInput(format!(
                "array lengths differ: {} words, {} wtimes, {} wdurations",
                self.words.len(),
                self.wtimes.len(),
                self.wdurations.len()
            )));
        }
        Ok(())
    }
}

/// One timed viseme envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisemeSequenceItem {
    pub viseme_code: VisemeCode,
    /// `[rise, peak, fall]` in absolute ms, non-decreasing.
    pub ts: [f64; 3],
    /// Peak intensity in `[0, 1]`.
    pub intensity: f32,
    /// The word this viseme came from, as given.
    pub source_word: String,
    /// Start of the source word (ms).
    pub source_time: f64,
    /// Duration of the source word (ms).
    pub source_duration: f64,
}

/// Generate the absolute viseme timeline for one utterance.
///
/// Malformed input (empty word list, mismatched arrays) yields an empty
/// sequence and a warning. Words with unusable timing and entries whose
/// numbers come out non-finite are skipped individually.
pub fn generate(
    processor: &dyn LipsyncProcessor,
    whisper: &WhisperData,
    config: &VisemeConfig,
) -> Vec<VisemeSequenceItem> {
    if let Err(e) = whisper.validate() {
        warn!(error = %e, "ignoring malformed word timing");
        return Vec::new();
    }

    let lipsync = &config.lipsync;
    let fudge = config.timing.fudge_factor;
    let mut sequence = Vec::new();

    for ((word, &wtime), &wduration) in whisper
        .words
        .iter()
        .zip(&whisper.wtimes)
        .zip(&whisper.wdurations)
    {
        if !wtime.is_finite() || !wduration.is_finite() || wduration <= 0.0 {
            warn!(word = %word, wtime, wduration, "skipping word with unusable timing");
            continue;
        }

        let normalized = processor.normalize(word, lipsync.expand_numbers);
        let Some(result) = processor.word_to_visemes(&normalized) else {
            debug!(word = %word, "word produced no visemes");
            continue;
        };
        let total_relative = result.total_duration();
        if total_relative <= 0.0 {
            continue;
        }

        let count = result.len() as f64;
        let slack = (wduration - count * lipsync.overdrive_ms_per_viseme).max(0.0);
        let overdrive = wduration.min(slack);
        let level = (lipsync.base_level + (overdrive / wduration) as f32 * lipsync.level_range)
            .clamp(0.0, 1.0);
        let word_duration = wduration.min(count * lipsync.max_ms_per_viseme);
        let scale = word_duration / total_relative;

        for (code, time, duration) in result.iter() {
            let t = wtime + time * scale;
            let d = duration * scale;
            let ts = [
                t - MAX_RISE_MS.min(2.0 * d / 3.0) + fudge,
                t + MAX_PEAK_MS.min(d / 2.0) + fudge,
                t + d + MAX_FALL_MS.min(d / 2.0) + fudge,
            ];
            let intensity = match code {
                VisemeCode::PP => lipsync.special_visemes.pp.clamp(0.0, 1.0),
                VisemeCode::FF => lipsync.special_visemes.ff.clamp(0.0, 1.0),
                _ => level,
            };

            if !intensity.is_finite() || ts.iter().any(|v| !v.is_finite()) {
                warn!(word = %word, viseme = %code, "skipping entry with non-finite values");
                continue;
            }

            sequence.push(VisemeSequenceItem {
                viseme_code: code,
                ts,
                intensity,
                source_word: word.clone(),
                source_time: wtime,
                source_duration: wduration,
            });
        }
    }

    debug!(
        words = whisper.len(),
        visemes = sequence.len(),
        "generated viseme sequence"
    );
    sequence
}

/// Build word timing from text alone, for speech sources that report none.
///
/// Each word lasts its relative viseme duration times
/// `config.lipsync.ms_per_unit`; words are separated by one unit of pause.
/// Words that produce no visemes are left out.
pub fn estimate_whisper_data(
    processor: &dyn LipsyncProcessor,
    text: &str,
    config: &VisemeConfig,
) -> WhisperData {
    let ms_per_unit = config.lipsync.ms_per_unit;
    let mut whisper = WhisperData::default();
    let mut cursor = 0.0;

    for word in text.split_whitespace() {
        let normalized = processor.normalize(word, config.lipsync.expand_numbers);
        let Some(result) = processor.word_to_visemes(&normalized) else {
            continue;
        };
        let duration = result.total_duration() * ms_per_unit;
        whisper.words.push(word.to_owned());
        whisper.wtimes.push(cursor);
        whisper.wdurations.push(duration);
        cursor += duration + ms_per_unit;
    }

    whisper
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use crate::lipsync::EnglishProcessor;

    fn whisper(words: &[&str], wtimes: &[f64], wdurations: &[f64]) -> WhisperData {
        WhisperData {
            words: words.iter().map(|w| (*w).to_owned()).collect(),
            wtimes: wtimes.to_vec(),
            wdurations: wdurations.to_vec(),
        }
    }

    #[test]
    fn malformed_input_yields_empty_sequence() {
        let en = EnglishProcessor::new().unwrap();
        let config = VisemeConfig::default();
        assert!(generate(&en, &WhisperData::default(), &config).is_empty());
        let mismatched = whisper(&["hi", "there"], &[0.0], &[100.0, 100.0]);
        assert!(generate(&en, &mismatched, &config).is_empty());
    }

    #[test]
    fn whisper_validation() {
        assert!(whisper(&["a"], &[0.0], &[10.0]).validate().is_ok());
        assert!(whisper(&[], &[], &[]).validate().is_err());
        assert!(whisper(&["a"], &[0.0, 1.0], &[10.0]).validate().is_err());
    }

    #[test]
    fn whisper_from_json_defaults_missing_arrays() {
        let w = WhisperData::from_json(r#"{"words": ["hi"]}"#).unwrap();
        assert_eq!(w.words, vec!["hi"]);
        assert!(w.wtimes.is_empty());
        assert!(w.validate().is_err());
        assert!(WhisperData::from_json("not json").is_err());
    }

    #[test]
    fn envelopes_are_ordered_and_within_word() {
        let en = EnglishProcessor::new().unwrap();
        let config = VisemeConfig::default();
        let seq = generate(&en, &whisper(&["HELLO"], &[0.0], &[500.0]), &config);
        assert_eq!(seq.len(), 4);
        for item in &seq {
            assert!(item.ts[0] <= item.ts[1] && item.ts[1] <= item.ts[2]);
            assert!(item.ts[1] <= 500.0);
            assert!((0.0..=1.0).contains(&item.intensity));
            assert_eq!(item.source_word, "HELLO");
        }
    }

    #[test]
    fn special_visemes_override_level() {
        let en = EnglishProcessor::new().unwrap();
        let mut config = VisemeConfig::default();
        config.lipsync.special_visemes.pp = 0.42;
        let seq = generate(&en, &whisper(&["stop"], &[0.0], &[500.0]), &config);
        let pp = seq.iter().find(|i| i.viseme_code == VisemeCode::PP).unwrap();
        assert!((pp.intensity - 0.42).abs() < 1e-6);
        let other = seq.iter().find(|i| i.viseme_code == VisemeCode::SS).unwrap();
        // 4 visemes * 150ms baseline leaves no slack in 500ms.
        assert!((other.intensity - 0.6).abs() < 1e-6);
    }

    #[test]
    fn slack_raises_level() {
        let en = EnglishProcessor::new().unwrap();
        let config = VisemeConfig::default();
        // NOW: 2 visemes, 1000ms, overdrive = 1000 - 300 = 700.
        let seq = generate(&en, &whisper(&["now"], &[0.0], &[1000.0]), &config);
        let expected = 0.6 + 0.7 * 0.4;
        assert!(seq.iter().all(|i| (i.intensity - expected).abs() < 1e-5));
        // Usable window clamped to 2 * 200ms.
        assert!(seq.iter().all(|i| i.ts[1] <= 400.0));
    }

    #[test]
    fn fudge_shifts_every_point() {
        let en = EnglishProcessor::new().unwrap();
        let base = VisemeConfig::default();
        let mut shifted = VisemeConfig::default();
        shifted.timing.fudge_factor = -40.0;
        let input = whisper(&["fish"], &[100.0], &[300.0]);
        let a = generate(&en, &input, &base);
        let b = generate(&en, &input, &shifted);
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            for k in 0..3 {
                assert!((x.ts[k] - 40.0 - y.ts[k]).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn unusable_words_are_skipped() {
        let en = EnglishProcessor::new().unwrap();
        let config = VisemeConfig::default();
        let input = whisper(
            &["stop", "now", "...", "fish"],
            &[0.0, f64::NAN, 700.0, 900.0],
            &[400.0, 300.0, 100.0, 0.0],
        );
        let seq = generate(&en, &input, &config);
        assert!(!seq.is_empty());
        assert!(seq.iter().all(|i| i.source_word == "stop"));
    }

    #[test]
    fn special_levels_are_clamped_to_unit_range() {
        let en = EnglishProcessor::new().unwrap();
        let mut config = VisemeConfig::default();
        config.lipsync.special_visemes.pp = 3.0;
        let seq = generate(&en, &whisper(&["stop"], &[0.0], &[500.0]), &config);
        let pp: Vec<_> = seq.iter().filter(|i| i.viseme_code == VisemeCode::PP).collect();
        assert!(!pp.is_empty());
        assert!(pp.iter().all(|i| i.intensity == 1.0));
        assert!(seq.iter().all(|i| (0.0..=1.0).contains(&i.intensity)));
    }

    #[test]
    fn nan_level_drops_only_that_entry() {
        let en = EnglishProcessor::new().unwrap();
        let mut config = VisemeConfig::default();
        let input = whisper(&["stop", "now"], &[0.0, 600.0], &[500.0, 400.0]);
        let clean = generate(&en, &input, &config);
        let clean_pp = clean
            .iter()
            .filter(|i| i.viseme_code == VisemeCode::PP)
            .count();
        assert!(clean_pp > 0);

        config.lipsync.special_visemes.pp = f32::NAN;
        let seq = generate(&en, &input, &config);
        assert!(seq.iter().all(|i| i.viseme_code != VisemeCode::PP));
        assert!(seq.iter().all(|i| i.intensity.is_finite()));
        assert_eq!(seq.len(), clean.len() - clean_pp);
        assert!(seq.iter().any(|i| i.source_word == "stop"));
        assert!(seq.iter().any(|i| i.source_word == "now"));
    }

    #[test]
    fn numbers_expand_inside_a_word_slot() {
        let en = EnglishProcessor::new().unwrap();
        let config = VisemeConfig::default();
        let seq = generate(&en, &whisper(&["42"], &[0.0], &[800.0]), &config);
        assert!(!seq.is_empty());
        assert!(seq.iter().all(|i| i.source_word == "42"));
        let mut no_expand = VisemeConfig::default();
        no_expand.lipsync.expand_numbers = false;
        assert!(generate(&en, &whisper(&["42"], &[0.0], &[800.0]), &no_expand).is_empty());
    }

    #[test]
    fn estimate_lays_words_end_to_end() {
        let en = EnglishProcessor::new().unwrap();
        let config = VisemeConfig::default();
        let w = estimate_whisper_data(&en, "stop ... now", &config);
        assert_eq!(w.words, vec!["stop", "now"]);
        assert!(w.validate().is_ok());
        assert_eq!(w.wtimes[0], 0.0);
        assert!(w.wtimes[1] >= w.wtimes[0] + w.wdurations[0]);
        assert!(w.wdurations.iter().all(|d| *d > 0.0));
        assert!(!generate(&en, &w, &config).is_empty());
    }
}
