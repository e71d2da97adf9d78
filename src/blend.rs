//! Per-frame viseme blending.
//!
//! Every frame runs dampen → activate → envelope → write, in that order,
//! over a single [`VisemeState`]. Sequence items are never consumed: an item
//! is active purely because `now` falls inside its window.

use crate::config::{CurveKind, VisemeConfig};
use crate::sequence::VisemeSequenceItem;
use crate::state::VisemeState;

/// Targets below this snap to zero instead of decaying further.
pub const NEGLIGIBLE_INTENSITY: f32 = 0.01;

/// Evaluate a ramp shape at `x`, clamped to `[0, 1]`.
pub fn curve(x: f64, kind: CurveKind) -> f64 {
    let x = x.clamp(0.0, 1.0);
    match kind {
        CurveKind::Linear => x,
        CurveKind::Quadratic => x * x,
        CurveKind::Cubic => x * x * x,
        CurveKind::Exponential => 1.0 - (-3.0 * x).exp(),
    }
}

/// Where an item's envelope stands at `now`. Derived on demand, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopePhase {
    /// `now` is before the rise point.
    Pending,
    /// Within `attack_time` of the rise point.
    Attacking,
    /// Active and outside both ramps.
    Steady,
    /// Within `release_time` of the peak point.
    Releasing,
    /// `now` is past the peak point.
    Expired,
}

/// Classify `item` at time `now`.
///
/// When the attack and release ramps overlap, attack takes precedence.
pub fn envelope_phase(
    item: &VisemeSequenceItem,
    now: f64,
    config: &VisemeConfig,
) -> EnvelopePhase {
    let [rise, peak, _] = item.ts;
    if now < rise {
        EnvelopePhase::Pending
    } else if now > peak {
        EnvelopePhase::Expired
    } else if now - rise < config.timing.attack_time {
        EnvelopePhase::Attacking
    } else if peak - now < config.timing.release_time {
        EnvelopePhase::Releasing
    } else {
        EnvelopePhase::Steady
    }
}

/// Envelope-shaped intensity of an active item at `now`.
///
/// The attack ramp rises from 0 at `ts[0]`; the release ramp falls to 0 at
/// `ts[1]`. A zero attack or release time disables that ramp. The result is
/// floored at `intensity.min_threshold`.
pub fn envelope_value(item: &VisemeSequenceItem, now: f64, config: &VisemeConfig) -> f32 {
    let timing = &config.timing;
    let [rise, peak, _] = item.ts;
    let mut value = f64::from(item.intensity) * f64::from(config.intensity.base_multiplier);

    let elapsed = now - rise;
    if timing.attack_time > 0.0 && elapsed < timing.attack_time {
        value *= curve(elapsed / timing.attack_time, config.curves.attack_curve);
    }

    let remaining = peak - now;
    if timing.release_time > 0.0 && remaining < timing.release_time {
        let progress = (timing.release_time - remaining) / timing.release_time;
        value *= 1.0 - curve(progress, config.curves.release_curve);
    }

    (value as f32).max(config.intensity.min_threshold)
}

/// Advance the blender by one frame.
pub fn update(state: &mut VisemeState, now: f64, config: &VisemeConfig) {
    let dampening = config.intensity.dampening_factor;
    for value in state.targets.values_mut() {
        if *value < NEGLIGIBLE_INTENSITY {
            *value = 0.0;
        } else {
            *value *= dampening;
        }
    }

    let min_duration = config.timing.min_duration;
    let active = state.sequence.iter().filter(|item| {
        let [rise, peak, _] = item.ts;
        rise <= now && now <= peak && (min_duration <= 0.0 || peak - rise >= min_duration)
    });

    for item in active {
        let value = envelope_value(item, now, config);
        state.targets.insert(item.viseme_code, value);
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use crate::viseme::VisemeCode;

    fn item(code: VisemeCode, ts: [f64; 3], intensity: f32) -> VisemeSequenceItem {
        VisemeSequenceItem {
            viseme_code: code,
            ts,
            intensity,
            source_word: "TEST".into(),
            source_time: ts[0],
            source_duration: ts[2] - ts[0],
        }
    }

    #[test]
    fn curves_hit_endpoints() {
        for kind in [CurveKind::Linear, CurveKind::Quadratic, CurveKind::Cubic] {
            assert_eq!(curve(0.0, kind), 0.0);
            assert_eq!(curve(1.0, kind), 1.0);
        }
        assert_eq!(curve(0.0, CurveKind::Exponential), 0.0);
        assert!((curve(1.0, CurveKind::Exponential) - (1.0 - (-3.0f64).exp())).abs() < 1e-12);
        assert_eq!(curve(0.5, CurveKind::Quadratic), 0.25);
        assert_eq!(curve(-1.0, CurveKind::Linear), 0.0);
        assert_eq!(curve(2.0, CurveKind::Cubic), 1.0);
    }

    #[test]
    fn dampening_decays_then_snaps_to_zero() {
        let config = VisemeConfig::default();
        let mut state = VisemeState::default();
        state.targets.insert(VisemeCode::Aa, 0.5);
        update(&mut state, 0.0, &config);
        assert!((state.target(VisemeCode::Aa) - 0.4).abs() < 1e-6);
        state.targets.insert(VisemeCode::Aa, 0.009);
        update(&mut state, 0.0, &config);
        assert_eq!(state.target(VisemeCode::Aa), 0.0);
    }

    #[test]
    fn items_outside_window_are_inactive() {
        let config = VisemeConfig::default();
        let mut state = VisemeState::default();
        state.start_sequence(vec![item(VisemeCode::O, [100.0, 300.0, 400.0], 1.0)]);
        update(&mut state, 50.0, &config);
        assert_eq!(state.target(VisemeCode::O), 0.0);
        update(&mut state, 350.0, &config);
        assert_eq!(state.target(VisemeCode::O), 0.0);
        update(&mut state, 200.0, &config);
        assert!((state.target(VisemeCode::O) - 1.0).abs() < 1e-6);
        assert_eq!(state.sequence.len(), 1);
    }

    #[test]
    fn attack_and_release_shape_the_value() {
        let config = VisemeConfig::default();
        let it = item(VisemeCode::E, [0.0, 200.0, 260.0], 1.0);
        assert_eq!(envelope_value(&it, 0.0, &config), 0.0);
        assert!((envelope_value(&it, 25.0, &config) - 0.5).abs() < 1e-6);
        assert!((envelope_value(&it, 100.0, &config) - 1.0).abs() < 1e-6);
        assert!((envelope_value(&it, 170.0, &config) - 0.5).abs() < 1e-6);
        assert_eq!(envelope_value(&it, 200.0, &config), 0.0);
    }

    #[test]
    fn zero_ramp_times_disable_shaping() {
        let mut config = VisemeConfig::default();
        config.timing.attack_time = 0.0;
        config.timing.release_time = 0.0;
        let it = item(VisemeCode::E, [0.0, 10.0, 20.0], 0.7);
        assert!((envelope_value(&it, 0.0, &config) - 0.7).abs() < 1e-6);
        assert!((envelope_value(&it, 10.0, &config) - 0.7).abs() < 1e-6);
    }

    #[test]
    fn min_threshold_floors_active_values() {
        let mut config = VisemeConfig::default();
        config.intensity.min_threshold = 0.2;
        let it = item(VisemeCode::U, [0.0, 200.0, 260.0], 1.0);
        assert!((envelope_value(&it, 0.0, &config) - 0.2).abs() < 1e-6);
    }

    #[test]
    fn min_duration_skips_short_windows() {
        let mut config = VisemeConfig::default();
        config.timing.min_duration = 50.0;
        config.timing.attack_time = 0.0;
        config.timing.release_time = 0.0;
        let mut state = VisemeState::default();
        state.start_sequence(vec![
            item(VisemeCode::SS, [0.0, 30.0, 60.0], 1.0),
            item(VisemeCode::RR, [0.0, 80.0, 100.0], 1.0),
        ]);
        update(&mut state, 10.0, &config);
        assert_eq!(state.target(VisemeCode::SS), 0.0);
        assert_eq!(state.target(VisemeCode::RR), 1.0);
    }

    #[test]
    fn last_writer_wins_per_code() {
        let mut config = VisemeConfig::default();
        config.timing.attack_time = 0.0;
        config.timing.release_time = 0.0;
        let mut state = VisemeState::default();
        state.start_sequence(vec![
            item(VisemeCode::Aa, [0.0, 100.0, 120.0], 0.9),
            item(VisemeCode::Aa, [0.0, 100.0, 120.0], 0.3),
        ]);
        update(&mut state, 50.0, &config);
        assert!((state.target(VisemeCode::Aa) - 0.3).abs() < 1e-6);
    }

    #[test]
    fn phases_follow_time() {
        let config = VisemeConfig::default();
        let it = item(VisemeCode::I, [100.0, 300.0, 350.0], 1.0);
        assert_eq!(envelope_phase(&it, 50.0, &config), EnvelopePhase::Pending);
        assert_eq!(envelope_phase(&it, 120.0, &config), EnvelopePhase::Attacking);
        assert_eq!(envelope_phase(&it, 200.0, &config), EnvelopePhase::Steady);
        assert_eq!(envelope_phase(&it, 280.0, &config), EnvelopePhase::Releasing);
        assert_eq!(envelope_phase(&it, 301.0, &config), EnvelopePhase::Expired);
    }
}
