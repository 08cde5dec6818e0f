// src/scoring/engine.rs
//
// The range heuristic: normalize each feature against its genre
// range, aggregate by weight, and derive recommendations from the
// weakest sub-scores.

use crate::config::{GenreProfile, PenaltyPolicy, RangeSpec};
use crate::core::{Feature, FeatureVector};

use super::result::{Priority, Recommendation, RecommendationCategory, SubScore};

/// Out-of-range penalty caps. The open cap allows a sub-score of 0;
/// the cushioned cap keeps a 0.3 floor.
const OPEN_PENALTY_CAP: f64 = 1.0;
const CUSHIONED_PENALTY_CAP: f64 = 0.7;

/// Normalized sub-scores plus their weighted aggregate.
#[derive(Debug, Clone)]
pub struct ScoreCard {
    /// Aggregate score 0-100, floored to the integer below.
    pub total: u32,
    /// Per-range normalized scores in [0, 1], in profile table order.
    pub subscores: Vec<(RangeSpec, f64)>,
}

impl ScoreCard {
    /// Sub-scores as percentages for reports, one decimal.
    pub fn as_percentages(&self) -> Vec<SubScore> {
        self.subscores
            .iter()
            .map(|(spec, score)| SubScore {
                feature: spec.feature,
                score: (score * 1000.0).round() / 10.0,
            })
            .collect()
    }

    fn subscore(&self, feature: Feature) -> Option<f64> {
        self.subscores
            .iter()
            .find(|(spec, _)| spec.feature == feature)
            .map(|(_, score)| *score)
    }
}

/// Score a feature set against a genre profile.
///
/// Zero-weight ranges are scored for the report but excluded from the
/// aggregate and its weight denominator.
pub fn heuristic_score(profile: &GenreProfile, features: &FeatureVector) -> ScoreCard {
    let mut subscores = Vec::with_capacity(profile.ranges.len());
    let mut weighted = 0.0;
    let mut active_weight = 0.0;

    for spec in profile.ranges {
        let value = features.value(spec.feature);
        let mut score = normalize(value, spec, profile.penalty);
        if profile.penalty == PenaltyPolicy::Open {
            score = apply_bonus(spec.feature, value, score);
        }

        if spec.weight > 0.0 {
            weighted += score * spec.weight;
            active_weight += spec.weight;
        }
        subscores.push((*spec, score));
    }

    let total = if active_weight > 0.0 {
        (weighted * 100.0 / active_weight).floor().clamp(0.0, 100.0) as u32
    } else {
        0
    };

    ScoreCard { total, subscores }
}

/// Normalize one value against its ideal range.
///
/// In-range values (inclusive) score 1.0. Out-of-range values lose
/// their distance relative to the violated boundary, with the loss
/// capped per the profile's penalty policy.
fn normalize(value: f64, spec: &RangeSpec, policy: PenaltyPolicy) -> f64 {
    if value >= spec.low && value <= spec.high {
        return 1.0;
    }

    let (distance, boundary) = if value < spec.low {
        (spec.low - value, spec.low)
    } else {
        (value - spec.high, spec.high)
    };

    let cap = match policy {
        PenaltyPolicy::Open => OPEN_PENALTY_CAP,
        PenaltyPolicy::Cushioned => CUSHIONED_PENALTY_CAP,
    };
    let penalty = (distance / boundary.abs().max(f64::EPSILON)).min(cap);
    1.0 - penalty
}

/// Near-ideal bonuses, open policy only: club tempos and very
/// danceable material score above their range, overlong tracks below.
fn apply_bonus(feature: Feature, value: f64, score: f64) -> f64 {
    match feature {
        Feature::Bpm if (120.0..=128.0).contains(&value) => (score * 1.1).min(1.0),
        Feature::Danceability if value > 0.8 => (score * 1.15).min(1.0),
        Feature::Duration if value > 300.0 => score * 0.7,
        _ => score,
    }
}

/// Derive recommendations from the weakest sub-scores.
pub fn recommendations(
    profile: &GenreProfile,
    features: &FeatureVector,
    card: &ScoreCard,
) -> Vec<Recommendation> {
    let mut recs = Vec::new();

    if let Some(score) = card.subscore(Feature::Bpm) {
        if score < 0.7 {
            if let Some(spec) = profile.ranges.iter().find(|r| r.feature == Feature::Bpm) {
                if features.bpm < spec.low {
                    recs.push(Recommendation::new(
                        Priority::High,
                        RecommendationCategory::Tempo,
                        format!(
                            "BPM ({:.0}) is below the ideal window. Consider raising the tempo toward {:.0}-{:.0} BPM.",
                            features.bpm, spec.low, spec.high
                        ),
                    ));
                } else {
                    recs.push(Recommendation::new(
                        Priority::Medium,
                        RecommendationCategory::Tempo,
                        format!(
                            "BPM ({:.0}) is above the ideal window. Consider easing the tempo toward {:.0}-{:.0} BPM.",
                            features.bpm, spec.low, spec.high
                        ),
                    ));
                }
            }
        }
    }

    if card.subscore(Feature::Danceability).is_some_and(|s| s < 0.6) {
        recs.push(Recommendation::new(
            Priority::High,
            RecommendationCategory::Danceability,
            "Danceability is low for the target profile. A steadier groove or stronger beat emphasis could help.",
        ));
    }

    if card.subscore(Feature::Energy).is_some_and(|s| s < 0.6) {
        recs.push(Recommendation::new(
            Priority::Medium,
            RecommendationCategory::Energy,
            "Energy sits below the profile's sweet spot. Consider a denser arrangement or a louder mix.",
        ));
    }

    if features.duration > 240.0 {
        recs.push(Recommendation::new(
            Priority::Medium,
            RecommendationCategory::Duration,
            format!(
                "The track runs long ({:.0}s). Radio-friendly cuts stay under 240 seconds.",
                features.duration
            ),
        ));
    } else if features.duration < 150.0 {
        recs.push(Recommendation::new(
            Priority::Low,
            RecommendationCategory::Duration,
            format!(
                "The track is short ({:.0}s). Consider developing an additional section.",
                features.duration
            ),
        ));
    }

    if recs.is_empty() {
        recs.push(Recommendation::new(
            Priority::Low,
            RecommendationCategory::Overall,
            "Core features sit inside the profile's hit window. No structural changes suggested.",
        ));
    }

    recs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GenreId, GenreProfile};

    fn generic_ideal() -> FeatureVector {
        let mut f = FeatureVector::fallback();
        f.bpm = 124.0;
        f.energy = 0.7;
        f.danceability = 0.82;
        f.loudness = -6.0;
        f.duration = 200.0;
        f.brightness = 2500.0;
        f.dynamic_variation = 0.2;
        f
    }

    #[test]
    fn test_ideal_generic_track_scores_100() {
        let profile = GenreProfile::for_genre(GenreId::Generic);
        let card = heuristic_score(&profile, &generic_ideal());
        assert_eq!(card.total, 100);
        assert!(card.subscores.iter().all(|(_, s)| *s == 1.0));
    }

    #[test]
    fn test_open_policy_can_zero_a_subscore() {
        let spec = RangeSpec {
            feature: Feature::Bpm,
            low: 110.0,
            high: 130.0,
            weight: 15.0,
        };
        // Distance 220 against a 110 boundary saturates the penalty.
        assert_eq!(normalize(-110.0, &spec, PenaltyPolicy::Open), 0.0);
    }

    #[test]
    fn test_cushioned_policy_keeps_a_floor() {
        let spec = RangeSpec {
            feature: Feature::Bpm,
            low: 90.0,
            high: 120.0,
            weight: 25.0,
        };
        let score = normalize(400.0, &spec, PenaltyPolicy::Cushioned);
        assert!((score - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_penalty_is_relative_to_the_violated_boundary() {
        let spec = RangeSpec {
            feature: Feature::Bpm,
            low: 110.0,
            high: 130.0,
            weight: 15.0,
        };
        let below = normalize(88.0, &spec, PenaltyPolicy::Open);
        assert!((below - 0.8).abs() < 1e-9, "got {}", below);
        let above = normalize(156.0, &spec, PenaltyPolicy::Open);
        assert!((above - 0.8).abs() < 1e-9, "got {}", above);
    }

    #[test]
    fn test_boundaries_are_inclusive() {
        let spec = RangeSpec {
            feature: Feature::Energy,
            low: 0.5,
            high: 0.9,
            weight: 20.0,
        };
        assert_eq!(normalize(0.5, &spec, PenaltyPolicy::Open), 1.0);
        assert_eq!(normalize(0.9, &spec, PenaltyPolicy::Open), 1.0);
    }

    #[test]
    fn test_long_track_bonus_cuts_the_duration_subscore() {
        let profile = GenreProfile::for_genre(GenreId::Generic);
        let mut f = generic_ideal();
        f.duration = 320.0;
        let card = heuristic_score(&profile, &f);
        let duration = card.subscore(Feature::Duration).unwrap();
        // Out of range and damped by the overlength adjustment.
        assert!(duration < 0.7, "duration subscore {}", duration);
        assert!(card.total < 100);
    }

    #[test]
    fn test_zero_weight_ranges_do_not_move_the_total() {
        let profile = GenreProfile::for_genre(GenreId::Sertanejo);
        let mut f = FeatureVector::fallback();
        f.energy = 0.8;
        f.loudness = -5.0;
        f.valence = 0.7;
        f.acousticness = 0.4;
        f.danceability = 0.8;

        f.bpm = 140.0;
        let in_range = heuristic_score(&profile, &f);
        f.bpm = 60.0;
        let out_of_range = heuristic_score(&profile, &f);

        assert_eq!(in_range.total, 100);
        assert_eq!(out_of_range.total, 100);
        // The informational sub-score still reflects the miss.
        assert!(out_of_range.subscore(Feature::Bpm).unwrap() < 1.0);
    }

    #[test]
    fn test_aggregate_floors() {
        let profile = GenreProfile::for_genre(GenreId::Pagode);
        let mut f = FeatureVector::fallback();
        f.danceability = 0.8;
        f.bpm = 110.0;
        f.acousticness = 0.6;
        f.energy = 0.7;
        // Valence 0.375 misses 0.5 by a quarter of the boundary:
        // sub-score 0.75, aggregate 97.5, floored to 97.
        f.valence = 0.375;
        let card = heuristic_score(&profile, &f);
        assert_eq!(card.total, 97);
    }

    #[test]
    fn test_slow_track_gets_a_tempo_recommendation() {
        let profile = GenreProfile::for_genre(GenreId::Generic);
        let mut f = generic_ideal();
        f.bpm = 70.0;
        let card = heuristic_score(&profile, &f);
        let recs = recommendations(&profile, &f, &card);
        let tempo = recs
            .iter()
            .find(|r| r.category == RecommendationCategory::Tempo)
            .unwrap();
        assert_eq!(tempo.priority, Priority::High);
        assert!(tempo.message.contains("below"));
    }

    #[test]
    fn test_fast_track_recommendation_is_medium() {
        let profile = GenreProfile::for_genre(GenreId::Generic);
        let mut f = generic_ideal();
        f.bpm = 180.0;
        let card = heuristic_score(&profile, &f);
        let recs = recommendations(&profile, &f, &card);
        let tempo = recs
            .iter()
            .find(|r| r.category == RecommendationCategory::Tempo)
            .unwrap();
        assert_eq!(tempo.priority, Priority::Medium);
    }

    #[test]
    fn test_ideal_track_gets_the_default_praise() {
        let profile = GenreProfile::for_genre(GenreId::Generic);
        let f = generic_ideal();
        let card = heuristic_score(&profile, &f);
        let recs = recommendations(&profile, &f, &card);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].category, RecommendationCategory::Overall);
        assert_eq!(recs[0].priority, Priority::Low);
    }

    #[test]
    fn test_duration_recommendations_use_fixed_limits() {
        let profile = GenreProfile::for_genre(GenreId::Samba);
        let mut f = FeatureVector::fallback();
        f.duration = 260.0;
        let card = heuristic_score(&profile, &f);
        let recs = recommendations(&profile, &f, &card);
        assert!(recs
            .iter()
            .any(|r| r.category == RecommendationCategory::Duration
                && r.priority == Priority::Medium));
    }
}
