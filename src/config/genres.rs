// src/config/genres.rs
//
// Genre scoring profiles: per-feature ideal ranges with weights, the
// normalization policy, and whether trained classifiers participate.

use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::Feature;

/// Supported genre profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenreId {
    Generic,
    Sertanejo,
    Samba,
    Pagode,
    Forro,
    Mpb,
    RnbBrasil,
    Brazil,
}

impl GenreId {
    pub fn all() -> [Self; 8] {
        [
            Self::Generic,
            Self::Sertanejo,
            Self::Samba,
            Self::Pagode,
            Self::Forro,
            Self::Mpb,
            Self::RnbBrasil,
            Self::Brazil,
        ]
    }

    /// Canonical lowercase identifier, as used in model filenames.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::Sertanejo => "sertanejo",
            Self::Samba => "samba",
            Self::Pagode => "pagode",
            Self::Forro => "forro",
            Self::Mpb => "mpb",
            Self::RnbBrasil => "rnb_brasil",
            Self::Brazil => "brazil",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Generic => "Generic",
            Self::Sertanejo => "Sertanejo",
            Self::Samba => "Samba",
            Self::Pagode => "Pagode",
            Self::Forro => "Forró",
            Self::Mpb => "MPB",
            Self::RnbBrasil => "R&B Brasil",
            Self::Brazil => "Brazilian Pop",
        }
    }

    /// Case-insensitive lookup; accepts the accented forró spelling.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "generic" => Some(Self::Generic),
            "sertanejo" => Some(Self::Sertanejo),
            "samba" => Some(Self::Samba),
            "pagode" => Some(Self::Pagode),
            "forro" | "forró" => Some(Self::Forro),
            "mpb" => Some(Self::Mpb),
            "rnb_brasil" => Some(Self::RnbBrasil),
            "brazil" => Some(Self::Brazil),
            _ => None,
        }
    }

    /// Lookup that never fails: empty input means "no genre" and any
    /// unrecognized id falls back to the generic profile with a warning.
    pub fn parse_or_generic(name: &str) -> Self {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Self::Generic;
        }
        match Self::parse(trimmed) {
            Some(id) => id,
            None => {
                warn!("unknown genre '{}', scoring against the generic profile", trimmed);
                Self::Generic
            }
        }
    }
}

impl fmt::Display for GenreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How out-of-range features are penalized during normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PenaltyPolicy {
    /// Penalty uncapped down to 0.0, with near-ideal bonuses on top.
    Open,
    /// Penalty capped so every sub-score keeps a 0.3 floor; no bonuses.
    Cushioned,
}

/// Whether a profile consults trained classifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMode {
    /// Range-based heuristic only.
    Heuristic,
    /// Blend with a classifier when one is available.
    MlBlend,
}

/// One weighted ideal range.
#[derive(Debug, Clone, Copy)]
pub struct RangeSpec {
    pub feature: Feature,
    pub low: f64,
    pub high: f64,
    /// Contribution to the aggregate; zero-weight ranges are scored
    /// and reported but do not move the total.
    pub weight: f64,
}

const fn range(feature: Feature, low: f64, high: f64, weight: f64) -> RangeSpec {
    RangeSpec {
        feature,
        low,
        high,
        weight,
    }
}

/// Complete scoring profile for one genre.
#[derive(Debug, Clone)]
pub struct GenreProfile {
    pub id: GenreId,
    pub ranges: &'static [RangeSpec],
    pub penalty: PenaltyPolicy,
    pub mode: ScoringMode,
}

impl GenreProfile {
    pub fn for_genre(id: GenreId) -> Self {
        match id {
            GenreId::Generic => Self::generic(),
            GenreId::Sertanejo => Self::sertanejo(),
            GenreId::Samba => Self::samba(),
            GenreId::Pagode => Self::pagode(),
            GenreId::Forro => Self::forro(),
            GenreId::Mpb => Self::mpb(),
            GenreId::RnbBrasil => Self::rnb_brasil(),
            GenreId::Brazil => Self::brazil(),
        }
    }

    /// Mainstream pop baseline used when no genre is given.
    fn generic() -> Self {
        const RANGES: &[RangeSpec] = &[
            range(Feature::Bpm, 110.0, 130.0, 15.0),
            range(Feature::Energy, 0.5, 0.9, 20.0),
            range(Feature::Danceability, 0.6, 0.95, 25.0),
            range(Feature::Loudness, -8.0, -4.0, 10.0),
            range(Feature::Duration, 150.0, 240.0, 10.0),
            range(Feature::Brightness, 1500.0, 3500.0, 10.0),
            range(Feature::DynamicVariation, 0.1, 0.4, 10.0),
        ];
        Self {
            id: GenreId::Generic,
            ranges: RANGES,
            penalty: PenaltyPolicy::Open,
            mode: ScoringMode::Heuristic,
        }
    }

    /// Energy and loudness dominate; tempo is informational only.
    fn sertanejo() -> Self {
        const RANGES: &[RangeSpec] = &[
            range(Feature::Energy, 0.6, 0.95, 35.0),
            range(Feature::Loudness, -7.0, -3.0, 30.0),
            range(Feature::Valence, 0.5, 0.9, 15.0),
            range(Feature::Acousticness, 0.2, 0.6, 10.0),
            range(Feature::Danceability, 0.6, 0.95, 10.0),
            range(Feature::Bpm, 120.0, 160.0, 0.0),
        ];
        Self {
            id: GenreId::Sertanejo,
            ranges: RANGES,
            penalty: PenaltyPolicy::Cushioned,
            mode: ScoringMode::MlBlend,
        }
    }

    fn samba() -> Self {
        const RANGES: &[RangeSpec] = &[
            range(Feature::Energy, 0.5, 0.85, 45.0),
            range(Feature::Bpm, 90.0, 120.0, 25.0),
            range(Feature::Loudness, -9.0, -4.0, 10.0),
            range(Feature::Brightness, 1200.0, 3000.0, 10.0),
            range(Feature::Danceability, 0.55, 0.9, 5.0),
            range(Feature::DynamicVariation, 0.1, 0.4, 5.0),
        ];
        Self {
            id: GenreId::Samba,
            ranges: RANGES,
            penalty: PenaltyPolicy::Cushioned,
            mode: ScoringMode::MlBlend,
        }
    }

    fn pagode() -> Self {
        const RANGES: &[RangeSpec] = &[
            range(Feature::Danceability, 0.65, 0.95, 30.0),
            range(Feature::Bpm, 100.0, 130.0, 25.0),
            range(Feature::Acousticness, 0.4, 0.8, 20.0),
            range(Feature::Energy, 0.5, 0.85, 15.0),
            range(Feature::Valence, 0.5, 0.9, 10.0),
        ];
        Self {
            id: GenreId::Pagode,
            ranges: RANGES,
            penalty: PenaltyPolicy::Cushioned,
            mode: ScoringMode::MlBlend,
        }
    }

    fn forro() -> Self {
        const RANGES: &[RangeSpec] = &[
            range(Feature::Bpm, 110.0, 140.0, 30.0),
            range(Feature::Danceability, 0.65, 0.95, 25.0),
            range(Feature::Energy, 0.55, 0.9, 20.0),
            range(Feature::Acousticness, 0.3, 0.7, 15.0),
            range(Feature::Valence, 0.5, 0.9, 10.0),
        ];
        Self {
            id: GenreId::Forro,
            ranges: RANGES,
            penalty: PenaltyPolicy::Cushioned,
            mode: ScoringMode::MlBlend,
        }
    }

    /// Wide stylistic spread, so acoustic character leads the table.
    fn mpb() -> Self {
        const RANGES: &[RangeSpec] = &[
            range(Feature::Acousticness, 0.4, 0.85, 30.0),
            range(Feature::Valence, 0.4, 0.8, 20.0),
            range(Feature::Energy, 0.35, 0.7, 15.0),
            range(Feature::DynamicVariation, 0.12, 0.4, 15.0),
            range(Feature::Loudness, -12.0, -5.0, 10.0),
            range(Feature::Bpm, 85.0, 125.0, 10.0),
        ];
        Self {
            id: GenreId::Mpb,
            ranges: RANGES,
            penalty: PenaltyPolicy::Cushioned,
            mode: ScoringMode::MlBlend,
        }
    }

    fn rnb_brasil() -> Self {
        const RANGES: &[RangeSpec] = &[
            range(Feature::Energy, 0.5, 0.85, 25.0),
            range(Feature::Danceability, 0.6, 0.9, 25.0),
            range(Feature::Speechiness, 0.08, 0.3, 15.0),
            range(Feature::Loudness, -8.0, -3.0, 15.0),
            range(Feature::Bpm, 85.0, 115.0, 10.0),
            range(Feature::Valence, 0.4, 0.8, 10.0),
        ];
        Self {
            id: GenreId::RnbBrasil,
            ranges: RANGES,
            penalty: PenaltyPolicy::Cushioned,
            mode: ScoringMode::MlBlend,
        }
    }

    /// Cross-genre Brazilian mainstream profile.
    fn brazil() -> Self {
        const RANGES: &[RangeSpec] = &[
            range(Feature::Energy, 0.6, 0.9, 25.0),
            range(Feature::Danceability, 0.65, 0.95, 25.0),
            range(Feature::Loudness, -6.0, -2.0, 20.0),
            range(Feature::Valence, 0.5, 0.9, 15.0),
            range(Feature::Bpm, 95.0, 128.0, 15.0),
        ];
        Self {
            id: GenreId::Brazil,
            ranges: RANGES,
            penalty: PenaltyPolicy::Cushioned,
            mode: ScoringMode::MlBlend,
        }
    }
}
