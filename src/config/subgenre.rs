// src/config/subgenre.rs
//
// Subcategory detection inside the broad genres. Each candidate is a
// table of feature clauses scored in points; the highest total wins
// and weak totals fall back to the genre's default subcategory.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::{Feature, FeatureVector};

use super::genres::GenreId;

/// Totals below this fall back to the parent's default subcategory.
const MIN_CONFIDENT_SCORE: i32 = 30;

/// Detected subcategories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subgenre {
    RnbTrap,
    RnbPop,
    MpbRock,
    MpbIndie,
    MpbClassic,
}

impl Subgenre {
    /// Canonical identifier, as used in model filenames.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RnbTrap => "rnb_trap",
            Self::RnbPop => "rnb_pop",
            Self::MpbRock => "mpb_rock",
            Self::MpbIndie => "mpb_indie",
            Self::MpbClassic => "mpb_classic",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::RnbTrap => "R&B Trap",
            Self::RnbPop => "R&B Pop",
            Self::MpbRock => "MPB Rock",
            Self::MpbIndie => "MPB Indie",
            Self::MpbClassic => "MPB Classic",
        }
    }

    pub fn parent(&self) -> GenreId {
        match self {
            Self::RnbTrap | Self::RnbPop => GenreId::RnbBrasil,
            Self::MpbRock | Self::MpbIndie | Self::MpbClassic => GenreId::Mpb,
        }
    }

    /// MPB Indie predictions go through the ensemble blend.
    pub fn uses_ensemble(&self) -> bool {
        matches!(self, Self::MpbIndie)
    }
}

impl fmt::Display for Subgenre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One scored condition on a feature value.
#[derive(Debug, Clone, Copy)]
struct Clause {
    feature: Feature,
    test: Test,
    points: i32,
}

#[derive(Debug, Clone, Copy)]
enum Test {
    /// Strictly greater.
    Gt(f64),
    /// Strictly less.
    Lt(f64),
    /// Inclusive on both ends.
    Between(f64, f64),
}

impl Test {
    fn passes(&self, value: f64) -> bool {
        match *self {
            Test::Gt(limit) => value > limit,
            Test::Lt(limit) => value < limit,
            Test::Between(low, high) => (low..=high).contains(&value),
        }
    }
}

const fn gt(feature: Feature, limit: f64, points: i32) -> Clause {
    Clause {
        feature,
        test: Test::Gt(limit),
        points,
    }
}

const fn lt(feature: Feature, limit: f64, points: i32) -> Clause {
    Clause {
        feature,
        test: Test::Lt(limit),
        points,
    }
}

const fn between(feature: Feature, low: f64, high: f64, points: i32) -> Clause {
    Clause {
        feature,
        test: Test::Between(low, high),
        points,
    }
}

struct Candidate {
    subgenre: Subgenre,
    clauses: &'static [Clause],
}

const RNB_BRASIL_CANDIDATES: &[Candidate] = &[
    Candidate {
        subgenre: Subgenre::RnbTrap,
        clauses: &[
            lt(Feature::Bpm, 95.0, 30),
            gt(Feature::Speechiness, 0.2, 35),
            gt(Feature::Energy, 0.7, 20),
            gt(Feature::Danceability, 0.6, 15),
            gt(Feature::Acousticness, 0.5, -40),
            lt(Feature::Speechiness, 0.15, -30),
        ],
    },
    Candidate {
        subgenre: Subgenre::RnbPop,
        clauses: &[
            between(Feature::Bpm, 95.0, 120.0, 25),
            lt(Feature::Speechiness, 0.15, 20),
            gt(Feature::Valence, 0.5, 25),
            gt(Feature::Danceability, 0.6, 15),
            gt(Feature::Acousticness, 0.4, 10),
        ],
    },
];

const MPB_CANDIDATES: &[Candidate] = &[
    Candidate {
        subgenre: Subgenre::MpbRock,
        clauses: &[
            gt(Feature::Energy, 0.6, 30),
            gt(Feature::Loudness, -7.0, 25),
            gt(Feature::Bpm, 110.0, 20),
            lt(Feature::Acousticness, 0.4, 15),
        ],
    },
    Candidate {
        subgenre: Subgenre::MpbIndie,
        clauses: &[
            gt(Feature::Acousticness, 0.5, 35),
            between(Feature::Valence, 0.4, 0.7, 25),
            between(Feature::Bpm, 95.0, 120.0, 20),
            between(Feature::Energy, 0.4, 0.65, 15),
            lt(Feature::Speechiness, 0.15, 15),
        ],
    },
    Candidate {
        subgenre: Subgenre::MpbClassic,
        clauses: &[
            gt(Feature::Acousticness, 0.6, 30),
            between(Feature::Bpm, 70.0, 110.0, 25),
            lt(Feature::Energy, 0.5, 20),
            gt(Feature::DynamicVariation, 0.15, 15),
            lt(Feature::Speechiness, 0.12, 10),
        ],
    },
];

fn candidates_for(genre: GenreId) -> Option<(&'static [Candidate], Subgenre)> {
    match genre {
        GenreId::RnbBrasil => Some((RNB_BRASIL_CANDIDATES, Subgenre::RnbPop)),
        GenreId::Mpb => Some((MPB_CANDIDATES, Subgenre::MpbClassic)),
        _ => None,
    }
}

/// Detect the subcategory of `features` within `genre`.
///
/// Genres without subcategory tables return None. Ties keep the
/// earlier table entry; negative totals count as zero.
pub fn detect(genre: GenreId, features: &FeatureVector) -> Option<Subgenre> {
    let (candidates, default) = candidates_for(genre)?;

    let mut best: Option<(Subgenre, i32)> = None;
    for candidate in candidates {
        let total: i32 = candidate
            .clauses
            .iter()
            .filter(|c| c.test.passes(features.value(c.feature)))
            .map(|c| c.points)
            .sum();
        let total = total.max(0);

        match best {
            Some((_, score)) if total <= score => {}
            _ => best = Some((candidate.subgenre, total)),
        }
    }

    match best {
        Some((subgenre, score)) if score >= MIN_CONFIDENT_SCORE => Some(subgenre),
        _ => Some(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features(f: impl FnOnce(&mut FeatureVector)) -> FeatureVector {
        let mut v = FeatureVector::fallback();
        f(&mut v);
        v
    }

    #[test]
    fn test_trap_profile_wins() {
        let f = features(|f| {
            f.bpm = 88.0;
            f.speechiness = 0.3;
            f.energy = 0.8;
            f.danceability = 0.7;
            f.acousticness = 0.2;
        });
        assert_eq!(detect(GenreId::RnbBrasil, &f), Some(Subgenre::RnbTrap));
    }

    #[test]
    fn test_acoustic_low_speech_material_reads_as_pop() {
        let f = features(|f| {
            f.bpm = 100.0;
            f.speechiness = 0.05;
            f.valence = 0.7;
            f.danceability = 0.7;
            f.acousticness = 0.6;
        });
        // Trap loses its speech and gains both negative clauses.
        assert_eq!(detect(GenreId::RnbBrasil, &f), Some(Subgenre::RnbPop));
    }

    #[test]
    fn test_weak_evidence_falls_back_to_default() {
        let f = features(|f| {
            f.bpm = 150.0;
            f.speechiness = 0.18;
            f.energy = 0.5;
            f.danceability = 0.3;
            f.valence = 0.2;
            f.acousticness = 0.2;
        });
        // No candidate reaches 30 points.
        assert_eq!(detect(GenreId::RnbBrasil, &f), Some(Subgenre::RnbPop));
    }

    #[test]
    fn test_mpb_rock_detection() {
        let f = features(|f| {
            f.energy = 0.75;
            f.loudness = -5.0;
            f.bpm = 125.0;
            f.acousticness = 0.2;
        });
        assert_eq!(detect(GenreId::Mpb, &f), Some(Subgenre::MpbRock));
    }

    #[test]
    fn test_mpb_indie_detection() {
        let f = features(|f| {
            f.acousticness = 0.6;
            f.valence = 0.55;
            f.bpm = 105.0;
            f.energy = 0.5;
            f.speechiness = 0.08;
            f.dynamic_variation = 0.05;
        });
        assert_eq!(detect(GenreId::Mpb, &f), Some(Subgenre::MpbIndie));
    }

    #[test]
    fn test_mpb_classic_detection() {
        let f = features(|f| {
            f.acousticness = 0.8;
            f.valence = 0.3;
            f.bpm = 85.0;
            f.energy = 0.35;
            f.dynamic_variation = 0.2;
            f.speechiness = 0.05;
        });
        assert_eq!(detect(GenreId::Mpb, &f), Some(Subgenre::MpbClassic));
    }

    #[test]
    fn test_plain_genres_have_no_subcategories() {
        let f = FeatureVector::fallback();
        assert_eq!(detect(GenreId::Samba, &f), None);
        assert_eq!(detect(GenreId::Generic, &f), None);
    }

    #[test]
    fn test_only_mpb_indie_uses_the_ensemble() {
        assert!(Subgenre::MpbIndie.uses_ensemble());
        assert!(!Subgenre::RnbTrap.uses_ensemble());
        assert!(!Subgenre::MpbClassic.uses_ensemble());
    }
}
