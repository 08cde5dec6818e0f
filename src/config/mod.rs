//! Genre configuration for hitscore

mod genres;
mod subgenre;

pub use genres::{GenreId, GenreProfile, PenaltyPolicy, RangeSpec, ScoringMode};
pub use subgenre::{detect as detect_subgenre, Subgenre};
