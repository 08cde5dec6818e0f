// src/cli/args.rs
//
// Command-line arguments and the genre listing.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::config::{GenreId, GenreProfile, ScoringMode};
use crate::ml::MODELS_DIR_ENV;

#[derive(Parser, Debug)]
#[command(name = "hitscore", version)]
#[command(about = "Score the hit potential of songs from raw audio")]
pub struct Args {
    /// Audio file or directory to analyze
    #[arg(required_unless_present = "list_genres")]
    pub input: Option<PathBuf>,

    /// Genre profile to score against
    #[arg(short, long, default_value = "generic", value_parser = parse_genre)]
    pub genre: GenreId,

    /// Directory holding trained classifier blobs
    #[arg(long, env = MODELS_DIR_ENV)]
    pub models_dir: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Recurse into subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// List supported genre profiles and exit
    #[arg(long)]
    pub list_genres: bool,

    /// Verbose output with the full feature dump
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

// Unrecognized genres warn and score against the generic profile
// instead of failing the invocation.
fn parse_genre(name: &str) -> Result<GenreId, String> {
    Ok(GenreId::parse_or_generic(name))
}

/// Print the supported genres and their scoring setup.
pub fn print_genres() {
    println!("Supported genre profiles:\n");
    for genre in GenreId::all() {
        let profile = GenreProfile::for_genre(genre);
        let mode = match profile.mode {
            ScoringMode::Heuristic => "heuristic only",
            ScoringMode::MlBlend => "heuristic + trained classifier",
        };
        println!(
            "  {:<12} {} ({})",
            genre.as_str(),
            genre.display_name(),
            mode
        );
    }
    println!("\nSelect one with --genre NAME.");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["hitscore", "song.mp3"]).unwrap();
        assert_eq!(args.input.as_deref(), Some(Path::new("song.mp3")));
        assert_eq!(args.genre, GenreId::Generic);
        assert_eq!(args.format, OutputFormat::Text);
        assert!(!args.recursive);
        assert!(!args.verbose);
    }

    #[test]
    fn test_accented_genre_spelling_parses() {
        let args = Args::try_parse_from(["hitscore", "-g", "Forró", "x.mp3"]).unwrap();
        assert_eq!(args.genre, GenreId::Forro);
    }

    #[test]
    fn test_unknown_genre_falls_back_to_generic() {
        let args = Args::try_parse_from(["hitscore", "-g", "polka", "x.mp3"]).unwrap();
        assert_eq!(args.genre, GenreId::Generic);
    }

    #[test]
    fn test_input_required_unless_listing() {
        assert!(Args::try_parse_from(["hitscore"]).is_err());
        let args = Args::try_parse_from(["hitscore", "--list-genres"]).unwrap();
        assert!(args.list_genres);
        assert!(args.input.is_none());
    }

    #[test]
    fn test_json_format_flag() {
        let args = Args::try_parse_from(["hitscore", "-f", "json", "x.mp3"]).unwrap();
        assert_eq!(args.format, OutputFormat::Json);
    }
}
