// src/main.rs
use anyhow::{bail, Context, Result};
use clap::Parser;
use colorful::Colorful;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use hitscore::cli::{self, Args, OutputFormat};
use hitscore::{analyze_file, AnalysisReport, LoadError};

const AUDIO_EXTENSIONS: [&str; 6] = ["mp3", "wav", "ogg", "flac", "m4a", "aac"];

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if args.verbose { "debug" } else { "warn" }),
    )
    .init();

    if args.list_genres {
        cli::print_genres();
        return Ok(());
    }

    let input = args
        .input
        .as_deref()
        .context("an input file or directory is required")?;
    let files = collect_audio_files(input, args.recursive)?;

    if files.is_empty() {
        println!("{}", "No audio files found!".red());
        return Ok(());
    }

    if files.len() == 1 {
        let report = analyze_file(&files[0], args.genre, args.models_dir.as_deref())
            .with_context(|| format!("failed to analyze {}", files[0].display()))?;
        print_single(&report, &args)?;
        return Ok(());
    }

    run_batch(&files, &args)
}

fn print_single(report: &AnalysisReport, args: &Args) -> Result<()> {
    match args.format {
        OutputFormat::Text => println!("{}", cli::format_report(report, args.verbose)),
        OutputFormat::Json => println!("{}", cli::format_json(report)?),
    }
    Ok(())
}

fn run_batch(files: &[PathBuf], args: &Args) -> Result<()> {
    println!("Found {} audio file(s)\n", files.len());

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    let outcomes: Vec<(PathBuf, Result<AnalysisReport, LoadError>)> = files
        .par_iter()
        .map(|path| {
            let outcome = analyze_file(path, args.genre, args.models_dir.as_deref());
            pb.inc(1);
            (path.clone(), outcome)
        })
        .collect();
    pb.finish_and_clear();

    let mut reports = Vec::new();
    let mut failures = Vec::new();
    for (path, outcome) in outcomes {
        match outcome {
            Ok(report) => reports.push(report),
            Err(e) => failures.push((path, anyhow::Error::new(e))),
        }
    }

    match args.format {
        OutputFormat::Text => {
            for report in &reports {
                println!("{}", cli::format_report(report, args.verbose));
            }
            for (path, e) in &failures {
                println!("{} {}: {:#}", "✗".red(), path.display(), e);
            }
            print!("{}", cli::format_summary(&reports));
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&reports)?);
            for (path, e) in &failures {
                eprintln!("failed {}: {:#}", path.display(), e);
            }
        }
    }

    Ok(())
}

fn collect_audio_files(path: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    if !path.exists() {
        bail!("{} does not exist", path.display());
    }

    let mut files = Vec::new();

    if path.is_file() {
        if has_audio_extension(path) {
            files.push(path.to_path_buf());
        }
        return Ok(files);
    }

    let max_depth = if recursive { usize::MAX } else { 1 };
    for entry in WalkDir::new(path)
        .max_depth(max_depth)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if entry.file_type().is_file() && has_audio_extension(entry.path()) {
            files.push(entry.into_path());
        }
    }

    files.sort();
    Ok(files)
}

fn has_audio_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| AUDIO_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}
