// src/cli/output.rs
//
// Terminal and JSON rendering of analysis reports.

use colorful::Colorful;

use crate::core::FeatureVector;
use crate::scoring::{AnalysisReport, Prediction, Priority};

/// Render one report for the terminal.
pub fn format_report(report: &AnalysisReport, verbose: bool) -> String {
    let mut out = String::new();
    let p = &report.prediction;

    out.push_str(&format!("{}\n", report.file.as_str().cyan()));
    out.push_str(&format!("  Genre: {}\n", p.genre.display_name()));
    if let Some(sub) = p.subcategory {
        out.push_str(&format!("  Subcategory: {}\n", sub.display_name()));
    }
    out.push_str(&format!("  Score: {}\n", score_line(p)));
    out.push_str(&format!("  Method: {}\n", p.method.description()));
    if let Some(ml) = &p.ml {
        let call = if ml.is_hit { "hit" } else { "miss" };
        out.push_str(&format!(
            "  Classifier: {:.1}% hit probability ({}), heuristic base {}\n",
            ml.probability, call, ml.heuristic_score
        ));
    }

    out.push_str("  Sub-scores:\n");
    for sub in &p.individual_scores {
        out.push_str(&format!("    {:<22} {:>5.1}%\n", sub.feature, sub.score));
    }

    out.push_str("  Recommendations:\n");
    for rec in &p.recommendations {
        out.push_str(&format!(
            "    • {} {}\n",
            priority_tag(rec.priority),
            rec.message
        ));
    }

    if verbose {
        out.push_str(&format_features(&report.features));
    }

    out
}

fn score_line(p: &Prediction) -> String {
    let text = format!("{}/100 ({})", p.score, p.verdict());
    match p.score {
        80..=100 => format!("{}", text.green()),
        60..=79 => format!("{}", text.cyan()),
        40..=59 => format!("{}", text.yellow()),
        _ => format!("{}", text.red()),
    }
}

fn priority_tag(priority: Priority) -> String {
    match priority {
        Priority::High => format!("{}", "[high]".red()),
        Priority::Medium => format!("{}", "[medium]".yellow()),
        Priority::Low => "[low]".to_string(),
    }
}

fn format_features(f: &FeatureVector) -> String {
    let mut out = String::new();
    out.push_str("  Feature detail:\n");
    out.push_str(&format!("    BPM: {:.1}\n", f.bpm));
    out.push_str(&format!("    Energy: {:.3}\n", f.energy));
    out.push_str(&format!("    Energy variance: {:.5}\n", f.energy_variance));
    out.push_str(&format!("    Danceability: {:.3}\n", f.danceability));
    out.push_str(&format!("    Valence: {:.3}\n", f.valence));
    out.push_str(&format!("    Acousticness: {:.3}\n", f.acousticness));
    out.push_str(&format!("    Instrumentalness: {:.3}\n", f.instrumentalness));
    out.push_str(&format!("    Liveness: {:.3}\n", f.liveness));
    out.push_str(&format!("    Speechiness: {:.3}\n", f.speechiness));
    out.push_str(&format!("    Loudness: {:.1} dBFS\n", f.loudness));
    out.push_str(&format!("    Brightness: {:.0} Hz\n", f.brightness));
    out.push_str(&format!("    Rolloff: {:.0} Hz\n", f.rolloff));
    out.push_str(&format!("    Bandwidth: {:.0} Hz\n", f.bandwidth));
    out.push_str(&format!("    Zero-crossing rate: {:.4}\n", f.zcr));
    out.push_str(&format!("    Dynamic variation: {:.4}\n", f.dynamic_variation));
    out.push_str(&format!("    Pitch irregularity: {:.3}\n", f.pitch_irregularity));
    out.push_str(&format!("    Duration: {:.1}s\n", f.duration));
    out
}

/// Render one report as pretty JSON.
pub fn format_json(report: &AnalysisReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

/// Band counts and a ranked list for batch runs.
pub fn format_summary(reports: &[AnalysisReport]) -> String {
    let mut out = String::new();

    let count = |lo: u32, hi: u32| {
        reports
            .iter()
            .filter(|r| (lo..=hi).contains(&r.prediction.score))
            .count()
    };
    let strong = count(80, 100);
    let promising = count(60, 79);
    let moderate = count(40, 59);
    let low = count(0, 39);

    out.push_str("\nSummary:\n");
    out.push_str(&format!("  {} track(s) analyzed\n", reports.len()));
    if strong > 0 {
        let line = format!("✓ {} strong (80+)", strong);
        out.push_str(&format!("  {}\n", line.green()));
    }
    if promising > 0 {
        let line = format!("• {} promising (60-79)", promising);
        out.push_str(&format!("  {}\n", line.cyan()));
    }
    if moderate > 0 {
        let line = format!("? {} moderate (40-59)", moderate);
        out.push_str(&format!("  {}\n", line.yellow()));
    }
    if low > 0 {
        let line = format!("✗ {} low (under 40)", low);
        out.push_str(&format!("  {}\n", line.red()));
    }

    if reports.len() > 1 {
        let mut ranked: Vec<&AnalysisReport> = reports.iter().collect();
        ranked.sort_by(|a, b| {
            b.prediction
                .score
                .cmp(&a.prediction.score)
                .then_with(|| a.file.cmp(&b.file))
        });

        out.push_str("\n  Ranked:\n");
        for (i, r) in ranked.iter().take(5).enumerate() {
            out.push_str(&format!(
                "  {}. {:>3}  {}\n",
                i + 1,
                r.prediction.score,
                r.file
            ));
        }
    }

    out
}
