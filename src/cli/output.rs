//! Output formatting for CLI

use crate::{pipeline::RunSummary, q_learning::WeightVector};

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:20} {}", format!("{}:", key), value);
}

/// One `name: weight` line per feature.
pub fn format_weights(weights: &WeightVector) -> String {
    weights
        .named()
        .map(|(feature, w)| format!("{:<17}: {w:.6}\n", feature.name()))
        .collect()
}

/// Print the headline numbers of a finished run.
pub fn print_run_summary(summary: &RunSummary) {
    print_section("Training Summary");
    print_kv("Episodes", &summary.episodes_played().to_string());
    print_kv(
        "Won",
        &format!(
            "{} ({:.1}%)",
            summary.episodes_won,
            summary.win_rate() * 100.0
        ),
    );
    print_kv("Evaluation windows", &summary.average_rewards.len().to_string());
    match summary.best_average {
        Some(best) => print_kv("Best average", &format!("{best:.2}")),
        None => print_kv("Best average", "none above 0"),
    }
    println!();
    print!("{}", format_weights(&summary.final_weights));
}
