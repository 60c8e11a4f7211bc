//! Output formatting for CLI

use crate::pipeline::TrainingResult;

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Format a number with thousands separators
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i.is_multiple_of(3) {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    result
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:20} {}", format!("{}:", key), value);
}

/// Print statistics table
pub fn print_stats_table(stats: &[(&str, String)]) {
    for (key, value) in stats {
        print_kv(key, value);
    }
}

/// Key figures of a run, in display order.
pub fn result_stats(result: &TrainingResult) -> Vec<(&'static str, String)> {
    vec![
        ("Episodes", format_number(result.episodes as usize)),
        ("Mean score", format!("{:.1}", result.mean_score)),
        ("Best score", format_number(result.best_score as usize)),
        (
            "Games won",
            format!(
                "{} ({:.1}%)",
                result.games_won,
                result.win_rate() * 100.0
            ),
        ),
        ("Max level", result.max_level.to_string()),
        ("Q-table size", format_number(result.table_size)),
    ]
}
