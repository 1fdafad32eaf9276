//! Progress bars and progress messages

use indicatif::{ProgressBar, ProgressStyle};

/// Create a standard progress bar with consistent styling
pub fn create_progress_bar(total: u64, message: &str) -> ProgressBar {
    if total == 0 || std::env::var("ABPREDICT_SILENT").is_ok() {
        return ProgressBar::hidden();
    }

    let style = ProgressStyle::with_template(
        "{msg} [{bar:40.cyan/blue}] {pos}/{len} ({elapsed_precise})",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("━━─");

    let pb = ProgressBar::new(total);
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb
}

/// Share of a genome's query items handled once item `index` is done
pub fn percent_complete(index: usize, total: usize) -> f64 {
    if total == 0 {
        return 100.0;
    }
    (index + 1) as f64 / total as f64 * 100.0
}

/// `"12.50%. Running alignment on X and Y"`
pub fn progress_message(percent: f64, action: &str) -> String {
    format!("{:.2}%. {}", percent, action)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_complete() {
        assert_eq!(percent_complete(0, 8), 12.5);
        assert_eq!(percent_complete(7, 8), 100.0);
        assert!((percent_complete(0, 3) - 33.333).abs() < 0.001);
    }

    #[test]
    fn test_progress_message() {
        assert_eq!(
            progress_message(12.5, "Running alignment on X and Y"),
            "12.50%. Running alignment on X and Y"
        );
        assert_eq!(progress_message(100.0 / 3.0, "Done"), "33.33%. Done");
    }

    #[test]
    fn test_empty_bar_is_hidden() {
        let pb = create_progress_bar(0, "nothing");
        assert!(pb.is_hidden());
    }
}
