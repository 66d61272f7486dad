//! Output formatting for the CLI.

use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use shop_catalog::catalog::PriceDisplay;

/// Output handler for CLI messages.
#[derive(Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
}

impl Output {
    /// Create a new output handler.
    pub fn new(verbose: bool, json: bool) -> Self {
        Self { verbose, json }
    }

    /// Print an info message.
    pub fn info(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("ℹ").blue(), msg);
    }

    /// Print a success message.
    pub fn success(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("✓").green(), msg);
    }

    /// Print a warning message.
    pub fn warn(&self, msg: &str) {
        if self.json {
            return;
        }
        eprintln!("{} {}", style("⚠").yellow(), msg);
    }

    /// Print an error message.
    pub fn error(&self, msg: &str) {
        if self.json {
            eprintln!("{}", serde_json::json!({ "error": msg }));
            return;
        }
        eprintln!("{} {}", style("✗").red(), style(msg).red());
    }

    /// Print a debug message (only in verbose mode).
    pub fn debug(&self, msg: &str) {
        if !self.verbose || self.json {
            return;
        }
        eprintln!("{} {}", style("→").dim(), style(msg).dim());
    }

    /// Print a header/title.
    pub fn header(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print JSON output.
    pub fn json<T: serde::Serialize>(&self, value: &T) {
        if let Ok(json) = serde_json::to_string_pretty(value) {
            println!("{}", json);
        }
    }

    /// Print a key-value pair.
    pub fn kv(&self, key: &str, value: &str) {
        if self.json {
            return;
        }
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a list item.
    pub fn list_item(&self, item: &str) {
        if self.json {
            return;
        }
        println!("  {} {}", style("•").dim(), item);
    }

    /// Print a table row.
    pub fn table_row(&self, cols: &[&str], widths: &[usize]) {
        if self.json {
            return;
        }
        let formatted: Vec<String> = cols
            .iter()
            .zip(widths.iter())
            .map(|(col, width)| format!("{:width$}", col, width = width))
            .collect();
        println!("  {}", formatted.join("  ").trim_end());
    }

    /// Create a spinner shown while a request is in flight.
    pub fn spinner(&self, msg: &str) -> ProgressBar {
        if self.json {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}")
        {
            pb.set_style(spinner_style);
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }

    /// Check if JSON mode is enabled.
    pub fn is_json(&self) -> bool {
        self.json
    }
}

/// Price followed by the compare-at price when it applies.
pub fn format_price(price: &PriceDisplay) -> String {
    match price.compare_at.filter(|_| price.shows_compare_at()) {
        Some(compare_at) => format!(
            "{} {}",
            price.price.display(),
            style(format!("(semula {})", compare_at.display())).dim()
        ),
        None => price.price.display(),
    }
}

/// Stock badge for a variant.
pub fn stock_badge(stock: u32) -> String {
    match stock {
        0 => style("habis").red().to_string(),
        1..=5 => style(format!("sisa {stock}")).yellow().to_string(),
        _ => style(stock.to_string()).green().to_string(),
    }
}

/// Cut a string to at most `max` characters, marking the cut.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{kept}…")
}

#[cfg(test)]
mod tests {
    use super::*;
    use shop_catalog::{Currency, Money};

    #[test]
    fn test_format_price_without_compare_at() {
        console::set_colors_enabled(false);
        let price = PriceDisplay {
            price: Money::new(1_299_000, Currency::IDR),
            compare_at: None,
        };
        assert_eq!(format_price(&price), price.price.display());
    }

    #[test]
    fn test_format_price_hides_lower_compare_at() {
        console::set_colors_enabled(false);
        let price = PriceDisplay {
            price: Money::new(3_499_000, Currency::IDR),
            compare_at: Some(Money::new(1_299_000, Currency::IDR)),
        };
        assert_eq!(format_price(&price), price.price.display());
    }

    #[test]
    fn test_format_price_with_compare_at() {
        console::set_colors_enabled(false);
        let price = PriceDisplay {
            price: Money::new(13_999_000, Currency::IDR),
            compare_at: Some(Money::new(14_999_000, Currency::IDR)),
        };
        let formatted = format_price(&price);
        assert!(formatted.starts_with(&price.price.display()));
        assert!(formatted.ends_with(&format!(
            "(semula {})",
            Money::new(14_999_000, Currency::IDR).display()
        )));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Edge Vision Kit", 40), "Edge Vision Kit");
        assert_eq!(truncate("Edge Vision Kit", 6), "Edge …");
    }
}
