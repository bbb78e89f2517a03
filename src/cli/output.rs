use crate::checker::{Annotation, Segment, Statistics, TextCounters};
use crate::CheckOutcome;
use anyhow::{Context, Result};
use colored::*;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Render the annotated text on one line.
///
/// Colored: the misspelled word struck through in red, followed by the
/// correction in green. Plain: each correction as `[original → corrected]`.
pub fn render_annotation(annotation: &Annotation, colored: bool) -> String {
    let mut out = String::new();
    for segment in annotation.segments() {
        match segment {
            Segment::Plain { text } => out.push_str(text),
            Segment::Correction {
                original,
                corrected,
                tooltip,
            } => {
                if !colored {
                    out.push_str(&format!("[{}]", tooltip));
                } else if original.is_empty() {
                    out.push_str(&corrected.green().bold().underline().to_string());
                } else {
                    out.push_str(&format!(
                        "{} {} {}",
                        original.red().strikethrough(),
                        "→".dimmed(),
                        corrected.green().bold()
                    ));
                }
            }
        }
    }
    out
}

pub fn render_statistics(stats: &Statistics, colored: bool) -> String {
    if !colored {
        return stats.to_string();
    }
    format!(
        "{} {}  {} {}  {} {}  {} {}",
        "words:".dimmed(),
        stats.total_words.to_string().bold(),
        "errors:".dimmed(),
        stats.errors_found.to_string().red().bold(),
        "corrections:".dimmed(),
        stats.corrections_made.to_string().green().bold(),
        "accuracy:".dimmed(),
        stats.accuracy_label().cyan().bold()
    )
}

pub fn render_counters(counters: &TextCounters) -> String {
    format!(
        "words: {}, arabic words: {}, characters: {}",
        counters.words, counters.arabic_words, counters.characters
    )
}

pub fn print_outcome(outcome: &CheckOutcome, format: OutputFormat, colored: bool) -> Result<()> {
    match format {
        OutputFormat::Text => {
            print_text_outcome(outcome, colored);
            Ok(())
        }
        OutputFormat::Json => print_json(outcome),
    }
}

fn print_text_outcome(outcome: &CheckOutcome, colored: bool) {
    println!("{}", render_annotation(&outcome.annotation, colored));

    if outcome.has_corrections() {
        println!();
        for record in &outcome.corrections {
            if colored {
                println!(
                    "  {} {} {}",
                    record.original.red().bold(),
                    "→".dimmed(),
                    record.corrected.green()
                );
            } else {
                println!("  {} → {}", record.original, record.corrected);
            }
        }
    }

    println!();
    println!("{}", render_statistics(&outcome.statistics, colored));
}

#[derive(Serialize)]
struct JsonStats<'a> {
    #[serde(flatten)]
    counters: &'a TextCounters,
    ignored_words: usize,
}

pub fn print_counters(
    counters: &TextCounters,
    ignored_words: usize,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Text => {
            println!("{}", render_counters(counters));
            println!("ignored words: {}", ignored_words);
            Ok(())
        }
        OutputFormat::Json => print_json(&JsonStats {
            counters,
            ignored_words,
        }),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

pub fn print_check_summary(total_errors: u64, colored: bool) {
    println!();
    if total_errors == 0 {
        if colored {
            println!("{}", "✓ No spelling errors found!".green().bold());
        } else {
            println!("✓ No spelling errors found!");
        }
    } else {
        let error_word = if total_errors == 1 { "error" } else { "errors" };
        if colored {
            println!(
                "{} {} {} found",
                "✗".red().bold(),
                total_errors.to_string().red().bold(),
                error_word
            );
        } else {
            println!("✗ {} {} found", total_errors, error_word);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_rendering_uses_tooltips() {
        let annotation = Annotation::new(vec![
            Segment::plain("هذا نص به "),
            Segment::correction("خطاء", "خطأ"),
            Segment::plain(""),
        ]);
        assert_eq!(render_annotation(&annotation, false), "هذا نص به [خطاء → خطأ]");
    }

    #[test]
    fn test_plain_rendering_of_fallback_segment() {
        let annotation = Annotation::new(vec![
            Segment::plain(""),
            Segment::correction("", "B"),
            Segment::plain(""),
        ]);
        assert_eq!(render_annotation(&annotation, false), "[→ B]");
    }

    #[test]
    fn test_colored_rendering_keeps_words() {
        colored::control::set_override(true);
        let annotation = Annotation::new(vec![
            Segment::plain("نص "),
            Segment::correction("خطاء", "خطأ"),
            Segment::plain(""),
        ]);
        let rendered = render_annotation(&annotation, true);
        colored::control::unset_override();

        assert!(rendered.starts_with("نص "));
        assert!(rendered.contains("خطاء"));
        assert!(rendered.contains("خطأ"));
        assert!(rendered.contains('\u{1b}'));
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!(OutputFormat::Text.to_string(), "text");
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_counters_line() {
        let counters = TextCounters::of("هذا نص");
        assert_eq!(
            render_counters(&counters),
            "words: 2, arabic words: 2, characters: 6"
        );
    }
}
