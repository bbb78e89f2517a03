use crate::session::PendingEdit;
use anyhow::{Context, Result};
use colored::*;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};

/// What the user picked in the suggestion panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choice {
    Skip,
    Replace(String),
    Ignore,
    MarkCorrect,
    Quit,
}

enum Item {
    Skip,
    Suggestion(String),
    Custom,
    Ignore,
    MarkCorrect,
    Quit,
}

fn items(pending: &PendingEdit) -> Vec<(Item, String)> {
    let mut items = vec![(Item::Skip, "Skip".to_string())];
    for suggestion in &pending.suggestions {
        items.push((
            Item::Suggestion(suggestion.word.clone()),
            format!("{}  ({})", suggestion.word, suggestion.display_label()),
        ));
    }
    items.push((Item::Custom, "Type a replacement...".to_string()));
    items.push((Item::Ignore, "Ignore this word".to_string()));
    items.push((Item::MarkCorrect, "Mark as correct (add to dictionary)".to_string()));
    items.push((Item::Quit, "Quit".to_string()));
    items
}

/// Show the suggestion panel for `pending` and wait for a choice.
pub fn ask(pending: &PendingEdit, context: &str, colored: bool) -> Result<Choice> {
    if colored {
        println!(
            "\n{} {}",
            "Misspelling found:".yellow().bold(),
            pending.word.red().bold()
        );
    } else {
        println!("\nMisspelling found: {}", pending.word);
    }
    println!("  {}", context);

    let items = items(pending);
    let labels: Vec<&str> = items.iter().map(|(_, label)| label.as_str()).collect();
    let theme = ColorfulTheme::default();

    let picked = Select::with_theme(&theme)
        .with_prompt("Choose a correction")
        .items(&labels)
        .default(0)
        .interact_opt()
        .context("Failed to read choice")?;

    let Some(index) = picked else {
        return Ok(Choice::Quit);
    };

    Ok(match &items[index].0 {
        Item::Skip => Choice::Skip,
        Item::Suggestion(word) => Choice::Replace(word.clone()),
        Item::Custom => {
            let word: String = Input::with_theme(&theme)
                .with_prompt("Replacement")
                .interact_text()
                .context("Failed to read replacement")?;
            match word.trim() {
                "" => Choice::Skip,
                word => Choice::Replace(word.to_string()),
            }
        }
        Item::Ignore => Choice::Ignore,
        Item::MarkCorrect => Choice::MarkCorrect,
        Item::Quit => Choice::Quit,
    })
}

/// The line around `pending` with the word highlighted.
pub fn context_line(text: &str, pending: &PendingEdit, colored: bool) -> String {
    let range = pending.position;
    if !range.fits(text) {
        return pending.word.clone();
    }
    let start = text[..range.start].rfind('\n').map_or(0, |i| i + 1);
    let end = text[range.end..]
        .find('\n')
        .map_or(text.len(), |i| range.end + i);
    let word = &text[range.start..range.end];
    let word = if colored {
        word.red().bold().underline().to_string()
    } else {
        format!(">{}<", word)
    };
    format!("{}{}{}", &text[start..range.start], word, &text[range.end..end])
}
