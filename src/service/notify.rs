use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Warning,
    Error,
}

/// Ephemeral user feedback. Nothing the engine does depends on it.
pub trait Notifier {
    fn notify(&self, message: &str, level: Level);

    fn show_busy(&self, message: &str);

    fn hide_busy(&self);
}

impl<T: Notifier + ?Sized> Notifier for std::sync::Arc<T> {
    fn notify(&self, message: &str, level: Level) {
        (**self).notify(message, level)
    }

    fn show_busy(&self, message: &str) {
        (**self).show_busy(message)
    }

    fn hide_busy(&self) {
        (**self).hide_busy()
    }
}

/// Writes notifications to stderr with an optional spinner while busy.
pub struct ConsoleNotifier {
    colored: bool,
    spinner: Mutex<Option<ProgressBar>>,
}

impl ConsoleNotifier {
    pub fn new(colored: bool) -> Self {
        Self {
            colored,
            spinner: Mutex::new(None),
        }
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, message: &str, level: Level) {
        let (icon, line) = match level {
            Level::Info => ("ℹ", message.cyan()),
            Level::Success => ("✓", message.green()),
            Level::Warning => ("!", message.yellow()),
            Level::Error => ("✗", message.red().bold()),
        };

        let spinner = self.spinner.lock().ok().and_then(|guard| guard.clone());
        let text = if self.colored {
            format!("{} {}", icon.bold(), line)
        } else {
            format!("{} {}", icon, message)
        };

        // Printing through the bar keeps the spinner line intact.
        match spinner {
            Some(bar) => bar.println(text),
            None => eprintln!("{}", text),
        }
    }

    fn show_busy(&self, message: &str) {
        let Ok(mut guard) = self.spinner.lock() else {
            return;
        };
        if let Some(previous) = guard.take() {
            previous.finish_and_clear();
        }

        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            bar.set_style(style);
        }
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        *guard = Some(bar);
    }

    fn hide_busy(&self) {
        if let Ok(mut guard) = self.spinner.lock() {
            if let Some(bar) = guard.take() {
                bar.finish_and_clear();
            }
        }
    }
}

/// Drops every notification. Used when stdout carries machine output.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn notify(&self, _message: &str, _level: Level) {}

    fn show_busy(&self, _message: &str) {}

    fn hide_busy(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_notifier_busy_cycle() {
        let notifier = ConsoleNotifier::new(false);
        notifier.show_busy("checking");
        notifier.show_busy("checking again");
        notifier.notify("done", Level::Success);
        notifier.hide_busy();
        notifier.hide_busy();
        assert!(notifier.spinner.lock().unwrap().is_none());
    }
}
