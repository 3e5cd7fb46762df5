use colored::Colorize;
use std::fmt;
use std::sync::{OnceLock, RwLock};

/// Message categories used by the CLI output helpers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Warning,
    Error,
    Hint,
    Section,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutputPreferences {
    pub color_enabled: bool,
    /// ASCII-only rendering without icons, for screen readers and logs.
    pub plain_mode: bool,
}

impl Default for OutputPreferences {
    fn default() -> Self {
        Self {
            color_enabled: true,
            plain_mode: false,
        }
    }
}

static PREFERENCES: OnceLock<RwLock<OutputPreferences>> = OnceLock::new();

pub fn set_preferences(prefs: OutputPreferences) {
    let lock = PREFERENCES.get_or_init(|| RwLock::new(OutputPreferences::default()));
    if let Ok(mut guard) = lock.write() {
        *guard = prefs;
    }
    colored::control::set_override(prefs.color_enabled && !prefs.plain_mode);
}

pub fn current_preferences() -> OutputPreferences {
    PREFERENCES
        .get_or_init(|| RwLock::new(OutputPreferences::default()))
        .read()
        .map(|guard| *guard)
        .unwrap_or_default()
}

fn build_label(kind: MessageKind, plain: bool) -> (&'static str, &'static str) {
    match (kind, plain) {
        (MessageKind::Info, _) => ("INFO", "[i]"),
        (MessageKind::Success, false) => ("SUCCESS", "[✓]"),
        (MessageKind::Success, true) => ("SUCCESS", "[ok]"),
        (MessageKind::Warning, _) => ("WARNING", "[!]"),
        (MessageKind::Error, _) => ("ERROR", "[x]"),
        (MessageKind::Hint, _) => ("HINT", ""),
        (MessageKind::Section, _) => ("", ""),
    }
}

pub(crate) fn format_message(
    kind: MessageKind,
    message: impl fmt::Display,
    prefs: &OutputPreferences,
) -> String {
    let text = message.to_string();
    if kind == MessageKind::Section {
        let title = format!("=== {} ===", text.trim());
        return if prefs.plain_mode {
            title
        } else {
            title.bold().to_string()
        };
    }

    let (label, icon) = build_label(kind, prefs.plain_mode);
    let base = if icon.is_empty() || prefs.plain_mode {
        format!("{label}: {text}")
    } else {
        format!("{label}: {icon} {text}")
    };

    if prefs.plain_mode {
        return base;
    }
    match kind {
        MessageKind::Success => base.bright_green().to_string(),
        MessageKind::Warning => base.bright_yellow().to_string(),
        MessageKind::Error => base.bright_red().to_string(),
        MessageKind::Hint => base.bright_cyan().to_string(),
        MessageKind::Info | MessageKind::Section => base,
    }
}

pub fn print(kind: MessageKind, message: impl fmt::Display) {
    let prefs = current_preferences();
    let formatted = format_message(kind, message, &prefs);
    match kind {
        MessageKind::Section => println!("\n{formatted}"),
        MessageKind::Error => eprintln!("{formatted}"),
        _ => println!("{formatted}"),
    }
}

pub fn info(message: impl fmt::Display) {
    print(MessageKind::Info, message);
}

pub fn success(message: impl fmt::Display) {
    print(MessageKind::Success, message);
}

pub fn warning(message: impl fmt::Display) {
    print(MessageKind::Warning, message);
}

pub fn error(message: impl fmt::Display) {
    print(MessageKind::Error, message);
}

pub fn hint(message: impl fmt::Display) {
    print(MessageKind::Hint, message);
}

pub fn section(title: impl fmt::Display) {
    print(MessageKind::Section, title);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_mode_drops_icons() {
        let prefs = OutputPreferences {
            color_enabled: false,
            plain_mode: true,
        };
        assert_eq!(
            format_message(MessageKind::Success, "Saved", &prefs),
            "SUCCESS: Saved"
        );
        assert_eq!(
            format_message(MessageKind::Section, " Assets ", &prefs),
            "=== Assets ==="
        );
    }

    #[test]
    fn labels_carry_icons_by_default() {
        let prefs = OutputPreferences::default();
        let text = format_message(MessageKind::Warning, "Missing family", &prefs);
        assert!(text.contains("WARNING: [!] Missing family"));
    }
}
