//! Shared UI primitives for rostercmd
//!
//! Conventions:
//! - Feedback: single line, sentence case: `Added 2 people`
//! - Errors and warnings go to stderr

use inquire::{ui::RenderConfig, Confirm};

use crate::session::SaveReport;

// ============================================================================
// Message Functions
// ============================================================================

/// Print a status message to stdout
#[inline]
pub fn status(msg: &str) {
    println!("{}", msg);
}

/// Print an error message to stderr
#[inline]
pub fn error(msg: &str) {
    eprintln!("Error: {}", msg);
}

/// Print a warning message to stderr
#[inline]
pub fn warning(msg: &str) {
    eprintln!("Warning: {}", msg);
}

/// Surface a write-through problem without failing the command
pub fn report_save(report: &SaveReport) {
    if let Some(msg) = report.warning() {
        warning(&msg);
    }
}

// ============================================================================
// Prompts
// ============================================================================

pub fn minimal_render_config() -> RenderConfig<'static> {
    RenderConfig::default_colored()
        .with_prompt_prefix(inquire::ui::Styled::new(""))
        .with_answered_prompt_prefix(inquire::ui::Styled::new(""))
}

/// Ask before a destructive change. `force` skips the prompt; a prompt that
/// cannot be shown (no terminal) counts as "no".
pub fn confirm(prompt: &str, force: bool) -> bool {
    if force {
        return true;
    }
    Confirm::new(prompt)
        .with_render_config(minimal_render_config())
        .with_default(false)
        .prompt()
        .unwrap_or(false)
}

// ============================================================================
// Text Helpers
// ============================================================================

/// Truncate to `max` characters, marking the cut with an ellipsis
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", cut.trim_end())
}

/// Pad or truncate to exactly `width` characters
pub fn fit(text: &str, width: usize) -> String {
    let text = truncate(text, width);
    let len = text.chars().count();
    format!("{}{}", text, " ".repeat(width.saturating_sub(len)))
}
