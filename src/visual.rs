use colored::*;

use crate::config::DisplayConfig;
use crate::models::ThoughtRecord;

/// Header line for a record: kind, position and revision/branch context
pub fn thought_header(record: &ThoughtRecord) -> String {
    let (prefix, context) = if record.is_revision() {
        (
            "🔄 Revision",
            format!(" (revising thought {})", optional(record.revises_thought)),
        )
    } else if let Some(from) = record.branch_from_thought {
        (
            "🌿 Branch",
            format!(
                " (from thought {}, ID: {})",
                from,
                optional(record.branch_id.as_deref())
            ),
        )
    } else {
        ("💭 Thought", String::new())
    };

    format!(
        "{} {}/{}{}",
        prefix, record.thought_number, record.total_thoughts, context
    )
}

/// Bordered block rendered for every recorded thought.
///
/// The border is as wide as the longer of header and thought text, plus 4,
/// counted in characters.
pub fn format_thought(record: &ThoughtRecord) -> String {
    let header = thought_header(record);
    let width = header.chars().count().max(record.thought.chars().count()) + 4;
    let border = "-".repeat(width);
    let body = pad_right(&record.thought, width - 2);

    format!(
        "\n┌{border}┐\n│ {header} │\n├{border}┤\n│ {body} │\n└{border}┘"
    )
}

fn optional<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "None".to_string(), |v| v.to_string())
}

fn pad_right(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        text.to_string()
    } else {
        format!("{}{}", text, " ".repeat(width - len))
    }
}

/// Writes thought blocks to stderr, keeping stdout free for the MCP transport
#[derive(Debug, Clone)]
pub struct VisualOutput {
    enabled: bool,
    color: bool,
}

impl VisualOutput {
    pub fn new(config: &DisplayConfig) -> Self {
        Self {
            enabled: config.enabled,
            color: config.color,
        }
    }

    /// Output that renders nothing
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            color: false,
        }
    }

    pub fn thought_recorded(&self, record: &ThoughtRecord) {
        if !self.enabled {
            return;
        }

        let block = format_thought(record);
        if !self.color {
            eprintln!("{}", block);
        } else if record.is_revision() {
            eprintln!("{}", block.yellow());
        } else if record.branch_from_thought.is_some() {
            eprintln!("{}", block.green());
        } else {
            eprintln!("{}", block.bright_blue());
        }
    }

    pub fn thread_cleared(&self, user_id: &str, thread_id: &str) {
        if !self.enabled {
            return;
        }

        let line = format!("🧹 Cleared thoughts for {}/{}", user_id, thread_id);
        if self.color {
            eprintln!("{}", line.bright_magenta());
        } else {
            eprintln!("{}", line);
        }
    }
}
