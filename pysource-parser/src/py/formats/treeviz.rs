//! Treeviz formatter for parsed code
//!
//! Treeviz is a one line per node rendering of the tree, meant for quickly eyeballing how a
//! file was split into statements, blocks and attachments.
//!
//! The format is:
//! <line number>? <connectors> <icon> <label> (labels truncated to 40 characters)
//!
//! Example:
//!
//! ```text
//! ⧉ 3 statements
//! ├─ ↵ import os
//! │ └─ # # platform helpers
//! └─ ↵ def main():
//!   └─ ➔ block (4 columns)
//!     └─ ↵ return 0
//! ```
//!
//! Icons
//!     Code: ⧉
//!     LogicalLine: ↵
//!     Block: ➔
//!     Comment: #
//!     Banner comment: ≡
//!     Blank line: ○
//!
//! Attachments are shown as children of the line or block that owns them: leading
//! attachments first under their line, trailing attachments last under their block.

use crate::py::ast::elements::{Block, Code, CommentAttachment, LogicalLine};

const LABEL_WIDTH: usize = 40;

/// Rendering switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreevizOptions {
    /// Prefix each node with the source line it starts on
    pub show_line_numbers: bool,
}

/// Intermediate node: what gets printed, independent of connectors
struct Snapshot {
    icon: &'static str,
    label: String,
    line: usize,
    children: Vec<Snapshot>,
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let mut truncated = s.chars().take(max_chars).collect::<String>();
        truncated.push_str("...");
        truncated
    } else {
        s.to_string()
    }
}

fn attachment_snapshot(attachment: &CommentAttachment) -> Snapshot {
    match attachment {
        CommentAttachment::Blank { line } => Snapshot {
            icon: "○",
            label: "blank".to_string(),
            line: *line,
            children: Vec::new(),
        },
        CommentAttachment::Comment {
            text,
            position,
            relocated,
            ..
        } => {
            let label = if *relocated {
                format!("{text} (relocated)")
            } else {
                text.clone()
            };
            Snapshot {
                icon: if attachment.is_banner() { "≡" } else { "#" },
                label,
                line: position.line,
                children: Vec::new(),
            }
        }
    }
}

fn line_snapshot(line: &LogicalLine) -> Snapshot {
    let mut children: Vec<Snapshot> = line.leading().iter().map(attachment_snapshot).collect();
    if let Some(body) = line.body() {
        children.push(block_snapshot(body));
    }
    Snapshot {
        icon: "↵",
        label: line.text().replace('\n', "⏎"),
        line: line.start().line,
        children,
    }
}

fn block_snapshot(block: &Block) -> Snapshot {
    let mut children: Vec<Snapshot> = block.lines().iter().map(line_snapshot).collect();
    children.extend(block.trailing().iter().map(attachment_snapshot));
    let line = block
        .lines()
        .first()
        .map(|l| l.start().line)
        .unwrap_or_default();
    Snapshot {
        icon: "➔",
        label: format!("block ({} columns)", block.width()),
        line,
        children,
    }
}

fn format_snapshot(
    snapshot: &Snapshot,
    prefix: &str,
    is_last: bool,
    options: &TreevizOptions,
    output: &mut String,
) {
    let connector = if is_last { "└─" } else { "├─" };
    let linum_prefix = if options.show_line_numbers {
        format!("{:02} ", snapshot.line)
    } else {
        String::new()
    };

    output.push_str(&format!(
        "{}{}{} {} {}\n",
        linum_prefix,
        prefix,
        connector,
        snapshot.icon,
        truncate(&snapshot.label, LABEL_WIDTH)
    ));

    let child_prefix = format!("{}{}", prefix, if is_last { "  " } else { "│ " });
    let child_count = snapshot.children.len();
    for (i, child) in snapshot.children.iter().enumerate() {
        format_snapshot(child, &child_prefix, i + 1 == child_count, options, output);
    }
}

pub fn to_treeviz_str(code: &Code) -> String {
    to_treeviz_str_with(code, &TreevizOptions::default())
}

pub fn to_treeviz_str_with(code: &Code, options: &TreevizOptions) -> String {
    let root = block_snapshot(code.root());
    let mut output = format!("⧉ {} statements\n", code.statement_count());
    let child_count = root.children.len();
    for (i, child) in root.children.iter().enumerate() {
        format_snapshot(child, "", i + 1 == child_count, options, &mut output);
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::py::parsing::parse_text;

    #[test]
    fn test_treeviz_shape() {
        let code =
            parse_text("import os\n# helpers\ndef main():\n    return 0\n\n# eof\n").unwrap();
        insta::assert_snapshot!(to_treeviz_str(&code), @r"
        ⧉ 3 statements
        ├─ ↵ import os
        ├─ ↵ def main():
        │ ├─ # # helpers
        │ └─ ➔ block (4 columns)
        │   └─ ↵ return 0
        ├─ ○ blank
        └─ # # eof
        ");
    }

    #[test]
    fn test_line_numbers_and_truncation() {
        let code = parse_text(
            "value = some_function_with_a_long_name(argument_one, argument_two)\n",
        )
        .unwrap();
        let options = TreevizOptions {
            show_line_numbers: true,
        };
        assert_eq!(
            to_treeviz_str_with(&code, &options),
            "⧉ 1 statements\n01 └─ ↵ value = some_function_with_a_long_name(a...\n"
        );
    }
}
