//! Block outline
//!
//!     A coarse reading of a block's statements for tools that reorganize files: which lines
//!     are the docstring, the import section, each function and class (with their
//!     decorators), and the plain code in between.
//!
//!     Classification only looks at the first tokens of a statement; nothing is parsed
//!     beyond that.
//!
//!         - Statement kinds: see [`classify`].
//!         - Fragments: consecutive imports form one fragment, decorators join the definition
//!           they decorate, consecutive plain statements form one fragment.
//!
//!     Import origins follow the usual isort-style sections. Which packages count as first
//!     party is configuration, passed in through [`OutlineOptions`].
//!
//!     Comments ahead of a fragment are read too: a banner comment above its first statement
//!     is reported with the fragment, and runs of comments that parse once uncommented are
//!     reported as commented-out code (see [`commented_code`]).

use crate::py::ast::elements::{Block, CommentAttachment, LogicalLine};
use crate::py::ast::range::Range;
use crate::py::parsing::parse_text;
use crate::py::token::{Token, TokenKind};
use serde::Serialize;
use std::fmt;
use std::ops::Range as IndexRange;

/// Modules shipped with the interpreter
const STDLIB: &[&str] = &[
    "__main__", "_dummy_thread", "_thread", "abc", "aifc", "antigravity", "argparse", "array",
    "ast", "asynchat", "asyncio", "asyncore", "atexit", "audioop", "base64", "bdb", "binascii",
    "binhex", "bisect", "builtins", "bz2", "cProfile", "calendar", "cgi", "cgitb", "chunk",
    "cmath", "cmd", "code", "codecs", "codeop", "collections", "colorsys", "compileall",
    "concurrent", "configparser", "contextlib", "contextvars", "copy", "copyreg", "crypt", "csv",
    "ctypes", "curses", "dataclasses", "datetime", "dbm", "decimal", "difflib", "dis",
    "distutils", "doctest", "dummy_threading", "email", "encodings", "enum", "errno",
    "faulthandler", "fcntl", "filecmp", "fileinput", "fnmatch", "formatter", "fpectl",
    "fractions", "ftplib", "functools", "gc", "getopt", "getpass", "gettext", "glob",
    "graphlib", "grp", "gzip", "hashlib", "heapq", "hmac", "html", "http", "imaplib", "imghdr",
    "imp", "importlib", "inspect", "io", "ipaddress", "itertools", "json", "keyword", "lib2to3",
    "linecache", "locale", "logging", "lzma", "macpath", "mailbox", "mailcap", "marshal", "math",
    "mimetypes", "mmap", "modulefinder", "msilib", "msvcrt", "multiprocessing", "netrc", "nis",
    "nntplib", "numbers", "operator", "optparse", "os", "ossaudiodev", "parser", "pathlib",
    "pdb", "pickle", "pickletools", "pipes", "pkgutil", "platform", "plistlib", "poplib",
    "posix", "pprint", "profile", "pstats", "pty", "pwd", "py_compile", "pyclbr", "pydoc",
    "queue", "quopri", "random", "re", "readline", "reprlib", "resource", "rlcompleter", "runpy",
    "sched", "secrets", "select", "selectors", "shelve", "shlex", "shutil", "signal", "site",
    "smtpd", "smtplib", "sndhdr", "socket", "socketserver", "spwd", "sqlite3", "ssl", "stat",
    "statistics", "string", "stringprep", "struct", "subprocess", "sunau", "symbol", "symtable",
    "sys", "sysconfig", "syslog", "tabnanny", "tarfile", "telnetlib", "tempfile", "termios",
    "test", "textwrap", "this", "threading", "time", "timeit", "tkinter", "token", "tokenize",
    "tomllib", "trace", "traceback", "tracemalloc", "tty", "turtle", "types", "typing",
    "unicodedata", "unittest", "urllib", "uu", "uuid", "venv", "warnings", "wave", "weakref",
    "webbrowser", "winreg", "winsound", "wsgiref", "xdrlib", "xml", "xmlrpc", "zipapp",
    "zipfile", "zipimport", "zlib", "zoneinfo",
];

/// Reserved words and soft keywords, which may stand next to another name
const KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "case", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if",
    "import", "in", "is", "lambda", "match", "nonlocal", "not", "or", "pass", "raise", "return",
    "try", "type", "while", "with", "yield",
];

/// Where an imported module comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImportOrigin {
    Future,
    Stdlib,
    FirstParty,
    ThirdParty,
    /// A group of imports with different origins
    Mixed,
}

impl fmt::Display for ImportOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ImportOrigin::Future => "future",
            ImportOrigin::Stdlib => "stdlib",
            ImportOrigin::FirstParty => "first-party",
            ImportOrigin::ThirdParty => "third-party",
            ImportOrigin::Mixed => "mixed",
        };
        write!(f, "{}", name)
    }
}

/// What a single statement is
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StatementKind {
    Import { module: String, origin: ImportOrigin },
    Decorator,
    Definition { keyword: String, name: String },
    Docstring,
    /// Any other block-opening statement
    Compound,
    Simple,
}

/// Options for classifying imports
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutlineOptions {
    /// Top-level packages that belong to the project being processed
    pub first_party: Vec<String>,
}

impl OutlineOptions {
    pub fn with_first_party<I, S>(packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            first_party: packages.into_iter().map(Into::into).collect(),
        }
    }

    /// Origin of a module named as in an import statement (`a.b`, `.rel`, `__future__`)
    pub fn origin_of(&self, module: &str) -> ImportOrigin {
        let top = module.split('.').next().unwrap_or_default();
        if module == "__future__" {
            ImportOrigin::Future
        } else if module.starts_with('.') || self.first_party.iter().any(|p| p == top) {
            ImportOrigin::FirstParty
        } else if STDLIB.contains(&top) {
            ImportOrigin::Stdlib
        } else {
            ImportOrigin::ThirdParty
        }
    }
}

/// A run of statements that belong together
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FragmentKind {
    Docstring,
    Imports { origin: ImportOrigin },
    /// A `def` / `class`, including its decorators
    Definition { keyword: String, name: String },
    Code,
}

impl fmt::Display for FragmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FragmentKind::Docstring => write!(f, "docstring"),
            FragmentKind::Imports { origin } => write!(f, "imports ({origin})"),
            FragmentKind::Definition { keyword, name } => write!(f, "{keyword} {name}"),
            FragmentKind::Code => write!(f, "code"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutlineItem {
    pub kind: FragmentKind,
    /// Indices into the block's lines
    pub lines: IndexRange<usize>,
    /// Source range from the first statement to the end of the last one's body
    pub range: Range,
    /// Banner comment directly above the fragment, if any
    pub banner: Option<CommentAttachment>,
    /// Source lines where a run of commented-out code starts, ahead of any of the fragment's
    /// statements
    pub commented_code: Vec<usize>,
}

fn is_name(token: &Token, text: &str) -> bool {
    token.is(TokenKind::Name, text)
}

/// Classify one statement. `leads_block` tells whether it is the first statement of its block.
pub fn classify(
    line: &LogicalLine,
    leads_block: bool,
    options: &OutlineOptions,
) -> StatementKind {
    let tokens: Vec<&Token> = line.code_tokens().collect();
    let Some(first) = tokens.first() else {
        return StatementKind::Simple;
    };

    if is_name(first, "import") || is_name(first, "from") {
        let module = import_module(&tokens[1..]);
        let origin = options.origin_of(&module);
        return StatementKind::Import { module, origin };
    }
    if first.is(TokenKind::Operator, "@") {
        return StatementKind::Decorator;
    }
    let definition = match tokens.as_slice() {
        [kw, name, ..] if is_name(kw, "def") || is_name(kw, "class") => {
            Some((kw.text().to_string(), name))
        }
        [asynch, kw, name, ..] if is_name(asynch, "async") && is_name(kw, "def") => {
            Some(("async def".to_string(), name))
        }
        _ => None,
    };
    if let Some((keyword, name)) = definition {
        if name.kind() == TokenKind::Name {
            return StatementKind::Definition {
                keyword,
                name: name.text().to_string(),
            };
        }
    }
    if leads_block && tokens.iter().all(|t| t.kind() == TokenKind::String) {
        return StatementKind::Docstring;
    }
    if line.opens_block() {
        StatementKind::Compound
    } else {
        StatementKind::Simple
    }
}

/// Dotted module name right after `import` / `from`
fn import_module(tokens: &[&Token]) -> String {
    tokens
        .iter()
        .take_while(|t| {
            (t.kind() == TokenKind::Name && !is_name(t, "import") && !is_name(t, "as"))
                || t.is(TokenKind::Operator, ".")
                || t.is(TokenKind::Operator, "...")
        })
        .map(|t| t.text())
        .collect()
}

fn item_range(lines: &[LogicalLine]) -> Range {
    let mut ranges = Vec::new();
    if let Some(first) = lines.first() {
        ranges.push(first.range());
    }
    if let Some(last) = lines.last() {
        ranges.push(last.range());
        if let Some(body_range) = last.body().and_then(Block::range) {
            ranges.push(body_range);
        }
    }
    Range::bounding_box(ranges.iter())
        .unwrap_or_else(|| Range::new(0..0, Default::default(), Default::default()))
}

/// Split attachments into runs of comments that share an offset
///
/// Blank lines and offset changes end a run.
pub fn comment_runs(attachments: &[CommentAttachment]) -> Vec<&[CommentAttachment]> {
    let mut runs = Vec::new();
    let mut start = 0;
    for idx in 0..=attachments.len() {
        let ends = match (attachments.get(idx), attachments.get(start)) {
            (None, _) => true,
            (Some(item), _) if item.is_blank() => true,
            (Some(item), Some(first)) => item.offset() != first.offset(),
            (Some(_), None) => false,
        };
        if !ends {
            continue;
        }
        if start < idx {
            runs.push(&attachments[start..idx]);
        }
        start = match attachments.get(idx) {
            Some(item) if item.is_comment() => idx,
            _ => idx + 1,
        };
    }
    runs
}

/// Code held by a run of comments, or `None` if the run is prose
///
/// The run must be comments at one offset, none of them a banner. Each line loses its `# `
/// (or bare `#`) prefix and the result has to parse with at least one statement. Parsing is
/// structural, so two plain names side by side are also taken as prose.
pub fn commented_code(run: &[CommentAttachment]) -> Option<String> {
    let first = run.first()?;
    let mut code = String::new();
    for attachment in run {
        let text = attachment.text()?;
        if attachment.offset() != first.offset() || attachment.is_banner() {
            return None;
        }
        let line = text.strip_prefix("# ").or_else(|| text.strip_prefix('#'))?;
        code.push_str(line);
        code.push('\n');
    }

    let parsed = parse_text(&code).ok()?;
    if parsed.is_empty() || parsed.lines().is_empty() {
        return None;
    }
    let reads_as_prose = parsed
        .walk()
        .filter_map(|item| item.node.as_line())
        .any(|line| {
            let tokens: Vec<&Token> = line.code_tokens().collect();
            tokens
                .windows(2)
                .any(|pair| pair.iter().all(|t| is_plain_name(t)))
        });
    if reads_as_prose {
        None
    } else {
        Some(code)
    }
}

fn is_plain_name(token: &Token) -> bool {
    token.kind() == TokenKind::Name && !KEYWORDS.contains(&token.text())
}

fn leading_banner(line: &LogicalLine) -> Option<CommentAttachment> {
    line.leading().iter().find(|a| a.is_banner()).cloned()
}

fn commented_code_lines(lines: &[LogicalLine]) -> Vec<usize> {
    lines
        .iter()
        .flat_map(|line| comment_runs(line.leading()))
        .filter(|run| commented_code(run).is_some())
        .map(|run| run[0].line())
        .collect()
}

/// Group a block's statements into fragments
pub fn outline(block: &Block, options: &OutlineOptions) -> Vec<OutlineItem> {
    let lines = block.lines();
    let kinds: Vec<StatementKind> = lines
        .iter()
        .enumerate()
        .map(|(idx, line)| classify(line, idx == 0, options))
        .collect();

    let mut items = Vec::new();
    let mut idx = 0;
    while idx < lines.len() {
        let start = idx;
        let kind = match &kinds[idx] {
            StatementKind::Docstring => {
                idx += 1;
                FragmentKind::Docstring
            }
            StatementKind::Import { origin, .. } => {
                let mut group = *origin;
                idx += 1;
                while let Some(StatementKind::Import { origin, .. }) = kinds.get(idx) {
                    if *origin != group {
                        group = ImportOrigin::Mixed;
                    }
                    idx += 1;
                }
                FragmentKind::Imports { origin: group }
            }
            StatementKind::Decorator => {
                while matches!(kinds.get(idx), Some(StatementKind::Decorator)) {
                    idx += 1;
                }
                match kinds.get(idx) {
                    Some(StatementKind::Definition { keyword, name }) => {
                        idx += 1;
                        FragmentKind::Definition {
                            keyword: keyword.clone(),
                            name: name.clone(),
                        }
                    }
                    _ => FragmentKind::Code,
                }
            }
            StatementKind::Definition { keyword, name } => {
                idx += 1;
                FragmentKind::Definition {
                    keyword: keyword.clone(),
                    name: name.clone(),
                }
            }
            StatementKind::Compound | StatementKind::Simple => {
                while matches!(
                    kinds.get(idx),
                    Some(StatementKind::Compound | StatementKind::Simple)
                ) {
                    idx += 1;
                }
                FragmentKind::Code
            }
        };
        let members = &lines[start..idx];
        items.push(OutlineItem {
            kind,
            lines: start..idx,
            range: item_range(members),
            banner: leading_banner(&members[0]),
            commented_code: commented_code_lines(members),
        });
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::py::ast::range::Position;
    use rstest::rstest;

    #[rstest]
    #[case("from __future__ import annotations", "__future__", ImportOrigin::Future)]
    #[case("import os.path", "os.path", ImportOrigin::Stdlib)]
    #[case("from collections import OrderedDict", "collections", ImportOrigin::Stdlib)]
    #[case("import numpy as np", "numpy", ImportOrigin::ThirdParty)]
    #[case("from . import sibling", ".", ImportOrigin::FirstParty)]
    #[case("from ..pkg.mod import x", "..pkg.mod", ImportOrigin::FirstParty)]
    #[case("from myproject.util import helper", "myproject.util", ImportOrigin::FirstParty)]
    fn test_import_classification(
        #[case] statement: &str,
        #[case] module: &str,
        #[case] origin: ImportOrigin,
    ) {
        let code = parse_text(&format!("{statement}\n")).unwrap();
        let options = OutlineOptions::with_first_party(["myproject"]);
        assert_eq!(
            classify(&code.lines()[0], false, &options),
            StatementKind::Import {
                module: module.to_string(),
                origin
            }
        );
    }

    #[test]
    fn test_statement_kinds() {
        let code = parse_text(
            "\"\"\"Doc.\"\"\"\n@cached\nasync def fetch(url):\n    pass\nclass A(B):\n    pass\nfor x in y:\n    pass\nz = 1\n",
        )
        .unwrap();
        let options = OutlineOptions::default();
        let kinds: Vec<StatementKind> = code
            .lines()
            .iter()
            .enumerate()
            .map(|(i, l)| classify(l, i == 0, &options))
            .collect();

        assert_eq!(
            kinds,
            vec![
                StatementKind::Docstring,
                StatementKind::Decorator,
                StatementKind::Definition {
                    keyword: "async def".to_string(),
                    name: "fetch".to_string()
                },
                StatementKind::Definition {
                    keyword: "class".to_string(),
                    name: "A".to_string()
                },
                StatementKind::Compound,
                StatementKind::Simple,
            ]
        );
    }

    #[test]
    fn test_string_statement_later_in_block_is_not_a_docstring() {
        let code = parse_text("x = 1\n'not a docstring'\n").unwrap();
        assert_eq!(
            classify(&code.lines()[1], false, &OutlineOptions::default()),
            StatementKind::Simple
        );
    }

    #[test]
    fn test_outline_grouping() {
        let source = "\
\"\"\"Module doc.\"\"\"
import os
import requests
from . import local

@decorator
@other(arg)
def handler(event):
    return event

x = 1
y = 2
";
        let code = parse_text(source).unwrap();
        let items = outline(code.root(), &OutlineOptions::default());
        let summary: Vec<(String, IndexRange<usize>)> = items
            .iter()
            .map(|item| (item.kind.to_string(), item.lines.clone()))
            .collect();

        assert_eq!(
            summary,
            vec![
                ("docstring".to_string(), 0..1),
                ("imports (mixed)".to_string(), 1..4),
                ("def handler".to_string(), 4..7),
                ("code".to_string(), 7..9),
            ]
        );
        let definition = &items[2];
        assert_eq!(definition.range.start.line, 6);
        assert_eq!(definition.range.end.line, 10);
    }

    fn run(comments: &[(&str, &str)]) -> Vec<CommentAttachment> {
        comments
            .iter()
            .enumerate()
            .map(|(idx, (offset, text))| {
                CommentAttachment::comment(*offset, *text, Position::new(idx + 1, 0), 0..0)
            })
            .collect()
    }

    #[rstest]
    #[case::assignments(&[("", "# x = 1"), ("", "# y = 2")], Some("x = 1\ny = 2\n"))]
    #[case::compound(&[("", "# if ready:"), ("", "#     go()")], Some("if ready:\n    go()\n"))]
    #[case::bare_hash(&[("  ", "#if ready:"), ("  ", "#\tgo()")], Some("if ready:\n\tgo()\n"))]
    #[case::bracket_across_lines(&[("", "# x = (1,"), ("", "#      2)")], Some("x = (1,\n     2)\n"))]
    #[case::single_word(&[("", "# Euclidean")], Some("Euclidean\n"))]
    #[case::missing_body(&[("", "# if ready:")], None)]
    #[case::apostrophe(&[("", "# don't touch")], None)]
    #[case::prose(&[("", "# end of the loop")], None)]
    #[case::indented_text(&[("", "#     x = 1")], None)]
    #[case::empty_comments(&[("", "#"), ("", "#")], None)]
    #[case::mixed_offsets(&[("", "# x = 1"), ("    ", "# y = 2")], None)]
    #[case::banner(&[("", "#-----"), ("", "# x = 1")], None)]
    fn test_commented_code(#[case] comments: &[(&str, &str)], #[case] expected: Option<&str>) {
        assert_eq!(commented_code(&run(comments)).as_deref(), expected);
    }

    #[test]
    fn test_commented_code_is_empty_for_no_comments() {
        assert_eq!(commented_code(&[]), None);
        assert_eq!(commented_code(&[CommentAttachment::blank(1)]), None);
    }

    #[test]
    fn test_comment_runs() {
        let mut attachments = run(&[("", "# a"), ("", "# b"), ("  ", "# c"), ("", "# d")]);
        attachments.insert(0, CommentAttachment::blank(9));
        attachments.insert(3, CommentAttachment::blank(10));

        let runs: Vec<Vec<&str>> = comment_runs(&attachments)
            .into_iter()
            .map(|run| run.iter().filter_map(|a| a.text()).collect())
            .collect();
        assert_eq!(
            runs,
            vec![vec!["# a", "# b"], vec!["# c"], vec!["# d"]]
        );
    }

    #[test]
    fn test_fragment_comments() {
        let source = "\
# ==== Setup ====
import os

# x = compute()
# y = x + 1
z = 2
# TODO later
w = 3
";
        let code = parse_text(source).unwrap();
        let items = outline(code.root(), &OutlineOptions::default());

        assert_eq!(items.len(), 2);
        assert_eq!(
            items[0].banner.as_ref().and_then(|b| b.text()),
            Some("# ==== Setup ====")
        );
        assert!(items[0].commented_code.is_empty());
        assert_eq!(items[1].banner, None);
        assert_eq!(items[1].commented_code, vec![4]);
    }

    #[test]
    fn test_single_origin_import_group() {
        let code = parse_text("import os\nimport sys\n").unwrap();
        let items = outline(code.root(), &OutlineOptions::default());
        assert_eq!(
            items[0].kind,
            FragmentKind::Imports {
                origin: ImportOrigin::Stdlib
            }
        );
    }
}
