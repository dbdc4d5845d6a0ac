//! Testing utilities
//!
//!     Helpers shared by the unit tests, the integration tests under `tests/` and downstream
//!     crates.
//!
//! Fixtures
//!
//!     Hand-written sources scattered through test files drift: one test strips a trailing
//!     newline, another mixes tabs in by accident, and nobody notices which behavior is being
//!     pinned. Sources that matter for more than one test live as `.py` files under
//!     `tests/fixtures/` and are loaded through [`Fixture`].
//!
//!     ```rust,ignore
//!     use pysource_parser::py::testing::Fixture;
//!
//!     let code = Fixture::named("decorated_class").parse();
//!     ```
//!
//! Round-trip assertions
//!
//!     [`assert_round_trip`] checks the core law (`unparse(parse(text)) == text`) and prints
//!     both texts on failure. [`assert_idempotent`] checks that a second round trip changes
//!     nothing, which also holds for inputs the first trip normalizes.

use crate::py::ast::Code;
use crate::py::loader::SourceLoader;
use crate::py::parsing::parse_text;
use std::fs;
use std::path::PathBuf;

/// Directory holding the `.py` fixtures
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

/// Names (file stems) of every fixture, sorted
pub fn fixture_names() -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(fixtures_dir())
        .map(|entries| {
            entries
                .filter_map(Result::ok)
                .map(|entry| entry.path())
                .filter(|path| path.extension().is_some_and(|ext| ext == "py"))
                .filter_map(|path| path.file_stem().map(|s| s.to_string_lossy().into_owned()))
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}

/// A source file from the fixture directory
#[derive(Debug, Clone)]
pub struct Fixture {
    name: String,
    source: String,
}

impl Fixture {
    /// Load `tests/fixtures/<name>.py`, panicking if it is missing
    pub fn named(name: &str) -> Self {
        let path = fixtures_dir().join(format!("{name}.py"));
        let source = fs::read_to_string(&path)
            .unwrap_or_else(|err| panic!("cannot read fixture {}: {err}", path.display()));
        Self {
            name: name.to_string(),
            source,
        }
    }

    pub fn all() -> Vec<Self> {
        fixture_names().iter().map(|name| Self::named(name)).collect()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn loader(&self) -> SourceLoader {
        SourceLoader::from_string(&self.source)
    }

    /// Parse the fixture, panicking with the fixture name on failure
    pub fn parse(&self) -> Code {
        self.loader()
            .parse()
            .unwrap_or_else(|err| panic!("fixture {} failed to parse: {err}", self.name))
    }
}

/// Parse and unparse `source`, requiring the exact same text back
pub fn assert_round_trip(source: &str) {
    let code = parse_text(source).unwrap_or_else(|err| panic!("parse failed: {err}\n{source}"));
    let output = code
        .unparse()
        .unwrap_or_else(|err| panic!("unparse failed: {err}\n{source}"));
    assert_eq!(
        output, source,
        "round trip changed the source\n--- input ---\n{source}\n--- output ---\n{output}"
    );
}

/// Round-trip twice, requiring the second pass to reproduce the first
pub fn assert_idempotent(source: &str) {
    let once = parse_text(source)
        .and_then(|code| Ok(code.unparse()?))
        .unwrap_or_else(|err| panic!("first pass failed: {err}\n{source}"));
    let twice = parse_text(&once)
        .and_then(|code| Ok(code.unparse()?))
        .unwrap_or_else(|err| panic!("second pass failed: {err}\n{once}"));
    assert_eq!(twice, once, "second round trip changed the text");
}
