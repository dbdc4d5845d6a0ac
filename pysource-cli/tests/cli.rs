use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("pysource-parser")
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn source_file(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".py").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn inspect_defaults_to_treeviz() {
    let mut cmd = cargo_bin_cmd!("pysource");
    cmd.arg("inspect").arg(fixture_path("tabs.py"));

    cmd.assert().success().stdout(
        predicate::str::starts_with("⧉ 7 statements\n")
            .and(predicate::str::contains("➔ block (16 columns)")),
    );
}

#[test]
fn global_tab_size_reaches_the_parser() {
    let mut cmd = cargo_bin_cmd!("pysource");
    cmd.arg("--tab-size")
        .arg("4")
        .arg("inspect")
        .arg(fixture_path("tabs.py"));

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("➔ block (8 columns)").and(
            predicate::str::contains("➔ block (16 columns)").not(),
        ));
}

#[test]
fn inspect_json_and_tokens() {
    let file = source_file("if x:\n    y = 1\n");

    cargo_bin_cmd!("pysource")
        .args(["inspect", "--format", "json"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"indent\": \"    \""));

    cargo_bin_cmd!("pysource")
        .args(["inspect", "--format", "tokens"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(
            predicate::str::contains("\"Indent\"").and(predicate::str::contains("\"Dedent\"")),
        );
}

#[test]
fn inspect_outline() {
    let mut cmd = cargo_bin_cmd!("pysource");
    cmd.args(["inspect", "-f", "outline"])
        .arg(fixture_path("simple_module.py"));

    cmd.assert().success().stdout(
        predicate::str::contains("imports (mixed)")
            .and(predicate::str::contains("  14-20   def main")),
    );
}

#[test]
fn inspect_outline_shows_banners_and_commented_code() {
    let file = source_file("# ==== Setup ====\nimport os\n\n# x = compute()\nz = 2\n");

    cargo_bin_cmd!("pysource")
        .args(["inspect", "--format", "outline"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(
            predicate::str::contains("   1      # ==== Setup ====\n   2-2    imports (stdlib)\n")
                .and(predicate::str::contains("   5-5    code (commented code at 4)\n")),
        );
}

#[test]
fn config_file_sets_first_party_packages() {
    let mut config = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(config, "[outline]\nfirst_party = [\"requests\"]").unwrap();
    let file = source_file("import requests\nfrom . import util\n");

    cargo_bin_cmd!("pysource")
        .arg("--config")
        .arg(config.path())
        .args(["inspect", "--format", "outline"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("imports (first-party)"));
}

#[test]
fn unparse_normalizes_the_documented_deviations() {
    let file = source_file("if x:\n# bad comment\n    y = 1   \n");

    cargo_bin_cmd!("pysource")
        .arg("unparse")
        .arg(file.path())
        .assert()
        .success()
        .stdout("if x:\n    # bad comment\n    y = 1\n");
}

#[test]
fn check_passes_on_fixtures() {
    cargo_bin_cmd!("pysource")
        .arg("check")
        .arg(fixture_path("comments.py"))
        .arg(fixture_path("strings.py"))
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn check_reports_deviations_as_a_diff() {
    let file = source_file("a = 1   \nb = 2\n");

    cargo_bin_cmd!("pysource")
        .arg("check")
        .arg(file.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("-a = 1   \n+a = 1\n"))
        .stderr(predicate::str::contains("round trip changed the file"));
}

#[test]
fn parse_errors_name_the_file() {
    let bad = source_file("if x:\n  y = 1\n z = 2\n");
    let good = source_file("x = 1\n");

    cargo_bin_cmd!("pysource")
        .arg("check")
        .arg(bad.path())
        .arg(good.path())
        .assert()
        .code(1)
        .stderr(
            predicate::str::contains(bad.path().display().to_string())
                .and(predicate::str::contains("unindent does not match")),
        );
}

#[test]
fn missing_file_fails() {
    cargo_bin_cmd!("pysource")
        .arg("unparse")
        .arg("/nonexistent/file.py")
        .assert()
        .failure()
        .stderr(predicate::str::contains("/nonexistent/file.py"));
}
