use pysource_parser::py::lexing::TokenizeError;
use pysource_parser::py::loader::SourceLoader;
use pysource_parser::py::parsing::{parse_bytes, parse_file, parse_file_with, ParseError, ParseOptions};
use pysource_parser::py::testing::{fixtures_dir, Fixture};
use std::io::Write;

#[test]
fn parse_file_matches_parse_text() {
    let path = fixtures_dir().join("decorated_class.py");
    let from_file = parse_file(&path).unwrap();
    assert_eq!(from_file, Fixture::named("decorated_class").parse());
}

#[test]
fn parse_file_with_options_keeps_the_tab_size() {
    let path = fixtures_dir().join("tabs.py");
    let code = parse_file_with(&path, &ParseOptions::with_tab_size(4)).unwrap();
    assert_eq!(code.tab_size(), 4);
    assert_eq!(code.lines()[0].body().unwrap().width(), 4);
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = parse_file(dir.path().join("absent.py")).unwrap_err();
    match err {
        ParseError::Io(io) => assert_eq!(io.kind(), std::io::ErrorKind::NotFound),
        other => panic!("expected an I/O error, got {other:?}"),
    }
}

#[test]
fn crlf_file_is_normalized() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"if x:\r\n    y = 1\r\n").unwrap();

    let code = parse_file(file.path()).unwrap();
    assert_eq!(code.unparse().unwrap(), "if x:\n    y = 1\n");
}

#[test]
fn invalid_utf8_is_reported_with_its_position() {
    let err = parse_bytes(b"a = 1\nb = '\xff'\n").unwrap_err();
    match err {
        ParseError::Tokenize(TokenizeError::InvalidUtf8 { position }) => {
            assert_eq!(position.line, 2);
            assert_eq!(position.column, 5);
        }
        other => panic!("expected invalid UTF-8, got {other:?}"),
    }
}

#[test]
fn loader_reads_files_and_keeps_options() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"class A:\n\tpass\n").unwrap();

    let loader = SourceLoader::from_path(file.path())
        .unwrap()
        .with_options(ParseOptions::with_tab_size(2));
    assert_eq!(loader.options().tab_size, 2);
    let code = loader.parse().unwrap();
    assert_eq!(code.lines()[0].body().unwrap().width(), 2);
}
