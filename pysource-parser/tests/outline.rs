use pysource_parser::py::outline::{
    comment_runs, commented_code, outline, FragmentKind, ImportOrigin, OutlineOptions,
};
use pysource_parser::py::testing::Fixture;

fn describe(name: &str, options: &OutlineOptions) -> Vec<(String, std::ops::Range<usize>)> {
    let code = Fixture::named(name).parse();
    outline(code.root(), options)
        .into_iter()
        .map(|item| (item.kind.to_string(), item.lines))
        .collect()
}

#[test]
fn module_sections() {
    assert_eq!(
        describe("simple_module", &OutlineOptions::default()),
        vec![
            ("docstring".to_string(), 0..1),
            ("imports (mixed)".to_string(), 1..6),
            ("code".to_string(), 6..7),
            ("def main".to_string(), 7..8),
            ("code".to_string(), 8..9),
        ]
    );
}

#[test]
fn decorators_join_their_definition() {
    let code = Fixture::named("decorated_class").parse();
    let options = OutlineOptions::default();

    let items = outline(code.root(), &options);
    assert_eq!(
        items[0].kind,
        FragmentKind::Imports {
            origin: ImportOrigin::Stdlib
        }
    );
    let banner = items[0].banner.as_ref().unwrap();
    assert_eq!(banner.line(), 1);
    assert!(banner.text().unwrap().starts_with("#-----"));
    assert!(items[0].commented_code.is_empty());
    assert_eq!(items[1].kind.to_string(), "class Point");
    assert_eq!(items[1].banner, None);
    assert_eq!(items[1].lines, 1..3);
    assert_eq!(items[1].range.start.line, 7);

    let body = code.lines()[2].body().unwrap();
    let members: Vec<String> = outline(body, &options)
        .into_iter()
        .map(|item| item.kind.to_string())
        .collect();
    assert_eq!(
        members,
        vec![
            "docstring",
            "code",
            "def norm",
            "def origin",
            "async def fetch"
        ]
    );
}

#[test]
fn definition_range_covers_the_body() {
    let code = Fixture::named("simple_module").parse();
    let items = outline(code.root(), &OutlineOptions::default());
    let main = &items[3];

    assert_eq!(main.range.start.line, 14);
    assert!(main.range.end.line >= 20);
}

#[test]
fn first_party_packages_are_configurable() {
    let code = Fixture::named("simple_module").parse();
    let options = OutlineOptions::with_first_party(["requests"]);

    assert_eq!(options.origin_of("requests.adapters"), ImportOrigin::FirstParty);
    assert_eq!(options.origin_of("os"), ImportOrigin::Stdlib);
    let items = outline(code.root(), &options);
    assert_eq!(
        items[1].kind,
        FragmentKind::Imports {
            origin: ImportOrigin::Mixed
        }
    );
}

#[test]
fn single_words_and_prose_in_fixture_comments() {
    let code = Fixture::named("decorated_class").parse();
    let class_body = code.lines()[2].body().unwrap();
    let items = outline(class_body, &OutlineOptions::default());

    // `# Euclidean` sits inside `norm`, not ahead of a member
    assert!(items.iter().all(|item| item.commented_code.is_empty()));

    let norm = class_body.lines()[4].body().unwrap();
    let euclidean = comment_runs(norm.lines()[0].leading());
    assert_eq!(commented_code(euclidean[0]).as_deref(), Some("Euclidean\n"));
}
