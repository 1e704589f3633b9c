//! Sanitizer and collision properties over a table of awkward inputs

use folio::core::layout::create_unique;
use folio::core::sanitize::{sanitize, SanitizeRules, FILESYSTEM_ILLEGAL, MARKUP_SYNTAX};
use tempfile::TempDir;
use test_case::test_case;

fn markup_rules() -> SanitizeRules {
    SanitizeRules::default().with_extra_illegal(MARKUP_SYNTAX)
}

#[test_case("Groceries" ; "plain")]
#[test_case("Recipe/Cake" ; "path separator")]
#[test_case(r"C:\Users\notes" ; "windows path")]
#[test_case("What? <Really> *now*" ; "wildcards and brackets")]
#[test_case("[Trip] #1 ^draft" ; "markup syntax")]
#[test_case("Line\nbreak\ttab" ; "control characters")]
#[test_case("Party 🎉🎂 time" ; "emoji")]
#[test_case("family 👨‍👩‍👧 photo" ; "zwj sequence")]
#[test_case("Ünïcödé ñame" ; "accented")]
#[test_case("  ..hidden..  " ; "dots and spaces")]
#[test_case("日本語のメモ" ; "cjk")]
fn test_no_illegal_characters(input: &str) {
    let rules = markup_rules();
    let out = sanitize(input, &rules);

    for c in out.chars() {
        assert!(!FILESYSTEM_ILLEGAL.contains(&c), "{c:?} left in {out:?}");
        assert!(!MARKUP_SYNTAX.contains(&c), "{c:?} left in {out:?}");
        assert!(!c.is_control(), "{c:?} left in {out:?}");
    }
}

#[test_case("Groceries" ; "plain")]
#[test_case("a/b" ; "separator")]
#[test_case("?x?" ; "single legal char")]
#[test_case("#Tag 🎉" ; "markup and emoji")]
#[test_case(" .a. " ; "trimmed edges")]
fn test_non_empty_when_legal_content_remains(input: &str) {
    assert!(!sanitize(input, &markup_rules()).is_empty());
}

#[test_case("Recipe/Cake?" ; "illegal")]
#[test_case("  spaced  out  " ; "spaces")]
#[test_case("..dots.." ; "dots")]
#[test_case("🎉 party" ; "leading emoji")]
#[test_case("x. /y" ; "dot before removed char")]
fn test_idempotent(input: &str) {
    let rules = markup_rules();
    let once = sanitize(input, &rules);
    assert_eq!(sanitize(&once, &rules), once);
}

#[test_case(1 ; "one")]
#[test_case(3 ; "three")]
#[test_case(12 ; "twelve")]
fn test_collisions_numbered_in_order(n: usize) {
    let temp = TempDir::new().unwrap();
    let mut names = Vec::new();
    for _ in 0..n {
        let (path, _file) = create_unique(temp.path(), "Groceries", "html").unwrap();
        names.push(path.file_name().unwrap().to_string_lossy().into_owned());
    }

    let mut expected = vec!["Groceries.html".to_string()];
    expected.extend((1..n).map(|i| format!("Groceries ({i}).html")));
    assert_eq!(names, expected);
}
