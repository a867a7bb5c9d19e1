use crate::parser::{closed_tag_names, find_tag, find_tag_from, TagSpan};

const LOREM_IPSUM: &str = "Lorem ipsum dolor sit amet, consectetur adipiscing elit. \
In lorem quam, fermentum id porttitor ac, iaculis eu arcu. \
Aliquam vulputate tempus felis consequat elementum.";

#[test]
pub fn just_text() {
    assert!(find_tag(LOREM_IPSUM, "b").is_none());
    assert!(closed_tag_names(LOREM_IPSUM).is_empty());
}

const SIMPLE: &str = "this is a [color=red]colored[/color] word";

#[test]
pub fn simple_span() {
    let span = find_tag(SIMPLE, "color").unwrap();
    assert_eq!(
        span,
        TagSpan {
            start: 10,
            raw: "[color=red]colored[/color]",
            name: "color",
            attributes: "=red",
            content: "colored",
        }
    );
    assert_eq!(&SIMPLE[span.start..span.end()], span.raw);
}

#[test]
pub fn raw_layout_holds() {
    let span = find_tag(r#"[jgrossi repo="foo"]Junior[/jgrossi]"#, "jgrossi").unwrap();
    let after_name = &span.raw["[".len() + span.name.len()..];
    assert!(after_name.starts_with(span.attributes));
    assert!(after_name[span.attributes.len() + "]".len()..].starts_with(span.content));
}

#[test]
pub fn name_must_end() {
    assert!(find_tag("[bold]x[/bold]", "b").is_none());
    assert!(find_tag("[highlight]x[/highlight]", "high").is_none());
    assert_eq!(find_tag("[b ]x[/b]", "b").unwrap().attributes, " ");
}

#[test]
pub fn case_insensitive() {
    let span = find_tag("[B]x[/b] and [/B]", "b").unwrap();
    assert_eq!(span.name, "B");
    assert_eq!(span.raw, "[B]x[/b]");
}

#[test]
pub fn shortest_content() {
    let span = find_tag("[b]one[/b] [b]two[/b]", "b").unwrap();
    assert_eq!(span.content, "one");

    let next = find_tag_from("[b]one[/b] [b]two[/b]", "b", span.end()).unwrap();
    assert_eq!(next.content, "two");
    assert_eq!(next.start, 11);
}

#[test]
pub fn nested_same_name_matches_leftmost_opening() {
    let span = find_tag("[b][b]x[/b][/b]", "b").unwrap();
    assert_eq!(span.raw, "[b][b]x[/b]");
    assert_eq!(span.content, "[b]x");
}

#[test]
pub fn spans_newlines() {
    let span = find_tag("[list]\n[*]a\n[*]b\n[/list]", "list").unwrap();
    assert_eq!(span.content, "\n[*]a\n[*]b\n");
}

const UNCLOSED_TAG: &str = "[not_a_tag=real ";

#[test]
pub fn unclosed_tag() {
    assert!(find_tag(UNCLOSED_TAG, "not_a_tag").is_none());
    assert!(find_tag("[b]never closed", "b").is_none());
    assert!(find_tag("[/b] before [b]", "b").is_none());
}

#[test]
pub fn multibyte_text() {
    let span = find_tag("héllo [i]wörld[/i] ✓", "i").unwrap();
    assert_eq!(span.content, "wörld");
    assert!(find_tag_from("héllo [i]wörld[/i] ✓", "i", span.end()).is_none());
}

#[test]
pub fn discovers_closed_pairs_only() {
    let names = closed_tag_names(
        "[B]x[/B] [*] item [1] [fake]y[/fake] [/orphan] [url]z[/url] [b]w[/b]",
    );
    assert_eq!(names, ["b", "fake", "url"]);
}

#[test]
pub fn discovers_non_ascii_names() {
    assert_eq!(closed_tag_names("é[bé]x[/bé]"), ["bé"]);
    assert_eq!(closed_tag_names("[größe=2]x[/größe] [/ü]"), ["größe"]);
}
