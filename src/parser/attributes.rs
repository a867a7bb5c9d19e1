//! Opening-tag attribute parsing.
//!
//! Handles the text between a tag name and the `]` closing its opening tag: `=red`,
//! `="http://foo.bar"`, ` repo="foo" other=bar`, or a mix of a positional value and named pairs.

/// Attributes of one tag occurrence, in the order they were found.
///
/// Keys are lower-cased. The positional value (`[color=red]`) is stored under
/// [`AttributeMap::POSITIONAL`] and always comes first when present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeMap {
    entries: Vec<(String, String)>,
}

impl AttributeMap {
    /// Key of the value written directly after the tag name. Never produced by a named pair.
    pub const POSITIONAL: &'static str = "";

    /// Parse raw attribute text. Never fails; malformed input yields whatever pairs could be read.
    pub fn parse(raw: &str) -> Self {
        let mut map = Self::default();
        let mut remaining = raw.trim_start();

        if let Some(after_eq) = remaining.strip_prefix('=') {
            let (value, rest) = positional_value(after_eq);
            map.insert(Self::POSITIONAL, value);
            remaining = rest;
        }

        loop {
            remaining = remaining.trim_start();
            if remaining.is_empty() {
                break;
            }

            if let Some((key, value, rest)) = parse_key_value(remaining) {
                map.insert(&key.to_ascii_lowercase(), value);
                remaining = rest;
            } else {
                // Skip one unrecognized character.
                let skip = remaining.chars().next().map_or(1, char::len_utf8);
                remaining = &remaining[skip..];
            }
        }

        map
    }

    /// Insert or overwrite; an overwritten key keeps its original position.
    pub fn insert(&mut self, key: &str, value: &str) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value.to_owned(),
            None => self.entries.push((key.to_owned(), value.to_owned())),
        }
    }

    /// Look up a named attribute, case-insensitively.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// The positional value, if the tag had one.
    pub fn positional(&self) -> Option<&str> {
        self.get(Self::POSITIONAL)
    }

    /// The first attribute found, whatever its key.
    pub fn first(&self) -> Option<&str> {
        self.entries.first().map(|(_, v)| v.as_str())
    }

    /// First attribute if it holds something other than whitespace.
    pub fn first_non_blank(&self) -> Option<&str> {
        self.first().filter(|v| !v.trim().is_empty())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Copy with every value made safe for a double-quoted HTML attribute.
    #[cfg(feature = "escape")]
    pub fn escaped(&self) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .map(|(k, v)| {
                    (
                        k.clone(),
                        html_escape::encode_double_quoted_attribute(v).into_owned(),
                    )
                })
                .collect(),
        }
    }
}

/// Read the value following a leading `=`.
///
/// A quoted value ends at its closing quote. An unquoted one may contain spaces
/// (`[font=Times New Roman]`) and runs until a following ` key=` pair or the end of input.
fn positional_value(s: &str) -> (&str, &str) {
    let s = s.trim_start();

    if let Some(quoted) = s.strip_prefix('"') {
        return match quoted.find('"') {
            Some(end) => (&quoted[..end], &quoted[end + 1..]),
            // Unterminated quote: keep what follows it.
            None => (quoted.trim_end(), ""),
        };
    }

    let end = s
        .char_indices()
        .filter(|(_, c)| c.is_whitespace())
        .map(|(i, _)| i)
        .find(|&i| starts_key_value(s[i..].trim_start()))
        .unwrap_or(s.len());

    (s[..end].trim_end(), &s[end..])
}

fn is_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

fn key_len(s: &str) -> usize {
    s.find(|c: char| !is_key_char(c)).unwrap_or(s.len())
}

fn starts_key_value(s: &str) -> bool {
    let len = key_len(s);
    len > 0 && s[len..].starts_with('=')
}

/// Parse `key="value"` or `key=value` from the front of `s`.
///
/// Returns (key, value, rest).
fn parse_key_value(s: &str) -> Option<(&str, &str, &str)> {
    if !starts_key_value(s) {
        return None;
    }

    let len = key_len(s);
    let key = &s[..len];
    let after_eq = &s[len + 1..];

    if let Some(quoted) = after_eq.strip_prefix('"') {
        if let Some(end) = quoted.find('"') {
            return Some((key, &quoted[..end], &quoted[end + 1..]));
        }
        // Unterminated quote: fall back to a bare word.
        let end = quoted.find(char::is_whitespace).unwrap_or(quoted.len());
        return Some((key, &quoted[..end], &quoted[end..]));
    }

    let end = after_eq
        .find(|c: char| c.is_whitespace() || c == ']')
        .unwrap_or(after_eq.len());
    Some((key, &after_eq[..end], &after_eq[end..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty() {
        assert!(AttributeMap::parse("").is_empty());
        assert!(AttributeMap::parse("   ").is_empty());
    }

    #[test]
    fn positional() {
        let attrs = AttributeMap::parse("=red");
        assert_eq!(attrs.positional(), Some("red"));
        assert_eq!(attrs.first(), Some("red"));
        assert_eq!(attrs.len(), 1);
    }

    #[test]
    fn positional_with_spaces() {
        let attrs = AttributeMap::parse("=Times New Roman");
        assert_eq!(attrs.first(), Some("Times New Roman"));

        let attrs = AttributeMap::parse("=John Doe;12345");
        assert_eq!(attrs.first(), Some("John Doe;12345"));
    }

    #[test]
    fn positional_quoted() {
        let attrs = AttributeMap::parse("=\"http://foo.bar\"");
        assert_eq!(attrs.first(), Some("http://foo.bar"));
    }

    #[test]
    fn positional_keeps_url_query() {
        let attrs = AttributeMap::parse("=http://bar.com?foo=bar%20&foo#bar");
        assert_eq!(attrs.first(), Some("http://bar.com?foo=bar%20&foo#bar"));
        assert_eq!(attrs.len(), 1);
    }

    #[test]
    fn positional_then_named() {
        let attrs = AttributeMap::parse("=Jane Doe post=12 Lang=en");
        assert_eq!(attrs.positional(), Some("Jane Doe"));
        assert_eq!(attrs.get("post"), Some("12"));
        assert_eq!(attrs.get("lang"), Some("en"));
        assert_eq!(
            attrs.iter().map(|(k, _)| k).collect::<Vec<_>>(),
            ["", "post", "lang"]
        );
    }

    #[test]
    fn named_pairs() {
        let attrs = AttributeMap::parse(r#" repo="foo" other=bar"#);
        assert_eq!(attrs.get("repo"), Some("foo"));
        assert_eq!(attrs.get("OTHER"), Some("bar"));
        assert_eq!(attrs.positional(), None);
        assert_eq!(attrs.first(), Some("foo"));
    }

    #[test]
    fn keys_are_lower_cased() {
        let attrs = AttributeMap::parse(" REPO=x");
        assert_eq!(attrs.iter().next(), Some(("repo", "x")));
    }

    #[test]
    fn later_duplicates_win() {
        let attrs = AttributeMap::parse(" a=1 b=2 a=3");
        assert_eq!(attrs.get("a"), Some("3"));
        assert_eq!(attrs.first(), Some("3"));
        assert_eq!(attrs.len(), 2);
    }

    #[test]
    fn malformed_is_best_effort() {
        let attrs = AttributeMap::parse(r#" repo="foo other=bar"#);
        assert_eq!(attrs.get("repo"), Some("foo"));
        assert_eq!(attrs.get("other"), Some("bar"));

        let attrs = AttributeMap::parse("=\"unterminated ");
        assert_eq!(attrs.first(), Some("unterminated"));

        let attrs = AttributeMap::parse(" == = junk");
        assert!(attrs.get("junk").is_none());
    }

    #[test]
    fn blank_positional() {
        let attrs = AttributeMap::parse("=  ");
        assert_eq!(attrs.first(), Some(""));
        assert_eq!(attrs.first_non_blank(), None);
    }

    #[cfg(feature = "escape")]
    #[test]
    fn escaping() {
        let attrs = AttributeMap::parse(r#"=a"b"#).escaped();
        assert_eq!(attrs.first(), Some("a&quot;b"));
    }
}
