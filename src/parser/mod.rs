//! Locating tag spans in raw text.
//!
//! Matching is leftmost and non-greedy: an opening `[name ...]` pairs with the nearest following
//! `[/name]`, across newlines and ignoring ASCII case. Nested tags sharing a name are therefore
//! not balanced in one go. `[b][b]x[/b][/b]` first matches `[b][b]x[/b]`, and the remaining
//! `[b]...[/b]` pair is picked up when the caller scans again after substituting.

pub mod attributes;
pub(crate) mod rules;

/// One matched tag occurrence, borrowed from the text it was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagSpan<'a> {
    /// Byte offset of `raw` within the searched text.
    pub start: usize,
    /// The whole span, from the opening `[` through the closing tag's `]`.
    pub raw: &'a str,
    /// The tag name as written.
    pub name: &'a str,
    /// Everything between the name and the `]` ending the opening tag.
    pub attributes: &'a str,
    /// Everything between the opening and closing tags.
    pub content: &'a str,
}

impl<'a> TagSpan<'a> {
    /// Byte offset just past the span.
    pub fn end(&self) -> usize {
        self.start + self.raw.len()
    }
}

/// Find the first complete `name` tag pair in `text`.
pub fn find_tag<'a>(text: &'a str, name: &str) -> Option<TagSpan<'a>> {
    find_tag_from(text, name, 0)
}

/// Find the first complete `name` tag pair whose opening bracket is at or after byte `from`.
pub fn find_tag_from<'a>(text: &'a str, name: &str, from: usize) -> Option<TagSpan<'a>> {
    if name.is_empty() || from >= text.len() {
        return None;
    }

    let closing = format!("[/{name}]");
    let mut cursor = from;

    while let Some(offset) = text.get(cursor..)?.find('[') {
        let start = cursor + offset;
        cursor = start + 1;

        let name_start = start + 1;
        let name_end = name_start + name.len();
        let Some(candidate) = text.as_bytes().get(name_start..name_end) else {
            return None;
        };
        if !candidate.eq_ignore_ascii_case(name.as_bytes()) {
            continue;
        }

        // The name must end here, otherwise `[b]` would match `[bold]`.
        match text[name_end..].chars().next() {
            Some(c) if c == ']' || c == '=' || c.is_whitespace() => {}
            _ => continue,
        }

        let Some(open_len) = text[name_end..].find(']') else {
            // No later opening tag can be terminated either.
            return None;
        };
        let open_end = name_end + open_len;

        let Some(close_offset) = find_ignore_ascii_case(&text[open_end + 1..], &closing) else {
            // Every later candidate would search a suffix of the same text.
            return None;
        };
        let close_start = open_end + 1 + close_offset;
        let close_end = close_start + closing.len();

        return Some(TagSpan {
            start,
            raw: &text[start..close_end],
            name: &text[name_start..name_end],
            attributes: &text[name_end..open_end],
            content: &text[open_end + 1..close_start],
        });
    }

    None
}

/// Lower-cased names of every tag that appears as a complete pair in `text`, in order of first
/// closing tag. Unpaired brackets such as `[*]` or `[1]` are not tags.
pub fn closed_tag_names(text: &str) -> Vec<String> {
    let mut names: Vec<String> = vec![];
    let mut rem = text;

    while let Some(idx) = rem.find("[/") {
        let after = &rem[idx + "[/".len()..];
        rem = after;

        let len = after
            .find(|c: char| !is_tag_name_char(c))
            .unwrap_or(after.len());
        if len == 0 || !after[len..].starts_with(']') {
            continue;
        }

        let name = after[..len].to_ascii_lowercase();
        if names.contains(&name) {
            continue;
        }
        if find_tag(text, &name).is_some() {
            names.push(name);
        }
    }

    names
}

/// Characters allowed in a tag name discovered from text: any alphanumeric, `_` or `-`.
/// Case is still folded for ASCII letters only.
pub(crate) fn is_tag_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}

fn find_ignore_ascii_case(haystack: &str, needle: &str) -> Option<usize> {
    let needle = needle.as_bytes();
    if needle.len() > haystack.len() {
        return None;
    }

    haystack
        .as_bytes()
        .windows(needle.len())
        .position(|w| w.eq_ignore_ascii_case(needle))
}

#[cfg(test)]
mod tests;
