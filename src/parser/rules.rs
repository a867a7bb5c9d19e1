//! Protection of tag content that must never be parsed (`[noparse]`).
//!
//! Protected spans are rendered once, then swapped for an opaque token that contains no `[`, so no
//! later scan can see into them. Tokens are swapped back after the last pass.

use crate::Result;

use super::{find_tag_from, TagSpan};

const TOKEN_OPEN: char = '\u{E000}';
const TOKEN_CLOSE: char = '\u{E001}';

/// Holds the rendered output of protected spans until the render finishes.
#[derive(Debug, Default)]
pub(crate) struct Shelter {
    stored: Vec<String>,
}

impl Shelter {
    /// Replace every `name` span in `text` with a token standing in for its rendered output.
    ///
    /// Returns how many spans were sheltered.
    pub fn protect<F>(&mut self, text: &mut String, name: &str, mut render: F) -> Result<usize>
    where
        F: FnMut(&TagSpan<'_>) -> Result<String>,
    {
        let mut count = 0;
        let mut cursor = 0;

        while let Some(span) = find_tag_from(text.as_str(), name, cursor) {
            let start = span.start;
            let end = span.end();
            let output = render(&span)?;

            let token = format!("{TOKEN_OPEN}{}{TOKEN_CLOSE}", self.stored.len());
            self.stored.push(output);
            text.replace_range(start..end, &token);

            cursor = start + token.len();
            count += 1;
        }

        Ok(count)
    }

    /// Swap every token in `text` back for the output it stands in for.
    pub fn restore(self, mut text: String) -> String {
        // Later entries may have swallowed earlier tokens, so unwind newest first.
        for (idx, output) in self.stored.iter().enumerate().rev() {
            let token = format!("{TOKEN_OPEN}{idx}{TOKEN_CLOSE}");
            text = text.replace(&token, output);
        }

        text
    }

    pub fn is_empty(&self) -> bool {
        self.stored.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shelters_and_restores() {
        let mut text = String::from("a [noparse][b]x[/b][/noparse] b [noparse]y[/noparse]");
        let mut shelter = Shelter::default();

        let count = shelter
            .protect(&mut text, "noparse", |span| Ok(span.content.to_owned()))
            .unwrap();

        assert_eq!(count, 2);
        assert!(!text.contains('['));
        assert_eq!(shelter.restore(text), "a [b]x[/b] b y");
    }

    #[test]
    fn nested_protection_unwinds() {
        let mut text = String::from("[keep][noparse]z[/noparse][/keep]");
        let mut shelter = Shelter::default();

        shelter
            .protect(&mut text, "noparse", |span| Ok(span.content.to_owned()))
            .unwrap();
        shelter
            .protect(&mut text, "keep", |span| Ok(format!("<{}>", span.content)))
            .unwrap();

        assert_eq!(shelter.restore(text), "<z>");
    }

    #[test]
    fn nothing_to_protect() {
        let mut text = String::from("plain [b]x[/b]");
        let mut shelter = Shelter::default();

        assert_eq!(
            shelter
                .protect(&mut text, "noparse", |_| unreachable!())
                .unwrap(),
            0
        );
        assert!(shelter.is_empty());
        assert_eq!(shelter.restore(text), "plain [b]x[/b]");
    }
}
