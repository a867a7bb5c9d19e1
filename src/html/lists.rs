//! `[list]` rendering.

/// Marker that starts each list item.
pub const ITEM_MARKER: &str = "[*]";

/// The list flavor selected by a `[list]` tag's attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListKind {
    /// `[list]`: an unordered `<ul>`.
    Bullet,
    /// `[list=1]`, `[list=a]`, `[list=I]`...: an `<ol>` of the given `type`.
    /// A number greater than one also sets where counting starts.
    Ordered { marker: String, start: Option<u64> },
}

impl ListKind {
    pub fn from_attribute(attribute: Option<&str>) -> Self {
        let Some(attribute) = attribute.map(str::trim).filter(|a| !a.is_empty()) else {
            return Self::Bullet;
        };

        match attribute.parse::<u64>() {
            Ok(n) => Self::Ordered {
                marker: "1".to_owned(),
                start: (n > 1).then_some(n),
            },
            Err(_) => Self::Ordered {
                marker: attribute.to_owned(),
                start: None,
            },
        }
    }

    pub fn render(&self, content: &str) -> String {
        let mut out = match self {
            Self::Bullet => String::from("<ul>"),
            Self::Ordered {
                marker,
                start: Some(start),
            } => format!("<ol type=\"{marker}\" start=\"{start}\">"),
            Self::Ordered { marker, start: None } => format!("<ol type=\"{marker}\">"),
        };

        for item in items(content) {
            out.push_str("<li>");
            out.push_str(item);
            out.push_str("</li>");
        }

        out.push_str(match self {
            Self::Bullet => "</ul>",
            Self::Ordered { .. } => "</ol>",
        });
        out
    }
}

/// Trimmed, non-blank items of a list body. Text before the first marker counts as an item.
pub fn items(content: &str) -> impl Iterator<Item = &str> {
    content
        .split(ITEM_MARKER)
        .map(str::trim)
        .filter(|item| !item.is_empty())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn bullet() {
        let out = ListKind::from_attribute(None).render(" \n[*] list item 1\n[*] list item 2\n");
        assert_eq!(out, "<ul><li>list item 1</li><li>list item 2</li></ul>");
    }

    #[test]
    fn blank_attribute_is_bullet() {
        assert_eq!(ListKind::from_attribute(Some("  ")), ListKind::Bullet);
    }

    #[test]
    fn ordered() {
        let body = "\n[*]list item 1\n[*]list item 2\n";
        assert_eq!(
            ListKind::from_attribute(Some("1")).render(body),
            "<ol type=\"1\"><li>list item 1</li><li>list item 2</li></ol>"
        );
        assert_eq!(
            ListKind::from_attribute(Some("a")).render(body),
            "<ol type=\"a\"><li>list item 1</li><li>list item 2</li></ol>"
        );
    }

    #[test]
    fn ordered_start() {
        assert_eq!(
            ListKind::from_attribute(Some("3")).render("[*]c"),
            "<ol type=\"1\" start=\"3\"><li>c</li></ol>"
        );
    }

    #[test]
    fn leading_text_and_empty_items() {
        let collected: Vec<_> = items("intro [*] [*]x[*]\n").collect();
        assert_eq!(collected, ["intro", "x"]);
        assert_eq!(ListKind::Bullet.render(""), "<ul></ul>");
    }
}
