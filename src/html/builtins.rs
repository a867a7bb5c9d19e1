//! Built-in implementations of common forum BBCode tags.
//!
//! Fixed wrappers are generated by `simple_tag!`. Tags that read attributes or URL templates are
//! handler families ([`NamedTag`]): one type serves several names and picks its behavior from
//! the name it was built for.
use crate::context::{ATTACH_URL, JIRA_URL, POST_URL, THREAD_URL, USER_URL};
use crate::{AttributeMap, Error, RenderContext, Result, TagSpan};

use super::lists::ListKind;
use super::registry::{Handler, NamedTag, TagFlags, TagHandler, TagRegistry};

impl<T> TagHandler for T
where
    T: SimpleTag + Send + Sync,
{
    fn render(&self, tag: &TagSpan<'_>, _: &AttributeMap, _: &RenderContext) -> Result<String> {
        Ok(format!("{}{}{}", Self::HTML_OPEN, tag.content, Self::HTML_CLOSE))
    }
}

/// A tag that ignores its attributes and wraps its content in fixed markup.
pub trait SimpleTag {
    const HTML_OPEN: &'static str;

    const HTML_CLOSE: &'static str;
}

macro_rules! simple_tag {
    ($doc:expr, $name:ident, $open:expr, $close:expr) => {
        #[derive(Copy, Clone, Debug, Default)]
        #[doc = $doc]
        #[doc = "# Exact output"]
        #[doc = "```html"]
        #[doc = $open]
        #[doc = " contents"]
        #[doc = $close]
        #[doc = "```"]
        pub struct $name;

        impl SimpleTag for $name {
            const HTML_OPEN: &'static str = $open;
            const HTML_CLOSE: &'static str = $close;
        }
    };
}

simple_tag! {"Bold text.", BoldTag, "<strong>", "</strong>"}
simple_tag! {"Italic text.", ItalicTag, "<em>", "</em>"}
simple_tag! {"Underlined text.", UnderlineTag, "<u>", "</u>"}
simple_tag! {"Struck-through text.", StrikeTag, "<s>", "</s>"}
simple_tag! {"Highlighted text.", HighlightTag, "<mark>", "</mark>"}
simple_tag! {"Indented block.", IndentTag, "<blockquote><div>", "</div></blockquote>"}
simple_tag! {"Image from the URL given as content.", ImageTag, "<img class=\"\" src=\"", "\"/>"}
simple_tag! {
    "Image floated left.",
    ImageLeftTag, "<img src=\"", "\" alt=\"\" style=\"float: left;\">"
}
simple_tag! {
    "Image floated right.",
    ImageRightTag, "<img src=\"", "\" alt=\"\" style=\"float: right;\">"
}
simple_tag! {"Code block, no highlighting.", CodeTag, "<code><pre>", "</pre></code>"}
simple_tag! {"Preformatted text.", PreformattedTag, "<pre>", "</pre>"}
simple_tag! {"Text between two rules.", RuleTag, "<hr />", "<hr />"}
simple_tag! {"Informational callout.", NoteTag, "<div class=\"alert alert-info\">", "</div>"}
simple_tag! {"Warning callout.", WarningTag, "<div class=\"alert alert-warning\">", "</div>"}
simple_tag! {"Header (tier 1).", Header1Tag, "<h1>", "</h1>"}
simple_tag! {"Header (tier 2).", Header2Tag, "<h2>", "</h2>"}
simple_tag! {"Header (tier 3).", Header3Tag, "<h3>", "</h3>"}
simple_tag! {"Header (tier 4).", Header4Tag, "<h4>", "</h4>"}
simple_tag! {"Header (tier 5).", Header5Tag, "<h5>", "</h5>"}
simple_tag! {"Header (tier 6).", Header6Tag, "<h6>", "</h6>"}
simple_tag! {"Content passed through untouched.", NoParseTag, "", ""}

/// Steps of the `size` scale, in percent. Relative sizes count from index 3.
const SIZE_SCALE: [u32; 7] = [60, 89, 100, 120, 150, 200, 300];

fn require_first<'a>(tag: &str, attributes: &'a AttributeMap) -> Result<&'a str> {
    attributes
        .first_non_blank()
        .ok_or_else(|| Error::MissingAttribute {
            tag: tag.to_owned(),
        })
}

/// Inline style span: `color`, `size` and `font`. Other names style the CSS property of the
/// same name.
#[derive(Clone, Debug)]
pub struct StyledSpan {
    tag: String,
}

impl StyledSpan {
    fn property(&self) -> &str {
        match self.tag.as_str() {
            "size" => "font-size",
            "font" => "font-family",
            other => other,
        }
    }
}

impl NamedTag for StyledSpan {
    fn for_tag(name: &str) -> Self {
        Self {
            tag: name.to_ascii_lowercase(),
        }
    }
}

impl TagHandler for StyledSpan {
    fn render(
        &self,
        tag: &TagSpan<'_>,
        attributes: &AttributeMap,
        _: &RenderContext,
    ) -> Result<String> {
        let value = require_first(&self.tag, attributes)?;
        let value = match self.tag.as_str() {
            "size" => font_size(value),
            _ => value.to_owned(),
        };

        Ok(format!(
            "<span style=\"{}: {value};\">{}</span>",
            self.property(),
            tag.content
        ))
    }
}

/// Map a `size` value onto [`SIZE_SCALE`]; anything off the scale passes through verbatim.
fn font_size(value: &str) -> String {
    let mut position = leading_int(value) - 1;
    if value.starts_with(['+', '-']) {
        position += 3;
    }

    usize::try_from(position)
        .ok()
        .and_then(|idx| SIZE_SCALE.get(idx))
        .map_or_else(|| value.to_owned(), |pct| format!("{pct}%"))
}

/// Integer prefix of `s` (optional sign, then digits); 0 when there is none.
fn leading_int(s: &str) -> i64 {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let magnitude = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, d| {
            acc.saturating_mul(10).saturating_add(i64::from(d - b'0'))
        });

    if negative {
        -magnitude
    } else {
        magnitude
    }
}

/// Text alignment block: `left`, `center`, `right`, or `align=<position>`.
#[derive(Clone, Debug)]
pub struct Alignment {
    position: Option<String>,
}

impl NamedTag for Alignment {
    fn for_tag(name: &str) -> Self {
        let name = name.to_ascii_lowercase();
        Self {
            position: (name != "align").then_some(name),
        }
    }
}

impl TagHandler for Alignment {
    fn render(
        &self,
        tag: &TagSpan<'_>,
        attributes: &AttributeMap,
        _: &RenderContext,
    ) -> Result<String> {
        let position = match (&self.position, attributes.first_non_blank()) {
            (Some(fixed), _) => fixed.as_str(),
            (None, Some(given)) => given,
            // `[align]` without a position stays as written.
            (None, None) => return Ok(tag.raw.to_owned()),
        };

        Ok(format!(
            "<div style=\"text-align: {position};\">{}</div>",
            tag.content
        ))
    }
}

/// Floating block: `floatright`, `rft` and `lft`.
#[derive(Clone, Debug)]
pub struct Float {
    side: &'static str,
}

impl NamedTag for Float {
    fn for_tag(name: &str) -> Self {
        let side = match name.to_ascii_lowercase().as_str() {
            "lft" | "floatleft" => "left",
            _ => "right",
        };
        Self { side }
    }
}

impl TagHandler for Float {
    fn render(&self, tag: &TagSpan<'_>, _: &AttributeMap, _: &RenderContext) -> Result<String> {
        Ok(format!(
            "<div style=\"float: {};\">{}</div>",
            self.side, tag.content
        ))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LinkKind {
    Email,
    External,
    Anchor,
}

/// Plain links: `email`, `url` and `a`.
#[derive(Clone, Debug)]
pub struct Link {
    kind: LinkKind,
}

impl NamedTag for Link {
    fn for_tag(name: &str) -> Self {
        let kind = match name.to_ascii_lowercase().as_str() {
            "email" => LinkKind::Email,
            "a" => LinkKind::Anchor,
            _ => LinkKind::External,
        };
        Self { kind }
    }
}

impl TagHandler for Link {
    fn render(
        &self,
        tag: &TagSpan<'_>,
        attributes: &AttributeMap,
        _: &RenderContext,
    ) -> Result<String> {
        let target = attributes.first_non_blank();
        let content = tag.content;

        Ok(match (self.kind, target) {
            (LinkKind::Email, target) => format!(
                "<a href=\"mailto:{}\">{content}</a>",
                target.unwrap_or(content)
            ),
            (LinkKind::External, target) => format!(
                "<a href=\"{}\" target=\"_blank\">{content}</a>",
                target.unwrap_or(content)
            ),
            (LinkKind::Anchor, Some(target)) => format!("<a href=\"{target}\">{content}</a>"),
            (LinkKind::Anchor, None) => tag.raw.to_owned(),
        })
    }
}

/// Links to forum entities through a configured URL template: `thread`, `post`, `attach`,
/// `jira` and `name`.
///
/// The id is the positional attribute, or the content when that is missing or blank. When the
/// content is the id itself the label is the resolved URL (for `jira`, the upper-cased id).
#[derive(Clone, Debug)]
pub struct EntityLink {
    tag: String,
    key: String,
}

impl NamedTag for EntityLink {
    fn for_tag(name: &str) -> Self {
        let tag = name.to_ascii_lowercase();
        let key = match tag.as_str() {
            "thread" => THREAD_URL.to_owned(),
            "post" => POST_URL.to_owned(),
            "attach" => ATTACH_URL.to_owned(),
            "jira" => JIRA_URL.to_owned(),
            "name" | "user" => USER_URL.to_owned(),
            other => format!("{other}_url"),
        };
        Self { tag, key }
    }
}

impl TagHandler for EntityLink {
    fn render(
        &self,
        tag: &TagSpan<'_>,
        attributes: &AttributeMap,
        context: &RenderContext,
    ) -> Result<String> {
        let content = tag.content;
        let given = attributes
            .positional()
            .map(str::trim)
            .filter(|id| !id.is_empty());

        if self.key == USER_URL {
            let id = given.unwrap_or(content).trim().to_lowercase();
            let url = context.resolve(&self.tag, &self.key, &id)?;
            return Ok(format!("<a href=\"{url}\">{content}</a>"));
        }

        let id = given.unwrap_or(content);
        let url = context.resolve(&self.tag, &self.key, id)?;

        let label = match (content == id, self.key == JIRA_URL) {
            (true, true) => id.to_uppercase(),
            (true, false) => url.clone(),
            (false, _) => content.to_owned(),
        };

        Ok(format!("<a href=\"{url}\">{label}</a>"))
    }
}

/// Bullet or ordered list of `[*]` items.
#[derive(Clone, Copy, Debug, Default)]
pub struct ListTag;

impl TagHandler for ListTag {
    fn render(
        &self,
        tag: &TagSpan<'_>,
        attributes: &AttributeMap,
        _: &RenderContext,
    ) -> Result<String> {
        Ok(ListKind::from_attribute(attributes.first()).render(tag.content))
    }
}

/// Block quote with an optional attribution footer.
///
/// `[quote=Name;123]` links the attribution to post `123` through the `post_url` template.
#[derive(Clone, Copy, Debug, Default)]
pub struct QuoteTag;

impl TagHandler for QuoteTag {
    fn render(
        &self,
        tag: &TagSpan<'_>,
        attributes: &AttributeMap,
        context: &RenderContext,
    ) -> Result<String> {
        let attribution = attributes.positional().unwrap_or_default();

        let footer = match attribution.rsplit_once(';') {
            Some((author, post)) if !post.trim().is_empty() => {
                let url = context.resolve("quote", POST_URL, post.trim())?;
                format!("<a href=\"{url}\">{}</a>", author.trim())
            }
            Some((author, _)) => author.trim().to_owned(),
            None => attribution.to_owned(),
        };

        Ok(format!(
            "<blockquote>\n    <p>{}</p>\n    <footer>{footer}</footer>\n</blockquote>",
            tag.content
        ))
    }
}

/// Breadcrumb trail from `Step > Step > Current`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProcessTag;

impl TagHandler for ProcessTag {
    fn render(&self, tag: &TagSpan<'_>, _: &AttributeMap, _: &RenderContext) -> Result<String> {
        let steps: Vec<&str> = tag
            .content
            .split('>')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();

        let mut out = String::from("<ol class=\"breadcrumb\">");
        if let Some((current, previous)) = steps.split_last() {
            for step in previous {
                out.push_str("<li><a>");
                out.push_str(step);
                out.push_str("</a></li>");
            }
            out.push_str("<li class=\"active\">");
            out.push_str(current);
            out.push_str("</li>");
        }
        out.push_str("</ol>");

        Ok(out)
    }
}

macro_rules! install {
    ($registry:ident; $($name:literal => $handler:expr),* $(,)?) => {
        $(
            $registry.register_with_flags($name, $handler, TagFlags::BUILTIN);
        )*
    };
}

/// Register every built-in tag, in pass order.
/// # Remarks
/// `process` and `list` split their content on `>` and `[*]`, so they run before the tags whose
/// output would contain those characters.
pub fn install(registry: &mut TagRegistry) {
    registry.register_with_flags(
        "noparse",
        Handler::object(NoParseTag),
        TagFlags::BUILTIN | TagFlags::NO_PARSE,
    );

    install! {registry;
        "process" => Handler::object(ProcessTag),
        "list" => Handler::object(ListTag),
        "b" => Handler::object(BoldTag),
        "i" => Handler::object(ItalicTag),
        "u" => Handler::object(UnderlineTag),
        "s" => Handler::object(StrikeTag),
        "color" => Handler::named::<StyledSpan>("color"),
        "size" => Handler::named::<StyledSpan>("size"),
        "font" => Handler::named::<StyledSpan>("font"),
        "highlight" => Handler::object(HighlightTag),
        "high" => Handler::object(HighlightTag),
        "left" => Handler::named::<Alignment>("left"),
        "center" => Handler::named::<Alignment>("center"),
        "right" => Handler::named::<Alignment>("right"),
        "align" => Handler::named::<Alignment>("align"),
        "indent" => Handler::object(IndentTag),
        "email" => Handler::named::<Link>("email"),
        "url" => Handler::named::<Link>("url"),
        "a" => Handler::named::<Link>("a"),
        "thread" => Handler::named::<EntityLink>("thread"),
        "post" => Handler::named::<EntityLink>("post"),
        "attach" => Handler::named::<EntityLink>("attach"),
        "jira" => Handler::named::<EntityLink>("jira"),
        "name" => Handler::named::<EntityLink>("name"),
        "img" => Handler::object(ImageTag),
        "imglft" => Handler::object(ImageLeftTag),
        "imgrft" => Handler::object(ImageRightTag),
        "code" => Handler::object(CodeTag),
        "php" => Handler::object(CodeTag),
        "html" => Handler::object(CodeTag),
        "pre" => Handler::object(PreformattedTag),
        "quote" => Handler::object(QuoteTag),
        "floatright" => Handler::named::<Float>("floatright"),
        "rft" => Handler::named::<Float>("rft"),
        "lft" => Handler::named::<Float>("lft"),
        "h1" => Handler::object(Header1Tag),
        "h2" => Handler::object(Header2Tag),
        "h3" => Handler::object(Header3Tag),
        "h4" => Handler::object(Header4Tag),
        "h5" => Handler::object(Header5Tag),
        "h6" => Handler::object(Header6Tag),
        "hr" => Handler::object(RuleTag),
        "note" => Handler::object(NoteTag),
        "warning" => Handler::object(WarningTag),
    }
}
