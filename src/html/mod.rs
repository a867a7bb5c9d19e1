//! HTML rendering by fixed-point substitution.
//!
//! Every pass walks the registry in order and, for each tag name, replaces each matched span
//! left to right with its handler's output. Passes repeat until one changes nothing.
use bitflags::bitflags;

use crate::parser::rules::Shelter;
use crate::parser::{closed_tag_names, find_tag_from};
use crate::{AttributeMap, Error, RenderContext, Result};

use self::registry::{Handler, NamedTag, TagEntry, TagFlags, TagRegistry};

pub mod builtins;
pub mod lists;
pub mod registry;

bitflags! {
    /// Optional rendering behaviors.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct ParserFeature: u32 {
        /// Leave tags with no registered handler as written instead of failing.
        const PASS_UNKNOWN_TAGS = 1 << 0;
        /// HTML-escape attribute values before handlers see them. Needs the `escape` feature.
        const ESCAPE_ATTRIBUTES = 1 << 1;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    pub feature_flags: ParserFeature,
    /// Passes allowed before rendering is abandoned with [`Error::IterationLimit`].
    pub max_passes: usize,
}

impl ParserConfig {
    pub const DEFAULT_MAX_PASSES: usize = 64;
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            feature_flags: ParserFeature::default(),
            max_passes: Self::DEFAULT_MAX_PASSES,
        }
    }
}

/// Render `text` with the handlers in `registry`.
///
/// Fails on the first handler error, on a tag with no handler (unless
/// [`ParserFeature::PASS_UNKNOWN_TAGS`] is set), or when the text is still changing after
/// `config.max_passes` passes. Text without a `[` is returned as is.
pub fn render(
    text: &str,
    registry: &TagRegistry,
    context: &RenderContext,
    config: &ParserConfig,
) -> Result<String> {
    if !text.contains('[') {
        return Ok(text.to_owned());
    }

    let mut working = text.to_owned();
    let mut shelter = Shelter::default();

    for pass in 1..=config.max_passes {
        for entry in registry
            .iter()
            .filter(|e| e.flags().contains(TagFlags::NO_PARSE))
        {
            shelter.protect(&mut working, entry.name(), |span| {
                entry
                    .handler()
                    .render(span, &attributes_for(span.attributes, config), context)
            })?;
        }

        check_unknown_tags(&working, registry, config)?;

        let mut substitutions = 0;
        for entry in registry
            .iter()
            .filter(|e| !e.flags().contains(TagFlags::NO_PARSE))
        {
            substitutions += substitute(&mut working, entry, context, config)?;
        }

        tracing::debug!(pass, substitutions, "Render pass finished");

        if substitutions == 0 {
            return Ok(if shelter.is_empty() {
                working
            } else {
                shelter.restore(working)
            });
        }
    }

    Err(Error::IterationLimit {
        limit: config.max_passes,
    })
}

fn attributes_for(raw: &str, config: &ParserConfig) -> AttributeMap {
    let attributes = AttributeMap::parse(raw);

    #[cfg(feature = "escape")]
    if config.feature_flags.contains(ParserFeature::ESCAPE_ATTRIBUTES) {
        return attributes.escaped();
    }
    #[cfg(not(feature = "escape"))]
    let _ = config;

    attributes
}

fn check_unknown_tags(text: &str, registry: &TagRegistry, config: &ParserConfig) -> Result<()> {
    for name in closed_tag_names(text) {
        if registry.contains(&name) {
            continue;
        }

        if config
            .feature_flags
            .contains(ParserFeature::PASS_UNKNOWN_TAGS)
        {
            tracing::debug!(tag = %name, "Leaving unknown tag as written");
            continue;
        }

        return Err(Error::UnknownTag { tag: name });
    }

    Ok(())
}

/// Replace every `entry` span in `text`, scanning left to right. Output is not rescanned until
/// the next pass. Returns the number of spans that changed.
fn substitute(
    text: &mut String,
    entry: &TagEntry,
    context: &RenderContext,
    config: &ParserConfig,
) -> Result<usize> {
    let mut count = 0;
    let mut cursor = 0;

    while let Some(span) = find_tag_from(text.as_str(), entry.name(), cursor) {
        let start = span.start;
        let end = span.end();

        let attributes = attributes_for(span.attributes, config);
        let html = entry.handler().render(&span, &attributes, context)?;

        if html == span.raw {
            // Declined; look for the next opening tag inside or after this one.
            cursor = start + 1;
            continue;
        }

        tracing::trace!(tag = entry.name(), start, "Substituted tag");
        text.replace_range(start..end, &html);
        cursor = start + html.len();
        count += 1;
    }

    Ok(count)
}

/// Renders BBCode with the built-in tags plus any registered through [`Parser::extend`].
#[derive(Debug)]
pub struct Parser {
    registry: TagRegistry,
    context: RenderContext,
    config: ParserConfig,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new(RenderContext::default())
    }
}

impl Parser {
    /// Construct a parser with every built-in tag.
    pub fn new(context: RenderContext) -> Self {
        Self::with_config(context, ParserConfig::default())
    }

    pub fn with_config(context: RenderContext, config: ParserConfig) -> Self {
        Self {
            registry: TagRegistry::with_builtins(),
            context,
            config,
        }
    }

    /// Construct a parser with no tags at all.
    pub fn empty(context: RenderContext) -> Self {
        Self {
            registry: TagRegistry::empty(),
            context,
            config: ParserConfig::default(),
        }
    }

    /// Register an inline render function `(raw span, attributes, content) -> html` for `name`.
    /// # Remarks
    /// Custom tags run after the built-ins in each pass. Reusing a built-in name replaces the
    /// built-in handler in its original position.
    pub fn extend<F>(&mut self, name: &str, f: F) -> &mut Self
    where
        F: Fn(&str, &AttributeMap, &str) -> String + Send + Sync + 'static,
    {
        self.registry.register_fn(name, f);
        self
    }

    /// Register the `T` handler family member for `name`.
    pub fn extend_with<T: NamedTag>(&mut self, name: &str) -> &mut Self {
        self.registry.register_named::<T>(name);
        self
    }

    pub fn extend_handler(&mut self, name: &str, handler: Handler) -> &mut Self {
        self.registry.register(name, handler);
        self
    }

    pub fn registry(&self) -> &TagRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut TagRegistry {
        &mut self.registry
    }

    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Render `text` to HTML.
    pub fn parse(&self, text: &str) -> Result<String> {
        render(text, &self.registry, &self.context, &self.config)
    }
}
