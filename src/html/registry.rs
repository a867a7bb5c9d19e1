//! Tag name to handler table.
use std::collections::HashMap;
use std::fmt;

use bitflags::bitflags;
use static_assertions::{assert_impl_all, assert_obj_safe};

use crate::{AttributeMap, RenderContext, Result, TagSpan};

/// The primary trait for turning one tag occurrence into HTML.
pub trait TagHandler: Send + Sync {
    /// Render `tag` to HTML.
    /// # Remarks
    /// Returning `tag.raw` unchanged declines the span: it stays in the text as written and does
    /// not count as a substitution.
    fn render(
        &self,
        tag: &TagSpan<'_>,
        attributes: &AttributeMap,
        context: &RenderContext,
    ) -> Result<String>;
}

assert_obj_safe!(TagHandler);

/// A handler type that serves a family of tag names, built once per name it is registered under.
pub trait NamedTag: TagHandler + Sized + 'static {
    fn for_tag(name: &str) -> Self;
}

/// Inline render function taking `(raw span, attributes, content)`.
pub type RenderFn = dyn Fn(&str, &AttributeMap, &str) -> String + Send + Sync;

/// A registered render behavior.
pub enum Handler {
    Function(Box<RenderFn>),
    Object(Box<dyn TagHandler>),
}

impl Handler {
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(&str, &AttributeMap, &str) -> String + Send + Sync + 'static,
    {
        Self::Function(Box::new(f))
    }

    pub fn object<T: TagHandler + 'static>(handler: T) -> Self {
        Self::Object(Box::new(handler))
    }

    /// Instantiate the `T` family member for `name`.
    pub fn named<T: NamedTag>(name: &str) -> Self {
        Self::object(T::for_tag(name))
    }

    pub fn render(
        &self,
        tag: &TagSpan<'_>,
        attributes: &AttributeMap,
        context: &RenderContext,
    ) -> Result<String> {
        match self {
            Self::Function(f) => Ok(f(tag.raw, attributes, tag.content)),
            Self::Object(h) => h.render(tag, attributes, context),
        }
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Function(_) => f.write_str("Handler::Function"),
            Self::Object(_) => f.write_str("Handler::Object"),
        }
    }
}

bitflags! {
    /// Properties of a registry entry.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct TagFlags: u32 {
        /// Registered by [`TagRegistry::with_builtins`].
        const BUILTIN = 1 << 0;
        /// Content is never parsed; the rendered output is inserted verbatim after all passes.
        const NO_PARSE = 1 << 1;
    }
}

#[derive(Debug)]
pub struct TagEntry {
    name: String,
    handler: Handler,
    flags: TagFlags,
}

impl TagEntry {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn handler(&self) -> &Handler {
        &self.handler
    }

    pub fn flags(&self) -> TagFlags {
        self.flags
    }
}

/// Ordered table of tag handlers. Iteration follows registration order.
#[derive(Debug, Default)]
pub struct TagRegistry {
    entries: Vec<TagEntry>,
    index: HashMap<String, usize>,
}

assert_impl_all!(TagRegistry: Send, Sync);

impl TagRegistry {
    /// Construct a registry with no tags.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Construct a registry holding every built-in tag.
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        super::builtins::install(&mut registry);
        registry
    }

    /// Register `handler` under `name`.
    /// # Remarks
    /// Names are case-insensitive. Registering a name that already exists, built-in or not,
    /// replaces its handler but keeps its position in pass order.
    pub fn register(&mut self, name: &str, handler: Handler) -> &mut Self {
        self.register_with_flags(name, handler, TagFlags::empty())
    }

    pub fn register_with_flags(
        &mut self,
        name: &str,
        handler: Handler,
        flags: TagFlags,
    ) -> &mut Self {
        let name = name.to_ascii_lowercase();

        if let Some(&idx) = self.index.get(&name) {
            tracing::debug!(tag = %name, "Replacing registered tag handler");
            self.entries[idx] = TagEntry {
                name,
                handler,
                flags,
            };
        } else {
            self.index.insert(name.clone(), self.entries.len());
            self.entries.push(TagEntry {
                name,
                handler,
                flags,
            });
        }

        self
    }

    /// Register an inline render function under `name`.
    pub fn register_fn<F>(&mut self, name: &str, f: F) -> &mut Self
    where
        F: Fn(&str, &AttributeMap, &str) -> String + Send + Sync + 'static,
    {
        self.register(name, Handler::function(f))
    }

    /// Register the `T` family member for `name`.
    pub fn register_named<T: NamedTag>(&mut self, name: &str) -> &mut Self {
        self.register(name, Handler::named::<T>(name))
    }

    /// Attempt to locate the entry for the given tag, if one exists.
    pub fn resolve(&self, name: &str) -> Option<&TagEntry> {
        let idx = match self.index.get(name) {
            Some(idx) => *idx,
            None => *self.index.get(&name.to_ascii_lowercase())?,
        };

        Some(&self.entries[idx])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TagEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    impl TagHandler for Echo {
        fn render(&self, tag: &TagSpan<'_>, _: &AttributeMap, _: &RenderContext) -> Result<String> {
            Ok(tag.content.to_owned())
        }
    }

    #[test]
    fn registration_order_is_kept() {
        let mut registry = TagRegistry::empty();
        registry
            .register_fn("zeta", |_, _, c| c.to_owned())
            .register("Alpha", Handler::object(Echo))
            .register_fn("mid", |_, _, c| c.to_owned());

        let names: Vec<_> = registry.iter().map(TagEntry::name).collect();
        assert_eq!(names, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn resolve_ignores_case() {
        let mut registry = TagRegistry::empty();
        registry.register("Foo", Handler::object(Echo));

        assert!(registry.contains("foo"));
        assert!(registry.contains("FOO"));
        assert!(!registry.contains("bar"));
    }

    #[test]
    fn replacing_keeps_position() {
        let mut registry = TagRegistry::empty();
        registry
            .register_fn("a", |_, _, _| "first".into())
            .register_fn("b", |_, _, _| "b".into())
            .register_fn("a", |_, _, _| "second".into());

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.iter().next().unwrap().name(), "a");

        let span = crate::find_tag("[a]x[/a]", "a").unwrap();
        let out = registry
            .resolve("a")
            .unwrap()
            .handler()
            .render(&span, &AttributeMap::default(), &RenderContext::new())
            .unwrap();
        assert_eq!(out, "second");
    }

    #[test]
    fn builtins_come_flagged() {
        let registry = TagRegistry::with_builtins();
        assert!(registry.iter().all(|e| e.flags().contains(TagFlags::BUILTIN)));
        assert!(registry
            .resolve("noparse")
            .unwrap()
            .flags()
            .contains(TagFlags::NO_PARSE));
        assert!(!registry.resolve("b").unwrap().flags().contains(TagFlags::NO_PARSE));
    }
}
