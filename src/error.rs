/// Failure raised while rendering; any of these aborts the whole parse.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A closed tag pair whose name has no registered handler.
    #[error("no handler registered for tag `{tag}`")]
    UnknownTag { tag: String },

    /// A handler required a positional attribute that was absent or blank.
    #[error("tag `{tag}` requires an attribute")]
    MissingAttribute { tag: String },

    /// A handler required a URL template the render context does not define.
    #[error("tag `{tag}` requires the `{key}` URL template")]
    MissingUrlTemplate { tag: String, key: String },

    /// Substitution kept producing changes past the configured pass limit.
    #[error("rendering did not settle within {limit} passes")]
    IterationLimit { limit: usize },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
