use thiserror::Error;

/// Errors raised while turning manifest text into a resolved segment plan.
///
/// Structural problems inside a well-formed MPD are not errors: they show up as
/// unsupported representations in the expansion or as validator diagnostics.
#[derive(Error, Debug)]
pub enum DashError {
    /// The document is not well-formed XML.
    #[error("XML syntax error: {0}")]
    Syntax(String),

    /// The document holds no element at all.
    #[error("document has no root element")]
    NoRoot,

    /// Elements are nested deeper than the parser allows.
    #[error("elements nested deeper than {0} levels")]
    TooDeep(usize),

    /// The root element is something other than `<MPD>`.
    #[error("root element is <{0}>, expected <MPD>")]
    UnexpectedRoot(String),

    /// A base or segment URL could not be resolved.
    #[error("invalid URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

impl DashError {
    /// Whether this error means the text could not be parsed as XML at all.
    pub fn is_syntax(&self) -> bool {
        matches!(self, DashError::Syntax(_) | DashError::NoRoot | DashError::TooDeep(_))
    }
}
