use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to parse domain xml at position {position}: {source}")]
    Parse {
        position: usize,
        #[source]
        source: quick_xml::Error,
    },

    #[error("domain xml has no root element")]
    MissingRoot,

    #[error("unexpected root element <{0}>, expected <domain>")]
    UnexpectedRoot(String),

    #[error("closing tag </{0}> has no matching opening tag")]
    UnbalancedEnd(String),

    #[error("domain xml ended before <{0}> was closed")]
    Unterminated(String),

    #[error("failed to serialize domain xml: {0}")]
    Encode(#[source] quick_xml::Error),
}
