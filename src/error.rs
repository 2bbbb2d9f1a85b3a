use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed url '{input}': {reason}")]
    MalformedUrl { input: String, reason: String },

    #[error("failed to connect to {addr}: {source}")]
    Connection {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to send request: {0}")]
    Write(#[source] io::Error),

    #[error("failed to read response: {0}")]
    Read(#[source] io::Error),

    #[error("failed to write response: {0}")]
    Output(#[source] io::Error),
}

impl Error {
    pub(crate) fn malformed_url<S: ToString>(input: &str, reason: S) -> Self {
        Error::MalformedUrl {
            input: input.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<R> = std::result::Result<R, Error>;
