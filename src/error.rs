use thiserror::Error;

use crate::endpoint::TransportError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// File operation incompatible with the handle's access mode.
    #[error("mode error: {0}")]
    Mode(String),

    /// Open mode string that names no access mode, or requests combined
    /// read/write access.
    #[error("invalid open mode: {0}")]
    InvalidMode(String),

    /// The backend rejected an upload.
    #[error("got status code {status} while sending to {url}")]
    Save { status: u16, url: String },

    /// The backend rejected a download.
    #[error("got status code {status} while reading {url}")]
    Read { status: u16, url: String },

    /// The operation is not part of the adapter's minimal protocol.
    #[error("`{0}` is not supported by the elliptics backend")]
    Unsupported(&'static str),

    /// Operation needs a buffer the handle has not materialized yet.
    #[error("`{0}` called before the handle buffered any data")]
    Uninitialized(&'static str),

    /// Connection-level failure, passed through untranslated.
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
