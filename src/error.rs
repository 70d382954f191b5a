//! Error types for the importer and the XMP writer

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The export document could not be opened or read
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The export document is not well-formed XML
    #[error("malformed document at byte {position}: {source}")]
    Xml {
        position: u64,
        #[source]
        source: quick_xml::Error,
    },

    /// Writing an XMP packet failed
    #[error("cannot serialize XMP packet: {0}")]
    Serialize(#[from] std::io::Error),

    /// Writing an XMP event failed
    #[error("cannot write XMP packet: {0}")]
    Writer(#[from] quick_xml::Error),

    /// Serialized packet is not valid UTF-8
    #[error("serialized XMP packet is not UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

pub type Result<T> = std::result::Result<T, Error>;
