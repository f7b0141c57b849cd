//! Character encoding detection for text files.
//!
//! A [`Resolver`] answers "which encoding is this stream in" by asking three
//! layers in order and taking the first answer:
//!
//! 1. a detector registered for the exact MIME type, such as the coding
//!    declaration of a Python source file
//! 2. a statistical charset sniffer
//! 3. trial decoding with a list of candidate encodings, ending in a fixed
//!    fallback name
//!
//! Detection never fails, the stream is always rewound to its start afterwards
//! so it can be read again with the encoding found.

pub(crate) mod coding;
pub(crate) mod document;
pub(crate) mod error;
pub(crate) mod label;
pub(crate) mod mime;
pub(crate) mod options;
pub(crate) mod registry;
pub(crate) mod resolver;
pub(crate) mod sniff;
pub(crate) mod trial;

use std::io::{Read, Seek};

pub use coding::coding_declaration;
pub use document::*;
pub use error::*;
pub use label::lookup;
pub use mime::*;
pub use options::*;
pub use registry::*;
pub use resolver::*;

/// A readable and seekable byte stream, the input of every detector.
pub trait Source: Read + Seek {}

impl<T: Read + Seek + ?Sized> Source for T {}
