use std::{
    fs,
    io::{Read, Seek, SeekFrom},
    path::Path,
};

use rustc_hash::FxHashSet;
use strum_macros::{AsRefStr, Display};

use crate::{
    document::Document, lookup, sniff::Sniffer, trial::Trial, Error, MimePatterns, MimeType,
    Options, Registry, Source,
};

/// The detection layer that produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Layer {
    Mime,
    Sniff,
    Trial,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    name: String,
    layer: Layer,
}

impl Detection {
    pub(crate) fn new(name: impl Into<String>, layer: Layer) -> Detection {
        Detection {
            name: name.into(),
            layer,
        }
    }

    /// Encoding name as reported by the layer
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn layer(&self) -> Layer {
        self.layer
    }

    /// The encoding this name refers to, if it is one `encoding_rs` knows
    pub fn encoding(&self) -> Option<&'static encoding_rs::Encoding> {
        lookup(&self.name)
    }

    pub fn into_name(self) -> String {
        self.name
    }
}

/// Resolves the encoding of a stream. Built once from [`Options`] and
/// read-only afterwards, so one resolver can be shared between threads.
#[derive(Debug, Clone)]
pub struct Resolver {
    registry: Registry,
    sniffer: Sniffer,
    trial: Trial,
    text_mime: FxHashSet<MimeType>,
    patterns: MimePatterns,
}

impl Resolver {
    pub fn new(options: &Options) -> Result<Resolver, Error> {
        Resolver::with_registry(options, Registry::default())
    }

    pub fn with_registry(options: &Options, registry: Registry) -> Result<Resolver, Error> {
        let text_mime = options
            .text_mime
            .iter()
            .map(|mime| mime.parse::<MimeType>())
            .collect::<Result<FxHashSet<_>, _>>()?;
        let sniffer = Sniffer::new(options);
        log::debug!(
            "Resolver: {} mime detectors, sniffer enabled: {}",
            registry.len(),
            sniffer.is_enabled()
        );

        Ok(Resolver {
            registry,
            sniffer,
            trial: Trial::new(options)?,
            text_mime,
            patterns: MimePatterns::new(&options.mime_patterns)?,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Detect the encoding of `stream`, never fails.
    ///
    /// The layers are asked in order: the mime type specific detector, the
    /// statistical sniffer and finally trial decoding. The stream is rewound
    /// to the start after every layer.
    pub fn detect<S: Read + Seek>(
        &self,
        stream: &mut S,
        filename: Option<&Path>,
        mime: Option<&MimeType>,
    ) -> Detection {
        self.detect_source(stream, filename, mime)
    }

    /// Encoding name of `stream`, see [`Resolver::detect`].
    pub fn detect_encoding<S: Read + Seek>(
        &self,
        stream: &mut S,
        filename: Option<&Path>,
        mime: Option<&MimeType>,
    ) -> String {
        self.detect(stream, filename, mime).into_name()
    }

    fn detect_source(
        &self,
        stream: &mut dyn Source,
        filename: Option<&Path>,
        mime: Option<&MimeType>,
    ) -> Detection {
        let found = self.registry.detect_mime(stream, filename, mime);
        rewind(stream);
        if let Some(name) = settle(Layer::Mime, found) {
            return Detection::new(name, Layer::Mime);
        }

        let found = self.sniffer.chardet_sniff(stream);
        rewind(stream);
        if let Some(name) = settle(Layer::Sniff, found) {
            return Detection::new(name, Layer::Sniff);
        }

        let detection = self.trial.dumb_detect(stream, filename);
        rewind(stream);
        log::debug!(
            "{} layer answered {} for {filename:?}",
            detection.layer(),
            detection.name()
        );
        detection
    }

    /// Mime type layer alone. Leaves the stream where the detector left it.
    pub fn detect_mime<S: Read + Seek>(
        &self,
        stream: &mut S,
        filename: Option<&Path>,
        mime: Option<&MimeType>,
    ) -> Option<String> {
        let found = self.registry.detect_mime(stream, filename, mime);
        settle(Layer::Mime, found)
    }

    /// Statistical sniffer layer alone. Leaves the stream where the sniffer
    /// stopped reading.
    pub fn chardet_sniff<S: Read + Seek>(&self, stream: &mut S) -> Option<String> {
        let found = self.sniffer.chardet_sniff(stream);
        settle(Layer::Sniff, found)
    }

    /// Trial decoding layer alone, always has an answer.
    pub fn dumb_detect<S: Read + Seek>(&self, stream: &mut S, filename: Option<&Path>) -> String {
        self.trial.dumb_detect(stream, filename).into_name()
    }

    /// Whether the input is text. Text mime types are taken at their word,
    /// otherwise the content has to decode with one of the candidates.
    pub fn detect_text<S: Read + Seek>(
        &self,
        stream: &mut S,
        filename: Option<&Path>,
        mime: Option<&MimeType>,
    ) -> bool {
        if let Some(mime) = mime {
            if mime.is_text() || self.text_mime.contains(mime) {
                return true;
            }
        }

        let text = self.trial.decodes_any(stream, filename);
        rewind(stream);
        text
    }

    /// Guess the mime type of a path from the configured patterns
    pub fn guess_mime(&self, path: &Path) -> Option<MimeType> {
        MimeType::determine(path, &self.patterns)
    }

    /// Read a file, detect its encoding and decode it to UTF-8.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Document, Error> {
        self.load_as(path, None)
    }

    /// Like [`Resolver::load`], but with a known mime type. The mime type is
    /// guessed from the path when `mime` is `None`.
    pub fn load_as(
        &self,
        path: impl AsRef<Path>,
        mime: Option<&MimeType>,
    ) -> Result<Document, Error> {
        let path = path.as_ref();
        let mut file = fs::File::open(path)?;
        let guessed = self.guess_mime(path);
        let mime = mime.or(guessed.as_ref());
        let detection = self.detect(&mut file, Some(path), mime);
        log::info!(
            "Loading {path:?} as {} ({})",
            detection.name(),
            detection.layer()
        );

        Document::decode(path, detection, &mut file)
    }
}

/// Layer errors are not fatal, they only mean the layer has no answer.
/// Empty names are not answers either.
fn settle(layer: Layer, found: Result<Option<String>, Error>) -> Option<String> {
    match found {
        Ok(Some(name)) if !name.trim().is_empty() => Some(name),
        Ok(_) => None,
        Err(e) => {
            log::debug!("{layer} layer failed: {e}");
            None
        }
    }
}

fn rewind(stream: &mut dyn Source) {
    if let Err(e) = stream.seek(SeekFrom::Start(0)) {
        log::debug!("Failed to rewind stream: {e}");
    }
}
