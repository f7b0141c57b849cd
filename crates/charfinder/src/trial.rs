use std::{
    fs,
    io::SeekFrom,
    path::Path,
};

use encoding_rs::Encoding;

use crate::{lookup, Detection, Error, Layer, Options, Source, TrialSource};

/// Trial decoding with a fixed, ordered list of candidate encodings.
#[derive(Debug, Clone)]
pub(crate) struct Trial {
    candidates: Vec<(String, &'static Encoding)>,
    fallback: String,
    source: TrialSource,
}

impl Trial {
    pub fn new(options: &Options) -> Result<Trial, Error> {
        let mut candidates = Vec::with_capacity(options.candidates.len());
        for label in &options.candidates {
            let encoding =
                lookup(label).ok_or_else(|| Error::UnknownEncoding(label.to_string()))?;
            candidates.push((label.to_string(), encoding));
        }

        if options.fallback.trim().is_empty() {
            return Err(Error::UnknownEncoding(options.fallback.clone()));
        }

        Ok(Trial {
            candidates,
            fallback: options.fallback.clone(),
            source: options.trial_source,
        })
    }

    /// Returns the first candidate that decodes the whole content, or the
    /// fallback name if none do or the content cannot be read.
    pub fn dumb_detect(&self, stream: &mut dyn Source, filename: Option<&Path>) -> Detection {
        let found = self
            .content(stream, filename)
            .map(|bytes| self.first_decoding(&bytes).map(String::from));

        match found {
            Ok(Some(name)) => Detection::new(name, Layer::Trial),
            Ok(None) => Detection::new(self.fallback.clone(), Layer::Fallback),
            Err(e) => {
                log::debug!("Trial decoding could not read content: {e}");
                Detection::new(self.fallback.clone(), Layer::Fallback)
            }
        }
    }

    /// Whether any candidate decodes the content. The fallback does not count.
    pub fn decodes_any(&self, stream: &mut dyn Source, filename: Option<&Path>) -> bool {
        match self.content(stream, filename) {
            Ok(bytes) => self.first_decoding(&bytes).is_some(),
            Err(e) => {
                log::debug!("Trial decoding could not read content: {e}");
                false
            }
        }
    }

    pub fn first_decoding(&self, bytes: &[u8]) -> Option<&str> {
        self.candidates
            .iter()
            .find(|(_, encoding)| decodes(*encoding, bytes))
            .map(|(label, _)| label.as_str())
    }

    /// Content to decode. The named file wins over the stream unless
    /// configured otherwise, the stream is used when there is no readable
    /// file.
    fn content(
        &self,
        stream: &mut dyn Source,
        filename: Option<&Path>,
    ) -> Result<Vec<u8>, Error> {
        if self.source == TrialSource::File {
            if let Some(path) = filename {
                match fs::read(path) {
                    Ok(bytes) => return Ok(bytes),
                    Err(e) => {
                        log::warn!("Failed to read {path:?} for trial decoding, using stream: {e}")
                    }
                }
            }
        }

        let mut bytes = vec![];
        stream.seek(SeekFrom::Start(0))?;
        stream.read_to_end(&mut bytes)?;
        Ok(bytes)
    }
}

/// Strict decode, any malformed sequence rejects the encoding.
fn decodes(encoding: &'static Encoding, bytes: &[u8]) -> bool {
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .is_some()
}
