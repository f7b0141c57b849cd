use std::{fmt, path::Path};

use rustc_hash::FxHashMap;

use crate::{coding_declaration, Error, MimeType, Source};

/// Detector for a single mime type. Returns `None` when it has no opinion.
pub type DetectFn =
    fn(&mut dyn Source, Option<&Path>, &MimeType) -> Result<Option<String>, Error>;

/// Mime type specific detectors. Immutable once built.
#[derive(Clone)]
pub struct Registry {
    detectors: FxHashMap<MimeType, DetectFn>,
}

impl Registry {
    /// Registry without any detectors
    pub fn empty() -> Registry {
        Registry {
            detectors: FxHashMap::default(),
        }
    }

    pub fn builder() -> RegistryBuilder {
        RegistryBuilder {
            detectors: FxHashMap::default(),
        }
    }

    pub fn get(&self, mime: &MimeType) -> Option<DetectFn> {
        self.detectors.get(mime).copied()
    }

    pub fn contains(&self, mime: &MimeType) -> bool {
        self.detectors.contains_key(mime)
    }

    pub fn len(&self) -> usize {
        self.detectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detectors.is_empty()
    }

    /// Run the detector registered for `mime`. Unregistered or missing mime
    /// types return `None` without touching the stream.
    pub fn detect_mime(
        &self,
        stream: &mut dyn Source,
        filename: Option<&Path>,
        mime: Option<&MimeType>,
    ) -> Result<Option<String>, Error> {
        let Some(mime) = mime else {
            return Ok(None);
        };
        let Some(detect) = self.get(mime) else {
            return Ok(None);
        };

        detect(stream, filename, mime)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut mimes: Vec<&MimeType> = self.detectors.keys().collect();
        mimes.sort();
        f.debug_struct("Registry").field("detectors", &mimes).finish()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Registry::builder()
            .register(MimeType::new("text", "x-python"), coding_declaration)
            .build()
    }
}

pub struct RegistryBuilder {
    detectors: FxHashMap<MimeType, DetectFn>,
}

impl RegistryBuilder {
    /// Register a detector, replacing any previous one for the same mime type.
    pub fn register(mut self, mime: MimeType, detect: DetectFn) -> RegistryBuilder {
        self.detectors.insert(mime, detect);
        self
    }

    pub fn build(self) -> Registry {
        Registry {
            detectors: self.detectors,
        }
    }
}
