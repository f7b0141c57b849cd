use std::path::Path;

use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::Error;

/// Where trial decoding reads the content it decodes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrialSource {
    /// Re-read the named file, the stream is used only when there is no
    /// readable file.
    #[default]
    File,

    /// Always read the stream given to the resolver.
    Stream,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Encodings tried in order by trial decoding
    pub candidates: Vec<String>,

    /// Name returned when no candidate decodes the content. This is a last
    /// resort and says nothing about the actual content.
    pub fallback: String,

    /// Whether to use the statistical sniffer, if it is compiled in
    pub sniff: bool,

    /// Bytes read at a time while sniffing
    pub chunk_size: usize,

    /// Maximum number of bytes the sniffer looks at
    pub sniff_limit: u64,

    pub trial_source: TrialSource,

    /// Mime types that are text even though their major type is not `text`
    pub text_mime: Vec<String>,

    /// Mime type to glob patterns, used to guess the mime type of a path
    #[serde(rename = "mime")]
    pub mime_patterns: FxHashMap<String, Vec<String>>,
}

impl Default for Options {
    fn default() -> Self {
        let mut mime_patterns = FxHashMap::default();
        mime_patterns.insert(
            "text/x-python".to_string(),
            vec!["*.py".to_string(), "*.pyw".to_string()],
        );

        Options {
            candidates: vec![
                "utf-8".to_string(),
                "iso-8859-15".to_string(),
                "windows-1252".to_string(),
            ],
            fallback: "ascii".to_string(),
            sniff: true,
            chunk_size: 4096,
            sniff_limit: 64 * 1024,
            trial_source: TrialSource::default(),
            text_mime: vec![],
            mime_patterns,
        }
    }
}

/// Read options from a configuration file, missing keys use defaults.
pub fn read_options(config_path: &Path) -> Result<Options, Error> {
    let config = config::Config::builder()
        .add_source(config::File::from(config_path))
        .build()?;

    let options = config.try_deserialize::<Options>()?;

    Ok(options)
}

#[cfg(test)]
mod test {
    use std::fs;

    use super::*;

    #[test]
    fn defaults() {
        let opts = Options::default();
        assert_eq!(opts.candidates, ["utf-8", "iso-8859-15", "windows-1252"]);
        assert_eq!(opts.fallback, "ascii");
        assert_eq!(opts.chunk_size, 4096);
        assert_eq!(opts.trial_source, TrialSource::File);
        assert!(opts.mime_patterns.contains_key("text/x-python"));
    }

    #[test]
    fn read_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("charfinder.toml");
        fs::write(
            &path,
            r#"
candidates = ["utf-8", "koi8-r"]
sniff = false
trial_source = "stream"
text_mime = ["application/json"]

[mime]
"text/x-rst" = ["*.rst"]
"#,
        )
        .unwrap();

        let opts = read_options(&path).unwrap();
        assert_eq!(opts.candidates, ["utf-8", "koi8-r"]);
        assert!(!opts.sniff);
        assert_eq!(opts.trial_source, TrialSource::Stream);
        assert_eq!(opts.text_mime, ["application/json"]);
        assert_eq!(opts.mime_patterns["text/x-rst"], ["*.rst"]);
        assert_eq!(opts.fallback, "ascii");
        assert_eq!(opts.chunk_size, 4096);
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");
        assert!(matches!(read_options(&path), Err(Error::Config(_))));
    }
}
