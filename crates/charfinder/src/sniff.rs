use crate::{Error, Options, Source};

/// Statistical charset sniffer. When the engine is not compiled in, or is
/// turned off, this is a sniffer that never has an answer.
#[derive(Debug, Clone)]
pub(crate) enum Sniffer {
    #[cfg(feature = "chardet")]
    Chardet { chunk_size: usize, limit: u64 },
    Disabled,
}

impl Sniffer {
    pub fn new(options: &Options) -> Sniffer {
        if !options.sniff {
            return Sniffer::Disabled;
        }

        engine(options).unwrap_or(Sniffer::Disabled)
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self, Sniffer::Disabled)
    }

    /// Feed the stream to the engine chunk by chunk and return its guess in
    /// lowercase. Empty streams return `None`, pure ASCII ones `ascii`.
    #[cfg_attr(not(feature = "chardet"), allow(unused_variables))]
    pub fn chardet_sniff(&self, stream: &mut dyn Source) -> Result<Option<String>, Error> {
        match self {
            #[cfg(feature = "chardet")]
            Sniffer::Chardet { chunk_size, limit } => chardet(stream, *chunk_size, *limit),
            Sniffer::Disabled => Ok(None),
        }
    }
}

#[cfg(feature = "chardet")]
fn engine(options: &Options) -> Option<Sniffer> {
    Some(Sniffer::Chardet {
        chunk_size: options.chunk_size.max(1),
        limit: options.sniff_limit,
    })
}

#[cfg(not(feature = "chardet"))]
fn engine(_options: &Options) -> Option<Sniffer> {
    None
}

#[cfg(feature = "chardet")]
const ASCII: &str = "ascii";

#[cfg(feature = "chardet")]
fn chardet(
    stream: &mut dyn Source,
    chunk_size: usize,
    limit: u64,
) -> Result<Option<String>, Error> {
    use std::io::ErrorKind;

    let mut detector = chardetng::EncodingDetector::new();
    let mut chunk = vec![0u8; chunk_size];
    let mut fed: u64 = 0;
    let mut non_ascii = false;

    // Stop feeding once the limit is reached, the guess is settled by then
    while fed < limit {
        let read = match stream.read(&mut chunk) {
            Ok(read) => read,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };

        if read == 0 {
            // Only tell the detector the input ended if it actually did, a
            // truncated multibyte sequence at the limit is not an error.
            detector.feed(&[], true);
            break;
        }

        non_ascii |= detector.feed(&chunk[..read], false);
        fed += read as u64;
    }

    if fed == 0 {
        return Ok(None);
    }

    // The engine would guess windows-1252 without any evidence
    if !non_ascii {
        return Ok(Some(ASCII.to_string()));
    }

    let encoding = detector.guess(None, true);
    log::debug!("chardetng guessed {} after {fed} bytes", encoding.name());
    Ok(Some(encoding.name().to_ascii_lowercase()))
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use super::*;

    fn sniffer() -> Sniffer {
        Sniffer::new(&Options::default())
    }

    fn sniff(sniffer: &Sniffer, bytes: &[u8]) -> Option<String> {
        let mut stream = Cursor::new(bytes.to_vec());
        sniffer.chardet_sniff(&mut stream).unwrap()
    }

    #[test]
    fn disabled_never_answers() {
        let opts = Options {
            sniff: false,
            ..Options::default()
        };
        let sniffer = Sniffer::new(&opts);
        assert!(!sniffer.is_enabled());
        assert_eq!(sniff(&sniffer, "päivää".as_bytes()), None);
    }

    #[test]
    fn empty() {
        let sniffer = sniffer();
        assert_eq!(sniff(&sniffer, b""), None);
    }

    #[cfg(feature = "chardet")]
    #[test]
    fn ascii() {
        let sniffer = sniffer();
        assert_eq!(
            sniff(&sniffer, b"print('hello')\n").as_deref(),
            Some("ascii")
        );
    }

    #[cfg(feature = "chardet")]
    #[test]
    fn utf8() {
        let sniffer = sniffer();
        assert!(sniffer.is_enabled());
        let text = "Hyvää päivää, näin käy äänestäjälle. Ελληνικά κείμενα εδώ.\n".repeat(20);
        assert_eq!(sniff(&sniffer, text.as_bytes()).as_deref(), Some("utf-8"));
    }

    #[cfg(feature = "chardet")]
    #[test]
    fn small_chunks() {
        let opts = Options {
            chunk_size: 3,
            ..Options::default()
        };
        let sniffer = Sniffer::new(&opts);
        let text = "Grüße aus Köln, schöne Größe.\n".repeat(10);
        assert_eq!(sniff(&sniffer, text.as_bytes()).as_deref(), Some("utf-8"));
    }
}
