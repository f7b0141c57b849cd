use std::{
    io::{self, Read, Seek, SeekFrom, Write},
    path::{Path, PathBuf},
};

use encoding_rs::{CoderResult, Encoding};

use crate::{Detection, Error, Layer};

/// Text file decoded to UTF-8 with the encoding it was detected to be in.
#[derive(Debug, Clone)]
pub struct Document {
    path: PathBuf,
    detection: Detection,
    text: String,
}

impl Document {
    /// Decode the whole stream from its start using the detected encoding.
    ///
    /// Names `encoding_rs` does not know, which a coding declaration may
    /// well contain, are decoded as UTF-8. Malformed sequences are replaced.
    pub(crate) fn decode<R: Read + Seek>(
        path: &Path,
        detection: Detection,
        reader: &mut R,
    ) -> Result<Document, Error> {
        let encoding = detection.encoding().unwrap_or_else(|| {
            log::warn!(
                "Unknown encoding {} for {path:?}, decoding as UTF-8",
                detection.name()
            );
            encoding_rs::UTF_8
        });

        reader.seek(SeekFrom::Start(0))?;
        let mut output = Vec::new();
        decode_to_utf8(reader, encoding, &mut output)?;
        let text = String::from_utf8(output)?;

        Ok(Document {
            path: path.into(),
            detection,
            text,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn encoding(&self) -> &str {
        self.detection.name()
    }

    pub fn layer(&self) -> Layer {
        self.detection.layer()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Lines with their line endings
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.split_inclusive('\n')
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

/// decode a reader to utf8 to a writer, returns bytes read and written
pub(crate) fn decode_to_utf8<R: Read, W: Write>(
    mut reader: R,
    encoding: &'static Encoding,
    writer: &mut W,
) -> io::Result<(usize, usize)> {
    const BUFFER_SIZE: usize = 4096;
    // Buffers to read input and decode to
    let mut buf: [u8; BUFFER_SIZE] = [0; BUFFER_SIZE];
    let mut buf_out: [u8; BUFFER_SIZE] = [0; BUFFER_SIZE];

    // Totals read from the reader and written to the writer
    let mut total_read: usize = 0;
    let mut total_written: usize = 0;

    let mut decoder = encoding.new_decoder();

    loop {
        let buf_read = match reader.read(&mut buf) {
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        // Wether input has ended
        let is_last = buf_read == 0;
        let mut buf_total_read = 0;

        loop {
            let (result, read, written, _) =
                decoder.decode_to_utf8(&buf[buf_total_read..buf_read], &mut buf_out, is_last);
            buf_total_read += read;
            total_read += read;
            writer.write_all(&buf_out[..written])?;
            total_written += written;

            match result {
                CoderResult::InputEmpty => break,
                CoderResult::OutputFull => {}
            }
        }

        if is_last {
            break;
        }
    }

    Ok((total_read, total_written))
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use super::*;

    fn decoded(bytes: &[u8], encoding: &'static Encoding) -> String {
        let mut out = Vec::new();
        let (read, written) = decode_to_utf8(bytes, encoding, &mut out).unwrap();
        assert_eq!(read, bytes.len());
        assert_eq!(written, out.len());
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn latin9() {
        assert_eq!(
            decoded(b"p\xe4iv\xe4\xe4 \xa4", encoding_rs::ISO_8859_15),
            "päivää €"
        );
    }

    #[test]
    fn larger_than_buffers() {
        let text = "äöå€".repeat(3000);
        let (latin, _, _) = encoding_rs::WINDOWS_1252.encode(&text);
        assert_eq!(decoded(&latin, encoding_rs::WINDOWS_1252), text);
        assert_eq!(decoded(text.as_bytes(), encoding_rs::UTF_8), text);
    }

    #[test]
    fn malformed_replaced() {
        assert_eq!(decoded(b"ok\xff", encoding_rs::UTF_8), "ok\u{FFFD}");
    }

    #[test]
    fn unknown_name_as_utf8() {
        let mut stream = Cursor::new("fine\nlines\n".as_bytes().to_vec());
        stream.set_position(4);
        let detection = Detection::new("martian", Layer::Mime);
        let doc = Document::decode(Path::new("x.py"), detection, &mut stream).unwrap();
        assert_eq!(doc.text(), "fine\nlines\n");
        assert_eq!(doc.encoding(), "martian");
        assert_eq!(doc.lines().collect::<Vec<_>>(), ["fine\n", "lines\n"]);
    }
}
