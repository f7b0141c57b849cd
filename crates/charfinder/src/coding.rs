use std::{
    io::{BufRead, BufReader},
    path::Path,
    sync::OnceLock,
};

use regex::bytes::Regex;

use crate::{Error, MimeType, Source};

/// How many lines from the start may hold a coding declaration.
const DECLARATION_LINES: usize = 2;

fn declaration() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"coding: ([\w-]+)").ok())
        .as_ref()
}

/// Finds a `coding: <name>` declaration on the first or second line of a
/// source file and returns the name as written.
pub fn coding_declaration(
    stream: &mut dyn Source,
    _filename: Option<&Path>,
    _mime: &MimeType,
) -> Result<Option<String>, Error> {
    let Some(pattern) = declaration() else {
        return Ok(None);
    };

    let mut reader = BufReader::new(stream);
    let mut line = Vec::new();

    for _ in 0..DECLARATION_LINES {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            break;
        }

        if let Some(name) = pattern.captures(&line).and_then(|caps| caps.get(1)) {
            let name = String::from_utf8_lossy(name.as_bytes()).into_owned();
            return Ok(Some(name));
        }
    }

    Ok(None)
}
