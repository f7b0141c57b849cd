use encoding_rs::Encoding;

/// Find the encoding for a name as it appears in the wild.
///
/// Tries the name as a WHATWG label first and then the common spellings used
/// by source file declarations, `utf_8` for `utf-8` and `latin-1` for
/// `latin1`.
pub fn lookup(name: &str) -> Option<&'static Encoding> {
    if let Some(enc) = Encoding::for_label(name.as_bytes()) {
        return Some(enc);
    }

    let dashed = name.trim().to_ascii_lowercase().replace('_', "-");
    if let Some(enc) = Encoding::for_label(dashed.as_bytes()) {
        return Some(enc);
    }

    let squashed = dashed.replace('-', "");
    Encoding::for_label(squashed.as_bytes())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn whatwg_labels() {
        assert_eq!(lookup("utf-8"), Some(encoding_rs::UTF_8));
        assert_eq!(lookup("ISO-8859-15"), Some(encoding_rs::ISO_8859_15));
        assert_eq!(lookup("ascii"), Some(encoding_rs::WINDOWS_1252));
    }

    #[test]
    fn declaration_spellings() {
        assert_eq!(lookup("utf_8"), Some(encoding_rs::UTF_8));
        assert_eq!(lookup("latin-1"), Some(encoding_rs::WINDOWS_1252));
        assert_eq!(lookup("Latin_1"), Some(encoding_rs::WINDOWS_1252));
    }

    #[test]
    fn unknown() {
        assert_eq!(lookup("klingon"), None);
        assert_eq!(lookup(""), None);
    }
}
