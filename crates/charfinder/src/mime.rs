use std::{fmt, path::Path, str::FromStr};

use globset::{Glob, GlobSet, GlobSetBuilder};
use rustc_hash::FxHashMap;

use crate::Error;

/// Content type as a `(major, minor)` pair, e.g. `("text", "x-python")`.
#[derive(Debug, Hash, PartialEq, Eq, Ord, PartialOrd, Clone)]
pub struct MimeType {
    major: String,
    minor: String,
}

impl MimeType {
    pub fn new(major: impl Into<String>, minor: impl Into<String>) -> MimeType {
        MimeType {
            major: major.into(),
            minor: minor.into(),
        }
    }

    pub fn major(&self) -> &str {
        &self.major
    }

    pub fn minor(&self) -> &str {
        &self.minor
    }

    pub fn is_text(&self) -> bool {
        self.major == "text"
    }

    /// Guess the mime type of a path using `patterns`, mime type to globs.
    pub fn determine(path: &Path, patterns: &MimePatterns) -> Option<MimeType> {
        patterns.determine(path)
    }
}

impl FromStr for MimeType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.split_once('/') {
            Some((major, minor))
                if !major.is_empty() && !minor.is_empty() && !minor.contains('/') =>
            {
                Ok(MimeType::new(major, minor))
            }
            _ => Err(Error::InvalidMime(s.into())),
        }
    }
}

impl fmt::Display for MimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.major, self.minor)
    }
}

/// Compiled mime type to glob table.
#[derive(Debug, Default, Clone)]
pub struct MimePatterns {
    // Sorted by mime type so guesses do not depend on hash order
    sets: Vec<(MimeType, GlobSet)>,
}

impl MimePatterns {
    pub fn new(patterns: &FxHashMap<String, Vec<String>>) -> Result<MimePatterns, Error> {
        let mut sets = Vec::with_capacity(patterns.len());
        for (mime, globs) in patterns {
            let mime: MimeType = mime.parse()?;
            let mut builder = GlobSetBuilder::new();
            for glob in globs {
                builder.add(Glob::new(glob)?);
            }
            sets.push((mime, builder.build()?));
        }
        sets.sort_by(|(a, _), (b, _)| a.cmp(b));

        Ok(MimePatterns { sets })
    }

    pub fn determine(&self, path: &Path) -> Option<MimeType> {
        self.sets
            .iter()
            .find(|(_, set)| set.is_match(path))
            .map(|(mime, _)| mime.clone())
    }
}

#[cfg(test)]
mod test {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn parse() {
        let mime: MimeType = "text/x-python".parse().unwrap();
        assert_eq!(mime, MimeType::new("text", "x-python"));
        assert_eq!(mime.to_string(), "text/x-python");
        assert!(mime.is_text());

        assert!("text".parse::<MimeType>().is_err());
        assert!("/plain".parse::<MimeType>().is_err());
        assert!("text/".parse::<MimeType>().is_err());
        assert!("a/b/c".parse::<MimeType>().is_err());
    }

    #[test]
    fn determine() {
        let mut table = FxHashMap::default();
        table.insert(
            "text/x-python".to_string(),
            vec!["*.py".to_string(), "*.pyw".to_string()],
        );
        table.insert("text/x-rst".to_string(), vec!["*.rst".to_string()]);
        let patterns = MimePatterns::new(&table).unwrap();

        let python = MimeType::new("text", "x-python");
        assert_eq!(
            MimeType::determine(&PathBuf::from("/src/pida/core/charfinder.py"), &patterns),
            Some(python.clone())
        );
        assert_eq!(
            MimeType::determine(&PathBuf::from("run.pyw"), &patterns),
            Some(python)
        );
        assert_eq!(
            MimeType::determine(&PathBuf::from("README.rst"), &patterns),
            Some(MimeType::new("text", "x-rst"))
        );
        assert_eq!(
            MimeType::determine(&PathBuf::from("Cargo.toml"), &patterns),
            None
        );
    }

    #[test]
    fn bad_patterns() {
        let mut table = FxHashMap::default();
        table.insert("nonsense".to_string(), vec!["*.py".to_string()]);
        assert!(MimePatterns::new(&table).is_err());

        let mut table = FxHashMap::default();
        table.insert("text/plain".to_string(), vec!["a[".to_string()]);
        assert!(matches!(MimePatterns::new(&table), Err(Error::Glob(_))));
    }
}
