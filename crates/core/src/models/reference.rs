//! Verse and chapter references in their `book:chapter[:verse]` string form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Identifies a chapter, e.g. `gen:1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChapterKey {
    pub book_id: String,
    pub chapter: u32,
}

impl ChapterKey {
    pub fn new(book_id: impl Into<String>, chapter: u32) -> Self {
        Self { book_id: book_id.into(), chapter }
    }
}

impl fmt::Display for ChapterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.book_id, self.chapter)
    }
}

impl FromStr for ChapterKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        match parts.as_slice() {
            [book, chapter] if !book.is_empty() => Ok(Self::new(*book, parse_number(chapter, s)?)),
            _ => Err(Error::InvalidInput(format!("malformed chapter reference: {s}"))),
        }
    }
}

/// Identifies a single verse, e.g. `gen:1:1`.
///
/// This is the primary key format for notes and the `verseId` of bookmarks and research.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VerseRef {
    pub book_id: String,
    pub chapter: u32,
    pub verse: u32,
}

impl VerseRef {
    pub fn new(book_id: impl Into<String>, chapter: u32, verse: u32) -> Self {
        Self { book_id: book_id.into(), chapter, verse }
    }

    /// The chapter this verse belongs to.
    pub fn chapter_key(&self) -> ChapterKey {
        ChapterKey::new(self.book_id.clone(), self.chapter)
    }
}

impl fmt::Display for VerseRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.book_id, self.chapter, self.verse)
    }
}

impl FromStr for VerseRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        match parts.as_slice() {
            [book, chapter, verse] if !book.is_empty() => {
                Ok(Self::new(*book, parse_number(chapter, s)?, parse_number(verse, s)?))
            }
            _ => Err(Error::InvalidInput(format!("malformed verse reference: {s}"))),
        }
    }
}

fn parse_number(part: &str, whole: &str) -> Result<u32, Error> {
    match part.parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(Error::InvalidInput(format!("malformed reference: {whole}"))),
    }
}
