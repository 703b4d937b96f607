//! Bilingual verses and the merged chapter cache payload.

use serde::{Deserialize, Serialize};

/// One verse with both translations side by side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verse {
    pub book_id: String,
    pub chapter: u32,
    pub verse: u32,
    pub text_cn: String,
    pub text_en: String,
}

/// A merged bilingual chapter as stored in the chapter cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedChapter {
    pub book_id: String,
    pub chapter: u32,
    pub verses: Vec<Verse>,
}

impl CachedChapter {
    /// Merge two independently fetched translations by position.
    ///
    /// The result has as many verses as the longer list; a missing side becomes
    /// an empty string. Verse numbers are assigned 1..=n.
    pub fn merge(book_id: &str, chapter: u32, chinese: Vec<String>, english: Vec<String>) -> Self {
        let len = chinese.len().max(english.len());
        let mut chinese = chinese.into_iter();
        let mut english = english.into_iter();

        let verses = (1..=len as u32)
            .map(|verse| Verse {
                book_id: book_id.to_string(),
                chapter,
                verse,
                text_cn: chinese.next().unwrap_or_default(),
                text_en: english.next().unwrap_or_default(),
            })
            .collect();

        Self { book_id: book_id.to_string(), chapter, verses }
    }

    /// Check that this payload really is the chapter stored under (`book_id`, `chapter`).
    ///
    /// Every verse must carry the same book and chapter, and verse numbers must run 1..=n.
    pub fn check(&self, book_id: &str, chapter: u32) -> Result<(), String> {
        if self.book_id != book_id || self.chapter != chapter {
            return Err(format!(
                "payload is {}:{} but stored under {book_id}:{chapter}",
                self.book_id, self.chapter
            ));
        }
        for (idx, verse) in self.verses.iter().enumerate() {
            if verse.book_id != book_id || verse.chapter != chapter {
                return Err(format!("verse {} belongs to {}:{}", verse.verse, verse.book_id, verse.chapter));
            }
            if verse.verse as usize != idx + 1 {
                return Err(format!("verse at position {} is numbered {}", idx + 1, verse.verse));
            }
        }
        Ok(())
    }

    /// Find a verse by number.
    pub fn verse(&self, number: u32) -> Option<&Verse> {
        self.verses.iter().find(|v| v.verse == number)
    }

    pub fn len(&self) -> usize {
        self.verses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verses.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(prefix: &str, n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("{prefix} {i}")).collect()
    }

    #[test]
    fn test_merge_equal_lengths() {
        let merged = CachedChapter::merge("gen", 1, texts("cn", 31), texts("en", 31));
        assert_eq!(merged.len(), 31);
        assert!(merged.verses.iter().all(|v| !v.text_cn.is_empty() && !v.text_en.is_empty()));
        assert_eq!(merged.verses[30].verse, 31);
        assert_eq!(merged.verses[30].text_en, "en 31");
        assert!(merged.check("gen", 1).is_ok());
    }

    #[test]
    fn test_merge_pads_shorter_side() {
        let merged = CachedChapter::merge("rom", 16, texts("cn", 27), texts("en", 25));
        assert_eq!(merged.len(), 27);
        assert_eq!(merged.verses[26].text_cn, "cn 27");
        assert_eq!(merged.verses[26].text_en, "");
        assert_eq!(merged.verses[24].text_en, "en 25");
    }

    #[test]
    fn test_merge_empty() {
        let merged = CachedChapter::merge("gen", 1, Vec::new(), Vec::new());
        assert!(merged.is_empty());
    }

    #[test]
    fn test_check_rejects_mismatch() {
        let merged = CachedChapter::merge("gen", 1, texts("cn", 3), texts("en", 3));
        assert!(merged.check("gen", 2).is_err());
        assert!(merged.check("exo", 1).is_err());

        let mut gapped = merged.clone();
        gapped.verses.remove(1);
        assert!(gapped.check("gen", 1).is_err());
    }

    #[test]
    fn test_camel_case_wire_format() {
        let merged = CachedChapter::merge("gen", 1, texts("cn", 1), texts("en", 1));
        let json = serde_json::to_value(&merged).unwrap();
        assert_eq!(json["bookId"], "gen");
        assert_eq!(json["verses"][0]["textCn"], "cn 1");
        assert_eq!(json["verses"][0]["textEn"], "en 1");
    }
}
