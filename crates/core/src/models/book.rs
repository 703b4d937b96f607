//! Canonical book list and chapter navigation.

use serde::Serialize;

use crate::Error;

/// Old or New Testament.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Testament {
    #[serde(rename = "OT")]
    Old,
    #[serde(rename = "NT")]
    New,
}

/// A book of the canon with its display names and chapter count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: &'static str,
    pub name: &'static str,
    pub name_en: &'static str,
    pub chapters: u32,
    pub testament: Testament,
}

impl Book {
    /// Whether `chapter` is a valid 1-based chapter of this book.
    pub fn has_chapter(&self, chapter: u32) -> bool {
        chapter >= 1 && chapter <= self.chapters
    }

    /// Chapters immediately before and after `chapter` within this book.
    pub fn adjacent_chapters(&self, chapter: u32) -> Vec<u32> {
        let mut adjacent = Vec::with_capacity(2);
        if chapter > 1 && self.has_chapter(chapter - 1) {
            adjacent.push(chapter - 1);
        }
        if self.has_chapter(chapter + 1) {
            adjacent.push(chapter + 1);
        }
        adjacent
    }
}

const fn ot(id: &'static str, name: &'static str, name_en: &'static str, chapters: u32) -> Book {
    Book { id, name, name_en, chapters, testament: Testament::Old }
}

const fn nt(id: &'static str, name: &'static str, name_en: &'static str, chapters: u32) -> Book {
    Book { id, name, name_en, chapters, testament: Testament::New }
}

/// The 66 books in canonical order.
pub const BOOKS: &[Book] = &[
    ot("gen", "创世记", "Genesis", 50),
    ot("exo", "出埃及记", "Exodus", 40),
    ot("lev", "利未记", "Leviticus", 27),
    ot("num", "民数记", "Numbers", 36),
    ot("deu", "申命记", "Deuteronomy", 34),
    ot("jos", "约书亚记", "Joshua", 24),
    ot("jdg", "士师记", "Judges", 21),
    ot("rut", "路得记", "Ruth", 4),
    ot("1sa", "撒母耳记上", "1 Samuel", 31),
    ot("2sa", "撒母耳记下", "2 Samuel", 24),
    ot("1ki", "列王纪上", "1 Kings", 22),
    ot("2ki", "列王纪下", "2 Kings", 25),
    ot("1ch", "历代志上", "1 Chronicles", 29),
    ot("2ch", "历代志下", "2 Chronicles", 36),
    ot("ezr", "以斯拉记", "Ezra", 10),
    ot("neh", "尼希米记", "Nehemiah", 13),
    ot("est", "以斯帖记", "Esther", 10),
    ot("job", "约伯记", "Job", 42),
    ot("psa", "诗篇", "Psalms", 150),
    ot("pro", "箴言", "Proverbs", 31),
    ot("ecc", "传道书", "Ecclesiastes", 12),
    ot("sng", "雅歌", "Song of Solomon", 8),
    ot("isa", "以赛亚书", "Isaiah", 66),
    ot("jer", "耶利米书", "Jeremiah", 52),
    ot("lam", "耶利米哀歌", "Lamentations", 5),
    ot("ezk", "以西结书", "Ezekiel", 48),
    ot("dan", "但以理书", "Daniel", 12),
    ot("hos", "何西阿书", "Hosea", 14),
    ot("jol", "约珥书", "Joel", 3),
    ot("amo", "阿摩司书", "Amos", 9),
    ot("oba", "俄巴底亚书", "Obadiah", 1),
    ot("jon", "约拿书", "Jonah", 4),
    ot("mic", "弥迦书", "Micah", 7),
    ot("nah", "那鸿书", "Nahum", 3),
    ot("hab", "哈巴谷书", "Habakkuk", 3),
    ot("zep", "西番雅书", "Zephaniah", 3),
    ot("hag", "哈该书", "Haggai", 2),
    ot("zec", "撒迦利亚书", "Zechariah", 14),
    ot("mal", "玛拉基书", "Malachi", 4),
    nt("mat", "马太福音", "Matthew", 28),
    nt("mrk", "马可福音", "Mark", 16),
    nt("luk", "路加福音", "Luke", 24),
    nt("jhn", "约翰福音", "John", 21),
    nt("act", "使徒行传", "Acts", 28),
    nt("rom", "罗马书", "Romans", 16),
    nt("1co", "哥林多前书", "1 Corinthians", 16),
    nt("2co", "哥林多后书", "2 Corinthians", 13),
    nt("gal", "加拉太书", "Galatians", 6),
    nt("eph", "以弗所书", "Ephesians", 6),
    nt("php", "腓立比书", "Philippians", 4),
    nt("col", "歌罗西书", "Colossians", 4),
    nt("1th", "帖撒罗尼迦前书", "1 Thessalonians", 5),
    nt("2th", "帖撒罗尼迦后书", "2 Thessalonians", 3),
    nt("1ti", "提摩太前书", "1 Timothy", 6),
    nt("2ti", "提摩太后书", "2 Timothy", 4),
    nt("tit", "提多书", "Titus", 3),
    nt("phm", "腓利门书", "Philemon", 1),
    nt("heb", "希伯来书", "Hebrews", 13),
    nt("jas", "雅各书", "James", 5),
    nt("1pe", "彼得前书", "1 Peter", 5),
    nt("2pe", "彼得后书", "2 Peter", 3),
    nt("1jn", "约翰一书", "1 John", 5),
    nt("2jn", "约翰二书", "2 John", 1),
    nt("3jn", "约翰三书", "3 John", 1),
    nt("jud", "犹大书", "Jude", 1),
    nt("rev", "启示录", "Revelation", 22),
];

fn position(id: &str) -> Option<usize> {
    BOOKS.iter().position(|b| b.id == id)
}

/// Look up a book by its id (e.g. `"gen"`).
pub fn find(id: &str) -> Option<&'static Book> {
    position(id).map(|idx| &BOOKS[idx])
}

/// Resolve a (book, chapter) request, rejecting unknown books and out-of-range chapters.
pub fn validate(id: &str, chapter: u32) -> Result<&'static Book, Error> {
    let book = find(id).ok_or_else(|| Error::InvalidInput(format!("unknown book: {id}")))?;
    if !book.has_chapter(chapter) {
        return Err(Error::InvalidInput(format!(
            "chapter {chapter} out of range for {id} (1-{})",
            book.chapters
        )));
    }
    Ok(book)
}

/// The chapter after (`id`, `chapter`), crossing into the next book when needed.
///
/// Returns `None` after the last chapter of Revelation or for an unknown book.
pub fn next_chapter(id: &str, chapter: u32) -> Option<(&'static Book, u32)> {
    let idx = position(id)?;
    let book = &BOOKS[idx];
    if chapter < book.chapters {
        return Some((book, chapter + 1));
    }
    BOOKS.get(idx + 1).map(|next| (next, 1))
}

/// The chapter before (`id`, `chapter`), crossing into the previous book when needed.
pub fn previous_chapter(id: &str, chapter: u32) -> Option<(&'static Book, u32)> {
    let idx = position(id)?;
    let book = &BOOKS[idx];
    if chapter > 1 {
        return Some((book, (chapter - 1).min(book.chapters)));
    }
    let prev = BOOKS.get(idx.checked_sub(1)?)?;
    Some((prev, prev.chapters))
}
