//! Reference resolution seam.
//!
//! The renderer never parses references itself: it hands the raw
//! `osisRef` (or the reference's text) to a [`ReferenceResolver`]. Real
//! applications plug in their versification-aware document model;
//! [`OsisRefResolver`] is a small standalone implementation that understands
//! OSIS ids (`Gen.1.1`, `Gen.1.1-Gen.1.5`, `Bible.KJV:John.3.16`) and, given a
//! basis, bare numeric forms (`16`, `3:16`, `16-18`).

extern crate alloc;

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

/// A single verse, chapter (`verse == 0`) or book (`chapter == 0`).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VerseRef {
    /// OSIS book id (`Gen`, `1Cor`, ...).
    pub book: String,
    /// Chapter number, 0 for the whole book.
    pub chapter: u32,
    /// Verse number, 0 for the whole chapter.
    pub verse: u32,
}

impl VerseRef {
    /// Create a verse reference.
    pub fn new(book: &str, chapter: u32, verse: u32) -> Self {
        Self {
            book: book.into(),
            chapter,
            verse,
        }
    }

    /// OSIS id form (`Gen.1.1`).
    pub fn to_osis(&self) -> String {
        match (self.chapter, self.verse) {
            (0, _) => self.book.clone(),
            (c, 0) => format!("{}.{}", self.book, c),
            (c, v) => format!("{}.{}.{}", self.book, c, v),
        }
    }

    /// Human-readable form (`Gen 1:1`).
    pub fn display(&self) -> String {
        match (self.chapter, self.verse) {
            (0, _) => self.book.clone(),
            (c, 0) => format!("{} {}", self.book, c),
            (c, v) => format!("{} {}:{}", self.book, c, v),
        }
    }
}

/// Inclusive range of verses.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerseRange {
    /// First verse.
    pub start: VerseRef,
    /// Last verse (equal to `start` for single verses).
    pub end: VerseRef,
}

impl VerseRange {
    /// Range covering one verse.
    pub fn single(verse: VerseRef) -> Self {
        Self {
            end: verse.clone(),
            start: verse,
        }
    }

    /// OSIS form (`Gen.1.1-Gen.1.5`).
    pub fn to_osis(&self) -> String {
        if self.start == self.end {
            self.start.to_osis()
        } else {
            format!("{}-{}", self.start.to_osis(), self.end.to_osis())
        }
    }

    /// Human-readable form, shortening the end when it shares book/chapter.
    pub fn display(&self) -> String {
        if self.start == self.end {
            return self.start.display();
        }
        if self.start.book == self.end.book {
            if self.start.chapter == self.end.chapter && self.end.verse != 0 {
                return format!("{}-{}", self.start.display(), self.end.verse);
            }
            if self.end.verse == 0 {
                return format!("{}-{}", self.start.display(), self.end.chapter);
            }
            return format!(
                "{}-{}:{}",
                self.start.display(),
                self.end.chapter,
                self.end.verse
            );
        }
        format!("{}-{}", self.start.display(), self.end.display())
    }
}

/// Failure to resolve a reference string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnresolvedReference {
    /// The reference as given.
    pub reference: String,
}

impl fmt::Display for UnresolvedReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot resolve reference '{}'", self.reference)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for UnresolvedReference {}

/// Turns reference text into verse ranges.
pub trait ReferenceResolver {
    /// Resolve `reference`, optionally relative to `basis`.
    fn resolve(
        &self,
        reference: &str,
        basis: Option<&VerseRef>,
    ) -> Result<Vec<VerseRange>, UnresolvedReference>;
}

/// Standalone resolver for OSIS reference syntax.
#[derive(Clone, Copy, Debug, Default)]
pub struct OsisRefResolver;

impl ReferenceResolver for OsisRefResolver {
    fn resolve(
        &self,
        reference: &str,
        basis: Option<&VerseRef>,
    ) -> Result<Vec<VerseRange>, UnresolvedReference> {
        let unresolved = || UnresolvedReference {
            reference: reference.into(),
        };
        let text = strip_work_prefix(reference.trim());
        let mut context = basis.cloned();
        let mut ranges = Vec::new();

        let mut items = text
            .split(|c: char| c.is_whitespace() || c == ';' || c == ',')
            .filter(|s| !s.is_empty())
            .peekable();

        while let Some(item) = items.next() {
            // `John 3:16`: a bare book followed by chapter/verse numbers.
            let book = is_osis_book(item)
                .then(|| items.next_if(|next| next.starts_with(|c: char| c.is_ascii_digit())))
                .flatten()
                .map(|numbers| (item, numbers));
            let item = book.map_or(item, |(_, numbers)| numbers);

            let (first, last) = match item.split_once('-') {
                Some((a, b)) => (a, Some(b)),
                None => (item, None),
            };
            let start = match book {
                Some((book, _)) => parse_in_book(book, first),
                None => parse_osis_id(first)
                    .or_else(|| context.as_ref().and_then(|ctx| parse_relative(first, ctx))),
            }
            .ok_or_else(unresolved)?;
            let end = match last {
                Some(last) if book.is_some() && start.verse == 0 => {
                    parse_in_book(&start.book, last)
                }
                Some(last) => parse_osis_id(last).or_else(|| parse_relative(last, &start)),
                None => Some(start.clone()),
            }
            .ok_or_else(unresolved)?;
            context = Some(end.clone());
            ranges.push(VerseRange { start, end });
        }

        if ranges.is_empty() {
            return Err(unresolved());
        }
        Ok(ranges)
    }
}

/// Whether `text` names verses without any book, e.g. `16`, `3:16`, `16-18`.
pub fn is_numeric_reference(text: &str) -> bool {
    let text = text.trim();
    text.chars().any(|c| c.is_ascii_digit())
        && text.chars().all(|c| {
            c.is_ascii_digit() || c.is_whitespace() || matches!(c, ':' | '.' | '-' | ',' | ';')
        })
}

/// Whether `book` is a known OSIS book id.
pub fn is_osis_book(book: &str) -> bool {
    OSIS_BOOKS.contains(&book)
}

fn strip_work_prefix(text: &str) -> &str {
    if let Some((prefix, rest)) = text.split_once(':') {
        let looks_like_book = rest
            .split(['.', '-', ' '])
            .next()
            .is_some_and(is_osis_book);
        if looks_like_book && prefix.parse::<u32>().is_err() {
            return rest;
        }
    }
    text
}

fn parse_osis_id(id: &str) -> Option<VerseRef> {
    // Drop sub-verse grain (`Gen.1.1!a`).
    let id = id.split('!').next().unwrap_or(id);
    let mut parts = id.split('.');
    let book = parts.next().filter(|b| is_osis_book(b))?;
    let chapter = match parts.next() {
        Some(c) => c.parse().ok()?,
        None => 0,
    };
    let verse = match parts.next() {
        Some(v) => v.parse().ok()?,
        None => 0,
    };
    if parts.next().is_some() {
        return None;
    }
    Some(VerseRef::new(book, chapter, verse))
}

/// `3:16` or `3` (a whole chapter) inside `book`.
fn parse_in_book(book: &str, text: &str) -> Option<VerseRef> {
    match text.split_once([':', '.']) {
        Some((chapter, verse)) => Some(VerseRef::new(
            book,
            chapter.trim().parse().ok()?,
            verse.trim().parse().ok()?,
        )),
        None => Some(VerseRef::new(book, text.trim().parse().ok()?, 0)),
    }
}

fn parse_relative(text: &str, basis: &VerseRef) -> Option<VerseRef> {
    match text.split_once([':', '.']) {
        Some((chapter, verse)) => Some(VerseRef::new(
            &basis.book,
            chapter.trim().parse().ok()?,
            verse.trim().parse().ok()?,
        )),
        None => Some(VerseRef::new(
            &basis.book,
            basis.chapter,
            text.trim().parse().ok()?,
        )),
    }
}

const OSIS_BOOKS: &[&str] = &[
    "Gen", "Exod", "Lev", "Num", "Deut", "Josh", "Judg", "Ruth", "1Sam", "2Sam", "1Kgs", "2Kgs",
    "1Chr", "2Chr", "Ezra", "Neh", "Esth", "Job", "Ps", "Prov", "Eccl", "Song", "Isa", "Jer",
    "Lam", "Ezek", "Dan", "Hos", "Joel", "Amos", "Obad", "Jonah", "Mic", "Nah", "Hab", "Zeph",
    "Hag", "Zech", "Mal", "Matt", "Mark", "Luke", "John", "Acts", "Rom", "1Cor", "2Cor", "Gal",
    "Eph", "Phil", "Col", "1Thess", "2Thess", "1Tim", "2Tim", "Titus", "Phlm", "Heb", "Jas",
    "1Pet", "2Pet", "1John", "2John", "3John", "Jude", "Rev", "Tob", "Jdt", "AddEsth", "EsthGr",
    "Wis", "Sir", "Bar", "EpJer", "PrAzar", "Sus", "Bel", "AddDan", "1Macc", "2Macc", "3Macc",
    "4Macc", "PrMan", "1Esd", "2Esd", "AddPs",
];
