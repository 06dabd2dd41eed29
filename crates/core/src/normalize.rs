//! Raw index record -> display record.
//!
//! `normalize` is total: every field of [`DisplayRecord`] has a fallback, so
//! a record with nothing but an id still produces something renderable.

use crate::record::{mime, DisplayRecord, FormatMap, RawRecord};

pub const UNKNOWN_AUTHOR: &str = "Unknown Author";
pub const UNKNOWN_LANGUAGE: &str = "Unknown";
pub const DEFAULT_YEAR: i32 = 1900;
pub const PLACEHOLDER_COVER: &str = "https://via.placeholder.com/400x500?text=No+Cover";

/// Language code -> display name.
pub const LANGUAGES: &[(&str, &str)] = &[
    ("en", "English"),
    ("fr", "Français"),
    ("de", "Deutsch"),
    ("es", "Español"),
    ("it", "Italiano"),
    ("ru", "Русский"),
    ("pt", "Português"),
    ("zh", "中文"),
    ("ja", "日本語"),
    ("ar", "العربية"),
    ("nl", "Nederlands"),
    ("pl", "Polski"),
    ("sv", "Svenska"),
    ("da", "Dansk"),
    ("no", "Norsk"),
    ("fi", "Suomi"),
    ("cs", "Čeština"),
    ("el", "Ελληνικά"),
    ("he", "עברית"),
    ("hi", "हिन्दी"),
];

const READ_PRIORITY: &[&str] = &[mime::HTML, mime::PLAIN_TEXT];
const DOWNLOAD_PRIORITY: &[&str] = &[mime::EPUB, mime::MOBI, mime::PLAIN_TEXT];

/// Display name for a language code. Unknown codes pass through unchanged.
pub fn language_name(code: &str) -> &str {
    LANGUAGES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
        .unwrap_or(code)
}

pub fn normalize(raw: RawRecord) -> DisplayRecord {
    let first_author = raw.authors.first();
    let author = first_author
        .map(|a| a.name.clone())
        .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());
    // Lossy on purpose: "no author" and "no birth year" both land on 1900.
    let year = first_author
        .and_then(|a| a.birth_year)
        .filter(|y| *y != 0)
        .unwrap_or(DEFAULT_YEAR);
    let language = raw
        .languages
        .first()
        .map(|code| language_name(code).to_string())
        .unwrap_or_else(|| UNKNOWN_LANGUAGE.to_string());

    let cover = first_present(&raw.formats, &[mime::JPEG])
        .unwrap_or(PLACEHOLDER_COVER)
        .to_string();
    let read_url = first_present(&raw.formats, READ_PRIORITY).map(String::from);
    let download_url = first_present(&raw.formats, DOWNLOAD_PRIORITY).map(String::from);

    DisplayRecord {
        id: raw.id,
        title: raw.title,
        author,
        cover,
        pages: 0,
        views: raw.download_count,
        year,
        language,
        download_url,
        read_url,
        subjects: raw.subjects,
        formats: raw.formats,
    }
}

/// First non-empty URL among `keys`, in order.
fn first_present<'a>(formats: &'a FormatMap, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|k| formats.get(*k))
        .map(String::as_str)
        .find(|url| !url.is_empty())
}
