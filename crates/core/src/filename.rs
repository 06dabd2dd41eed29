//! File names for saved downloads.
//! Format: `{placeholder|modifier}`, e.g. `{author|kebab} - {title}.{ext}`

use crate::display::BookType;
use crate::record::{mime, DisplayRecord};

/// Extension matching the format `download_url` resolved to.
pub fn download_extension(book: &DisplayRecord) -> &'static str {
    let url = match book.download_url.as_deref() {
        Some(u) => u,
        None => return BookType::Other.extension(),
    };
    let is = |key: &str| book.formats.get(key).map(String::as_str) == Some(url);
    if is(mime::EPUB) {
        BookType::Epub.extension()
    } else if is(mime::MOBI) {
        BookType::Mobi.extension()
    } else if is(mime::PLAIN_TEXT) {
        BookType::Txt.extension()
    } else {
        BookType::Other.extension()
    }
}

pub fn download_filename(book: &DisplayRecord, template: &str) -> String {
    let ext = download_extension(book);
    let mut out = template.to_string();

    if out.contains("{title|kebab}") {
        out = out.replace("{title|kebab}", &kebab(&book.title));
    }
    if out.contains("{author|kebab}") {
        out = out.replace("{author|kebab}", &kebab(&book.author));
    }
    out = out.replace("{title}", &book.title);
    out = out.replace("{author}", &book.author);
    out = out.replace("{id}", &book.id.to_string());
    out = out.replace("{ext}", ext);

    out.replace(['/', '\\'], "-")
}

fn kebab(s: &str) -> String {
    s.replace(' ', "-")
        .replace(|c: char| !c.is_alphanumeric() && c != '-', "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use crate::record::{Author, RawRecord};

    fn book(formats: &[(&str, &str)]) -> DisplayRecord {
        let mut raw = RawRecord::new(84, "Frankenstein; Or, The Modern Prometheus");
        raw.authors = vec![Author {
            name: "Shelley, Mary Wollstonecraft".to_string(),
            birth_year: Some(1797),
            death_year: Some(1851),
        }];
        for (k, v) in formats {
            raw.formats.insert(k.to_string(), v.to_string());
        }
        normalize(raw)
    }

    #[test]
    fn extension_follows_resolved_format() {
        assert_eq!(download_extension(&book(&[(mime::EPUB, "http://x/84.epub")])), "epub");
        assert_eq!(download_extension(&book(&[(mime::MOBI, "http://x/84.mobi")])), "mobi");
        assert_eq!(download_extension(&book(&[(mime::PLAIN_TEXT, "http://x/84.txt")])), "txt");
        assert_eq!(download_extension(&book(&[])), "bin");
    }

    #[test]
    fn default_template() {
        let b = book(&[(mime::EPUB, "http://x/84.epub")]);
        assert_eq!(
            download_filename(&b, "{title}.{ext}"),
            "Frankenstein; Or, The Modern Prometheus.epub"
        );
    }

    #[test]
    fn kebab_and_id() {
        let b = book(&[(mime::MOBI, "http://x/84.mobi")]);
        let out = download_filename(&b, "{id}-{title|kebab}.{ext}");
        assert_eq!(out, "84-Frankenstein-Or-The-Modern-Prometheus.mobi");
    }

    #[test]
    fn separators_are_replaced() {
        let mut b = book(&[(mime::EPUB, "http://x/84.epub")]);
        b.title = "AC/DC".to_string();
        assert_eq!(download_filename(&b, "{title}.{ext}"), "AC-DC.epub");
    }
}
