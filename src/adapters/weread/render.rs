//! Markdown rendering of a book's highlights and thoughts
//!
//! Layout:
//!
//! ```text
//! # Title
//!
//! Author: ...
//!
//! ## Chapter
//!
//! > highlighted passage
//!
//! > passage a thought refers to
//!
//! thought
//!
//! ## Book review
//!
//! review text
//! ```
//!
//! Chapters follow reading order, entries within a chapter follow their
//! position in the text. A book with nothing to render gets
//! [`NO_NOTES_SENTINEL`] as its body.

use super::models::{range_start, BookmarkList, ReviewList};
use crate::domain::{Book, ExportedDocument, NO_NOTES_SENTINEL};
use std::collections::{BTreeMap, HashMap};
use std::fmt::Write as _;

enum Entry<'a> {
    Highlight(&'a str),
    Thought { quote: Option<&'a str>, content: &'a str },
}

struct ChapterNotes<'a> {
    title: String,
    entries: Vec<(i64, i64, Entry<'a>)>,
}

/// Renders the document for one book
pub fn render_book(book: &Book, bookmarks: &BookmarkList, reviews: &ReviewList) -> ExportedDocument {
    let chapter_info: HashMap<i64, (i64, &str)> = bookmarks
        .chapters
        .iter()
        .map(|c| (c.chapter_uid, (c.chapter_idx, c.title.as_str())))
        .collect();

    // Keyed by (chapter index, chapter uid); unknown chapters sort last
    let mut grouped: BTreeMap<(i64, i64), Vec<(i64, i64, Entry<'_>)>> = BTreeMap::new();
    let mut book_reviews = Vec::new();

    for mark in &bookmarks.updated {
        if mark.mark_text.trim().is_empty() {
            continue;
        }
        let key = chapter_key(&chapter_info, mark.chapter_uid);
        grouped.entry(key).or_default().push((
            range_start(&mark.range),
            mark.create_time,
            Entry::Highlight(mark.mark_text.trim()),
        ));
    }

    for item in &reviews.reviews {
        let review = &item.review;
        if review.content.trim().is_empty() {
            continue;
        }
        match review.chapter_uid {
            Some(uid) if !review.is_book_review() => {
                let key = chapter_key(&chapter_info, uid);
                grouped.entry(key).or_default().push((
                    review.range.as_deref().map(range_start).unwrap_or(i64::MAX),
                    review.create_time,
                    Entry::Thought {
                        quote: review.quote.as_deref().map(str::trim).filter(|q| !q.is_empty()),
                        content: review.content.trim(),
                    },
                ));
            }
            _ => book_reviews.push(review.content.trim()),
        }
    }

    let chapters: Vec<((i64, i64), ChapterNotes<'_>)> = grouped
        .into_iter()
        .map(|(key, entries)| {
            let title = chapter_info
                .get(&key.1)
                .map(|(_, title)| title.to_string())
                .unwrap_or_default();
            (key, ChapterNotes { title, entries })
        })
        .collect();

    let mut out = String::new();
    let _ = writeln!(out, "# {}\n", book.title);
    if let Some(author) = &book.author {
        let _ = writeln!(out, "Author: {author}\n");
    }

    if chapters.is_empty() && book_reviews.is_empty() {
        let _ = writeln!(out, "{NO_NOTES_SENTINEL}");
        return ExportedDocument::new(book.title.clone(), out);
    }

    for ((_, uid), mut notes) in chapters {
        notes.entries.sort_by_key(|(start, created, _)| (*start, *created));
        let heading = if notes.title.trim().is_empty() {
            format!("Chapter {uid}")
        } else {
            notes.title.trim().to_string()
        };
        let _ = writeln!(out, "## {heading}\n");

        for (_, _, entry) in &notes.entries {
            match entry {
                Entry::Highlight(text) => {
                    let _ = writeln!(out, "{}\n", quote_block(text));
                }
                Entry::Thought { quote, content } => {
                    if let Some(quote) = quote {
                        let _ = writeln!(out, "{}\n", quote_block(quote));
                    }
                    let _ = writeln!(out, "{content}\n");
                }
            }
        }
    }

    if !book_reviews.is_empty() {
        let _ = writeln!(out, "## Book review\n");
        for review in book_reviews {
            let _ = writeln!(out, "{review}\n");
        }
    }

    ExportedDocument::new(book.title.clone(), out)
}

fn chapter_key(chapter_info: &HashMap<i64, (i64, &str)>, uid: i64) -> (i64, i64) {
    let idx = chapter_info.get(&uid).map(|(idx, _)| *idx).unwrap_or(i64::MAX);
    (idx, uid)
}

fn quote_block(text: &str) -> String {
    text.lines()
        .map(|line| format!("> {}", line.trim_end()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BookId;

    fn book() -> Book {
        Book::new(BookId::new("1").unwrap(), "三体").with_author("刘慈欣")
    }

    fn bookmarks(json: &str) -> BookmarkList {
        serde_json::from_str(json).unwrap()
    }

    fn reviews(json: &str) -> ReviewList {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_no_annotations_renders_sentinel() {
        let doc = render_book(&book(), &BookmarkList::default(), &ReviewList::default());
        assert!(doc.has_no_notes());
        assert!(doc.content.unwrap().starts_with("# 三体"));
    }

    #[test]
    fn test_title_containing_sentinel_keeps_notes() {
        let book = Book::new(BookId::new("2").unwrap(), format!("{NO_NOTES_SENTINEL}?"));
        let marks = bookmarks(
            r#"{
                "updated": [{"chapterUid": 10, "markText": "a highlight", "range": "1-5"}],
                "chapters": [{"chapterUid": 10, "chapterIdx": 1, "title": "Part One"}]
            }"#,
        );

        let doc = render_book(&book, &marks, &ReviewList::default());
        assert!(!doc.has_no_notes());
    }

    #[test]
    fn test_chapters_in_reading_order() {
        let marks = bookmarks(
            r#"{
                "updated": [
                    {"chapterUid": 20, "markText": "second chapter", "range": "1-5"},
                    {"chapterUid": 10, "markText": "later in first", "range": "50-60"},
                    {"chapterUid": 10, "markText": "early in first", "range": "5-9"}
                ],
                "chapters": [
                    {"chapterUid": 10, "chapterIdx": 1, "title": "Part One"},
                    {"chapterUid": 20, "chapterIdx": 2, "title": "Part Two"}
                ]
            }"#,
        );

        let doc = render_book(&book(), &marks, &ReviewList::default());
        let content = doc.content.unwrap();

        let one = content.find("## Part One").unwrap();
        let early = content.find("> early in first").unwrap();
        let later = content.find("> later in first").unwrap();
        let two = content.find("## Part Two").unwrap();
        assert!(one < early && early < later && later < two);
        assert!(content.contains("Author: 刘慈欣"));
        assert!(!doc_has_sentinel(&content));
    }

    #[test]
    fn test_thoughts_and_book_review() {
        let marks = bookmarks(r#"{"chapters": [{"chapterUid": 10, "chapterIdx": 1, "title": "Part One"}]}"#);
        let reviews = reviews(
            r#"{
                "reviews": [
                    {"review": {"chapterUid": 10, "abstract": "the passage", "content": "my thought", "range": "1-3", "type": 1}},
                    {"review": {"content": "a fine book", "type": 4}}
                ]
            }"#,
        );

        let content = render_book(&book(), &marks, &reviews).content.unwrap();
        assert!(content.contains("## Part One"));
        assert!(content.contains("> the passage\n\nmy thought"));
        assert!(content.contains("## Book review\n\na fine book"));
    }

    #[test]
    fn test_unknown_chapter_gets_placeholder_heading() {
        let marks = bookmarks(r#"{"updated": [{"chapterUid": 99, "markText": "orphan", "range": "1-2"}]}"#);
        let content = render_book(&book(), &marks, &ReviewList::default())
            .content
            .unwrap();
        assert!(content.contains("## Chapter 99"));
    }

    #[test]
    fn test_multiline_highlight_is_quoted_per_line() {
        assert_eq!(quote_block("a\nb"), "> a\n> b");
    }

    fn doc_has_sentinel(content: &str) -> bool {
        content.contains(NO_NOTES_SENTINEL)
    }
}
