//! WeRead web API models
//!
//! Only the fields the exporter reads are modelled; everything else in the
//! responses is ignored.

use crate::domain::{Book, BookId};
use serde::Deserialize;

/// `GET /web/shelf/sync`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShelfResponse {
    #[serde(default)]
    pub books: Vec<ShelfBook>,
}

/// One entry of the shelf
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShelfBook {
    pub book_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
}

impl ShelfBook {
    /// Convert to a domain book; `None` when the entry has no id
    pub fn to_domain(&self) -> Option<Book> {
        let id = BookId::new(self.book_id.clone()).ok()?;
        let title = if self.title.trim().is_empty() {
            self.book_id.clone()
        } else {
            self.title.clone()
        };

        let book = Book::new(id, title);
        Some(match &self.author {
            Some(author) if !author.trim().is_empty() => book.with_author(author.clone()),
            _ => book,
        })
    }
}

/// `GET /web/book/bookmarklist`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookmarkList {
    #[serde(default)]
    pub updated: Vec<Bookmark>,
    #[serde(default)]
    pub chapters: Vec<Chapter>,
}

/// A highlighted passage
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub chapter_uid: i64,
    #[serde(default)]
    pub mark_text: String,
    /// Character range inside the chapter, `"start-end"`
    #[serde(default)]
    pub range: String,
    #[serde(default)]
    pub create_time: i64,
}

/// A chapter the bookmarks refer to
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub chapter_uid: i64,
    #[serde(default)]
    pub chapter_idx: i64,
    #[serde(default)]
    pub title: String,
}

/// `GET /web/review/list`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewList {
    #[serde(default)]
    pub reviews: Vec<ReviewItem>,
}

/// Wrapper around a review
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewItem {
    pub review: Review,
}

/// A thought on a passage, or a review of the whole book
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    /// Missing for whole-book reviews
    #[serde(default)]
    pub chapter_uid: Option<i64>,
    /// The passage the thought refers to
    #[serde(default, rename = "abstract")]
    pub quote: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub range: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: i64,
    #[serde(default)]
    pub create_time: i64,
}

impl Review {
    /// WeRead marks whole-book reviews with type 4
    pub fn is_book_review(&self) -> bool {
        self.kind == 4 || self.chapter_uid.is_none()
    }
}

/// Start offset of a `"start-end"` range, for ordering within a chapter
pub fn range_start(range: &str) -> i64 {
    range
        .split('-')
        .next()
        .and_then(|start| start.trim().parse().ok())
        .unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_shelf() {
        let json = r#"{
            "synckey": 1700000000,
            "books": [
                {"bookId": "3300064831", "title": "三体", "author": "刘慈欣", "cover": "x"},
                {"bookId": "42", "title": ""}
            ]
        }"#;
        let shelf: ShelfResponse = serde_json::from_str(json).unwrap();
        let books: Vec<Book> = shelf.books.iter().filter_map(ShelfBook::to_domain).collect();

        assert_eq!(books.len(), 2);
        assert_eq!(books[0].title, "三体");
        assert_eq!(books[0].author.as_deref(), Some("刘慈欣"));
        assert_eq!(books[1].title, "42");
    }

    #[test]
    fn test_parse_bookmarks() {
        let json = r#"{
            "updated": [
                {"bookId": "1", "bookmarkId": "1_5_10-20", "chapterUid": 5, "markText": "text", "range": "10-20", "createTime": 1}
            ],
            "chapters": [{"bookId": "1", "chapterUid": 5, "chapterIdx": 2, "title": "第一章"}]
        }"#;
        let list: BookmarkList = serde_json::from_str(json).unwrap();
        assert_eq!(list.updated[0].chapter_uid, 5);
        assert_eq!(list.chapters[0].title, "第一章");
    }

    #[test]
    fn test_parse_reviews() {
        let json = r#"{
            "reviews": [
                {"reviewId": "r1", "review": {"chapterUid": 5, "abstract": "quote", "content": "thought", "range": "3-9", "type": 1}},
                {"reviewId": "r2", "review": {"content": "great book", "type": 4}}
            ]
        }"#;
        let list: ReviewList = serde_json::from_str(json).unwrap();
        assert_eq!(list.reviews[0].review.quote.as_deref(), Some("quote"));
        assert!(!list.reviews[0].review.is_book_review());
        assert!(list.reviews[1].review.is_book_review());
    }

    #[test]
    fn test_range_start() {
        assert_eq!(range_start("120-300"), 120);
        assert_eq!(range_start(""), i64::MAX);
    }
}
