/*
 * Responsibility
 * - Book request/response DTOs with validate()
 * - Response bodies carry HATEOAS `_links`
 */
use serde::{Deserialize, Serialize};

use crate::api::dto::links::Link;
use crate::repos::book_repo::{BookRow, NewBook};

#[derive(Debug, Deserialize)]
pub struct BookPayload {
    pub title: Option<String>,
    pub author: Option<String>,
    pub published_year: Option<i32>,
    pub book_picture: Option<String>,
    pub book_description: Option<String>,
    pub genre: Option<String>,
    pub average_rating: Option<f32>,
}

impl BookPayload {
    pub fn validate(&self) -> Result<NewBook<'_>, &'static str> {
        let (Some(title), Some(author), Some(published_year)) = (
            self.title.as_deref().filter(|t| !t.trim().is_empty()),
            self.author.as_deref().filter(|a| !a.trim().is_empty()),
            self.published_year,
        ) else {
            return Err("All fields (title, author, published_year) are required");
        };

        Ok(NewBook {
            title,
            author,
            published_year,
            book_picture: self.book_picture.as_deref(),
            book_description: self.book_description.as_deref(),
            genre: self.genre.as_deref(),
            average_rating: self.average_rating,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct BookResponse {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub published_year: i32,
    pub book_picture: Option<String>,
    pub book_description: Option<String>,
    pub genre: Option<String>,
    pub average_rating: Option<f32>,
    #[serde(rename = "_links")]
    pub links: BookLinks,
}

#[derive(Debug, Serialize)]
pub struct BookLinks {
    #[serde(rename = "self")]
    pub self_link: Link,
    pub reviews: Link,
    pub collection: Link,
}

impl From<BookRow> for BookResponse {
    fn from(row: BookRow) -> Self {
        let links = BookLinks {
            self_link: Link::new(format!("/books/{}", row.id)),
            reviews: Link::new(format!("/books/{}/reviews", row.id)),
            collection: Link::new("/books"),
        };

        Self {
            id: row.id,
            title: row.title,
            author: row.author,
            published_year: row.published_year,
            book_picture: row.book_picture,
            book_description: row.book_description,
            genre: row.genre,
            average_rating: row.average_rating,
            links,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BookCollectionResponse {
    pub books: Vec<BookResponse>,
    #[serde(rename = "_links")]
    pub links: CollectionLinks,
}

#[derive(Debug, Serialize)]
pub struct CollectionLinks {
    #[serde(rename = "self")]
    pub self_link: Link,
}

impl BookCollectionResponse {
    pub fn new(rows: Vec<BookRow>) -> Self {
        Self {
            books: rows.into_iter().map(BookResponse::from).collect(),
            links: CollectionLinks {
                self_link: Link::new("/books"),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BookDeletedResponse {
    pub message: String,
    #[serde(rename = "_links")]
    pub links: CollectionLinks,
}

impl BookDeletedResponse {
    pub fn new() -> Self {
        Self {
            message: "Book and its reviews deleted successfully".to_string(),
            links: CollectionLinks {
                self_link: Link::new("/books"),
            },
        }
    }
}
