/*
 * Responsibility
 * - Review request/response DTOs with validate()
 */
use serde::{Deserialize, Serialize};

use crate::api::dto::links::Link;
use crate::repos::review_repo::ReviewRow;

#[derive(Debug, Deserialize)]
pub struct ReviewPayload {
    pub review_text: Option<String>,
    pub rating: Option<i32>,
}

impl ReviewPayload {
    pub fn validate(&self) -> Result<(&str, i32), &'static str> {
        match (self.review_text.as_deref(), self.rating) {
            (Some(text), Some(rating)) if !text.trim().is_empty() && (1..=5).contains(&rating) => {
                Ok((text, rating))
            }
            _ => Err("Review text is required and rating must be between 1 and 5"),
        }
    }
}

/// Body for a freshly created review.
#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub id: i64,
    pub book_id: i64,
    pub review_text: String,
    pub rating: i32,
}

impl From<ReviewRow> for ReviewResponse {
    fn from(row: ReviewRow) -> Self {
        Self {
            id: row.id,
            book_id: row.book_id,
            review_text: row.review_text,
            rating: row.rating,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReviewWithLinks {
    pub id: i64,
    pub book_id: i64,
    pub review_text: String,
    pub rating: i32,
    #[serde(rename = "_links")]
    pub links: ReviewLinks,
}

#[derive(Debug, Serialize)]
pub struct ReviewLinks {
    #[serde(rename = "self")]
    pub self_link: Link,
    pub book: Link,
}

#[derive(Debug, Serialize)]
pub struct ReviewCollectionResponse {
    pub reviews: Vec<ReviewWithLinks>,
    #[serde(rename = "_links")]
    pub links: ReviewCollectionLinks,
}

#[derive(Debug, Serialize)]
pub struct ReviewCollectionLinks {
    #[serde(rename = "self")]
    pub self_link: Link,
    pub book: Link,
}

impl ReviewCollectionResponse {
    pub fn new(book_id: i64, rows: Vec<ReviewRow>) -> Self {
        let reviews = rows
            .into_iter()
            .map(|row| ReviewWithLinks {
                links: ReviewLinks {
                    self_link: Link::new(format!("/reviews/{}", row.id)),
                    book: Link::new(format!("/books/{book_id}")),
                },
                id: row.id,
                book_id: row.book_id,
                review_text: row.review_text,
                rating: row.rating,
            })
            .collect();

        Self {
            reviews,
            links: ReviewCollectionLinks {
                self_link: Link::new(format!("/books/{book_id}/reviews")),
                book: Link::new(format!("/books/{book_id}")),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_must_be_in_range() {
        for rating in [1, 3, 5] {
            let payload = ReviewPayload {
                review_text: Some("good".into()),
                rating: Some(rating),
            };
            assert!(payload.validate().is_ok(), "rating {rating} should pass");
        }

        for rating in [0, 6, -1] {
            let payload = ReviewPayload {
                review_text: Some("good".into()),
                rating: Some(rating),
            };
            assert!(payload.validate().is_err(), "rating {rating} should fail");
        }
    }

    #[test]
    fn review_text_is_required() {
        let payload = ReviewPayload {
            review_text: None,
            rating: Some(4),
        };
        assert!(payload.validate().is_err());

        let blank = ReviewPayload {
            review_text: Some("".into()),
            rating: Some(4),
        };
        assert!(blank.validate().is_err());
    }
}
