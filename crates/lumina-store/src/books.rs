// SPDX-License-Identifier: Apache-2.0

use crate::{decode_ts, encode_ts, Store, StoreError};
use chrono::Utc;
use lumina_model::{Book, BookDraft, BookId, BookPatch, Review};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use std::collections::HashMap;

pub(crate) const BOOK_COLUMNS: &str =
    "b.id, b.title, b.author, b.description, b.price, b.category, b.created_at";

pub(crate) fn book_from_row(row: &Row<'_>) -> Result<Book, StoreError> {
    let id: String = row.get(0).map_err(StoreError::from)?;
    let created_at: String = row.get(6).map_err(StoreError::from)?;
    Ok(Book {
        id: BookId::parse(&id).map_err(|e| StoreError::Corrupt(e.to_string()))?,
        title: row.get(1).map_err(StoreError::from)?,
        author: row.get(2).map_err(StoreError::from)?,
        description: row.get(3).map_err(StoreError::from)?,
        price: row.get(4).map_err(StoreError::from)?,
        category: row.get(5).map_err(StoreError::from)?,
        reviews: Vec::new(),
        created_at: decode_ts(&created_at)?,
    })
}

/// Reviews for a set of books, keyed by book id, in append order.
pub(crate) fn load_reviews(
    conn: &Connection,
    ids: &[BookId],
) -> Result<HashMap<BookId, Vec<Review>>, StoreError> {
    let mut out: HashMap<BookId, Vec<Review>> = HashMap::new();
    if ids.is_empty() {
        return Ok(out);
    }
    let placeholders = vec!["?"; ids.len()].join(",");
    let mut stmt = conn.prepare(&format!(
        "SELECT book_id, reviewer, rating, comment, created_at
         FROM reviews WHERE book_id IN ({placeholders}) ORDER BY id"
    ))?;
    let rows = stmt.query_map(
        params_from_iter(ids.iter().map(ToString::to_string)),
        |row| {
            let book_id: String = row.get(0)?;
            let reviewer: String = row.get(1)?;
            let rating: i64 = row.get(2)?;
            let comment: String = row.get(3)?;
            let created_at: String = row.get(4)?;
            Ok((book_id, reviewer, rating, comment, created_at))
        },
    )?;
    for row in rows {
        let (book_id, reviewer, rating, comment, created_at) = row?;
        let book_id = BookId::parse(&book_id).map_err(|e| StoreError::Corrupt(e.to_string()))?;
        out.entry(book_id).or_default().push(Review {
            reviewer,
            rating,
            comment,
            created_at: decode_ts(&created_at)?,
        });
    }
    Ok(out)
}

fn attach_reviews(conn: &Connection, books: &mut [Book]) -> Result<(), StoreError> {
    let ids: Vec<BookId> = books.iter().map(|b| b.id).collect();
    let mut reviews = load_reviews(conn, &ids)?;
    for book in books {
        book.reviews = reviews.remove(&book.id).unwrap_or_default();
    }
    Ok(())
}

fn fetch_book(conn: &Connection, id: BookId) -> Result<Option<Book>, StoreError> {
    let book = conn
        .query_row(
            &format!("SELECT {BOOK_COLUMNS} FROM books b WHERE b.id = ?1"),
            params![id.to_string()],
            |row| Ok(book_from_row(row)),
        )
        .optional()?
        .transpose()?;
    match book {
        Some(mut book) => {
            book.reviews = load_reviews(conn, &[book.id])?.remove(&book.id).unwrap_or_default();
            Ok(Some(book))
        }
        None => Ok(None),
    }
}

impl Store {
    pub async fn insert_book(&self, draft: BookDraft) -> Result<Book, StoreError> {
        self.with_conn(move |conn| {
            let book = Book {
                id: BookId::new(),
                title: draft.title,
                author: draft.author,
                description: draft.description,
                price: draft.price,
                category: draft.category,
                reviews: Vec::new(),
                created_at: Utc::now(),
            };
            conn.execute(
                "INSERT INTO books(id, title, author, description, price, category, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    book.id.to_string(),
                    book.title,
                    book.author,
                    book.description,
                    book.price,
                    book.category,
                    encode_ts(book.created_at),
                ],
            )?;
            Ok(book)
        })
        .await
    }

    /// Catalog listing, newest first. `search` is a case-insensitive substring
    /// matched against title OR author; `category` is an exact match.
    pub async fn list_books(
        &self,
        search: Option<String>,
        category: Option<String>,
    ) -> Result<Vec<Book>, StoreError> {
        self.with_conn(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {BOOK_COLUMNS} FROM books b
                 WHERE (?1 IS NULL
                        OR instr(lower(b.title), lower(?1)) > 0
                        OR instr(lower(b.author), lower(?1)) > 0)
                   AND (?2 IS NULL OR b.category = ?2)
                 ORDER BY b.created_at DESC, b.rowid DESC"
            ))?;
            let rows = stmt.query_map(params![search, category], |row| Ok(book_from_row(row)))?;
            let mut books = Vec::new();
            for row in rows {
                books.push(row??);
            }
            attach_reviews(conn, &mut books)?;
            Ok(books)
        })
        .await
    }

    pub async fn book_by_id(&self, id: BookId) -> Result<Option<Book>, StoreError> {
        self.with_conn(move |conn| fetch_book(conn, id)).await
    }

    /// Partial field replace; returns the updated record, or `None` when no
    /// such book exists.
    pub async fn update_book(
        &self,
        id: BookId,
        patch: BookPatch,
    ) -> Result<Option<Book>, StoreError> {
        self.with_conn(move |conn| {
            let changed = conn.execute(
                "UPDATE books SET
                     title = COALESCE(?2, title),
                     author = COALESCE(?3, author),
                     description = COALESCE(?4, description),
                     price = COALESCE(?5, price),
                     category = COALESCE(?6, category)
                 WHERE id = ?1",
                params![
                    id.to_string(),
                    patch.title,
                    patch.author,
                    patch.description,
                    patch.price,
                    patch.category,
                ],
            )?;
            if changed == 0 {
                return Ok(None);
            }
            fetch_book(conn, id)
        })
        .await
    }

    /// Wipes the catalog; used by the seeding tool. Returns how many books
    /// were removed.
    pub async fn clear_books(&self) -> Result<usize, StoreError> {
        self.with_conn(|conn| Ok(conn.execute("DELETE FROM books", [])?))
            .await
    }

    /// Idempotent; reports whether a row was actually removed. Embedded
    /// reviews go with the book (ON DELETE CASCADE).
    pub async fn delete_book(&self, id: BookId) -> Result<bool, StoreError> {
        self.with_conn(move |conn| {
            let changed = conn.execute("DELETE FROM books WHERE id = ?1", params![id.to_string()])?;
            Ok(changed > 0)
        })
        .await
    }

    /// Appends a review in one statement, guarded by book existence, then
    /// returns the updated book. `None` when the book is gone. Rating range is
    /// intentionally unchecked.
    pub async fn add_review(
        &self,
        book: BookId,
        reviewer: String,
        rating: i64,
        comment: String,
    ) -> Result<Option<Book>, StoreError> {
        self.with_conn(move |conn| {
            let inserted = conn.execute(
                "INSERT INTO reviews(book_id, reviewer, rating, comment, created_at)
                 SELECT ?1, ?2, ?3, ?4, ?5
                 WHERE EXISTS (SELECT 1 FROM books WHERE id = ?1)",
                params![
                    book.to_string(),
                    reviewer,
                    rating,
                    comment,
                    encode_ts(Utc::now()),
                ],
            )?;
            if inserted == 0 {
                return Ok(None);
            }
            fetch_book(conn, book)
        })
        .await
    }
}
