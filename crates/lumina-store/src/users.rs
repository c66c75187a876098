// SPDX-License-Identifier: Apache-2.0

use crate::books::{book_from_row, load_reviews, BOOK_COLUMNS};
use crate::{decode_ts, encode_ts, Store, StoreError};
use chrono::Utc;
use lumina_model::{Book, BookId, Email, Role, User, UserId};
use rusqlite::{params, Connection, OptionalExtension, Row};

fn user_from_row(row: &Row<'_>) -> Result<User, StoreError> {
    let id: String = row.get(0).map_err(StoreError::from)?;
    let name: String = row.get(1).map_err(StoreError::from)?;
    let email: String = row.get(2).map_err(StoreError::from)?;
    let password_hash: String = row.get(3).map_err(StoreError::from)?;
    let role: String = row.get(4).map_err(StoreError::from)?;
    let created_at: String = row.get(5).map_err(StoreError::from)?;
    Ok(User {
        id: UserId::parse(&id).map_err(|e| StoreError::Corrupt(e.to_string()))?,
        name,
        email: Email::parse(&email).map_err(|e| StoreError::Corrupt(e.to_string()))?,
        password_hash,
        role: Role::parse(&role).map_err(|e| StoreError::Corrupt(e.to_string()))?,
        created_at: decode_ts(&created_at)?,
    })
}

const USER_COLUMNS: &str = "id, name, email, password_hash, role, created_at";

fn email_conflict(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, Some(msg))
            if e.code == rusqlite::ErrorCode::ConstraintViolation && msg.contains("users.email")
    )
}

impl Store {
    pub async fn create_user(
        &self,
        name: String,
        email: Email,
        password_hash: String,
        role: Role,
    ) -> Result<User, StoreError> {
        self.with_conn(move |conn| {
            let user = User {
                id: UserId::new(),
                name,
                email,
                password_hash,
                role,
                created_at: Utc::now(),
            };
            conn.execute(
                "INSERT INTO users(id, name, email, password_hash, role, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    user.id.to_string(),
                    user.name,
                    user.email.as_str(),
                    user.password_hash,
                    user.role.as_str(),
                    encode_ts(user.created_at),
                ],
            )
            .map_err(|e| {
                if email_conflict(&e) {
                    StoreError::EmailTaken
                } else {
                    StoreError::from(e)
                }
            })?;
            Ok(user)
        })
        .await
    }

    pub async fn user_by_email(&self, email: Email) -> Result<Option<User>, StoreError> {
        self.with_conn(move |conn| {
            conn.query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
                params![email.as_str()],
                |row| Ok(user_from_row(row)),
            )
            .optional()?
            .transpose()
        })
        .await
    }

    pub async fn user_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        self.with_conn(move |conn| {
            conn.query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
                params![id.to_string()],
                |row| Ok(user_from_row(row)),
            )
            .optional()?
            .transpose()
        })
        .await
    }

    /// Flips wishlist membership for `(user, book)` inside one transaction:
    /// present -> removed, absent -> appended. Applying it twice restores the
    /// original membership. Returns the wishlist in insertion order.
    pub async fn toggle_wishlist(
        &self,
        user: UserId,
        book: BookId,
    ) -> Result<Vec<BookId>, StoreError> {
        self.with_conn(move |conn| {
            let tx = conn.transaction()?;
            let removed = tx.execute(
                "DELETE FROM wishlist WHERE user_id = ?1 AND book_id = ?2",
                params![user.to_string(), book.to_string()],
            )?;
            if removed == 0 {
                tx.execute(
                    "INSERT INTO wishlist(user_id, book_id, added_at) VALUES (?1, ?2, ?3)",
                    params![user.to_string(), book.to_string(), encode_ts(Utc::now())],
                )?;
            }
            let ids = wishlist_ids(&tx, user)?;
            tx.commit()?;
            Ok(ids)
        })
        .await
    }

    /// Resolves the wishlist to full book records; ids pointing at
    /// since-deleted books are dropped.
    pub async fn wishlist_books(&self, user: UserId) -> Result<Vec<Book>, StoreError> {
        self.with_conn(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {BOOK_COLUMNS} FROM books b
                 JOIN wishlist w ON w.book_id = b.id
                 WHERE w.user_id = ?1
                 ORDER BY w.added_at, w.rowid"
            ))?;
            let rows = stmt.query_map(params![user.to_string()], |row| Ok(book_from_row(row)))?;
            let mut books = Vec::new();
            for row in rows {
                books.push(row??);
            }
            let mut reviews = load_reviews(conn, &books.iter().map(|b| b.id).collect::<Vec<_>>())?;
            for book in &mut books {
                book.reviews = reviews.remove(&book.id).unwrap_or_default();
            }
            Ok(books)
        })
        .await
    }
}

fn wishlist_ids(conn: &Connection, user: UserId) -> Result<Vec<BookId>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT book_id FROM wishlist WHERE user_id = ?1 ORDER BY added_at, rowid",
    )?;
    let rows = stmt.query_map(params![user.to_string()], |row| row.get::<_, String>(0))?;
    let mut ids = Vec::new();
    for raw in rows {
        let raw = raw?;
        ids.push(BookId::parse(&raw).map_err(|e| StoreError::Corrupt(e.to_string()))?);
    }
    Ok(ids)
}
