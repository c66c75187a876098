#![forbid(unsafe_code)]
//! Seeds the catalog with a starter shelf of books. Wipes existing books
//! first, so point it at a scratch database.

use lumina_model::BookDraft;
use lumina_store::Store;
use std::env;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn starter_shelf() -> Vec<(&'static str, &'static str, &'static str, f64, &'static str)> {
    vec![
        (
            "The Great Gatsby",
            "F. Scott Fitzgerald",
            "A novel set in the Jazz Age that tells the story of Jay Gatsby's unrequited love for Daisy Buchanan.",
            12.99,
            "Fiction",
        ),
        (
            "1984",
            "George Orwell",
            "A dystopian social science fiction novel and cautionary tale about the future.",
            14.99,
            "Sci-Fi",
        ),
        (
            "To Kill a Mockingbird",
            "Harper Lee",
            "A novel about the serious issues of rape and racial inequality.",
            10.99,
            "Fiction",
        ),
        (
            "Pride and Prejudice",
            "Jane Austen",
            "A romantic novel of manners written by Jane Austen.",
            9.99,
            "Romance",
        ),
        (
            "The Catcher in the Rye",
            "J.D. Salinger",
            "A story about adolescent alienation and loss of innocence.",
            11.99,
            "Fiction",
        ),
        (
            "Dune",
            "Frank Herbert",
            "Set on the desert planet Arrakis, Dune is the story of the boy Paul Atreides.",
            18.99,
            "Sci-Fi",
        ),
        (
            "Thinking, Fast and Slow",
            "Daniel Kahneman",
            "The major New York Times bestseller that explains the two systems that drive the way we think.",
            16.99,
            "Business",
        ),
    ]
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let db_path = env::var("LUMINA_DB_PATH").unwrap_or_else(|_| "lumina.sqlite".to_string());
    let store = Store::open(std::path::Path::new(&db_path))
        .map_err(|e| format!("failed to open store: {e}"))?;

    let cleared = store
        .clear_books()
        .await
        .map_err(|e| format!("failed to clear books: {e}"))?;
    info!("cleared {cleared} existing books");

    for (title, author, description, price, category) in starter_shelf() {
        let draft = BookDraft::new(
            title.to_string(),
            author.to_string(),
            Some(description.to_string()),
            price,
            Some(category.to_string()),
        )
        .map_err(|e| format!("bad seed record {title:?}: {e}"))?;
        let book = store
            .insert_book(draft)
            .await
            .map_err(|e| format!("failed to seed {title:?}: {e}"))?;
        info!(book = %book.id, title, "seeded");
    }
    info!("seeded {} books into {db_path}", starter_shelf().len());
    Ok(())
}
