use crate::{Store, StoreError};
use lumina_model::{BookDraft, BookPatch, Email, LineItem, OrderStatus, Role};

fn email(raw: &str) -> Email {
    Email::parse(raw).expect("email")
}

fn draft(title: &str, author: &str, category: Option<&str>) -> BookDraft {
    BookDraft::new(
        title.to_string(),
        author.to_string(),
        None,
        9.99,
        category.map(ToString::to_string),
    )
    .expect("draft")
}

async fn seeded_user(store: &Store, addr: &str) -> lumina_model::User {
    store
        .create_user("Ada".to_string(), email(addr), "hash".to_string(), Role::User)
        .await
        .expect("create user")
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() {
    let store = Store::open_in_memory().expect("store");
    seeded_user(&store, "a@x.com").await;
    let err = store
        .create_user("Eve".to_string(), email("a@x.com"), "h2".to_string(), Role::User)
        .await
        .expect_err("duplicate email must fail");
    assert_eq!(err, StoreError::EmailTaken);
    // A different address is still fine.
    seeded_user(&store, "b@x.com").await;
}

#[tokio::test]
async fn user_lookup_by_email_and_id() {
    let store = Store::open_in_memory().expect("store");
    let user = seeded_user(&store, "a@x.com").await;
    let by_email = store
        .user_by_email(email("a@x.com"))
        .await
        .expect("query")
        .expect("present");
    assert_eq!(by_email.id, user.id);
    let by_id = store.user_by_id(user.id).await.expect("query").expect("present");
    assert_eq!(by_id.email.as_str(), "a@x.com");
    assert!(store
        .user_by_email(email("ghost@x.com"))
        .await
        .expect("query")
        .is_none());
}

#[tokio::test]
async fn wishlist_toggle_is_an_involution() {
    let store = Store::open_in_memory().expect("store");
    let user = seeded_user(&store, "a@x.com").await;
    let first = store.insert_book(draft("First", "A", None)).await.expect("book");
    let second = store.insert_book(draft("Second", "B", None)).await.expect("book");

    let after_add = store.toggle_wishlist(user.id, first.id).await.expect("toggle");
    assert_eq!(after_add, vec![first.id]);
    let after_second = store.toggle_wishlist(user.id, second.id).await.expect("toggle");
    assert_eq!(after_second, vec![first.id, second.id]);

    // Toggling the same pair again removes it, restoring the prior state.
    let after_remove = store.toggle_wishlist(user.id, first.id).await.expect("toggle");
    assert_eq!(after_remove, vec![second.id]);
    let restored = store.toggle_wishlist(user.id, first.id).await.expect("toggle");
    assert_eq!(restored, vec![second.id, first.id]);
}

#[tokio::test]
async fn wishlist_resolution_drops_deleted_books() {
    let store = Store::open_in_memory().expect("store");
    let user = seeded_user(&store, "a@x.com").await;
    let keep = store.insert_book(draft("Keep", "A", None)).await.expect("book");
    let gone = store.insert_book(draft("Gone", "B", None)).await.expect("book");
    store.toggle_wishlist(user.id, keep.id).await.expect("toggle");
    store.toggle_wishlist(user.id, gone.id).await.expect("toggle");

    assert!(store.delete_book(gone.id).await.expect("delete"));
    let books = store.wishlist_books(user.id).await.expect("wishlist");
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].id, keep.id);
}

#[tokio::test]
async fn search_matches_title_or_author_case_insensitively() {
    let store = Store::open_in_memory().expect("store");
    store
        .insert_book(draft("The Great Gatsby", "F. Scott Fitzgerald", None))
        .await
        .expect("book");
    store
        .insert_book(draft("Dune", "Frank Herbert", Some("Sci-Fi")))
        .await
        .expect("book");

    let by_title = store.list_books(Some("great".to_string()), None).await.expect("list");
    assert_eq!(by_title.len(), 1);
    assert_eq!(by_title[0].title, "The Great Gatsby");

    let by_author = store.list_books(Some("HERBERT".to_string()), None).await.expect("list");
    assert_eq!(by_author.len(), 1);
    assert_eq!(by_author[0].title, "Dune");

    assert!(store
        .list_books(Some("nothing".to_string()), None)
        .await
        .expect("list")
        .is_empty());
}

#[tokio::test]
async fn category_filter_is_exact_and_listing_is_newest_first() {
    let store = Store::open_in_memory().expect("store");
    let older = store.insert_book(draft("Older", "A", Some("Sci-Fi"))).await.expect("book");
    let newer = store.insert_book(draft("Newer", "B", Some("Sci-Fi"))).await.expect("book");
    store.insert_book(draft("Other", "C", None)).await.expect("book");

    let scifi = store
        .list_books(None, Some("Sci-Fi".to_string()))
        .await
        .expect("list");
    assert_eq!(
        scifi.iter().map(|b| b.id).collect::<Vec<_>>(),
        vec![newer.id, older.id]
    );

    let all = store.list_books(None, None).await.expect("list");
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].title, "Other");
}

#[tokio::test]
async fn update_patches_fields_and_misses_explicitly() {
    let store = Store::open_in_memory().expect("store");
    let book = store.insert_book(draft("T", "A", None)).await.expect("book");

    let patch = BookPatch {
        price: Some(3.5),
        category: Some("Classics".to_string()),
        ..BookPatch::default()
    };
    let updated = store
        .update_book(book.id, patch)
        .await
        .expect("update")
        .expect("present");
    assert_eq!(updated.price, 3.5);
    assert_eq!(updated.category, "Classics");
    assert_eq!(updated.title, "T");

    let missing = store
        .update_book(lumina_model::BookId::new(), BookPatch::default())
        .await
        .expect("update");
    assert!(missing.is_none());
}

#[tokio::test]
async fn review_append_is_guarded_and_range_free() {
    let store = Store::open_in_memory().expect("store");
    let book = store.insert_book(draft("T", "A", None)).await.expect("book");

    let after_first = store
        .add_review(book.id, "Ada".to_string(), 5, "ok".to_string())
        .await
        .expect("review")
        .expect("book present");
    assert_eq!(after_first.reviews.len(), 1);
    assert_eq!(after_first.reviews[0].reviewer, "Ada");

    // No rating-range validation: zero, negative, and >5 are all stored.
    for rating in [0, -3, 11] {
        store
            .add_review(book.id, "Ada".to_string(), rating, String::new())
            .await
            .expect("review")
            .expect("book present");
    }
    let reloaded = store.book_by_id(book.id).await.expect("get").expect("present");
    assert_eq!(reloaded.reviews.len(), 4);
    assert_eq!(
        reloaded.reviews.iter().map(|r| r.rating).collect::<Vec<_>>(),
        vec![5, 0, -3, 11]
    );

    let gone = store
        .add_review(lumina_model::BookId::new(), "Ada".to_string(), 1, String::new())
        .await
        .expect("review");
    assert!(gone.is_none());
}

#[tokio::test]
async fn order_transitions_are_guarded_in_place() {
    let store = Store::open_in_memory().expect("store");
    let user = seeded_user(&store, "a@x.com").await;
    let book = store.insert_book(draft("T", "A", None)).await.expect("book");
    let items = vec![LineItem {
        book: book.id,
        quantity: 2,
        price: 5.0,
        title: "T".to_string(),
        section: None,
    }];
    let order = store.create_order(user.id, items, 10.0).await.expect("order");
    assert_eq!(order.status, OrderStatus::Pending);

    store
        .set_payment_intent(order.id, "pi_123".to_string())
        .await
        .expect("intent");

    assert!(store
        .transition_order(order.id, OrderStatus::Pending, OrderStatus::Paid)
        .await
        .expect("transition"));
    // Already Paid: the guard refuses a second transition.
    assert!(!store
        .transition_order(order.id, OrderStatus::Pending, OrderStatus::Paid)
        .await
        .expect("transition"));

    let reloaded = store.order_by_id(order.id).await.expect("get").expect("present");
    assert_eq!(reloaded.status, OrderStatus::Paid);
    assert_eq!(reloaded.payment_intent.as_deref(), Some("pi_123"));
    assert_eq!(reloaded.items.len(), 1);
    assert_eq!(reloaded.total, 10.0);
}

#[tokio::test]
async fn my_orders_come_back_newest_first() {
    let store = Store::open_in_memory().expect("store");
    let user = seeded_user(&store, "a@x.com").await;
    let other = seeded_user(&store, "b@x.com").await;
    let first = store.create_order(user.id, Vec::new(), 1.0).await.expect("order");
    let second = store.create_order(user.id, Vec::new(), 2.0).await.expect("order");
    store.create_order(other.id, Vec::new(), 3.0).await.expect("order");

    let mine = store.orders_for_user(user.id).await.expect("orders");
    assert_eq!(
        mine.iter().map(|o| o.id).collect::<Vec<_>>(),
        vec![second.id, first.id]
    );
}

#[tokio::test]
async fn file_backed_store_survives_reopen() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("lumina.sqlite");
    {
        let store = Store::open(&path).expect("open");
        seeded_user(&store, "a@x.com").await;
    }
    let store = Store::open(&path).expect("reopen");
    assert!(store
        .user_by_email(email("a@x.com"))
        .await
        .expect("query")
        .is_some());
}
