#![forbid(unsafe_code)]
//! Wire contract for the Lumina bookstore API: request DTOs, the error
//! envelope, and its HTTP status mapping. Nothing in here touches storage or
//! the network.

mod dto;
mod error_mapping;
mod errors;
mod params;

pub use dto::{
    BookCreateDto, BookUpdateDto, CreateIntentDto, LineItemDto, LoginDto, OrderCreateDto,
    ReviewDto, SignupDto,
};
pub use error_mapping::map_error;
pub use errors::{ApiError, ApiErrorCode};
pub use params::{parse_list_books_params, ListBooksParams, CATEGORY_ALL};

pub const CRATE_NAME: &str = "lumina-api";
