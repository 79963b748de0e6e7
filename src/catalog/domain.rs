pub mod service;

use async_trait::async_trait;
use crate::books::domain::model::{BookPatch, NewBook};
use crate::books::dto::BookDto;
use crate::core::library::LibraryResult;

/// Typed surface over the books collection.
///
/// Only `find_by_id` treats a missing book as an error. `delete_by_id` and
/// `update_by_id` hand back whatever the collection reports, `None` included.
#[async_trait]
pub trait CatalogService: Sync + Send {
    async fn create(&self, book: &NewBook) -> LibraryResult<BookDto>;
    async fn find_all(&self) -> LibraryResult<Vec<BookDto>>;
    async fn find_by_id(&self, id: &str) -> LibraryResult<BookDto>;
    async fn delete_by_id(&self, id: &str) -> LibraryResult<Option<BookDto>>;
    async fn update_by_id(&self, id: &str, patch: &BookPatch) -> LibraryResult<Option<BookDto>>;
    async fn search(&self, keyword: &str) -> LibraryResult<Vec<BookDto>>;
}
