pub mod ddb_book_repository;
pub mod memory_book_repository;

use async_trait::async_trait;
use crate::books::domain::Book;
use crate::books::domain::model::{BookEntity, BookPatch, NewBook};
use crate::core::library::{LibraryError, LibraryResult};
use crate::core::repository::Collection;

#[async_trait]
pub trait BookRepository: Collection<BookEntity, NewBook, BookPatch> {
    async fn find_by_keyword(&self, keyword: &str) -> LibraryResult<Vec<BookEntity>> {
        let books = self.find().await?;
        Ok(books.into_iter().filter(|b| b.matches_keyword(keyword)).collect())
    }
}

pub(crate) fn validate_id(id: &str) -> LibraryResult<()> {
    if id.trim().is_empty() {
        return Err(LibraryError::validation("book id must not be empty", None));
    }
    Ok(())
}
