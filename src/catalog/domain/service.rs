use async_trait::async_trait;
use crate::books::domain::model::{BookPatch, NewBook};
use crate::books::dto::BookDto;
use crate::books::repository::BookRepository;
use crate::catalog::domain::CatalogService;
use crate::core::library::{LibraryError, LibraryResult};

pub(crate) struct CatalogServiceImpl {
    book_repository: Box<dyn BookRepository>,
}

impl CatalogServiceImpl {
    pub(crate) fn new(book_repository: Box<dyn BookRepository>) -> Self {
        Self {
            book_repository,
        }
    }
}

#[async_trait]
impl CatalogService for CatalogServiceImpl {
    async fn create(&self, book: &NewBook) -> LibraryResult<BookDto> {
        self.book_repository.create(book).await.map(|b| BookDto::from(&b))
    }

    async fn find_all(&self) -> LibraryResult<Vec<BookDto>> {
        let books = self.book_repository.find().await?;
        Ok(books.iter().map(BookDto::from).collect())
    }

    async fn find_by_id(&self, id: &str) -> LibraryResult<BookDto> {
        match self.book_repository.find_by_id(id).await? {
            Some(book) => Ok(BookDto::from(&book)),
            None => Err(LibraryError::not_found(format!("book not found for {}", id).as_str(), Some(id.to_string()))),
        }
    }

    async fn delete_by_id(&self, id: &str) -> LibraryResult<Option<BookDto>> {
        let deleted = self.book_repository.find_by_id_and_delete(id).await?;
        Ok(deleted.as_ref().map(BookDto::from))
    }

    async fn update_by_id(&self, id: &str, patch: &BookPatch) -> LibraryResult<Option<BookDto>> {
        let updated = self.book_repository.find_by_id_and_update(id, patch).await?;
        Ok(updated.as_ref().map(BookDto::from))
    }

    async fn search(&self, keyword: &str) -> LibraryResult<Vec<BookDto>> {
        let books = self.book_repository.find_by_keyword(keyword).await?;
        Ok(books.iter().map(BookDto::from).collect())
    }
}
