use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::books::domain::model::{BookEntity, BookPatch, NewBook};
use crate::books::repository::{validate_id, BookRepository};
use crate::core::library::LibraryResult;
use crate::core::repository::Collection;

// Books kept in insertion order, used for tests and the InMemory store.
#[derive(Debug, Default)]
pub struct MemoryBookRepository {
    books: RwLock<Vec<BookEntity>>,
}

impl MemoryBookRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_books(books: Vec<BookEntity>) -> Self {
        Self {
            books: RwLock::new(books),
        }
    }
}

#[async_trait]
impl Collection<BookEntity, NewBook, BookPatch> for MemoryBookRepository {
    async fn create(&self, input: &NewBook) -> LibraryResult<BookEntity> {
        let book = BookEntity::new(Uuid::new_v4().to_string().as_str(), input);
        self.books.write().await.push(book.clone());
        Ok(book)
    }

    async fn find(&self) -> LibraryResult<Vec<BookEntity>> {
        Ok(self.books.read().await.clone())
    }

    async fn find_by_id(&self, id: &str) -> LibraryResult<Option<BookEntity>> {
        validate_id(id)?;
        Ok(self.books.read().await.iter().find(|b| b.id == id).cloned())
    }

    async fn find_by_id_and_delete(&self, id: &str) -> LibraryResult<Option<BookEntity>> {
        validate_id(id)?;
        let mut books = self.books.write().await;
        Ok(books.iter().position(|b| b.id == id).map(|ndx| books.remove(ndx)))
    }

    async fn find_by_id_and_update(&self, id: &str, patch: &BookPatch) -> LibraryResult<Option<BookEntity>> {
        validate_id(id)?;
        let mut books = self.books.write().await;
        Ok(books.iter_mut().find(|b| b.id == id).map(|book| {
            patch.apply(book);
            book.clone()
        }))
    }
}

#[async_trait]
impl BookRepository for MemoryBookRepository {}

#[cfg(test)]
mod tests {
    use crate::books::domain::model::{BookPatch, NewBook};
    use crate::books::repository::BookRepository;
    use crate::books::repository::memory_book_repository::MemoryBookRepository;
    use crate::core::library::{Category, LibraryError};
    use crate::core::repository::Collection;

    #[tokio::test]
    async fn test_should_create_get_books() {
        let books_repo = MemoryBookRepository::new();
        let book = books_repo.create(&NewBook::new("title", "description", "author", 10.0, Category::Crime))
            .await.expect("should create book");
        assert!(!book.id.is_empty());

        let loaded = books_repo.find_by_id(book.id.as_str()).await.expect("should query book");
        assert_eq!(Some(book), loaded);
    }

    #[tokio::test]
    async fn test_should_keep_insertion_order() {
        let books_repo = MemoryBookRepository::new();
        for i in 0..5 {
            let _ = books_repo.create(&NewBook::new(format!("title_{}", i).as_str(), "d", "a", 1.0, Category::Crime))
                .await.expect("should create book");
        }
        let all = books_repo.find().await.expect("should list books");
        let titles: Vec<&str> = all.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(vec!["title_0", "title_1", "title_2", "title_3", "title_4"], titles);
    }

    #[tokio::test]
    async fn test_should_return_none_for_missing_books() {
        let books_repo = MemoryBookRepository::new();
        assert_eq!(None, books_repo.find_by_id("missing").await.expect("should query"));
        assert_eq!(None, books_repo.find_by_id_and_delete("missing").await.expect("should delete"));
        assert_eq!(None, books_repo.find_by_id_and_update("missing", &BookPatch::default()).await.expect("should update"));
    }

    #[tokio::test]
    async fn test_should_reject_empty_id() {
        let books_repo = MemoryBookRepository::new();
        let res = books_repo.find_by_id(" ").await;
        assert!(matches!(res, Err(LibraryError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_should_create_update_books() {
        let books_repo = MemoryBookRepository::new();
        let book = books_repo.create(&NewBook::new("title", "description", "author", 10.0, Category::Crime))
            .await.expect("should create book");
        let patch = BookPatch { author: Some("new author".to_string()), ..BookPatch::default() };
        let updated = books_repo.find_by_id_and_update(book.id.as_str(), &patch)
            .await.expect("should update book").expect("should find book");
        assert_eq!("new author", updated.author.as_str());
        assert_eq!(book.title, updated.title);

        let loaded = books_repo.find_by_id(book.id.as_str()).await.expect("should query book");
        assert_eq!(Some(updated), loaded);
    }

    #[tokio::test]
    async fn test_should_create_delete_books() {
        let books_repo = MemoryBookRepository::new();
        let book = books_repo.create(&NewBook::new("title", "description", "author", 10.0, Category::Crime))
            .await.expect("should create book");
        let deleted = books_repo.find_by_id_and_delete(book.id.as_str()).await.expect("should delete book");
        assert_eq!(Some(book.clone()), deleted);
        assert_eq!(None, books_repo.find_by_id(book.id.as_str()).await.expect("should query"));
        assert!(books_repo.find().await.expect("should list").is_empty());
    }

    #[tokio::test]
    async fn test_should_find_by_keyword() {
        let books_repo = MemoryBookRepository::new();
        let _ = books_repo.create(&NewBook::new("Arsène Lupin", "d", "a", 1.0, Category::Adventure)).await.expect("should create");
        let _ = books_repo.create(&NewBook::new("The Hobbit", "d", "a", 1.0, Category::Fantasy)).await.expect("should create");
        let res = books_repo.find_by_keyword("lupin").await.expect("should search");
        assert_eq!(1, res.len());
        assert_eq!("Arsène Lupin", res[0].title.as_str());
    }
}
