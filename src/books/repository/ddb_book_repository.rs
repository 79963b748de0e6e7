use std::cmp;
use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::update_item::{UpdateItemError, UpdateItemOutput};
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use tracing::debug;
use uuid::Uuid;

use crate::books::domain::model::{BookEntity, BookPatch, NewBook};
use crate::books::repository::{validate_id, BookRepository};
use crate::core::library::{LibraryError, LibraryResult, PaginatedResult};
use crate::core::repository::Collection;
use crate::utils::ddb::{from_ddb, is_service_error, parse_float_attribute, parse_item, parse_string_attribute, to_ddb_page};

const SCAN_PAGE_SIZE: usize = 500;

#[derive(Debug)]
pub struct DDBBookRepository {
    client: Client,
    table_name: String,
}

impl DDBBookRepository {
    pub(crate) fn new(client: Client, table_name: &str) -> Self {
        Self {
            client,
            table_name: table_name.to_string(),
        }
    }

    async fn scan(&self, page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<BookEntity>> {
        let table_name: &str = self.table_name.as_ref();
        let exclusive_start_key = to_ddb_page(page);
        let res = self.client
            .scan()
            .table_name(table_name)
            .consistent_read(true)
            .set_exclusive_start_key(exclusive_start_key)
            .limit(cmp::min(page_size, SCAN_PAGE_SIZE) as i32)
            .send()
            .await?;
        let records = res.items().unwrap_or_default().iter()
            .map(map_to_book).collect::<LibraryResult<Vec<BookEntity>>>()?;
        Ok(from_ddb(page, page_size, res.last_evaluated_key(), records))
    }
}

#[async_trait]
impl Collection<BookEntity, NewBook, BookPatch> for DDBBookRepository {
    async fn create(&self, input: &NewBook) -> LibraryResult<BookEntity> {
        let table_name: &str = self.table_name.as_ref();
        let book = BookEntity::new(Uuid::new_v4().to_string().as_str(), input);
        let val = serde_json::to_value(&book)?;
        self.client
            .put_item()
            .table_name(table_name)
            .condition_expression("attribute_not_exists(id)")
            .set_item(Some(parse_item(val)?))
            .send()
            .await?;
        debug!(book_id = book.id.as_str(), table = table_name, "stored book");
        Ok(book)
    }

    async fn find(&self) -> LibraryResult<Vec<BookEntity>> {
        let mut books = vec![];
        let mut page: Option<String> = None;
        loop {
            let res = self.scan(page.as_deref(), SCAN_PAGE_SIZE).await?;
            books.extend(res.records);
            match res.next_page {
                Some(next) => page = Some(next),
                None => break,
            }
        }
        Ok(books)
    }

    async fn find_by_id(&self, id: &str) -> LibraryResult<Option<BookEntity>> {
        validate_id(id)?;
        let table_name: &str = self.table_name.as_ref();
        let res = self.client
            .get_item()
            .table_name(table_name)
            .key("id", AttributeValue::S(id.to_string()))
            .consistent_read(true)
            .send()
            .await?;
        res.item().map(map_to_book).transpose()
    }

    async fn find_by_id_and_delete(&self, id: &str) -> LibraryResult<Option<BookEntity>> {
        validate_id(id)?;
        let table_name: &str = self.table_name.as_ref();
        let res = self.client
            .delete_item()
            .table_name(table_name)
            .key("id", AttributeValue::S(id.to_string()))
            .return_values(ReturnValue::AllOld)
            .send()
            .await?;
        res.attributes().map(map_to_book).transpose()
    }

    // Note you cannot use certain reserved words per https://docs.aws.amazon.com/amazondynamodb/latest/developerguide/ReservedWords.html
    // so every attribute goes through a #name placeholder.
    async fn find_by_id_and_update(&self, id: &str, patch: &BookPatch) -> LibraryResult<Option<BookEntity>> {
        validate_id(id)?;
        if patch.is_empty() {
            return self.find_by_id(id).await;
        }
        let table_name: &str = self.table_name.as_ref();
        let mut request = self.client
            .update_item()
            .table_name(table_name)
            .key("id", AttributeValue::S(id.to_string()))
            .condition_expression("attribute_exists(#id)")
            .expression_attribute_names("#id", "id")
            .return_values(ReturnValue::AllNew);

        let mut assignments = vec![];
        for (name, value) in parse_item(serde_json::to_value(patch)?)? {
            assignments.push(format!("#{} = :{}", name, name));
            request = request
                .expression_attribute_names(format!("#{}", name), name.as_str())
                .expression_attribute_values(format!(":{}", name), value);
        }
        request = request.update_expression(format!("SET {}", assignments.join(", ")));

        let res = updated_attributes(request.send().await)?;
        if res.is_none() {
            debug!(book_id = id, table = table_name, "update skipped for missing book");
        }
        Ok(res)
    }
}

#[async_trait]
impl BookRepository for DDBBookRepository {}

// A failed `attribute_exists(#id)` condition means there was no book to update.
fn updated_attributes(res: Result<UpdateItemOutput, SdkError<UpdateItemError>>) -> LibraryResult<Option<BookEntity>> {
    match res {
        Ok(out) => out.attributes().map(map_to_book).transpose(),
        Err(err) if is_service_error(&err, UpdateItemError::is_conditional_check_failed_exception) => Ok(None),
        Err(err) => Err(LibraryError::from(err)),
    }
}

fn map_to_book(map: &HashMap<String, AttributeValue>) -> LibraryResult<BookEntity> {
    let malformed = |field: &str| LibraryError::serialization(format!("book item without valid {}", field).as_str());
    let id = parse_string_attribute("id", map).ok_or_else(|| malformed("id"))?;
    let price = parse_float_attribute("price", map).ok_or_else(|| malformed("price"))?;
    let category = parse_string_attribute("category", map).ok_or_else(|| malformed("category"))?;
    Ok(BookEntity {
        id,
        title: parse_string_attribute("title", map).unwrap_or_default(),
        description: parse_string_attribute("description", map).unwrap_or_default(),
        author: parse_string_attribute("author", map).unwrap_or_default(),
        price,
        category: category.parse()?,
        user: parse_string_attribute("user", map),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use async_once::AsyncOnce;
    use aws_sdk_dynamodb::Client;
    use aws_sdk_dynamodb::error::SdkError;
    use aws_sdk_dynamodb::operation::update_item::{UpdateItemError, UpdateItemOutput};
    use aws_sdk_dynamodb::types::AttributeValue;
    use aws_sdk_dynamodb::types::error::ConditionalCheckFailedException;
    use aws_smithy_http::body::SdkBody;
    use aws_smithy_http::operation;
    use axum::http::Response;
    use lazy_static::lazy_static;

    use crate::books::domain::model::{BookPatch, NewBook};
    use crate::books::repository::ddb_book_repository::{map_to_book, updated_attributes, DDBBookRepository};
    use crate::core::domain::Configuration;
    use crate::core::library::{Category, LibraryError};
    use crate::core::repository::{Collection, RepositoryStore};
    use crate::utils::ddb::{build_db_client, create_table, delete_table};

    lazy_static! {
        static ref CLIENT: AsyncOnce<Client> = AsyncOnce::new(async {
                let config = Configuration::new("test", RepositoryStore::LocalDynamoDB);
                let client = build_db_client(&config).await;
                let _ = delete_table(&client, "books").await;
                let _ = create_table(&client, "books", "id").await;
                client
            });
    }

    fn new_book(title: &str) -> NewBook {
        NewBook::new(title, "test description", "test author", 10.0, Category::Adventure)
    }

    #[tokio::test]
    async fn test_should_map_item_to_book() {
        let item = HashMap::from([
            ("id".to_string(), AttributeValue::S("124626".to_string())),
            ("title".to_string(), AttributeValue::S("New Book".to_string())),
            ("price".to_string(), AttributeValue::N("100".to_string())),
            ("category".to_string(), AttributeValue::S("Fantasy".to_string())),
            ("user".to_string(), AttributeValue::Null(true)),
        ]);
        let book = map_to_book(&item).expect("should map book");
        assert_eq!("124626", book.id.as_str());
        assert_eq!(100.0, book.price);
        assert_eq!(Category::Fantasy, book.category);
        assert_eq!(None, book.user);
    }

    fn stored_item() -> HashMap<String, AttributeValue> {
        HashMap::from([
            ("id".to_string(), AttributeValue::S("124626".to_string())),
            ("price".to_string(), AttributeValue::N("100".to_string())),
            ("category".to_string(), AttributeValue::S("Fantasy".to_string())),
        ])
    }

    #[tokio::test]
    async fn test_should_reject_malformed_items() {
        for field in ["id", "price", "category"] {
            let mut item = stored_item();
            item.remove(field);
            assert!(matches!(map_to_book(&item), Err(LibraryError::Serialization { .. })), "{}", field);
        }
        let mut item = stored_item();
        item.insert("price".to_string(), AttributeValue::N("ten".to_string()));
        assert!(matches!(map_to_book(&item), Err(LibraryError::Serialization { .. })));
        item.insert("price".to_string(), AttributeValue::S("10".to_string()));
        assert!(matches!(map_to_book(&item), Err(LibraryError::Serialization { .. })));
    }

    #[tokio::test]
    async fn test_should_skip_update_when_condition_fails() {
        let failed: SdkError<UpdateItemError> = SdkError::service_error(
            UpdateItemError::ConditionalCheckFailedException(ConditionalCheckFailedException::builder().build()),
            operation::Response::new(Response::new(SdkBody::empty())));
        assert_eq!(None, updated_attributes(Err(failed)).expect("should pass absence through"));

        let timeout: SdkError<UpdateItemError> = SdkError::timeout_error("timed out");
        assert!(matches!(updated_attributes(Err(timeout)), Err(LibraryError::CurrentlyUnavailable { .. })));

        let out = UpdateItemOutput::builder().set_attributes(Some(stored_item())).build();
        let book = updated_attributes(Ok(out)).expect("should map book").expect("should return book");
        assert_eq!("124626", book.id.as_str());
    }

    #[tokio::test]
    #[ignore = "requires DynamoDB Local on localhost:8000"]
    async fn test_should_create_get_books() {
        let books_repo = DDBBookRepository::new(CLIENT.get().await.clone(), "books");
        let book = books_repo.create(&new_book("test book")).await.expect("should create book");

        let loaded = books_repo.find_by_id(book.id.as_str()).await.expect("should return book");
        assert_eq!(Some(book), loaded);
        assert_eq!(None, books_repo.find_by_id("missing").await.expect("should query book"));
    }

    #[tokio::test]
    #[ignore = "requires DynamoDB Local on localhost:8000"]
    async fn test_should_create_update_books() {
        let books_repo = DDBBookRepository::new(CLIENT.get().await.clone(), "books");
        let book = books_repo.create(&new_book("test book")).await.expect("should create book");

        let patch = BookPatch {
            title: Some("new title".to_string()),
            category: Some(Category::Classics),
            ..BookPatch::default()
        };
        let updated = books_repo.find_by_id_and_update(book.id.as_str(), &patch)
            .await.expect("should update book").expect("should return book");
        assert_eq!("new title", updated.title.as_str());
        assert_eq!(Category::Classics, updated.category);
        assert_eq!(book.author, updated.author);

        let missing = books_repo.find_by_id_and_update("missing", &patch).await.expect("should skip update");
        assert_eq!(None, missing);
    }

    #[tokio::test]
    #[ignore = "requires DynamoDB Local on localhost:8000"]
    async fn test_should_create_scan_books() {
        let books_repo = DDBBookRepository::new(CLIENT.get().await.clone(), "books");
        for i in 0..20 {
            let _ = books_repo.create(&new_book(format!("title_{}", i).as_str())).await.expect("should create book");
        }
        let res = books_repo.scan(None, 10).await.expect("should return books");
        assert_eq!(10, res.records.len());
        assert!(res.next_page.is_some());
        let all = books_repo.find().await.expect("should return books");
        assert!(all.len() >= 20);
    }

    #[tokio::test]
    #[ignore = "requires DynamoDB Local on localhost:8000"]
    async fn test_should_create_delete_books() {
        let books_repo = DDBBookRepository::new(CLIENT.get().await.clone(), "books");
        let book = books_repo.create(&new_book("test book")).await.expect("should create book");

        let deleted = books_repo.find_by_id_and_delete(book.id.as_str()).await.expect("should delete book");
        assert_eq!(Some(book.clone()), deleted);

        let loaded = books_repo.find_by_id(book.id.as_str()).await.expect("should query book");
        assert_eq!(None, loaded);
    }
}
