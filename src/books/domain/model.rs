use serde::{Deserialize, Serialize};
use crate::books::domain::Book;
use crate::core::library::Category;

// BookEntity is a catalog record as stored in the books collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookEntity {
    pub id: String,
    pub title: String,
    pub description: String,
    pub author: String,
    pub price: f64,
    pub category: Category,
    // owner reference
    pub user: Option<String>,
}

impl BookEntity {
    pub fn new(id: &str, input: &NewBook) -> Self {
        Self {
            id: id.to_string(),
            title: input.title.to_string(),
            description: input.description.to_string(),
            author: input.author.to_string(),
            price: input.price,
            category: input.category,
            user: input.user.clone(),
        }
    }
}

impl Book for BookEntity {
    fn title(&self) -> &str {
        self.title.as_str()
    }
}

// NewBook carries every book field except the store-assigned id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBook {
    pub title: String,
    pub description: String,
    pub author: String,
    pub price: f64,
    pub category: Category,
    #[serde(default)]
    pub user: Option<String>,
}

impl NewBook {
    pub fn new(title: &str, description: &str, author: &str, price: f64, category: Category) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            author: author.to_string(),
            price,
            category,
            user: None,
        }
    }
}

/// Partial update for a book. Present fields overwrite the stored value,
/// absent fields are kept. The id is not patchable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

impl BookPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.author.is_none()
            && self.price.is_none() && self.category.is_none() && self.user.is_none()
    }

    pub fn apply(&self, book: &mut BookEntity) {
        if let Some(title) = &self.title {
            book.title = title.to_string();
        }
        if let Some(description) = &self.description {
            book.description = description.to_string();
        }
        if let Some(author) = &self.author {
            book.author = author.to_string();
        }
        if let Some(price) = self.price {
            book.price = price;
        }
        if let Some(category) = self.category {
            book.category = category;
        }
        if let Some(user) = &self.user {
            book.user = Some(user.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::books::domain::Book;
    use crate::books::domain::model::{BookEntity, BookPatch, NewBook};
    use crate::core::library::Category;

    fn stored_book() -> BookEntity {
        let mut input = NewBook::new("New Book", "Book Description", "Author", 100.0, Category::Fantasy);
        input.user = Some("zzgrjgiods,vp".to_string());
        BookEntity::new("124626", &input)
    }

    #[tokio::test]
    async fn test_should_build_book() {
        let book = stored_book();
        assert_eq!("124626", book.id.as_str());
        assert_eq!("New Book", book.title.as_str());
        assert_eq!(Category::Fantasy, book.category);
        assert_eq!(Some("zzgrjgiods,vp".to_string()), book.user);
    }

    #[tokio::test]
    async fn test_should_merge_patch_fields() {
        let mut book = stored_book();
        let patch = BookPatch {
            title: Some("Updated Book".to_string()),
            price: Some(200.0),
            category: Some(Category::Classics),
            ..BookPatch::default()
        };
        patch.apply(&mut book);
        assert_eq!("124626", book.id.as_str());
        assert_eq!("Updated Book", book.title.as_str());
        assert_eq!(200.0, book.price);
        assert_eq!(Category::Classics, book.category);
        assert_eq!("Book Description", book.description.as_str());
        assert_eq!("Author", book.author.as_str());
        assert_eq!(Some("zzgrjgiods,vp".to_string()), book.user);
    }

    #[tokio::test]
    async fn test_should_keep_book_for_empty_patch() {
        let mut book = stored_book();
        let patch = BookPatch::default();
        assert!(patch.is_empty());
        patch.apply(&mut book);
        assert_eq!(stored_book(), book);
    }

    #[tokio::test]
    async fn test_should_skip_absent_fields_when_serializing_patch() {
        let patch: BookPatch = serde_json::from_str(r#"{"title": "Updated Book", "id": "999"}"#)
            .expect("should parse patch");
        assert_eq!(Some("Updated Book".to_string()), patch.title);
        let json = serde_json::to_value(&patch).expect("should serialize patch");
        assert_eq!(serde_json::json!({"title": "Updated Book"}), json);
    }

    #[tokio::test]
    async fn test_should_match_keyword_ignoring_case() {
        let book = stored_book();
        assert!(book.matches_keyword("new"));
        assert!(book.matches_keyword("BOOK"));
        assert!(book.matches_keyword(""));
        assert!(!book.matches_keyword("lupin"));
    }
}
