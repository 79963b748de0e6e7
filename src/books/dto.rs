use serde::{Deserialize, Serialize};
use crate::books::domain::model::BookEntity;
use crate::core::library::Category;

// BookDto is a data transfer object for Catalog service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookDto {
    pub id: String,
    pub title: String,
    pub description: String,
    pub author: String,
    pub price: f64,
    pub category: Category,
    pub user: Option<String>,
}

impl From<&BookEntity> for BookDto {
    fn from(other: &BookEntity) -> Self {
        Self {
            id: other.id.to_string(),
            title: other.title.to_string(),
            description: other.description.to_string(),
            author: other.author.to_string(),
            price: other.price,
            category: other.category,
            user: other.user.clone(),
        }
    }
}
