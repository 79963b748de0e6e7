use std::sync::Arc;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::books::domain::model::NewBook;
use crate::books::dto::BookDto;
use crate::catalog::domain::CatalogService;
use crate::core::command::{Command, CommandError};
use crate::core::library::Category;

pub(crate) struct AddBookCommand {
    catalog_service: Arc<dyn CatalogService>,
}

impl AddBookCommand {
    pub(crate) fn new(catalog_service: Arc<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct AddBookCommandRequest {
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) author: String,
    pub(crate) price: f64,
    pub(crate) category: Category,
    #[serde(default)]
    pub(crate) user: Option<String>,
}

impl AddBookCommandRequest {
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

    pub fn build_book(&self) -> NewBook {
        NewBook {
            title: self.title.to_string(),
            description: self.description.to_string(),
            author: self.author.to_string(),
            price: self.price,
            category: self.category,
            user: self.user.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct AddBookCommandResponse {
    pub book: BookDto,
}

impl AddBookCommandResponse {
    pub fn new(book: BookDto) -> Self {
        Self {
            book,
        }
    }
}

#[async_trait]
impl Command<AddBookCommandRequest, AddBookCommandResponse> for AddBookCommand {
    async fn execute(&self, req: AddBookCommandRequest) -> Result<AddBookCommandResponse, CommandError> {
        let book = req.build_book();
        self.catalog_service.create(&book).await.map_err(CommandError::from).map(AddBookCommandResponse::new)
    }
}
