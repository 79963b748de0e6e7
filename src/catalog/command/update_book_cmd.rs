use std::sync::Arc;
use async_trait::async_trait;
use serde::Serialize;
use crate::books::domain::model::BookPatch;
use crate::books::dto::BookDto;
use crate::catalog::domain::CatalogService;
use crate::core::command::{Command, CommandError};

pub(crate) struct UpdateBookCommand {
    catalog_service: Arc<dyn CatalogService>,
}

impl UpdateBookCommand {
    pub(crate) fn new(catalog_service: Arc<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

#[derive(Debug)]
pub(crate) struct UpdateBookCommandRequest {
    pub book_id: String,
    pub patch: BookPatch,
}

impl UpdateBookCommandRequest {
    pub fn new(book_id: &str, patch: BookPatch) -> Self {
        Self {
            book_id: book_id.to_string(),
            patch,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct UpdateBookCommandResponse {
    // None when the collection had no such book
    pub book: Option<BookDto>,
}

impl UpdateBookCommandResponse {
    pub fn new(book: Option<BookDto>) -> Self {
        Self {
            book,
        }
    }
}

#[async_trait]
impl Command<UpdateBookCommandRequest, UpdateBookCommandResponse> for UpdateBookCommand {
    async fn execute(&self, req: UpdateBookCommandRequest) -> Result<UpdateBookCommandResponse, CommandError> {
        self.catalog_service.update_by_id(req.book_id.as_str(), &req.patch)
            .await.map_err(CommandError::from).map(UpdateBookCommandResponse::new)
    }
}
