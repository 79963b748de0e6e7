use std::sync::Arc;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::books::dto::BookDto;
use crate::catalog::domain::CatalogService;
use crate::core::command::{Command, CommandError};

pub(crate) struct ListBooksCommand {
    catalog_service: Arc<dyn CatalogService>,
}

impl ListBooksCommand {
    pub(crate) fn new(catalog_service: Arc<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListBooksCommandRequest {
    // optional title filter
    #[serde(default)]
    pub(crate) keyword: Option<String>,
}

impl ListBooksCommandRequest {
    pub fn new(keyword: Option<&str>) -> Self {
        Self {
            keyword: keyword.map(str::to_string),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ListBooksCommandResponse {
    pub books: Vec<BookDto>,
}

impl ListBooksCommandResponse {
    pub fn new(books: Vec<BookDto>) -> Self {
        Self {
            books,
        }
    }
}

#[async_trait]
impl Command<ListBooksCommandRequest, ListBooksCommandResponse> for ListBooksCommand {
    async fn execute(&self, req: ListBooksCommandRequest) -> Result<ListBooksCommandResponse, CommandError> {
        let res = match req.keyword {
            Some(keyword) => self.catalog_service.search(keyword.as_str()).await,
            None => self.catalog_service.find_all().await,
        };
        res.map_err(CommandError::from).map(ListBooksCommandResponse::new)
    }
}
