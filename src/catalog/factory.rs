use crate::books::factory;
use crate::catalog::domain::CatalogService;
use crate::catalog::domain::service::CatalogServiceImpl;
use crate::core::domain::Configuration;

pub async fn create_catalog_service(config: &Configuration) -> Box<dyn CatalogService> {
    let book_repo = factory::create_book_repository(config).await;
    Box::new(CatalogServiceImpl::new(book_repo))
}
