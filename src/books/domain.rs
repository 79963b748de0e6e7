pub mod model;

pub trait Book {
    fn title(&self) -> &str;

    // case-insensitive title match, an empty keyword matches everything
    fn matches_keyword(&self, keyword: &str) -> bool {
        keyword.is_empty() || self.title().to_lowercase().contains(&keyword.to_lowercase())
    }
}
