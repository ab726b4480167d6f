use async_trait::async_trait;

use super::categories_model::{Category, NewCategory};
use crate::errors::Result;

/// Trait for category repository operations
#[async_trait]
pub trait CategoryRepositoryTrait: Send + Sync {
    fn get_by_id(&self, category_id: i64) -> Result<Option<Category>>;
    async fn create(&self, new_category: NewCategory) -> Result<Category>;
    async fn set_active(&self, category_id: i64, is_active: bool) -> Result<Category>;
}
