use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;
use std::sync::Arc;

use budgetwatch_core::categories::{Category, CategoryRepositoryTrait, NewCategory};
use budgetwatch_core::{Error, Result};

use super::model::{CategoryDB, NewCategoryDB};
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::categories;

pub struct CategoryRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl CategoryRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl CategoryRepositoryTrait for CategoryRepository {
    fn get_by_id(&self, category_id: i64) -> Result<Option<Category>> {
        let mut conn = get_connection(&self.pool)?;
        let category = categories::table
            .find(category_id)
            .select(CategoryDB::as_select())
            .first::<CategoryDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(category.map(Category::from))
    }

    async fn create(&self, new_category: NewCategory) -> Result<Category> {
        new_category.validate()?;
        let row: NewCategoryDB = new_category.into();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Category> {
                let created = diesel::insert_into(categories::table)
                    .values(&row)
                    .returning(CategoryDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(Category::from(created))
            })
            .await
    }

    async fn set_active(&self, category_id: i64, is_active: bool) -> Result<Category> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Category> {
                let updated = diesel::update(categories::table.find(category_id))
                    .set(categories::is_active.eq(is_active))
                    .returning(CategoryDB::as_returning())
                    .get_result(conn)
                    .optional()
                    .map_err(StorageError::from)?;
                updated
                    .map(Category::from)
                    .ok_or_else(|| Error::not_found("Category", category_id))
            })
            .await
    }
}
