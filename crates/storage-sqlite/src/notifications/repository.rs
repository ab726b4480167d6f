use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;
use std::sync::Arc;

use budgetwatch_core::notifications::{NotificationPreference, NotificationRepositoryTrait};
use budgetwatch_core::Result;

use super::model::NotificationPreferenceDB;
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::notification_preferences;

pub struct NotificationRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl NotificationRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl NotificationRepositoryTrait for NotificationRepository {
    fn get_preferences(&self, user_id: i64) -> Result<Option<NotificationPreference>> {
        let mut conn = get_connection(&self.pool)?;
        notification_preferences::table
            .find(user_id)
            .select(NotificationPreferenceDB::as_select())
            .first::<NotificationPreferenceDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?
            .map(NotificationPreference::try_from)
            .transpose()
    }

    async fn save_preferences(
        &self,
        preference: NotificationPreference,
    ) -> Result<NotificationPreference> {
        let row = NotificationPreferenceDB::from(&preference);
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<NotificationPreference> {
                diesel::insert_into(notification_preferences::table)
                    .values(&row)
                    .on_conflict(notification_preferences::user_id)
                    .do_update()
                    .set(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(preference)
            })
            .await
    }
}
