use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use budgetwatch_core::notifications::NotificationPreference;
use budgetwatch_core::{Error, Result};

use crate::utils::{decimal_to_text, text_to_decimal};

#[derive(
    Queryable,
    Identifiable,
    Insertable,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::notification_preferences)]
#[diesel(primary_key(user_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct NotificationPreferenceDB {
    pub user_id: i64,
    pub enable_in_app: bool,
    pub enable_email: bool,
    pub enable_sms: bool,
    pub notify_at_low: String,
    pub notify_at_medium: String,
    pub notify_at_high: String,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<NotificationPreferenceDB> for NotificationPreference {
    type Error = Error;

    fn try_from(db: NotificationPreferenceDB) -> Result<Self> {
        Ok(Self {
            user_id: db.user_id,
            enable_in_app: db.enable_in_app,
            enable_email: db.enable_email,
            enable_sms: db.enable_sms,
            notify_at_low: text_to_decimal("notify_at_low", &db.notify_at_low)?,
            notify_at_medium: text_to_decimal("notify_at_medium", &db.notify_at_medium)?,
            notify_at_high: text_to_decimal("notify_at_high", &db.notify_at_high)?,
            updated_at: db.updated_at,
        })
    }
}

impl From<&NotificationPreference> for NotificationPreferenceDB {
    fn from(pref: &NotificationPreference) -> Self {
        Self {
            user_id: pref.user_id,
            enable_in_app: pref.enable_in_app,
            enable_email: pref.enable_email,
            enable_sms: pref.enable_sms,
            notify_at_low: decimal_to_text(pref.notify_at_low),
            notify_at_medium: decimal_to_text(pref.notify_at_medium),
            notify_at_high: decimal_to_text(pref.notify_at_high),
            updated_at: pref.updated_at,
        }
    }
}
