use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_NOTIFY_AT_HIGH, DEFAULT_NOTIFY_AT_LOW, DEFAULT_NOTIFY_AT_MEDIUM,
    MAX_CRITICAL_THRESHOLD, MAX_WARNING_THRESHOLD,
};
use crate::errors::{Result, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationChannel {
    InApp,
    Email,
    Sms,
}

/// How and when a user wants to hear about budget alerts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPreference {
    pub user_id: i64,
    pub enable_in_app: bool,
    pub enable_email: bool,
    pub enable_sms: bool,
    pub notify_at_low: Decimal,
    pub notify_at_medium: Decimal,
    pub notify_at_high: Decimal,
    pub updated_at: NaiveDateTime,
}

impl NotificationPreference {
    /// In-app only, at 50/80/100 percent.
    pub fn new(user_id: i64, now: NaiveDateTime) -> Self {
        Self {
            user_id,
            enable_in_app: true,
            enable_email: false,
            enable_sms: false,
            notify_at_low: DEFAULT_NOTIFY_AT_LOW,
            notify_at_medium: DEFAULT_NOTIFY_AT_MEDIUM,
            notify_at_high: DEFAULT_NOTIFY_AT_HIGH,
            updated_at: now,
        }
    }

    pub fn update_channels(&mut self, in_app: bool, email: bool, sms: bool, now: NaiveDateTime) {
        self.enable_in_app = in_app;
        self.enable_email = email;
        self.enable_sms = sms;
        self.updated_at = now;
    }

    /// Replaces all three levels. The first two must lie in (0, 100], the
    /// third in (0, 150]. On error nothing changes.
    pub fn update_thresholds(
        &mut self,
        low: Decimal,
        medium: Decimal,
        high: Decimal,
        now: NaiveDateTime,
    ) -> Result<()> {
        check_level("low", low, MAX_WARNING_THRESHOLD)?;
        check_level("medium", medium, MAX_WARNING_THRESHOLD)?;
        check_level("high", high, MAX_CRITICAL_THRESHOLD)?;
        self.notify_at_low = low;
        self.notify_at_medium = medium;
        self.notify_at_high = high;
        self.updated_at = now;
        Ok(())
    }

    /// True once `percentage` reaches any of the three levels.
    ///
    /// This is independent of the budget's own two-tier alert rule; the two
    /// can disagree.
    pub fn should_notify_at(&self, percentage: Decimal) -> bool {
        percentage >= self.notify_at_low
            || percentage >= self.notify_at_medium
            || percentage >= self.notify_at_high
    }

    pub fn enabled_channels(&self) -> Vec<NotificationChannel> {
        [
            (self.enable_in_app, NotificationChannel::InApp),
            (self.enable_email, NotificationChannel::Email),
            (self.enable_sms, NotificationChannel::Sms),
        ]
        .into_iter()
        .filter_map(|(enabled, channel)| enabled.then_some(channel))
        .collect()
    }
}

/// Input model for saving a user's preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPreferenceUpdate {
    pub user_id: i64,
    pub enable_in_app: bool,
    pub enable_email: bool,
    pub enable_sms: bool,
    pub notify_at_low: Decimal,
    pub notify_at_medium: Decimal,
    pub notify_at_high: Decimal,
}

fn check_level(name: &str, level: Decimal, max: Decimal) -> Result<()> {
    if level <= Decimal::ZERO || level > max {
        return Err(ValidationError::InvalidThresholds(format!(
            "{} notification threshold must be within (0, {}], got {}",
            name, max, level
        ))
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn ts() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let pref = NotificationPreference::new(7, ts());
        assert_eq!(pref.enabled_channels(), vec![NotificationChannel::InApp]);
        assert_eq!(pref.notify_at_low, dec!(50));
        assert_eq!(pref.notify_at_medium, dec!(80));
        assert_eq!(pref.notify_at_high, dec!(100));
    }

    #[test]
    fn test_should_notify_at_uses_any_level() {
        let pref = NotificationPreference::new(7, ts());
        assert!(!pref.should_notify_at(dec!(49.99)));
        assert!(pref.should_notify_at(dec!(50)));
        assert!(pref.should_notify_at(dec!(120)));
    }

    #[test]
    fn test_update_thresholds_validates_and_keeps_previous() {
        let mut pref = NotificationPreference::new(7, ts());
        for (low, medium, high) in [
            (dec!(0), dec!(80), dec!(100)),
            (dec!(50), dec!(101), dec!(100)),
            (dec!(50), dec!(80), dec!(151)),
        ] {
            assert!(pref.update_thresholds(low, medium, high, ts()).is_err());
            assert_eq!(pref.notify_at_low, dec!(50));
        }

        // Ordering between the levels is not enforced.
        pref.update_thresholds(dec!(90), dec!(60), dec!(150), ts())
            .unwrap();
        assert!(pref.should_notify_at(dec!(60)));
        assert!(!pref.should_notify_at(dec!(59)));
    }

    #[test]
    fn test_update_channels() {
        let mut pref = NotificationPreference::new(7, ts());
        pref.update_channels(false, true, true, ts());
        assert_eq!(
            pref.enabled_channels(),
            vec![NotificationChannel::Email, NotificationChannel::Sms]
        );
    }
}
