//! Account profile.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::de;

/// The authenticated user as returned by `user/me`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default, deserialize_with = "de::or_default")]
    pub auth_id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// Subscription plan identifier
    #[serde(default, deserialize_with = "de::or_default")]
    pub plan: i64,
    #[serde(default, deserialize_with = "de::or_default")]
    pub is_subscribed: bool,
    #[serde(default)]
    pub premium_expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub cooldown_until: Option<DateTime<Utc>>,
    #[serde(default)]
    pub customer: Option<String>,
    #[serde(default)]
    pub base_email: Option<String>,
    #[serde(default)]
    pub user_referral: Option<String>,
    #[serde(default, deserialize_with = "de::or_default")]
    pub total_downloaded: i64,
    #[serde(default, deserialize_with = "de::or_default")]
    pub total_bytes_downloaded: i64,
    #[serde(default, deserialize_with = "de::or_default")]
    pub total_bytes_uploaded: i64,
    #[serde(default, deserialize_with = "de::or_default")]
    pub torrents_downloaded: i64,
    #[serde(default, deserialize_with = "de::or_default")]
    pub web_downloads_downloaded: i64,
    #[serde(default, deserialize_with = "de::or_default")]
    pub usenet_downloads_downloaded: i64,
    /// Account settings, only present when requested; the key set is owned by
    /// the service and changes often, so it stays untyped.
    #[serde(default)]
    pub settings: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_with_settings() {
        let user: User = serde_json::from_value(json!({
            "id": 1,
            "auth_id": "a-1",
            "email": "someone@example.com",
            "plan": 2,
            "is_subscribed": true,
            "total_downloaded": null,
            "settings": {"seed_torrents": 3}
        }))
        .unwrap();

        assert_eq!(user.plan, 2);
        assert!(user.is_subscribed);
        assert_eq!(user.total_downloaded, 0);
        assert_eq!(user.settings.unwrap()["seed_torrents"], 3);
    }
}
