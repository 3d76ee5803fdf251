use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub type UserId = i64;
pub type BookId = i32;

/// A registered account as persisted in the users file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub password: String,
    #[serde(with = "iso_millis")]
    pub created_at: DateTime<Utc>,
}

/// What a client gets to see of a user after logging in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserView {
    pub id: UserId,
    pub username: String,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub price: f64,
    pub rating: f64,
    pub image: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PriceRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl PriceRange {
    pub const DEFAULT_MIN: f64 = 0.0;
    pub const DEFAULT_MAX: f64 = 1000.0;

    pub fn contains(&self, price: f64) -> bool {
        let min = self.min.unwrap_or(Self::DEFAULT_MIN);
        let max = self.max.unwrap_or(Self::DEFAULT_MAX);
        price >= min && price <= max
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct Credentials {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendRequest {
    #[serde(default)]
    pub user_id: Value,
    pub genre: Option<String>,
    pub price_range: Option<PriceRange>,
    pub limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordRecommendRequest {
    #[serde(default)]
    pub user_id: Value,
    pub preference: Option<String>,
}

/// The `{success, message, ...}` envelope every JSON endpoint answers with.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            user: None,
            data: None,
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            user: None,
            data: None,
        }
    }

    pub fn with_user(mut self, user: UserView) -> Self {
        self.user = Some(user);
        self
    }

    pub fn with_data(mut self, data: T) -> Self {
        self.data = Some(data);
        self
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendations {
    pub user_id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_preference: Option<String>,
    pub recommended_books: Vec<Book>,
    pub count: usize,
    pub timestamp: String,
}

/// ISO-8601 UTC timestamps with millisecond precision, e.g. `2024-06-10T06:13:20.000Z`.
pub mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(D::Error::custom)
    }
}

/// Mirrors a JS truthiness check: null, false, 0 and "" all count as absent.
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn price_range_defaults_are_inclusive() {
        let range = PriceRange {
            min: Some(14.0),
            max: None,
        };
        assert!(range.contains(14.0));
        assert!(range.contains(1000.0));
        assert!(!range.contains(13.99));
        assert!(PriceRange::default().contains(0.0));
    }

    #[test]
    fn user_id_presence() {
        assert!(!is_present(&Value::Null));
        assert!(!is_present(&json!(0)));
        assert!(!is_present(&json!("")));
        assert!(!is_present(&json!(false)));
        assert!(is_present(&json!(1718000000000_i64)));
        assert!(is_present(&json!("abc")));
    }

    #[test]
    fn user_serializes_camel_case() {
        let user = User {
            id: 1,
            username: "alice".into(),
            password: "secret1".into(),
            created_at: Utc::now(),
        };
        let value = serde_json::to_value(&user).unwrap();
        assert!(value.get("createdAt").is_some());
        assert!(value.get("created_at").is_none());
    }

    #[test]
    fn created_at_uses_millisecond_precision() {
        let created_at = DateTime::parse_from_rfc3339("2026-10-16T06:41:44.931140703Z")
            .unwrap()
            .with_timezone(&Utc);
        let user = User {
            id: 1,
            username: "alice".into(),
            password: "secret1".into(),
            created_at,
        };
        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["createdAt"], "2026-10-16T06:41:44.931Z");

        let back: User = serde_json::from_value(value).unwrap();
        assert_eq!(back.created_at.timestamp_millis(), created_at.timestamp_millis());
    }
}
