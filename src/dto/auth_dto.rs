use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Fields the Login Widget always sends; a payload missing any of these is
/// rejected before any cryptography runs.
pub const REQUIRED_FIELDS: [&str; 4] = ["id", "first_name", "auth_date", "hash"];

/// Login data as posted by Telegram's Login Widget. The known schema is
/// modeled as named optional fields; anything Telegram adds later lands in
/// `extra` and still participates in the data-check string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_date: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl LoginPayload {
    /// First required field that is absent (or, for strings, empty), if any.
    pub fn missing_field(&self) -> Option<&'static str> {
        REQUIRED_FIELDS.into_iter().find(|&name| match name {
            "id" => self.id.is_none(),
            "first_name" => !is_present(&self.first_name),
            "auth_date" => self.auth_date.is_none(),
            "hash" => !is_present(&self.hash),
            _ => unreachable!(),
        })
    }

    /// Every present field except `hash`, stringified for the data-check
    /// string. Unsorted; the verifier owns the ordering.
    pub fn check_fields(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();

        if let Some(id) = self.id {
            pairs.push(("id".to_string(), id.to_string()));
        }
        if let Some(auth_date) = self.auth_date {
            pairs.push(("auth_date".to_string(), auth_date.to_string()));
        }
        for (name, value) in [
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("username", &self.username),
            ("photo_url", &self.photo_url),
        ] {
            if let Some(value) = value {
                pairs.push((name.to_string(), value.clone()));
            }
        }
        for (name, value) in &self.extra {
            if let Some(value) = json_to_check_string(value) {
                pairs.push((name.clone(), value));
            }
        }

        pairs
    }
}

fn is_present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|s| !s.is_empty())
}

/// String form of an unrecognized payload value; null means "absent" and is
/// dropped from the data-check string.
fn json_to_check_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
