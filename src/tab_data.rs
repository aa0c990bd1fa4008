/// Data structures for Link & Note Saver
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// Metadata of the focused browser tab
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TabContext {
    pub url: String,
    #[serde(default)]
    pub title: String,
}

/// A note attached to a page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavedItem {
    pub id: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub note: String,
    #[serde(deserialize_with = "millis")]
    pub created_at: i64,
}

impl SavedItem {
    pub fn new(id: String, url: String, title: String, note: String, created_at: i64) -> SavedItem {
        SavedItem {
            id,
            url,
            title,
            note,
            created_at,
        }
    }
}

// JS hands every number back as a double
fn millis<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let ms = f64::deserialize(deserializer)?;
    if !ms.is_finite() || ms < i64::MIN as f64 || ms >= i64::MAX as f64 {
        return Err(D::Error::custom(format!("invalid createdAt: {}", ms)));
    }
    Ok(ms as i64)
}
