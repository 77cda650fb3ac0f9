use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

/// Local login record. Everything else about a user lives in the remote API.
#[derive(Debug, Clone)]
pub struct ClinicUser {
    pub id: i64,
    pub name: String,
    pub display_name: String,
    pub phone: String,
    pub password_hash: String,
    pub telegram_linked: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct NewClinicUser {
    pub name: String,
    pub display_name: String,
    pub phone: String,
    pub password_hash: String,
}

/// A user as the remote appointment API reports it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteUser {
    pub user_name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub telegram_linked: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub attended_count: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub missed_count: u32,
    #[serde(default)]
    pub attendance_rate: Option<f64>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub category: Option<Category>,
}

/// `null` decodes like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl RemoteUser {
    pub fn points(&self) -> f64 {
        self.score.unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub user_name: String,
    pub display_name: String,
    pub phone: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Category {
    #[serde(rename = "Very Good")]
    VeryGood,
    #[serde(rename = "Good")]
    Good,
    #[serde(rename = "At-Risk")]
    AtRisk,
    /// Any label this front end does not know. Never sent back to the API.
    #[serde(other)]
    Other,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::VeryGood, Category::Good, Category::AtRisk];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::VeryGood => "Very Good",
            Category::Good => "Good",
            Category::AtRisk => "At-Risk",
            Category::Other => "Other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Category::ALL.into_iter().find(|c| c.as_str() == s)
    }

    /// Sort position on the performance page.
    pub fn rank(&self) -> u8 {
        match self {
            Category::VeryGood => 1,
            Category::Good => 2,
            Category::AtRisk => 3,
            Category::Other => 4,
        }
    }

    /// Bootstrap colour used for the category badge.
    pub fn badge(&self) -> &'static str {
        match self {
            Category::VeryGood => "success",
            Category::Good => "primary",
            Category::AtRisk => "danger",
            Category::Other => "secondary",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
