use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    #[serde(rename = "_id")]
    pub id: String,
    pub doctor_name: String,
    #[serde(default)]
    pub user_name: Option<String>,
    pub date: DateTime<Utc>,
    pub status: AppointmentStatus,
    #[serde(default)]
    pub specialty: Option<String>,
    #[serde(default)]
    pub reminders: Vec<Reminder>,
}

impl Appointment {
    pub fn belongs_to(&self, user_name: &str) -> bool {
        self.user_name.as_deref() == Some(user_name)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Available,
    Booked,
    Attended,
    Missed,
    #[serde(other)]
    Unknown,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Available => "available",
            AppointmentStatus::Booked => "booked",
            AppointmentStatus::Attended => "attended",
            AppointmentStatus::Missed => "missed",
            AppointmentStatus::Unknown => "unknown",
        }
    }

    /// Statuses an admin may set from the attendance dashboard.
    pub fn parse_outcome(s: &str) -> Option<Self> {
        match s {
            "attended" => Some(AppointmentStatus::Attended),
            "missed" => Some(AppointmentStatus::Missed),
            _ => None,
        }
    }

    pub fn is_past(&self) -> bool {
        matches!(self, AppointmentStatus::Attended | AppointmentStatus::Missed)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    #[serde(default)]
    pub message_type: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub send_time: Option<DateTime<Utc>>,
}

impl Reminder {
    pub fn is_sent(&self) -> bool {
        self.status == "sent"
    }
}

#[derive(Debug, Deserialize)]
pub struct AppointmentList {
    #[serde(default)]
    pub appointments: Vec<Appointment>,
}

#[derive(Debug, Deserialize)]
pub struct SlotList {
    #[serde(default)]
    pub slots: Vec<Appointment>,
}

/// A block of slots for one doctor, expanded into individual slots by the API.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SlotBlock {
    pub doctor_name: String,
    pub start_date: String,
    pub end_date: Option<String>,
    pub start_hour: u32,
    pub start_minute: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_hour: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_minute: Option<u32>,
    pub interval_minutes: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub user_name: String,
    pub phone: String,
}

/// Reply body shared by the API's action endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiReply {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}
