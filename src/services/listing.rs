use std::collections::HashSet;

use crate::models::{Appointment, AppointmentStatus, Category, RemoteUser};

pub const DEFAULT_SPECIALTY: &str = "General Practitioner";
pub const DEFAULT_INTERVAL_MINUTES: u32 = 60;

// ── Appointments ──

/// A user's booked appointments, soonest first.
pub fn upcoming_for_user(appointments: Vec<Appointment>, user_name: &str) -> Vec<Appointment> {
    let mut mine: Vec<Appointment> = appointments
        .into_iter()
        .filter(|a| a.belongs_to(user_name) && a.status == AppointmentStatus::Booked)
        .collect();
    mine.sort_by_key(|a| a.date);
    mine
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PastFilter {
    #[default]
    All,
    Attended,
    Missed,
}

impl PastFilter {
    pub fn parse(s: Option<&str>) -> Self {
        match s {
            Some("attended") => PastFilter::Attended,
            Some("missed") => PastFilter::Missed,
            _ => PastFilter::All,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PastFilter::All => "all",
            PastFilter::Attended => "attended",
            PastFilter::Missed => "missed",
        }
    }

    fn admits(&self, status: AppointmentStatus) -> bool {
        match self {
            PastFilter::All => status.is_past(),
            PastFilter::Attended => status == AppointmentStatus::Attended,
            PastFilter::Missed => status == AppointmentStatus::Missed,
        }
    }
}

/// A user's attended/missed appointments, most recent first.
pub fn past_for_user(
    appointments: Vec<Appointment>,
    user_name: &str,
    filter: PastFilter,
) -> Vec<Appointment> {
    let mut past: Vec<Appointment> = appointments
        .into_iter()
        .filter(|a| a.belongs_to(user_name) && filter.admits(a.status))
        .collect();
    past.sort_by(|a, b| b.date.cmp(&a.date));
    past
}

/// Booked appointments awaiting an attendance outcome.
pub fn awaiting_attendance(appointments: Vec<Appointment>, user_name: &str) -> Vec<Appointment> {
    appointments
        .into_iter()
        .filter(|a| a.belongs_to(user_name) && a.status == AppointmentStatus::Booked)
        .collect()
}

pub fn with_status(appointments: Vec<Appointment>, status: AppointmentStatus) -> Vec<Appointment> {
    appointments.into_iter().filter(|a| a.status == status).collect()
}

pub fn open_slots_for_doctor(slots: Vec<Appointment>, doctor: &str) -> Vec<Appointment> {
    slots
        .into_iter()
        .filter(|s| s.doctor_name == doctor && s.status == AppointmentStatus::Available)
        .collect()
}

// ── Doctors ──

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoctorCard {
    pub name: String,
    pub specialty: String,
}

/// Distinct doctor names in first-seen order.
pub fn distinct_doctors(appointments: &[Appointment]) -> Vec<String> {
    let mut seen = HashSet::new();
    appointments
        .iter()
        .filter(|a| seen.insert(a.doctor_name.as_str()))
        .map(|a| a.doctor_name.clone())
        .collect()
}

/// Doctors with at least one open slot, optionally narrowed by a name search.
pub fn doctors_with_slots(slots: &[Appointment], query: Option<&str>) -> Vec<DoctorCard> {
    let mut seen = HashSet::new();
    let query = query.map(|q| q.trim().to_lowercase()).filter(|q| !q.is_empty());

    slots
        .iter()
        .filter(|s| s.status == AppointmentStatus::Available)
        .filter(|s| seen.insert(s.doctor_name.as_str()))
        .map(|s| DoctorCard {
            name: s.doctor_name.clone(),
            specialty: s
                .specialty
                .clone()
                .unwrap_or_else(|| DEFAULT_SPECIALTY.to_string()),
        })
        .filter(|d| match &query {
            Some(q) => d.name.to_lowercase().contains(q.as_str()),
            None => true,
        })
        .collect()
}

// ── Users ──

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PerformanceStats {
    pub available: usize,
    pub booked: usize,
    pub users: usize,
    pub very_good: usize,
    pub good: usize,
    pub at_risk: usize,
}

pub fn performance_stats(appointments: &[Appointment], users: &[RemoteUser]) -> PerformanceStats {
    let count_status = |status| appointments.iter().filter(|a| a.status == status).count();
    let count_category =
        |cat| users.iter().filter(|u| u.category == Some(cat)).count();

    PerformanceStats {
        available: count_status(AppointmentStatus::Available),
        booked: count_status(AppointmentStatus::Booked),
        users: users.len(),
        very_good: count_category(Category::VeryGood),
        good: count_category(Category::Good),
        at_risk: count_category(Category::AtRisk),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn parse(s: Option<&str>) -> Self {
        s.and_then(Category::parse)
            .map(CategoryFilter::Only)
            .unwrap_or_default()
    }
}

/// Users ranked Very Good, Good, At-Risk (uncategorised last), then searched and filtered.
pub fn rank_users(
    mut users: Vec<RemoteUser>,
    search: Option<&str>,
    filter: CategoryFilter,
) -> Vec<RemoteUser> {
    users.sort_by_key(|u| u.category.map(|c| c.rank()).unwrap_or(u8::MAX));

    let search = search.map(|q| q.trim().to_lowercase()).filter(|q| !q.is_empty());
    users
        .into_iter()
        .filter(|u| match &search {
            Some(q) => u.user_name.to_lowercase().contains(q.as_str()),
            None => true,
        })
        .filter(|u| match filter {
            CategoryFilter::All => true,
            CategoryFilter::Only(cat) => u.category == Some(cat),
        })
        .collect()
}

// ── Form input ──

/// Peak hours from a comma-separated list such as `"9, 10,17"`.
///
/// Each entry keeps its leading digits (`"9am"` is 9); entries without digits and
/// hours outside 0-23 are dropped.
pub fn parse_peak_hours(input: &str) -> Vec<u32> {
    input
        .split(',')
        .filter_map(|part| {
            let digits: String = part.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
            digits.parse::<u32>().ok()
        })
        .filter(|h| *h < 24)
        .collect()
}

/// `"HH:MM"` from a time input.
pub fn parse_clock(input: &str) -> Option<(u32, u32)> {
    let (h, m) = input.trim().split_once(':')?;
    let hour: u32 = h.parse().ok()?;
    let minute: u32 = m.parse().ok()?;
    (hour < 24 && minute < 60).then_some((hour, minute))
}

pub fn interval_minutes(input: Option<&str>) -> u32 {
    input
        .and_then(|v| v.trim().parse::<u32>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(DEFAULT_INTERVAL_MINUTES)
}
