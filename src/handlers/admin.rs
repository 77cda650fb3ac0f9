use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::{Html, IntoResponse, Response};
use axum::Form;
use chrono::{Datelike, Utc};
use serde::Deserialize;

use super::{redirect_with_notice, NoticeQuery};
use crate::errors::BackendError;
use crate::models::{AppointmentStatus, BaselineSetup, Category, SlotBlock};
use crate::services::listing::{self, CategoryFilter};
use crate::state::AppState;
use crate::views::admin::{AddBlockPage, BaselinePage, MonthBaseline, PerformancePage};
use crate::views::{self, Notice};

const UPDATED: &str = "تم التحديث";
const ERROR: &str = "خطأ";

fn failure(err: &BackendError, fallback: &str) -> Notice {
    Notice::new(ERROR, err.api_message().unwrap_or(fallback))
}

// GET /admin/dashboard
#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub user: Option<String>,
}

pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DashboardQuery>,
    Query(notice): Query<NoticeQuery>,
) -> Response {
    let user = query
        .user
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty());

    let bookings = match user {
        Some(name) => {
            let found = state
                .api
                .all_appointments()
                .await
                .map(|all| listing::awaiting_attendance(all, name));
            if let Err(e) = &found {
                tracing::warn!(user = %name, error = %e, "failed to load bookings for attendance");
            }
            Some(found)
        }
        None => None,
    };

    let offset = state.config.clinic_offset();
    let notice = notice.notice();
    Html(views::admin::dashboard(user, bookings.as_ref(), &offset, notice.as_ref()).into_string())
        .into_response()
}

// POST /admin/appointments/:id/status
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StatusForm {
    pub status: String,
    pub user: String,
}

pub async fn set_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Form(form): Form<StatusForm>,
) -> Response {
    let back = [("user", form.user.as_str())];

    let Some(status) = AppointmentStatus::parse_outcome(&form.status) else {
        return redirect_with_notice(
            "/admin/dashboard",
            &back,
            &Notice::new(ERROR, "حالة غير صالحة."),
        )
        .into_response();
    };

    let notice = match state.api.set_status(&id, status).await {
        Ok(_) => {
            tracing::info!(appointment = %id, status = status.as_str(), "attendance recorded");
            let message = match status {
                AppointmentStatus::Missed => "تم تسجيل الغياب.",
                _ => "تم تسجيل حضور الموعد.",
            };
            Notice::new(UPDATED, message)
        }
        Err(e) => {
            tracing::warn!(appointment = %id, error = %e, "failed to update appointment status");
            failure(&e, "حدث خطأ أثناء تحديث الحالة.")
        }
    };
    redirect_with_notice("/admin/dashboard", &back, &notice).into_response()
}

// GET /admin/add-block
#[derive(Debug, Deserialize)]
pub struct SlotsQuery {
    pub doctor: Option<String>,
}

pub async fn add_block_page(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SlotsQuery>,
    Query(notice): Query<NoticeQuery>,
) -> Response {
    let selected = query.doctor.filter(|d| !d.is_empty());
    let slots = state.api.available_slots().await;
    if let Err(e) = &slots {
        tracing::warn!(error = %e, "failed to load available slots");
    }

    let doctors = slots
        .as_ref()
        .map(|s| listing::distinct_doctors(s))
        .unwrap_or_default();
    let slots = slots.map(|all| {
        let mut shown = match &selected {
            Some(doctor) => listing::open_slots_for_doctor(all, doctor),
            None => listing::with_status(all, AppointmentStatus::Available),
        };
        shown.sort_by_key(|s| s.date);
        shown
    });

    let offset = state.config.clinic_offset();
    let notice = notice.notice();
    Html(
        views::admin::add_block(AddBlockPage {
            slots: &slots,
            doctors: &doctors,
            selected_doctor: selected.as_deref(),
            offset: &offset,
            notice: notice.as_ref(),
        })
        .into_string(),
    )
    .into_response()
}

// POST /admin/add-block
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AddBlockForm {
    pub doctor_name: String,
    pub start_date: String,
    pub end_date: String,
    pub start_time: String,
    pub end_time: String,
    pub interval_minutes: String,
}

impl AddBlockForm {
    /// `None` when the doctor, start date or start time is missing.
    fn to_block(&self) -> Option<SlotBlock> {
        let doctor_name = self.doctor_name.trim();
        let start_date = self.start_date.trim();
        if doctor_name.is_empty() || start_date.is_empty() {
            return None;
        }
        let (start_hour, start_minute) = listing::parse_clock(&self.start_time)?;
        let end = listing::parse_clock(&self.end_time);
        let end_date = self.end_date.trim();

        Some(SlotBlock {
            doctor_name: doctor_name.to_string(),
            start_date: start_date.to_string(),
            end_date: (!end_date.is_empty()).then(|| end_date.to_string()),
            start_hour,
            start_minute,
            end_hour: end.map(|(h, _)| h),
            end_minute: end.map(|(_, m)| m),
            interval_minutes: listing::interval_minutes(Some(&self.interval_minutes)),
        })
    }
}

pub async fn add_block(
    State(state): State<Arc<AppState>>,
    Form(form): Form<AddBlockForm>,
) -> Response {
    let Some(block) = form.to_block() else {
        return redirect_with_notice(
            "/admin/add-block",
            &[],
            &Notice::new(
                "حقول ناقصة",
                "الرجاء إدخال اسم الطبيب، وتاريخ البداية، ووقت البداية.",
            ),
        )
        .into_response();
    };

    let notice = match state.api.add_block(&block).await {
        Ok(reply) => {
            tracing::info!(
                doctor = %block.doctor_name,
                start = %block.start_date,
                interval = block.interval_minutes,
                "appointment block added"
            );
            Notice::new(
                "تمت الإضافة",
                reply.message.as_deref().unwrap_or("تمت إضافة المواعيد بنجاح."),
            )
        }
        Err(e) => {
            tracing::warn!(doctor = %block.doctor_name, error = %e, "failed to add appointment block");
            failure(&e, "حدث خطأ أثناء إضافة المواعيد، الرجاء المحاولة مرة أخرى.")
        }
    };
    redirect_with_notice(
        "/admin/add-block",
        &[("doctor", block.doctor_name.as_str())],
        &notice,
    )
    .into_response()
}

// POST /admin/slots/:id/delete
pub async fn delete_slot(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Response {
    let notice = match state.api.delete_slot(&id).await {
        Ok(_) => {
            tracing::info!(slot = %id, "slot deleted");
            Notice::new("Deleted", "Appointment slot deleted successfully.")
        }
        Err(e) => {
            tracing::warn!(slot = %id, error = %e, "failed to delete slot");
            Notice::new(
                "Error",
                e.api_message()
                    .unwrap_or("Server error. Could not delete appointment slot."),
            )
        }
    };
    redirect_with_notice("/admin/add-block", &[], &notice).into_response()
}

// GET /admin/booked
pub async fn booked(State(state): State<Arc<AppState>>) -> Response {
    let bookings = state
        .api
        .booked_appointments()
        .await
        .map(|list| listing::with_status(list, AppointmentStatus::Booked));
    if let Err(e) = &bookings {
        tracing::warn!(error = %e, "failed to load booked appointments");
    }

    let offset = state.config.clinic_offset();
    Html(views::admin::booked(&bookings, &offset).into_string()).into_response()
}

// GET /admin/baseline
#[derive(Debug, Deserialize)]
pub struct BaselineQuery {
    pub doctor: Option<String>,
    pub year: Option<i32>,
}

pub async fn baseline_page(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BaselineQuery>,
    Query(notice): Query<NoticeQuery>,
) -> Response {
    let offset = state.config.clinic_offset();
    let doctors = state
        .api
        .all_appointments()
        .await
        .map(|all| listing::distinct_doctors(&all));
    if let Err(e) = &doctors {
        tracing::warn!(error = %e, "failed to load doctors");
    }

    let doctor = query.doctor.filter(|d| !d.is_empty());
    let year = query
        .year
        .unwrap_or_else(|| Utc::now().with_timezone(&offset).year());

    let mut months = Vec::with_capacity(12);
    if let Some(doctor) = &doctor {
        for month in 1..=12 {
            let entry = match state.api.high_demand(doctor, year, month).await {
                Ok(Some(info)) => MonthBaseline::Loaded(info),
                Ok(None) => MonthBaseline::Missing,
                Err(e) => {
                    tracing::warn!(doctor = %doctor, year, month, error = %e, "failed to load baseline");
                    MonthBaseline::Failed
                }
            };
            months.push(entry);
        }
    }

    let notice = notice.notice();
    Html(
        views::admin::baseline(BaselinePage {
            doctors: &doctors,
            selected: doctor.as_deref().map(|d| (d, year, months.as_slice())),
            notice: notice.as_ref(),
        })
        .into_string(),
    )
    .into_response()
}

// POST /admin/baseline
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaselineForm {
    pub doctor_name: String,
    pub year: i32,
    pub month: u32,
    #[serde(default)]
    pub hours: String,
}

pub async fn save_baseline(
    State(state): State<Arc<AppState>>,
    Form(form): Form<BaselineForm>,
) -> Response {
    let setup = BaselineSetup {
        doctor_name: form.doctor_name.clone(),
        year: form.year,
        month: form.month,
        hours: listing::parse_peak_hours(&form.hours),
    };

    let notice = match state.api.setup_high_demand(&setup).await {
        Ok(reply) => {
            tracing::info!(
                doctor = %setup.doctor_name,
                year = setup.year,
                month = setup.month,
                hours = ?setup.hours,
                "baseline saved"
            );
            Notice::new(
                "تم الحفظ",
                reply.message.as_deref().unwrap_or("تم حفظ ساعات الذروة بنجاح."),
            )
        }
        Err(e) => {
            tracing::warn!(doctor = %setup.doctor_name, error = %e, "failed to save baseline");
            failure(&e, "حدث خطأ أثناء حفظ البيانات.")
        }
    };

    let year = form.year.to_string();
    redirect_with_notice(
        "/admin/baseline",
        &[("doctor", form.doctor_name.as_str()), ("year", year.as_str())],
        &notice,
    )
    .into_response()
}

// GET /admin/performance
#[derive(Debug, Deserialize)]
pub struct PerformanceQuery {
    pub q: Option<String>,
    pub category: Option<String>,
}

pub async fn performance(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PerformanceQuery>,
    Query(notice): Query<NoticeQuery>,
) -> Response {
    let (appointments, users) =
        tokio::join!(state.api.all_appointments(), state.api.list_users());

    let stats = match (&appointments, &users) {
        (Ok(a), Ok(u)) => Some(listing::performance_stats(a, u)),
        _ => None,
    };
    if let Err(e) = &appointments {
        tracing::warn!(error = %e, "failed to load appointments for stats");
    }
    if let Err(e) = &users {
        tracing::warn!(error = %e, "failed to load users");
    }

    let search = query.q.unwrap_or_default();
    let filter = CategoryFilter::parse(query.category.as_deref());
    let users = users.map(|u| listing::rank_users(u, Some(search.as_str()), filter));

    let notice = notice.notice();
    Html(
        views::admin::performance(PerformancePage {
            stats: stats.as_ref(),
            users: &users,
            search: &search,
            filter,
            notice: notice.as_ref(),
        })
        .into_string(),
    )
    .into_response()
}

// POST /admin/set-category
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CategoryForm {
    #[serde(rename = "userName")]
    pub user_name: String,
    pub category: String,
}

pub async fn set_category(
    State(state): State<Arc<AppState>>,
    Form(form): Form<CategoryForm>,
) -> Response {
    let Some(category) = Category::parse(&form.category) else {
        return redirect_with_notice(
            "/admin/performance",
            &[],
            &Notice::new(ERROR, "فئة غير صالحة."),
        )
        .into_response();
    };

    let notice = match state.api.set_category(&form.user_name, category).await {
        Ok(_) => {
            tracing::info!(user = %form.user_name, category = %category, "category overridden");
            Notice::new(
                UPDATED,
                format!("تم تحديث فئة المستخدم ({}) إلى: {}", form.user_name, category),
            )
        }
        Err(e) => {
            tracing::warn!(user = %form.user_name, error = %e, "failed to set category");
            failure(&e, "فشل تحديث الفئة، الرجاء المحاولة مرة أخرى.")
        }
    };
    redirect_with_notice("/admin/performance", &[], &notice).into_response()
}
