use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use serde::Deserialize;

use super::{redirect_with_notice, to_login, IdentityQuery, NoticeQuery};
use crate::db::queries;
use crate::errors::BackendError;
use crate::models::BookingRequest;
use crate::services::listing::{self, PastFilter};
use crate::state::AppState;
use crate::views::user::{AvailablePage, TelegramStatus};
use crate::views::{self, Identity, Notice};

const BOOKED: &str = "تم حجز الموعد بنجاح ✅";
const BOOKING_REFUSED: &str = "تعذّر حجز الموعد. الرجاء اختيار وقت آخر.";
const BOOKING_FAILED: &str = "فشل حجز الموعد، الرجاء المحاولة مرة أخرى.";
const TELEGRAM_REQUIRED: &str = "يبدو أنك لم تقم بربط حسابك مع تيليغرام بعد.\n\nمن فضلك افتح البوت واكتب اسم المستخدم الخاص بك لإتمام الربط.";

// GET /user/available
pub async fn available(
    State(state): State<Arc<AppState>>,
    Query(who): Query<IdentityQuery>,
    Query(notice): Query<NoticeQuery>,
) -> Response {
    let Some(identity) = who.identity() else {
        return to_login().into_response();
    };

    let display_name = local_display_name(&state, &identity.user_name);
    let (remote_user, appointments) = tokio::join!(
        state.api.get_user(&identity.user_name),
        state.api.booked_appointments(),
    );

    let telegram = match remote_user {
        Ok(Some(u)) if u.telegram_linked => TelegramStatus::Linked,
        Ok(_) => TelegramStatus::NotLinked,
        Err(e) => {
            tracing::warn!(user = %identity.user_name, error = %e, "failed to check telegram status");
            TelegramStatus::Unknown
        }
    };
    let upcoming = appointments.map(|all| listing::upcoming_for_user(all, &identity.user_name));
    if let Err(e) = &upcoming {
        tracing::warn!(user = %identity.user_name, error = %e, "failed to load appointments");
    }

    let offset = state.config.clinic_offset();
    let notice = notice.notice();
    Html(
        views::user::available(AvailablePage {
            identity: &identity,
            display_name: &display_name,
            telegram,
            upcoming: &upcoming,
            offset: &offset,
            notice: notice.as_ref(),
        })
        .into_string(),
    )
    .into_response()
}

/// Display name from the local record, falling back to the username.
fn local_display_name(state: &AppState, user_name: &str) -> String {
    let found = match state.db() {
        Ok(conn) => queries::find_user(&conn, user_name),
        Err(e) => Err(e.into()),
    };
    match found {
        Ok(Some(user)) if !user.display_name.is_empty() => user.display_name,
        Ok(_) => user_name.to_string(),
        Err(e) => {
            tracing::warn!(user = %user_name, error = %e, "failed to read local user");
            user_name.to_string()
        }
    }
}

// GET /user/doctors
#[derive(Debug, Deserialize)]
pub struct DoctorsQuery {
    pub q: Option<String>,
}

pub async fn doctors(
    State(state): State<Arc<AppState>>,
    Query(who): Query<IdentityQuery>,
    Query(query): Query<DoctorsQuery>,
    Query(notice): Query<NoticeQuery>,
) -> Response {
    let Some(identity) = who.identity() else {
        return to_login().into_response();
    };

    let search = query.q.unwrap_or_default();
    let doctors = state
        .api
        .available_slots()
        .await
        .map(|slots| listing::doctors_with_slots(&slots, Some(search.as_str())));
    if let Err(e) = &doctors {
        tracing::warn!(error = %e, "failed to load doctors");
    }

    let notice = notice.notice();
    Html(views::user::doctors(&identity, &doctors, &search, notice.as_ref()).into_string())
        .into_response()
}

// GET /user/times
#[derive(Debug, Deserialize)]
pub struct TimesQuery {
    pub doctor: Option<String>,
}

pub async fn times(
    State(state): State<Arc<AppState>>,
    Query(who): Query<IdentityQuery>,
    Query(query): Query<TimesQuery>,
    Query(notice): Query<NoticeQuery>,
) -> Response {
    let Some(identity) = who.identity() else {
        return to_login().into_response();
    };
    let Some(doctor) = query.doctor.filter(|d| !d.is_empty()) else {
        return Redirect::to(&identity.link("/user/doctors")).into_response();
    };

    let slots = state.api.available_slots().await.map(|slots| {
        let mut open = listing::open_slots_for_doctor(slots, &doctor);
        open.sort_by_key(|s| s.date);
        open
    });
    if let Err(e) = &slots {
        tracing::warn!(doctor = %doctor, error = %e, "failed to load times");
    }

    let offset = state.config.clinic_offset();
    let notice = notice.notice();
    Html(views::user::times(&identity, &doctor, &slots, &offset, notice.as_ref()).into_string())
        .into_response()
}

// POST /user/book/:id
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BookForm {
    #[serde(rename = "userName")]
    pub user_name: String,
    pub phone: String,
    pub doctor: String,
}

pub async fn book(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Form(form): Form<BookForm>,
) -> Response {
    if form.user_name.trim().is_empty() {
        return to_login().into_response();
    }
    let identity = Identity {
        user_name: form.user_name.trim().to_string(),
        phone: form.phone.clone(),
    };

    let linked = match state.api.get_user(&identity.user_name).await {
        Ok(user) => user.is_some_and(|u| u.telegram_linked),
        Err(e) => {
            tracing::warn!(user = %identity.user_name, error = %e, "failed to check telegram link");
            false
        }
    };
    if !linked {
        tracing::info!(user = %identity.user_name, slot = %id, "booking blocked until telegram is linked");
        return redirect_with_notice(
            "/connect-telegram",
            &[("name", identity.user_name.as_str()), ("phone", identity.phone.as_str())],
            &Notice::new("ربط تيليغرام مطلوب", TELEGRAM_REQUIRED),
        )
        .into_response();
    }

    let request = BookingRequest {
        user_name: identity.user_name.clone(),
        phone: identity.phone.clone(),
    };
    match state.api.book(&id, &request).await {
        Ok(reply) => {
            tracing::info!(user = %identity.user_name, slot = %id, "appointment booked");
            redirect_with_notice(
                "/user/available",
                &[("userName", identity.user_name.as_str()), ("phone", identity.phone.as_str())],
                &Notice::new("حجز الموعد", reply.message.as_deref().unwrap_or(BOOKED)),
            )
            .into_response()
        }
        Err(e) => {
            tracing::warn!(user = %identity.user_name, slot = %id, error = %e, "booking failed");
            let notice = match &e {
                BackendError::Rejected { .. } => {
                    Notice::new("تنبيه", e.api_message().unwrap_or(BOOKING_REFUSED))
                }
                _ => Notice::new("خطأ", BOOKING_FAILED),
            };
            let doctor = form.doctor.trim();
            if doctor.is_empty() {
                return redirect_with_notice(
                    "/user/doctors",
                    &[("userName", identity.user_name.as_str()), ("phone", identity.phone.as_str())],
                    &notice,
                )
                .into_response();
            }
            redirect_with_notice(
                "/user/times",
                &[
                    ("userName", identity.user_name.as_str()),
                    ("phone", identity.phone.as_str()),
                    ("doctor", doctor),
                ],
                &notice,
            )
            .into_response()
        }
    }
}

// GET /user/booked
pub async fn booked(
    State(state): State<Arc<AppState>>,
    Query(who): Query<IdentityQuery>,
) -> Response {
    let Some(identity) = who.identity() else {
        return to_login().into_response();
    };

    let booked = state
        .api
        .booked_appointments()
        .await
        .map(|list| listing::upcoming_for_user(list, &identity.user_name));
    if let Err(e) = &booked {
        tracing::warn!(user = %identity.user_name, error = %e, "failed to load booked appointments");
    }

    let offset = state.config.clinic_offset();
    Html(views::user::booked(&identity, &booked, &offset).into_string()).into_response()
}

// GET /user/past
#[derive(Debug, Deserialize)]
pub struct PastQuery {
    pub filter: Option<String>,
}

pub async fn past(
    State(state): State<Arc<AppState>>,
    Query(who): Query<IdentityQuery>,
    Query(query): Query<PastQuery>,
) -> Response {
    let Some(identity) = who.identity() else {
        return to_login().into_response();
    };

    let filter = PastFilter::parse(query.filter.as_deref());
    let past = state
        .api
        .all_appointments()
        .await
        .map(|all| listing::past_for_user(all, &identity.user_name, filter));
    if let Err(e) = &past {
        tracing::warn!(user = %identity.user_name, error = %e, "failed to load past appointments");
    }

    let offset = state.config.clinic_offset();
    Html(views::user::past(&identity, &past, filter, &offset).into_string()).into_response()
}

// GET /user/loyalty
pub async fn loyalty(
    State(state): State<Arc<AppState>>,
    Query(who): Query<IdentityQuery>,
) -> Response {
    let Some(identity) = who.identity() else {
        return to_login().into_response();
    };

    let user = state.api.get_user(&identity.user_name).await;
    if let Err(e) = &user {
        tracing::warn!(user = %identity.user_name, error = %e, "failed to load loyalty points");
    }

    Html(views::user::loyalty(&identity, &user).into_string()).into_response()
}
