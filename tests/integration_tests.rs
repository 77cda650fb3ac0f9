use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use tower::ServiceExt;

use clinic_front::app;
use clinic_front::config::AppConfig;
use clinic_front::db::{self, queries};
use clinic_front::errors::BackendError;
use clinic_front::models::{
    ApiReply, Appointment, AppointmentStatus, BaselineSetup, BookingRequest, Category,
    HighDemandMonth, NewClinicUser, Registration, RemoteUser, SlotBlock,
};
use clinic_front::services::accounts;
use clinic_front::services::backend::AppointmentApi;
use clinic_front::state::AppState;

// ── Mock API ──

#[derive(Default)]
struct MockApi {
    appointments: Vec<Appointment>,
    users: Vec<RemoteUser>,
    book_rejection: Option<String>,
    // Every call fails at the transport level.
    offline: bool,
    // Only `book` fails at the transport level.
    book_offline: bool,
    calls: Arc<Mutex<Vec<String>>>,
    // Appointment list endpoints that were read.
    reads: Arc<Mutex<Vec<&'static str>>>,
}

impl MockApi {
    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn read(&self, endpoint: &'static str) {
        self.reads.lock().unwrap().push(endpoint);
    }

    fn reachable(&self) -> Result<(), BackendError> {
        if self.offline {
            return Err(BackendError::InvalidUrl("api offline".to_string()));
        }
        Ok(())
    }

    fn ok(&self) -> Result<ApiReply, BackendError> {
        self.reachable()?;
        Ok(ApiReply::default())
    }
}

#[async_trait]
impl AppointmentApi for MockApi {
    async fn all_appointments(&self) -> Result<Vec<Appointment>, BackendError> {
        self.read("all");
        self.reachable()?;
        Ok(self.appointments.clone())
    }

    async fn available_slots(&self) -> Result<Vec<Appointment>, BackendError> {
        self.read("available");
        self.reachable()?;
        Ok(self.appointments.clone())
    }

    // Returns everything so the page has to do its own status filtering.
    async fn booked_appointments(&self) -> Result<Vec<Appointment>, BackendError> {
        self.read("booked");
        self.reachable()?;
        Ok(self.appointments.clone())
    }

    async fn add_block(&self, block: &SlotBlock) -> Result<ApiReply, BackendError> {
        self.record(format!(
            "add_block {} {} {:02}:{:02} every {}",
            block.doctor_name, block.start_date, block.start_hour, block.start_minute, block.interval_minutes
        ));
        self.ok()
    }

    async fn delete_slot(&self, id: &str) -> Result<ApiReply, BackendError> {
        self.record(format!("delete_slot {id}"));
        self.ok()
    }

    async fn set_status(
        &self,
        id: &str,
        status: AppointmentStatus,
    ) -> Result<ApiReply, BackendError> {
        self.record(format!("set_status {id} {}", status.as_str()));
        self.ok()
    }

    async fn book(&self, id: &str, request: &BookingRequest) -> Result<ApiReply, BackendError> {
        self.record(format!("book {id} {}", request.user_name));
        if self.book_offline {
            return Err(BackendError::InvalidUrl("api offline".to_string()));
        }
        match &self.book_rejection {
            Some(message) => Err(BackendError::Rejected {
                status: 409,
                message: Some(message.clone()),
            }),
            None => self.ok(),
        }
    }

    async fn list_users(&self) -> Result<Vec<RemoteUser>, BackendError> {
        self.reachable()?;
        Ok(self.users.clone())
    }

    async fn get_user(&self, user_name: &str) -> Result<Option<RemoteUser>, BackendError> {
        self.reachable()?;
        Ok(self.users.iter().find(|u| u.user_name == user_name).cloned())
    }

    async fn register_user(&self, registration: &Registration) -> Result<(), BackendError> {
        self.record(format!("register {}", registration.user_name));
        self.reachable()
    }

    async fn set_category(
        &self,
        user_name: &str,
        category: Category,
    ) -> Result<ApiReply, BackendError> {
        self.record(format!("set_category {user_name} {category}"));
        self.ok()
    }

    async fn high_demand(
        &self,
        _doctor_name: &str,
        _year: i32,
        _month: u32,
    ) -> Result<Option<HighDemandMonth>, BackendError> {
        self.reachable()?;
        Ok(None)
    }

    async fn setup_high_demand(&self, setup: &BaselineSetup) -> Result<ApiReply, BackendError> {
        self.record(format!("baseline {} {}/{} {:?}", setup.doctor_name, setup.month, setup.year, setup.hours));
        self.ok()
    }
}

// ── Helpers ──

fn test_config() -> AppConfig {
    AppConfig {
        port: 4000,
        backend_api: "http://api.test".to_string(),
        database_url: ":memory:".to_string(),
        admin_name: "admin".to_string(),
        admin_password: "1234".to_string(),
        utc_offset_minutes: 180,
        telegram_bot_url: None,
    }
}

fn test_state(api: MockApi) -> Arc<AppState> {
    let conn = db::init_db(":memory:").unwrap();
    Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config: test_config(),
        api: Box::new(api),
    })
}

fn test_app(state: Arc<AppState>) -> Router {
    app::router(state)
}

fn seed_user(state: &AppState, name: &str) {
    let conn = state.db.lock().unwrap();
    queries::create_user(
        &conn,
        &NewClinicUser {
            name: name.to_string(),
            display_name: "Huda A".to_string(),
            phone: "055".to_string(),
            password_hash: accounts::hash_password("secret").unwrap(),
        },
    )
    .unwrap();
}

fn appointment(id: &str, doctor: &str, user: Option<&str>, status: &str) -> Appointment {
    serde_json::from_value(serde_json::json!({
        "_id": id,
        "doctorName": doctor,
        "userName": user,
        "date": "2025-03-05T11:30:00Z",
        "status": status,
    }))
    .unwrap()
}

fn remote_user(name: &str, linked: bool, category: Option<&str>) -> RemoteUser {
    serde_json::from_value(serde_json::json!({
        "userName": name,
        "telegramLinked": linked,
        "attendedCount": 2,
        "missedCount": 1,
        "score": 8.0,
        "category": category,
    }))
    .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn location(res: &Response) -> String {
    res.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// Decoded `title`/`notice` pair of a redirect.
fn redirect_notice(res: &Response) -> (String, String) {
    let to = location(res);
    let query = to.split_once('?').map(|(_, q)| q).unwrap_or_default();
    let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query).unwrap();
    let find = |key: &str| {
        pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
            .unwrap_or_default()
    };
    (find("title"), find("notice"))
}

async fn body_text(res: Response) -> String {
    let body = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}

// ── Health ──

#[tokio::test]
async fn test_health() {
    let app = test_app(test_state(MockApi::default()));
    let res = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let json: serde_json::Value = serde_json::from_str(&body_text(res).await).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["users"], 0);
}

#[tokio::test]
async fn test_health_reports_poisoned_store() {
    let state = test_state(MockApi::default());
    let db = Arc::clone(&state.db);
    let _ = std::thread::spawn(move || {
        let _guard = db.lock().unwrap();
        panic!("poison the account store");
    })
    .join();

    let res = test_app(state).oneshot(get("/health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json: serde_json::Value = serde_json::from_str(&body_text(res).await).unwrap();
    assert_eq!(json["error"], "database lock poisoned");
}

// ── Signup / login ──

#[tokio::test]
async fn test_signup_creates_account_and_registers() {
    let api = MockApi::default();
    let calls = Arc::clone(&api.calls);
    let state = test_state(api);

    let res = test_app(state.clone())
        .oneshot(form("/signup", "name=Huda&displayName=Huda+A&phone=055&password=secret"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/login");

    let conn = state.db.lock().unwrap();
    let user = queries::find_user(&conn, "huda").unwrap().unwrap();
    assert_eq!(user.display_name, "Huda A");
    assert_ne!(user.password_hash, "secret");
    assert_eq!(*calls.lock().unwrap(), vec!["register huda".to_string()]);
}

#[tokio::test]
async fn test_duplicate_signup_ignores_case() {
    let api = MockApi::default();
    let calls = Arc::clone(&api.calls);
    let state = test_state(api);
    seed_user(&state, "huda");

    let res = test_app(state.clone())
        .oneshot(form("/signup", "name=HUDA&displayName=Other&phone=056&password=pw"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(body_text(res).await.contains("This username is already taken"));

    let conn = state.db.lock().unwrap();
    assert_eq!(queries::count_users(&conn).unwrap(), 1);
    assert!(calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_signup_rejects_spaces() {
    let state = test_state(MockApi::default());
    let res = test_app(state.clone())
        .oneshot(form("/signup", "name=huda+a&displayName=Huda&phone=055&password=pw"))
        .await
        .unwrap();
    assert!(body_text(res).await.contains("Username cannot contain spaces."));

    let res = test_app(state)
        .oneshot(form("/signup", "name=+++&displayName=Huda&phone=055&password=pw"))
        .await
        .unwrap();
    assert!(body_text(res).await.contains("Username cannot contain spaces."));
}

#[tokio::test]
async fn test_signup_keeps_local_record_when_registration_fails() {
    let api = MockApi {
        offline: true,
        ..Default::default()
    };
    let calls = Arc::clone(&api.calls);
    let state = test_state(api);

    let res = test_app(state.clone())
        .oneshot(form("/signup", "name=huda&displayName=Huda+A&phone=055&password=secret"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(body_text(res).await.contains("Server error"));

    let conn = state.db.lock().unwrap();
    assert_eq!(queries::count_users(&conn).unwrap(), 1);
    assert_eq!(*calls.lock().unwrap(), vec!["register huda".to_string()]);
}

#[tokio::test]
async fn test_admin_login_skips_store() {
    let state = test_state(MockApi::default());

    // Poison the store lock; any lookup would now fail.
    let db = Arc::clone(&state.db);
    let _ = std::thread::spawn(move || {
        let _guard = db.lock().unwrap();
        panic!("poison the account store");
    })
    .join();
    assert!(state.db.is_poisoned());

    let res = test_app(state)
        .oneshot(form("/login", "name=admin&password=1234"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/admin/dashboard");
}

#[tokio::test]
async fn test_user_login_redirects_with_identity() {
    let state = test_state(MockApi::default());
    seed_user(&state, "huda");

    let res = test_app(state)
        .oneshot(form("/login", "name=Huda&password=secret"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/user/available?userName=huda&phone=055");
}

#[tokio::test]
async fn test_login_failures() {
    let state = test_state(MockApi::default());
    seed_user(&state, "huda");

    let res = test_app(state.clone())
        .oneshot(form("/login", "name=huda&password=nope"))
        .await
        .unwrap();
    assert!(body_text(res).await.contains("Wrong password"));

    let res = test_app(state.clone())
        .oneshot(form("/login", "name=ghost&password=nope"))
        .await
        .unwrap();
    assert!(body_text(res).await.contains("User not found"));

    let res = test_app(state)
        .oneshot(form("/login", "name=huda&password="))
        .await
        .unwrap();
    assert!(body_text(res).await.contains("Missing fields"));
}

// ── Telegram ──

#[tokio::test]
async fn test_connect_telegram_requires_name_and_phone() {
    let state = test_state(MockApi::default());
    let res = test_app(state.clone())
        .oneshot(get("/connect-telegram?name=huda"))
        .await
        .unwrap();
    assert_eq!(location(&res), "/login");

    let res = test_app(state)
        .oneshot(get("/connect-telegram?name=huda&phone=055"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(body_text(res).await.contains("/check-telegram?user=huda"));
}

#[tokio::test]
async fn test_check_telegram_persists_remote_link() {
    let api = MockApi {
        users: vec![remote_user("huda", true, None)],
        ..Default::default()
    };
    let state = test_state(api);
    seed_user(&state, "huda");

    let res = test_app(state.clone())
        .oneshot(get("/check-telegram?user=huda"))
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_str(&body_text(res).await).unwrap();
    assert_eq!(json["linked"], true);

    let conn = state.db.lock().unwrap();
    assert!(queries::find_user(&conn, "huda").unwrap().unwrap().telegram_linked);
}

#[tokio::test]
async fn test_check_telegram_unknown_user() {
    let state = test_state(MockApi::default());
    let res = test_app(state)
        .oneshot(get("/check-telegram?user=ghost"))
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_str(&body_text(res).await).unwrap();
    assert_eq!(json["linked"], false);
}

// ── User pages ──

#[tokio::test]
async fn test_user_pages_require_identity() {
    let state = test_state(MockApi::default());
    for uri in [
        "/user/available",
        "/user/booked",
        "/user/doctors",
        "/user/past",
        "/user/loyalty",
    ] {
        let res = test_app(state.clone()).oneshot(get(uri)).await.unwrap();
        assert_eq!(res.status(), StatusCode::SEE_OTHER, "{uri}");
        assert_eq!(location(&res), "/login", "{uri}");
    }
}

fn mixed_appointments() -> Vec<Appointment> {
    vec![
        appointment("a1", "Dr. Attended", Some("huda"), "attended"),
        appointment("a2", "Dr. Missed", Some("huda"), "missed"),
        appointment("a3", "Dr. Booked", Some("huda"), "booked"),
        appointment("a4", "Dr. Open", None, "available"),
    ]
}

#[tokio::test]
async fn test_past_page_shows_only_filtered_status() {
    let api = MockApi {
        appointments: mixed_appointments(),
        ..Default::default()
    };
    let res = test_app(test_state(api))
        .oneshot(get("/user/past?userName=huda&phone=055&filter=attended"))
        .await
        .unwrap();
    let html = body_text(res).await;
    assert!(html.contains("Dr. Attended"));
    assert!(!html.contains("Dr. Missed"));
    assert!(!html.contains("Dr. Booked"));
    assert!(!html.contains("Dr. Open"));
}

#[tokio::test]
async fn test_available_page_shows_only_booked() {
    let api = MockApi {
        appointments: mixed_appointments(),
        users: vec![remote_user("huda", false, None)],
        ..Default::default()
    };
    let reads = Arc::clone(&api.reads);
    let state = test_state(api);
    seed_user(&state, "huda");

    let res = test_app(state)
        .oneshot(get("/user/available?userName=huda&phone=055"))
        .await
        .unwrap();
    assert_eq!(*reads.lock().unwrap(), vec!["booked"]);
    let html = body_text(res).await;
    assert!(html.contains("Hello, Huda A"));
    assert!(html.contains("Dr. Booked"));
    assert!(!html.contains("Dr. Attended"));
    assert!(!html.contains("Dr. Open"));
    assert!(html.contains("Telegram NOT connected"));
}

#[tokio::test]
async fn test_user_booked_page_lists_own_bookings() {
    let mut appointments = mixed_appointments();
    appointments.push(appointment("b1", "Dr. Someone Else", Some("sara"), "booked"));
    let api = MockApi {
        appointments,
        ..Default::default()
    };
    let reads = Arc::clone(&api.reads);
    let res = test_app(test_state(api))
        .oneshot(get("/user/booked?userName=huda&phone=055"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(*reads.lock().unwrap(), vec!["booked"]);
    let html = body_text(res).await;
    assert!(html.contains("Dr. Booked"));
    assert!(!html.contains("Dr. Attended"));
    assert!(!html.contains("Dr. Missed"));
    assert!(!html.contains("Dr. Open"));
    assert!(!html.contains("Dr. Someone Else"));
}

#[tokio::test]
async fn test_user_pages_render_inline_failures() {
    let api = MockApi {
        offline: true,
        ..Default::default()
    };
    let state = test_state(api);
    seed_user(&state, "huda");

    let pages = [
        ("/user/available?userName=huda&phone=055", "Failed to load appointments."),
        ("/user/booked?userName=huda&phone=055", "Failed to load booked appointments."),
        ("/user/doctors?userName=huda&phone=055", "Failed to load doctors."),
        ("/user/times?userName=huda&phone=055&doctor=Dr.+Salem", "Failed to load times."),
        ("/user/past?userName=huda&phone=055", "Failed to load past appointments."),
        ("/user/loyalty?userName=huda&phone=055", "Failed to load your points."),
    ];
    for (uri, text) in pages {
        let res = test_app(state.clone()).oneshot(get(uri)).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK, "{uri}");
        assert!(body_text(res).await.contains(text), "{uri}");
    }

    let res = test_app(state)
        .oneshot(get("/user/available?userName=huda&phone=055"))
        .await
        .unwrap();
    assert!(body_text(res).await.contains("Unable to check Telegram status."));
}

#[tokio::test]
async fn test_doctors_search() {
    let api = MockApi {
        appointments: vec![
            appointment("s1", "Dr. Salem", None, "available"),
            appointment("s2", "Dr. Noura", None, "available"),
        ],
        ..Default::default()
    };
    let state = test_state(api);

    let res = test_app(state.clone())
        .oneshot(get("/user/doctors?userName=huda&phone=055&q=SAL"))
        .await
        .unwrap();
    let html = body_text(res).await;
    assert!(html.contains("Dr. Salem"));
    assert!(!html.contains("Dr. Noura"));

    let res = test_app(state)
        .oneshot(get("/user/doctors?userName=huda&phone=055"))
        .await
        .unwrap();
    let html = body_text(res).await;
    assert!(html.contains("Dr. Salem"));
    assert!(html.contains("Dr. Noura"));
}

#[tokio::test]
async fn test_loyalty_shows_score() {
    let api = MockApi {
        users: vec![remote_user("huda", true, Some("Good"))],
        ..Default::default()
    };
    let res = test_app(test_state(api))
        .oneshot(get("/user/loyalty?userName=huda&phone=055"))
        .await
        .unwrap();
    let html = body_text(res).await;
    assert!(html.contains("8 Points"));
    assert!(html.contains("Premium Priority Appointment Slot"));
}

#[tokio::test]
async fn test_times_lists_open_slots_of_doctor() {
    let api = MockApi {
        appointments: vec![
            appointment("s1", "Dr. Salem", None, "available"),
            appointment("s2", "Dr. Salem", Some("huda"), "booked"),
            appointment("s3", "Dr. Noura", None, "available"),
        ],
        ..Default::default()
    };
    let res = test_app(test_state(api))
        .oneshot(get("/user/times?userName=huda&phone=055&doctor=Dr.+Salem"))
        .await
        .unwrap();
    let html = body_text(res).await;
    assert!(html.contains("/user/book/s1"));
    assert!(!html.contains("/user/book/s2"));
    assert!(!html.contains("/user/book/s3"));
}

#[tokio::test]
async fn test_booking_requires_telegram() {
    let api = MockApi {
        users: vec![remote_user("huda", false, None)],
        ..Default::default()
    };
    let calls = Arc::clone(&api.calls);

    let res = test_app(test_state(api))
        .oneshot(form("/user/book/s1", "userName=huda&phone=055&doctor=Dr.+Salem"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert!(location(&res).starts_with("/connect-telegram?name=huda&phone=055&title="));
    assert!(calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_booking_success_and_rejection() {
    let api = MockApi {
        users: vec![remote_user("huda", true, None)],
        ..Default::default()
    };
    let calls = Arc::clone(&api.calls);
    let res = test_app(test_state(api))
        .oneshot(form("/user/book/s1", "userName=huda&phone=055&doctor=Dr.+Salem"))
        .await
        .unwrap();
    assert!(location(&res).starts_with("/user/available?userName=huda&phone=055&title="));
    assert_eq!(*calls.lock().unwrap(), vec!["book s1 huda".to_string()]);

    let api = MockApi {
        users: vec![remote_user("huda", true, None)],
        book_rejection: Some("High demand slot".to_string()),
        ..Default::default()
    };
    let res = test_app(test_state(api))
        .oneshot(form("/user/book/s1", "userName=huda&phone=055&doctor=Dr.+Salem"))
        .await
        .unwrap();
    let to = location(&res);
    assert!(to.starts_with("/user/times?userName=huda&phone=055&doctor=Dr.+Salem&title="));
    assert!(to.ends_with("notice=High+demand+slot"));
}

#[tokio::test]
async fn test_booking_transport_failure() {
    let api = MockApi {
        users: vec![remote_user("huda", true, None)],
        book_offline: true,
        ..Default::default()
    };
    let calls = Arc::clone(&api.calls);
    let res = test_app(test_state(api))
        .oneshot(form("/user/book/s1", "userName=huda&phone=055&doctor=Dr.+Salem"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert!(location(&res).starts_with("/user/times?userName=huda&phone=055&doctor=Dr.+Salem&title="));
    let (title, notice) = redirect_notice(&res);
    assert_eq!(title, "خطأ");
    assert!(notice.starts_with("فشل حجز الموعد"));
    assert_eq!(*calls.lock().unwrap(), vec!["book s1 huda".to_string()]);
}

#[tokio::test]
async fn test_rejected_booking_without_doctor_returns_to_doctors() {
    let api = MockApi {
        users: vec![remote_user("huda", true, None)],
        book_rejection: Some("High demand slot".to_string()),
        ..Default::default()
    };
    let state = test_state(api);
    let res = test_app(state.clone())
        .oneshot(form("/user/book/s1", "userName=huda&phone=055&doctor="))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert!(location(&res).starts_with("/user/doctors?userName=huda&phone=055&title="));
    let (_, notice) = redirect_notice(&res);
    assert_eq!(notice, "High demand slot");

    // The doctors page shows the carried notice.
    let res = test_app(state).oneshot(get(&location(&res))).await.unwrap();
    assert!(body_text(res).await.contains("High demand slot"));
}

// ── Admin pages ──

#[tokio::test]
async fn test_booked_page_shows_only_booked() {
    let api = MockApi {
        appointments: mixed_appointments(),
        ..Default::default()
    };
    let res = test_app(test_state(api)).oneshot(get("/admin/booked")).await.unwrap();
    let html = body_text(res).await;
    assert!(html.contains("Dr. Booked"));
    assert!(!html.contains("Dr. Missed"));
    assert!(!html.contains("Dr. Open"));
}

#[tokio::test]
async fn test_attendance_lists_awaiting_bookings() {
    let api = MockApi {
        appointments: mixed_appointments(),
        ..Default::default()
    };
    let calls = Arc::clone(&api.calls);
    let state = test_state(api);

    let res = test_app(state.clone())
        .oneshot(get("/admin/dashboard?user=huda"))
        .await
        .unwrap();
    let html = body_text(res).await;
    assert!(html.contains("/admin/appointments/a3/status"));
    assert!(!html.contains("/admin/appointments/a1/status"));

    let res = test_app(state)
        .oneshot(form("/admin/appointments/a3/status", "status=missed&user=huda"))
        .await
        .unwrap();
    assert!(location(&res).starts_with("/admin/dashboard?user=huda&title="));
    assert_eq!(*calls.lock().unwrap(), vec!["set_status a3 missed".to_string()]);
}

#[tokio::test]
async fn test_status_rejects_unknown_outcome() {
    let api = MockApi::default();
    let calls = Arc::clone(&api.calls);
    let res = test_app(test_state(api))
        .oneshot(form("/admin/appointments/a3/status", "status=booked&user=huda"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert!(calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_add_block_missing_fields() {
    let api = MockApi::default();
    let calls = Arc::clone(&api.calls);
    let res = test_app(test_state(api))
        .oneshot(form(
            "/admin/add-block",
            "doctorName=Dr.+Salem&startDate=&startTime=09%3A00",
        ))
        .await
        .unwrap();
    assert!(location(&res).starts_with("/admin/add-block?title="));
    assert!(calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_add_block_sends_block() {
    let api = MockApi::default();
    let calls = Arc::clone(&api.calls);
    let res = test_app(test_state(api))
        .oneshot(form(
            "/admin/add-block",
            "doctorName=Dr.+Salem&startDate=2025-03-05&endDate=&startTime=09%3A30&endTime=&intervalMinutes=",
        ))
        .await
        .unwrap();
    assert!(location(&res).starts_with("/admin/add-block?doctor=Dr.+Salem&title="));
    assert_eq!(
        *calls.lock().unwrap(),
        vec!["add_block Dr. Salem 2025-03-05 09:30 every 60".to_string()]
    );
}

#[tokio::test]
async fn test_delete_slot() {
    let api = MockApi::default();
    let calls = Arc::clone(&api.calls);
    let res = test_app(test_state(api))
        .oneshot(form("/admin/slots/s9/delete", ""))
        .await
        .unwrap();
    assert!(location(&res).starts_with("/admin/add-block?title=Deleted"));
    assert_eq!(*calls.lock().unwrap(), vec!["delete_slot s9".to_string()]);
}

#[tokio::test]
async fn test_save_baseline_drops_bad_hours() {
    let api = MockApi::default();
    let calls = Arc::clone(&api.calls);
    let res = test_app(test_state(api))
        .oneshot(form(
            "/admin/baseline",
            "doctorName=Dr.+Salem&year=2025&month=3&hours=9%2C+x%2C+17%2C+30",
        ))
        .await
        .unwrap();
    assert!(location(&res).starts_with("/admin/baseline?doctor=Dr.+Salem&year=2025&title="));
    assert_eq!(
        *calls.lock().unwrap(),
        vec!["baseline Dr. Salem 3/2025 [9, 17]".to_string()]
    );
}

#[tokio::test]
async fn test_baseline_page_shows_twelve_months() {
    let api = MockApi {
        appointments: mixed_appointments(),
        ..Default::default()
    };
    let res = test_app(test_state(api))
        .oneshot(get("/admin/baseline?doctor=Dr.+Booked&year=2025"))
        .await
        .unwrap();
    let html = body_text(res).await;
    assert!(html.contains("January 2025"));
    assert!(html.contains("December 2025"));
    assert_eq!(html.matches("No baseline data.").count(), 12);
}

#[tokio::test]
async fn test_performance_filters_by_category() {
    let api = MockApi {
        users: vec![
            remote_user("huda", true, Some("Good")),
            remote_user("sara", true, Some("At-Risk")),
        ],
        ..Default::default()
    };
    let res = test_app(test_state(api))
        .oneshot(get("/admin/performance?category=At-Risk"))
        .await
        .unwrap();
    let html = body_text(res).await;
    assert!(html.contains(r#"value="sara""#));
    assert!(!html.contains(r#"value="huda""#));
}

#[tokio::test]
async fn test_set_category() {
    let api = MockApi::default();
    let calls = Arc::clone(&api.calls);
    let res = test_app(test_state(api))
        .oneshot(form("/admin/set-category", "userName=huda&category=At-Risk"))
        .await
        .unwrap();
    assert!(location(&res).starts_with("/admin/performance?title="));
    assert_eq!(*calls.lock().unwrap(), vec!["set_category huda At-Risk".to_string()]);
}

#[tokio::test]
async fn test_set_category_rejects_unknown_label() {
    let api = MockApi::default();
    let calls = Arc::clone(&api.calls);
    let state = test_state(api);
    for category in ["Bogus", "Other"] {
        let res = test_app(state.clone())
            .oneshot(form("/admin/set-category", &format!("userName=huda&category={category}")))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert!(location(&res).starts_with("/admin/performance?title="));
        assert_eq!(redirect_notice(&res).1, "فئة غير صالحة.");
    }
    assert!(calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_admin_pages_render_inline_failures() {
    let api = MockApi {
        offline: true,
        ..Default::default()
    };
    let state = test_state(api);
    let pages = [
        ("/admin/dashboard?user=huda", "Failed to load appointments."),
        ("/admin/booked", "Failed to load booked appointments."),
        ("/admin/performance", "Failed to load users."),
    ];
    for (uri, text) in pages {
        let res = test_app(state.clone()).oneshot(get(uri)).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK, "{uri}");
        assert!(body_text(res).await.contains(text), "{uri}");
    }
}
