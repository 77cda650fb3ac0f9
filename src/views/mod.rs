pub mod admin;
pub mod auth;
pub mod user;

use maud::{html, Markup, PreEscaped, DOCTYPE};

/// One-shot message shown at the top of a page after a redirect.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Who is browsing the user pages. Carried in the query string, never in a cookie.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub user_name: String,
    pub phone: String,
}

impl Identity {
    pub fn link(&self, path: &str) -> String {
        link(path, &[("userName", self.user_name.as_str()), ("phone", self.phone.as_str())])
    }

    pub fn link_with(&self, path: &str, extra: &[(&str, &str)]) -> String {
        let mut params = vec![("userName", self.user_name.as_str()), ("phone", self.phone.as_str())];
        params.extend_from_slice(extra);
        link(path, &params)
    }
}

pub enum Nav<'a> {
    Public,
    User(&'a Identity),
    Admin,
}

/// `path?k=v&...` with the values form-encoded.
pub fn link(path: &str, params: &[(&str, &str)]) -> String {
    match serde_urlencoded::to_string(params) {
        Ok(query) if !query.is_empty() => format!("{path}?{query}"),
        _ => path.to_string(),
    }
}

pub fn page(title: &str, nav: Nav, notice: Option<&Notice>, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " · Clinic" }
                link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/css/bootstrap.min.css";
                style { (PreEscaped(CSS)) }
            }
            body {
                (navbar(&nav))
                main.container."py-4" {
                    @if let Some(notice) = notice {
                        div.alert.alert-info.notice role="alert" dir="auto" {
                            strong { (notice.title) }
                            p."mb-0" { (notice.message) }
                        }
                    }
                    (content)
                }
            }
        }
    }
}

fn navbar(nav: &Nav) -> Markup {
    html! {
        nav.navbar.navbar-expand.bg-light."mb-3" {
            div.container {
                a.navbar-brand href="/" { "🏥 Clinic" }
                ul.navbar-nav {
                    @match nav {
                        Nav::Public => {
                            li.nav-item { a.nav-link href="/login" { "Login" } }
                            li.nav-item { a.nav-link href="/signup" { "Sign up" } }
                        }
                        Nav::User(id) => {
                            li.nav-item { a.nav-link href=(id.link("/user/available")) { "My appointments" } }
                            li.nav-item { a.nav-link href=(id.link("/user/booked")) { "Booked" } }
                            li.nav-item { a.nav-link href=(id.link("/user/doctors")) { "Book" } }
                            li.nav-item { a.nav-link href=(id.link("/user/past")) { "History" } }
                            li.nav-item { a.nav-link href=(id.link("/user/loyalty")) { "Points" } }
                            li.nav-item { a.nav-link href="/login" { "Logout" } }
                        }
                        Nav::Admin => {
                            li.nav-item { a.nav-link href="/admin/dashboard" { "Attendance" } }
                            li.nav-item { a.nav-link href="/admin/add-block" { "Slots" } }
                            li.nav-item { a.nav-link href="/admin/booked" { "Booked" } }
                            li.nav-item { a.nav-link href="/admin/baseline" { "Peak hours" } }
                            li.nav-item { a.nav-link href="/admin/performance" { "Performance" } }
                            li.nav-item { a.nav-link href="/login" { "Logout" } }
                        }
                    }
                }
            }
        }
    }
}

/// Inline placeholder for a section whose data could not be fetched.
pub fn load_failed(what: &str) -> Markup {
    html! { p.text-danger { "Failed to load " (what) "." } }
}

const CSS: &str = r#"
.notice p { white-space: pre-line; }
.small-card, .time-card, .past-card, .attendance-card, .doctor-card, .reward-card {
  border: 1px solid #e3e6ea; border-radius: 12px; padding: 14px; margin-bottom: 12px; background: #fff;
}
.card-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(220px, 1fr)); gap: 12px; }
.doctor-card a { text-decoration: none; color: inherit; display: block; }
.past-card, .attendance-card { display: flex; justify-content: space-between; align-items: center; }
.status.booked { background: #e7f1ff; color: #0d6efd; border-radius: 8px; padding: 2px 10px; }
.reward-points { font-weight: 600; }
"#;
