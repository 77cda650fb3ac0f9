pub mod admin;
pub mod auth;
pub mod health;
pub mod user;

use axum::response::Redirect;
use serde::Deserialize;

use crate::views::{link, Identity, Notice};

/// `notice` / `title` carried by a redirect from an action handler.
#[derive(Debug, Default, Deserialize)]
pub struct NoticeQuery {
    pub notice: Option<String>,
    pub title: Option<String>,
}

impl NoticeQuery {
    pub fn notice(&self) -> Option<Notice> {
        let message = self.notice.as_deref().filter(|m| !m.is_empty())?;
        Some(Notice::new(self.title.clone().unwrap_or_default(), message))
    }
}

/// `userName` / `phone` threaded through every user page.
#[derive(Debug, Default, Deserialize)]
pub struct IdentityQuery {
    #[serde(rename = "userName")]
    pub user_name: Option<String>,
    pub phone: Option<String>,
}

impl IdentityQuery {
    pub fn identity(&self) -> Option<Identity> {
        let user_name = self.user_name.as_deref().map(str::trim).filter(|n| !n.is_empty())?;
        Some(Identity {
            user_name: user_name.to_string(),
            phone: self.phone.clone().unwrap_or_default(),
        })
    }
}

pub fn redirect_with_notice(path: &str, params: &[(&str, &str)], notice: &Notice) -> Redirect {
    let mut all = params.to_vec();
    all.push(("title", notice.title.as_str()));
    all.push(("notice", notice.message.as_str()));
    Redirect::to(&link(path, &all))
}

pub fn to_login() -> Redirect {
    Redirect::to("/login")
}
