use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use rand_core::OsRng;
use rusqlite::Connection;
use serde::Deserialize;

use crate::config::AppConfig;
use crate::db::queries;
use crate::models::{ClinicUser, NewClinicUser};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SignupForm {
    pub name: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
    pub phone: String,
    pub password: String,
}

/// Signup input that passed validation, with the username lowercased.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidSignup {
    pub name: String,
    pub display_name: String,
    pub phone: String,
    pub password: String,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SignupError {
    #[error("All fields are required")]
    MissingFields,
    #[error("Username cannot contain spaces.")]
    UsernameHasSpaces,
    #[error("This username is already taken. Please choose another one.")]
    UsernameTaken,
    #[error("Server error")]
    Server,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub name: String,
    pub password: String,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum LoginError {
    #[error("Missing fields")]
    MissingFields,
    #[error("User not found")]
    UserNotFound,
    #[error("Wrong password")]
    WrongPassword,
    #[error("Server error. Try again.")]
    Server,
}

pub fn validate_signup(form: &SignupForm) -> Result<ValidSignup, SignupError> {
    let fields = [&form.name, &form.display_name, &form.phone, &form.password];
    if fields.iter().any(|f| f.is_empty()) {
        return Err(SignupError::MissingFields);
    }
    if form.name.chars().any(char::is_whitespace) {
        return Err(SignupError::UsernameHasSpaces);
    }

    Ok(ValidSignup {
        name: form.name.to_lowercase(),
        display_name: form.display_name.clone(),
        phone: form.phone.clone(),
        password: form.password.clone(),
    })
}

pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|phc| phc.to_string())
        .map_err(|e| anyhow::anyhow!("argon2 hash error: {e}"))
}

pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let parsed = match PasswordHash::new(stored_hash) {
        Ok(p) => p,
        Err(_) => return false,
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Store a new account unless the name is taken, ignoring case.
pub fn create_account(
    conn: &Connection,
    signup: &ValidSignup,
    password_hash: String,
) -> Result<(), SignupError> {
    match queries::find_user_ci(conn, &signup.name) {
        Ok(Some(_)) => return Err(SignupError::UsernameTaken),
        Ok(None) => {}
        Err(e) => {
            tracing::error!(error = %e, "failed to check existing username");
            return Err(SignupError::Server);
        }
    }

    let user = NewClinicUser {
        name: signup.name.clone(),
        display_name: signup.display_name.clone(),
        phone: signup.phone.clone(),
        password_hash,
    };

    match queries::create_user(conn, &user) {
        Ok(_) => Ok(()),
        Err(e) if queries::is_unique_violation(&e) => Err(SignupError::UsernameTaken),
        Err(e) => {
            tracing::error!(error = %e, "failed to create clinic user");
            Err(SignupError::Server)
        }
    }
}

pub fn is_admin(config: &AppConfig, form: &LoginForm) -> bool {
    form.name == config.admin_name && form.password == config.admin_password
}

pub fn check_credentials(
    user: Option<ClinicUser>,
    password: &str,
) -> Result<ClinicUser, LoginError> {
    let user = user.ok_or(LoginError::UserNotFound)?;
    if !verify_password(password, &user.password_hash) {
        return Err(LoginError::WrongPassword);
    }
    Ok(user)
}
