//! Field validation for the auth endpoints.

use crate::backend::error::{BackendError, BackendResult};
use crate::shared::Validator;

pub const USERNAME_MESSAGE: &str = "El nombre de usuario debe tener entre 3 y 30 caracteres, empezar por una letra y contener solo letras, números y guiones bajos";
pub const EMAIL_MESSAGE: &str = "El email no es válido";
pub const PASSWORD_MESSAGE: &str = "La contraseña debe tener al menos 8 caracteres";

/// Usernames are 3-30 chars, start with a letter, then letters, digits or `_`
pub fn is_valid_username(username: &str) -> bool {
    if username.len() < 3 || username.len() > 30 {
        return false;
    }

    let mut chars = username.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// An `@` with something before it and a dot somewhere after it
pub fn is_valid_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !email.contains(char::is_whitespace)
                && domain
                    .find('.')
                    .is_some_and(|dot| dot > 0 && dot < domain.len() - 1)
        }
        None => false,
    }
}

pub fn is_valid_password(password: &str) -> bool {
    password.chars().count() >= 8
}

pub fn registration(username: &str, email: &str, password: &str) -> BackendResult<()> {
    let mut validator = Validator::new();
    validator
        .check(is_valid_username(username), "username", USERNAME_MESSAGE)
        .check(is_valid_email(email), "email", EMAIL_MESSAGE)
        .check(is_valid_password(password), "password", PASSWORD_MESSAGE);
    validator.finish().map_err(BackendError::Validation)
}

pub fn email(email: &str) -> BackendResult<()> {
    let mut validator = Validator::new();
    validator.check(is_valid_email(email), "email", EMAIL_MESSAGE);
    validator.finish().map_err(BackendError::Validation)
}

pub fn new_password(field: &str, password: &str) -> BackendResult<()> {
    let mut validator = Validator::new();
    validator.check(is_valid_password(password), field, PASSWORD_MESSAGE);
    validator.finish().map_err(BackendError::Validation)
}
