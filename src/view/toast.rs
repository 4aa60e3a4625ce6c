use crate::core::constants::TOAST_DURATION_MS;
use crate::i18n::{translate, Language};
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ToastKind {
    Success,
    /// The user has to sign in first
    LoginRequired,
    Error,
}

/// Transient message shown after a favorite toggle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    pub duration: Duration,
}

impl Toast {
    pub fn new(kind: ToastKind, message_key: &str, language: Language) -> Self {
        Self {
            kind,
            message: translate(message_key, language).to_string(),
            duration: Duration::from_millis(TOAST_DURATION_MS),
        }
    }

    pub fn success(message_key: &str, language: Language) -> Self {
        Self::new(ToastKind::Success, message_key, language)
    }

    pub fn login_required(language: Language) -> Self {
        Self::new(ToastKind::LoginRequired, "message.loginToAddFavorites", language)
    }

    pub fn error(language: Language) -> Self {
        Self::new(ToastKind::Error, "message.favoriteFailed", language)
    }
}
