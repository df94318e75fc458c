//! Transient user notices.
//!
//! Every use-case outcome is reported to the presentation layer as a
//! [`Notice`], shown as a short-lived toast.

use blogdesk_core::error::{BlogError, ErrorKind};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Callback receiving notices (for UI notifications).
pub type NoticeCallback = Arc<dyn Fn(Notice) + Send + Sync>;

/// The user action a notice reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    LoadPosts,
    CreatePost,
    UpdatePost,
    DeletePost,
    SignIn,
    Register,
    SignOut,
    ChangePassword,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    /// Notice for a successful action.
    pub fn completed(action: Action) -> Self {
        let message = match action {
            Action::LoadPosts => "Blogs loaded.",
            Action::CreatePost => "Blog successfully uploaded!",
            Action::UpdatePost => "Blog successfully updated!",
            Action::DeletePost => "Blog successfully deleted!",
            Action::SignIn => "Welcome back!",
            Action::Register => "Account created. Please log in.",
            Action::SignOut => "Signed out.",
            Action::ChangePassword => "Password updated successfully",
        };
        Self::success(message)
    }

    /// Notice for a failed action; each error kind reads differently.
    pub fn failed(action: Action, err: &BlogError) -> Self {
        let message = match (err.kind(), action) {
            (ErrorKind::Validation, _) => match err {
                BlogError::Validation { message, .. } => message.clone(),
                _ => "Invalid input.".to_string(),
            },
            (ErrorKind::Auth, Action::SignIn) => "Invalid credentials. Please try again.".into(),
            (ErrorKind::Auth, Action::Register) => {
                "Error registering user. Please try again.".into()
            }
            (ErrorKind::Auth, Action::SignOut) => "Error signing out.".into(),
            (ErrorKind::Auth, Action::ChangePassword) => "Error updating password".into(),
            (ErrorKind::Auth, _) => "Please log in to post a blog.".into(),
            (ErrorKind::NotFound, _) => "This blog no longer exists.".into(),
            (ErrorKind::Fetch, _) => "Error fetching blogs.".into(),
            (ErrorKind::Persist, Action::CreatePost) => "Error uploading blog.".into(),
            (ErrorKind::Persist, Action::UpdatePost) => "Error updating blog.".into(),
            (ErrorKind::Persist, Action::DeletePost) => "Error deleting blog.".into(),
            (ErrorKind::Persist, _) => "Error saving changes.".into(),
            (ErrorKind::Config, _) | (ErrorKind::Internal, _) => {
                "Something went wrong. Please try again.".into()
            }
        };
        Self::error(message)
    }
}
