/// Audit trail for session transitions
///
/// Each register / login / refresh / logout / password reset / user delete
/// produces one [`AuditLog`] entry, written through `tracing` so it lands in
/// the same JSON stream as request logs.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    Register,
    Login,
    Refresh,
    Logout,
    ResetPassword,
    DeleteUser,
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AuditAction::Register => "REGISTER",
            AuditAction::Login => "LOGIN",
            AuditAction::Refresh => "REFRESH",
            AuditAction::Logout => "LOGOUT",
            AuditAction::ResetPassword => "RESET_PASSWORD",
            AuditAction::DeleteUser => "DELETE_USER",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditStatus {
    Success,
    Failure,
}

impl fmt::Display for AuditStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditStatus::Success => f.write_str("SUCCESS"),
            AuditStatus::Failure => f.write_str("FAILURE"),
        }
    }
}

/// 감사 로그 항목
#[derive(Debug, Clone, Serialize)]
pub struct AuditLog {
    pub log_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub action: AuditAction,
    pub status: AuditStatus,
    /// User the transition applies to, when known
    pub user_id: Option<Uuid>,
    pub message: String,
}

impl AuditLog {
    pub fn new(action: AuditAction, status: AuditStatus, message: impl Into<String>) -> Self {
        Self {
            log_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            action,
            status,
            user_id: None,
            message: message.into(),
        }
    }

    pub fn success(action: AuditAction, message: impl Into<String>) -> Self {
        Self::new(action, AuditStatus::Success, message)
    }

    pub fn failure(action: AuditAction, message: impl Into<String>) -> Self {
        Self::new(action, AuditStatus::Failure, message)
    }

    pub fn with_user_id(mut self, user_id: Uuid) -> Self {
        self.user_id = Some(user_id);
        self
    }
}

/// Write an audit entry; failures are logged at warn level
pub fn log_audit(entry: &AuditLog) {
    match entry.status {
        AuditStatus::Failure => tracing::warn!(
            log_id = %entry.log_id,
            action = %entry.action,
            user_id = ?entry.user_id,
            status = %entry.status,
            message = %entry.message,
            "Audit log entry"
        ),
        AuditStatus::Success => tracing::info!(
            log_id = %entry.log_id,
            action = %entry.action,
            user_id = ?entry.user_id,
            status = %entry.status,
            message = %entry.message,
            "Audit log entry"
        ),
    }
}
