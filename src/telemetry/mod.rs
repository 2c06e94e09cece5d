//! Flow Telemetry
//!
//! Per-operation telemetry events. A controller starts an event when an
//! operation begins; the dispatcher (or the structured-result wrapper)
//! completes it with success or failure once a terminal callback has fired.

use std::sync::{Arc, Mutex};
use std::time::Instant;

/// Public operation identifiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApiId {
    SignUpStart,
    SignUpWithPasswordStart,
    SignUpSubmitCode,
    SignUpSubmitPassword,
    SignUpSubmitAttributes,
    SignUpResendCode,
    SignInWithCodeStart,
    SignInWithPasswordStart,
    SignInSubmitCode,
    SignInSubmitPassword,
    SignInResendCode,
    SignInAfterSignUp,
    SignInAfterResetPassword,
    ResetPasswordStart,
    ResetPasswordSubmitCode,
    ResetPasswordSubmit,
    ResetPasswordResendCode,
    MfaSendChallenge,
    MfaSubmitChallenge,
}

impl ApiId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SignUpStart => "sign_up_start",
            Self::SignUpWithPasswordStart => "sign_up_with_password_start",
            Self::SignUpSubmitCode => "sign_up_submit_code",
            Self::SignUpSubmitPassword => "sign_up_submit_password",
            Self::SignUpSubmitAttributes => "sign_up_submit_attributes",
            Self::SignUpResendCode => "sign_up_resend_code",
            Self::SignInWithCodeStart => "sign_in_with_code_start",
            Self::SignInWithPasswordStart => "sign_in_with_password_start",
            Self::SignInSubmitCode => "sign_in_submit_code",
            Self::SignInSubmitPassword => "sign_in_submit_password",
            Self::SignInResendCode => "sign_in_resend_code",
            Self::SignInAfterSignUp => "sign_in_after_sign_up",
            Self::SignInAfterResetPassword => "sign_in_after_reset_password",
            Self::ResetPasswordStart => "reset_password_start",
            Self::ResetPasswordSubmitCode => "reset_password_submit_code",
            Self::ResetPasswordSubmit => "reset_password_submit",
            Self::ResetPasswordResendCode => "reset_password_resend_code",
            Self::MfaSendChallenge => "mfa_send_challenge",
            Self::MfaSubmitChallenge => "mfa_submit_challenge",
        }
    }
}

/// Completed telemetry record.
#[derive(Clone, Debug)]
pub struct TelemetryRecord {
    pub api_id: ApiId,
    pub success: bool,
    /// Error kind string for failed operations.
    pub error: Option<String>,
    pub duration: std::time::Duration,
}

/// Telemetry sink interface.
pub trait FlowTelemetry: Send + Sync {
    /// Record a completed operation.
    fn record(&self, record: TelemetryRecord);
}

/// One in-flight telemetry event. Completed exactly once.
pub struct EventHandle {
    api_id: ApiId,
    started: Instant,
    sink: Arc<dyn FlowTelemetry>,
}

impl EventHandle {
    pub(crate) fn new(api_id: ApiId, sink: Arc<dyn FlowTelemetry>) -> Self {
        tracing::debug!(api = api_id.as_str(), "operation started");
        Self {
            api_id,
            started: Instant::now(),
            sink,
        }
    }

    /// Complete the event successfully.
    pub fn success(self) {
        let record = TelemetryRecord {
            api_id: self.api_id,
            success: true,
            error: None,
            duration: self.started.elapsed(),
        };
        self.sink.record(record);
    }

    /// Complete the event as failed, recording the error kind.
    pub fn failure(self, error: impl Into<String>) {
        let error = error.into();
        tracing::debug!(api = self.api_id.as_str(), error = %error, "operation failed");
        let record = TelemetryRecord {
            api_id: self.api_id,
            success: false,
            error: Some(error),
            duration: self.started.elapsed(),
        };
        self.sink.record(record);
    }
}

/// In-memory telemetry sink for assertions.
#[derive(Default)]
pub struct InMemoryTelemetry {
    records: Mutex<Vec<TelemetryRecord>>,
}

impl InMemoryTelemetry {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded events.
    pub fn records(&self) -> Vec<TelemetryRecord> {
        self.records.lock().unwrap().clone()
    }

    /// The most recent record.
    pub fn last(&self) -> Option<TelemetryRecord> {
        self.records.lock().unwrap().last().cloned()
    }
}

impl FlowTelemetry for InMemoryTelemetry {
    fn record(&self, record: TelemetryRecord) {
        self.records.lock().unwrap().push(record);
    }
}

/// Telemetry sink that drops everything.
#[derive(Default)]
pub struct NoOpTelemetry;

impl FlowTelemetry for NoOpTelemetry {
    fn record(&self, _record: TelemetryRecord) {}
}

/// Create an in-memory telemetry sink.
pub fn create_in_memory_telemetry() -> Arc<InMemoryTelemetry> {
    Arc::new(InMemoryTelemetry::new())
}

/// Create a no-op telemetry sink.
pub fn no_op_telemetry() -> Arc<NoOpTelemetry> {
    Arc::new(NoOpTelemetry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_success() {
        let sink = create_in_memory_telemetry();
        let handle = EventHandle::new(ApiId::SignUpStart, sink.clone());
        handle.success();

        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert!(records[0].success);
        assert_eq!(records[0].api_id, ApiId::SignUpStart);
    }

    #[test]
    fn test_event_failure_records_error_kind() {
        let sink = create_in_memory_telemetry();
        let handle = EventHandle::new(ApiId::SignUpSubmitCode, sink.clone());
        handle.failure("invalid_code");

        let last = sink.last().unwrap();
        assert!(!last.success);
        assert_eq!(last.error.as_deref(), Some("invalid_code"));
    }
}
