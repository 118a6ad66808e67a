use crate::utils::redact::{mask, serialize_optional_secret};
use serde::Serialize;
use std::fmt;

/// The parts of an incoming request the job access check looks at.
#[derive(Debug, Clone, Default)]
pub struct JobRequest {
    user: Option<String>,
    headers: Vec<(String, String)>,
}

impl JobRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the request as coming from an authenticated user.
    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user = Some(user_id.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    /// Case-insensitive header lookup; the first match wins.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Decides who may trigger background job runs.
///
/// Logged-in users always may. Anyone else must present
/// `Authorization: Bearer <CRON_SECRET>`. With no cron secret configured
/// only logged-in users get through.
#[derive(Clone, Default, PartialEq, Eq, Serialize)]
pub struct JobAccessPolicy {
    #[serde(serialize_with = "serialize_optional_secret")]
    cron_secret: Option<String>,
}

impl JobAccessPolicy {
    pub fn new(cron_secret: Option<String>) -> Self {
        Self {
            cron_secret: cron_secret.filter(|s| !s.is_empty()),
        }
    }

    pub fn has_cron_secret(&self) -> bool {
        self.cron_secret.is_some()
    }

    pub fn decide(&self, request: &JobRequest) -> JobDecision {
        if self.can_run(request) {
            JobDecision::Allowed
        } else {
            JobDecision::Denied
        }
    }

    pub fn can_run(&self, request: &JobRequest) -> bool {
        if let Some(user) = request.user() {
            tracing::debug!("Job run allowed for user {}", user);
            return true;
        }

        let Some(secret) = self.cron_secret.as_deref() else {
            tracing::debug!("Job run denied: no CRON_SECRET configured");
            return false;
        };

        let expected = expected_header(secret);
        let allowed = request
            .header("authorization")
            .is_some_and(|header| constant_time_eq(header.as_bytes(), expected.as_bytes()));

        if !allowed {
            tracing::debug!("Job run denied: bearer token missing or mismatched");
        }
        allowed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobDecision {
    Allowed,
    Denied,
}

impl JobDecision {
    pub fn as_str(self) -> &'static str {
        match self {
            JobDecision::Allowed => "allowed",
            JobDecision::Denied => "denied",
        }
    }

    /// Exit code for `check-job`: 0 when allowed, 4 when denied.
    pub fn exit_code(self) -> i32 {
        match self {
            JobDecision::Allowed => 0,
            JobDecision::Denied => 4,
        }
    }
}

impl fmt::Debug for JobAccessPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JobAccessPolicy")
            .field("cron_secret", &self.cron_secret.as_deref().map(mask))
            .finish()
    }
}

fn expected_header(secret: &str) -> String {
    format!("Bearer {}", secret)
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JobsConfig {
    pub access: JobAccessPolicy,
    pub tasks: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> JobAccessPolicy {
        JobAccessPolicy::new(Some("s3cr3t".to_string()))
    }

    #[test]
    fn test_user_always_allowed() {
        let request = JobRequest::new()
            .with_user("42")
            .with_header("Authorization", "Bearer wrong");
        assert!(policy().can_run(&request));
        assert!(JobAccessPolicy::new(None).can_run(&request));
    }

    #[test]
    fn test_matching_bearer_allowed() {
        let request = JobRequest::new().with_header("Authorization", "Bearer s3cr3t");
        assert!(policy().can_run(&request));

        let lowercase = JobRequest::new().with_header("authorization", "Bearer s3cr3t");
        assert!(policy().can_run(&lowercase));
    }

    #[test]
    fn test_missing_or_wrong_bearer_denied() {
        assert!(!policy().can_run(&JobRequest::new()));
        assert!(!policy().can_run(&JobRequest::new().with_header("Authorization", "")));
        assert!(!policy().can_run(&JobRequest::new().with_header("Authorization", "Bearer nope")));
        assert!(!policy().can_run(&JobRequest::new().with_header("Authorization", "s3cr3t")));
        assert!(!policy().can_run(&JobRequest::new().with_header("Authorization", "bearer s3cr3t")));
    }

    #[test]
    fn test_unset_secret_fails_closed() {
        let policy = JobAccessPolicy::new(None);
        assert!(!policy.can_run(&JobRequest::new().with_header("Authorization", "Bearer undefined")));
        assert!(!policy.can_run(&JobRequest::new().with_header("Authorization", "Bearer ")));

        let empty = JobAccessPolicy::new(Some(String::new()));
        assert!(!empty.has_cron_secret());
        assert!(!empty.can_run(&JobRequest::new().with_header("Authorization", "Bearer ")));
    }

    #[test]
    fn test_decision_exit_codes() {
        let allowed = policy().decide(&JobRequest::new().with_header("Authorization", "Bearer s3cr3t"));
        assert_eq!(allowed, JobDecision::Allowed);
        assert_eq!(allowed.exit_code(), 0);
        assert_eq!(allowed.as_str(), "allowed");

        let denied = policy().decide(&JobRequest::new());
        assert_eq!(denied, JobDecision::Denied);
        assert_eq!(denied.exit_code(), 4);
        assert_eq!(denied.as_str(), "denied");
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"abcd"));
    }
}
