//! Aggregation failure taxonomy.

use std::fmt;

use thiserror::Error;

use crate::upstream::UpstreamError;

/// The dependencies whose failure aborts a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MandatoryService {
    Identity,
    Access,
}

impl MandatoryService {
    /// Name used in user-facing messages.
    pub fn label(&self) -> &'static str {
        match self {
            MandatoryService::Identity => "user",
            MandatoryService::Access => "permissions",
        }
    }
}

impl fmt::Display for MandatoryService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A fatal aggregation outcome. Each variant maps to a 500 response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregateError {
    /// A mandatory upstream answered with an error.
    #[error("{service} service failed")]
    MandatoryServiceError {
        service: MandatoryService,
        source: UpstreamError,
    },

    /// A mandatory upstream did not answer before the deadline.
    #[error("timeout on {service} service")]
    MandatoryServiceTimeout { service: MandatoryService },
}

impl AggregateError {
    /// Classify a failed mandatory call.
    pub fn from_failure(service: MandatoryService, err: UpstreamError) -> Self {
        if err.is_deadline() {
            AggregateError::MandatoryServiceTimeout { service }
        } else {
            AggregateError::MandatoryServiceError { service, source: err }
        }
    }

    pub fn service(&self) -> MandatoryService {
        match self {
            AggregateError::MandatoryServiceError { service, .. }
            | AggregateError::MandatoryServiceTimeout { service } => *service,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, AggregateError::MandatoryServiceTimeout { .. })
    }
}

/// Why the optional context was left out of a response.
///
/// Never surfaced to the caller; only logged and counted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Degradation {
    /// The context upstream returned an error.
    Failed(UpstreamError),
    /// The deadline fired before the context arrived.
    TimedOut,
}

impl Degradation {
    pub fn from_failure(err: UpstreamError) -> Self {
        if err.is_deadline() {
            Degradation::TimedOut
        } else {
            Degradation::Failed(err)
        }
    }

    pub fn reason(&self) -> &'static str {
        match self {
            Degradation::Failed(_) => "error",
            Degradation::TimedOut => "timeout",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_facing_messages() {
        let cases = [
            (
                AggregateError::from_failure(MandatoryService::Identity, UpstreamError::Domain("x".into())),
                "user service failed",
            ),
            (
                AggregateError::from_failure(MandatoryService::Identity, UpstreamError::DeadlineExceeded),
                "timeout on user service",
            ),
            (
                AggregateError::from_failure(MandatoryService::Access, UpstreamError::Lost),
                "permissions service failed",
            ),
            (
                AggregateError::from_failure(MandatoryService::Access, UpstreamError::Cancelled),
                "timeout on permissions service",
            ),
        ];

        for (err, message) in cases {
            assert_eq!(err.to_string(), message);
        }
    }

    #[test]
    fn test_source_is_kept() {
        let err = AggregateError::from_failure(
            MandatoryService::Identity,
            UpstreamError::Domain("directory offline".into()),
        );
        let source = std::error::Error::source(&err).map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("directory offline"));
    }

    #[test]
    fn test_degradation_reason() {
        assert_eq!(Degradation::from_failure(UpstreamError::DeadlineExceeded), Degradation::TimedOut);
        assert_eq!(
            Degradation::from_failure(UpstreamError::Domain("x".into())).reason(),
            "error"
        );
    }
}
