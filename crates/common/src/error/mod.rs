//! Error classification shared by every Butterfly error type
//!
//! Module-specific errors stay module-specific (`AuthError`,
//! `ButterflyError`) but all of them implement [`ErrorClassification`] so the
//! UI layer can decide uniformly whether to offer a retry and how loudly to
//! report a failure.
//!
//! | Level | Use Case | Examples |
//! |-------|----------|----------|
//! | **Info** | Expected conditions | User cancelled the browser session |
//! | **Warning** | Degraded but operational | Identity script slow to load, transient network |
//! | **Error** | Failure requiring attention | Provider rejected the code, malformed credential |
//! | **Critical** | Integrity at risk | Missing client configuration |

use std::fmt;
use std::time::Duration;

/// Standard interface for classifying errors by their characteristics
pub trait ErrorClassification {
    /// Check if this error is retryable
    ///
    /// Retryable errors are transient: re-invoking the same operation may
    /// succeed without any configuration change.
    fn is_retryable(&self) -> bool;

    /// Get the error severity level
    fn severity(&self) -> ErrorSeverity;

    /// Check if this is a critical error requiring immediate attention
    fn is_critical(&self) -> bool {
        self.severity() == ErrorSeverity::Critical
    }

    /// Get the suggested retry delay if applicable
    fn retry_after(&self) -> Option<Duration> {
        None
    }
}

/// Error severity levels for monitoring and alerting
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Informational, typically for debugging
    Info,
    /// Warning, should be monitored but not critical
    Warning,
    /// Error, requires attention and action
    Error,
    /// Critical, immediate action required
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

impl ErrorClassification for butterfly_domain::ButterflyError {
    fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Config(_) | Self::Internal(_) => ErrorSeverity::Critical,
            Self::Network(_) => ErrorSeverity::Warning,
            Self::Auth(_) | Self::InvalidInput(_) => ErrorSeverity::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use butterfly_domain::ButterflyError;

    use super::*;

    #[test]
    fn test_severity_ordering_and_display() {
        assert!(ErrorSeverity::Info < ErrorSeverity::Warning);
        assert!(ErrorSeverity::Error < ErrorSeverity::Critical);
        assert_eq!(ErrorSeverity::Warning.to_string(), "WARN");
        assert_eq!(ErrorSeverity::Critical.to_string(), "CRITICAL");
    }

    #[test]
    fn test_domain_error_classification() {
        let network = ButterflyError::Network("reset".to_string());
        assert!(network.is_retryable());
        assert_eq!(network.severity(), ErrorSeverity::Warning);
        assert!(network.retry_after().is_none());

        let config = ButterflyError::Config("missing".to_string());
        assert!(!config.is_retryable());
        assert!(config.is_critical());
    }
}
