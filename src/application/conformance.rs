use crate::domain::ports::ClientHandler;
use crate::error::{Result, SdkError};
use crate::testing::sample_request;
use tracing::debug;

/// Outcome of probing a freshly constructed handler for its basic
/// contractual obligations.
///
/// Every check runs and records its finding even after an earlier failure;
/// the public contract is still fail-fast via [`ConformanceReport::into_result`],
/// because a handler that fails shape checks must not proceed to simulation.
#[derive(Debug, Default)]
pub struct ConformanceReport {
    violations: Vec<String>,
    checks_run: usize,
}

impl ConformanceReport {
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[String] {
        &self.violations
    }

    pub fn checks_run(&self) -> usize {
        self.checks_run
    }

    /// Fails on the first recorded violation.
    pub fn into_result(mut self) -> Result<()> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(SdkError::ContractViolation(self.violations.remove(0)))
        }
    }

    fn check(&mut self, ok: bool, violation: &str) {
        self.checks_run += 1;
        if !ok {
            self.violations.push(violation.to_string());
        }
    }
}

/// Probes a handler instance for mandatory non-empty return values and for
/// acceptance of a known-good synthetic request.
pub fn validate_handler(handler: &dyn ClientHandler) -> ConformanceReport {
    let mut report = ConformanceReport::default();

    report.check(
        handler.merchant_config().is_some(),
        "merchant_config() returned no configuration",
    );
    report.check(
        !handler.merchant_id().is_empty(),
        "merchant_id() returned empty string",
    );
    report.check(
        !handler.merchant_name().is_empty(),
        "merchant_name() returned empty string",
    );

    let valid_request = sample_request();
    match handler.validate_request(&valid_request) {
        Ok(()) => report.check(true, ""),
        Err(err) => report.check(false, &format!("rejects valid input: {err}")),
    }

    debug!(
        checks = report.checks_run,
        violations = report.violations.len(),
        "conformance validation finished"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_merchant, MockClientHandler};
    use std::sync::Arc;

    #[test]
    fn test_conforming_handler_passes() {
        let mock = MockClientHandler::new();
        mock.set_merchant(Arc::new(sample_merchant()));

        let report = validate_handler(&mock);
        assert!(report.passed());
        assert_eq!(report.checks_run(), 4);
        assert!(report.into_result().is_ok());
    }

    #[test]
    fn test_unconfigured_handler_records_all_violations() {
        // No merchant wired: config, id and name checks all fail, and the
        // request check still runs.
        let mock = MockClientHandler::new();

        let report = validate_handler(&mock);
        assert_eq!(report.checks_run(), 4);
        assert_eq!(report.violations().len(), 3);

        let err = report.into_result().unwrap_err();
        assert!(matches!(err, SdkError::ContractViolation(ref msg)
            if msg.contains("merchant_config")));
    }

    #[test]
    fn test_handler_rejecting_valid_input_fails() {
        let mock = MockClientHandler::new();
        mock.set_merchant(Arc::new(sample_merchant()));
        mock.set_validate_request_error("backend offline");

        let report = validate_handler(&mock);
        assert!(!report.passed());
        let err = report.into_result().unwrap_err();
        assert!(err.to_string().contains("rejects valid input"));
    }
}
