use crate::domain::entities::run_result::{RawRunResult, RunFailure, SkippedAssertion};
use crate::domain::services::humanize::{humanize, humanize_ms};

pub const NO_TEST_FAILURES: &str = "No Test Failures";
pub const NO_SKIPPED_TESTS: &str = "No Skipped Tests";
pub const PASS_RATE_UNAVAILABLE: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Passed,
    Failed,
}

impl RunOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunOutcome::Passed => "Passed",
            RunOutcome::Failed => "Failed",
        }
    }

    pub fn severity(&self) -> SeverityColor {
        match self {
            RunOutcome::Passed => SeverityColor::Good,
            RunOutcome::Failed => SeverityColor::Danger,
        }
    }
}

/// Attachment colour understood by the chat platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeverityColor {
    Good,
    Danger,
}

impl SeverityColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeverityColor::Good => "good",
            SeverityColor::Danger => "danger",
        }
    }
}

/// Derived view of a completed run, computed once and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub duration_humanized: String,
    /// `None` when the run recorded no assertions at all.
    pub pass_rate_percent: Option<f64>,
    pub outcome: RunOutcome,
    pub severity_color: SeverityColor,
    pub effective_assertion_count: u64,
    pub failure_count: u64,
    pub request_count: u64,
    pub iteration_count: u32,
    pub average_response_time: String,
    pub failure_list_text: String,
    pub skipped_list_text: String,
}

impl RunSummary {
    /// Build the summary for a completed run.
    pub fn from_raw(raw: &RawRunResult) -> Self {
        // Step 1: Classify the outcome; any failed assertion fails the run.
        let outcome = if raw.assertions_failed > 0 {
            RunOutcome::Failed
        } else {
            RunOutcome::Passed
        };

        // Step 2: Derive the numeric metrics.
        let skipped = raw.skipped_count() as u64;
        let effective_assertion_count = raw.assertions_total.saturating_sub(skipped);
        let pass_rate_percent = pass_rate(raw.assertions_total, raw.assertions_failed);

        // Step 3: Render the human-readable parts.
        Self {
            duration_humanized: humanize(raw.elapsed()),
            pass_rate_percent,
            outcome,
            severity_color: outcome.severity(),
            effective_assertion_count,
            failure_count: raw.assertions_failed,
            request_count: raw.request_count,
            iteration_count: raw.iteration_count.max(1),
            average_response_time: humanize_ms(raw.average_response_time_ms, Some(2)),
            failure_list_text: render_failures(&raw.failures),
            skipped_list_text: render_skipped(raw.skipped.as_deref().unwrap_or_default()),
        }
    }

    /// Pass rate with two decimals, or `N/A` for runs without assertions.
    pub fn pass_rate_label(&self) -> String {
        match self.pass_rate_percent {
            Some(rate) => format!("{rate:.2}"),
            None => PASS_RATE_UNAVAILABLE.to_string(),
        }
    }
}

/// Summarize a completed run. Pure; calling it twice yields equal summaries.
pub fn summarize(raw: &RawRunResult) -> RunSummary {
    RunSummary::from_raw(raw)
}

fn pass_rate(total: u64, failed: u64) -> Option<f64> {
    let denominator = total.saturating_add(failed);
    if denominator == 0 {
        return None;
    }
    let rate = (total as f64 * 100.0) / denominator as f64;
    Some((rate * 100.0).round() / 100.0)
}

fn render_failures(failures: &[RunFailure]) -> String {
    if failures.is_empty() {
        return NO_TEST_FAILURES.to_string();
    }
    failures
        .iter()
        .map(|f| {
            format!(
                "*{}:* {} - {} - _{}_",
                f.error_name, f.source_name, f.error_test, f.error_message
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn render_skipped(skipped: &[SkippedAssertion]) -> String {
    if skipped.is_empty() {
        return NO_SKIPPED_TESTS.to_string();
    }
    skipped
        .iter()
        .map(|s| format!("*{}:* {}", s.item_name, s.assertion_description))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::timestamps::Timestamp;

    fn raw(total: u64, failed: u64) -> RawRunResult {
        RawRunResult {
            collection_name: Some("Restful Booker".to_string()),
            environment_name: Some("Staging".to_string()),
            iteration_count: 1,
            started_at: Timestamp::from_unix_millis(1_700_000_000_000).unwrap(),
            completed_at: Timestamp::from_unix_millis(1_700_000_092_400).unwrap(),
            average_response_time_ms: 48.5,
            request_count: 12,
            assertions_total: total,
            assertions_failed: failed,
            failures: Vec::new(),
            skipped: None,
        }
    }

    fn booking_failure() -> RunFailure {
        RunFailure {
            error_name: "AssertionError".to_string(),
            error_test: "Status code is 200".to_string(),
            error_message: "expected 404 to equal 200".to_string(),
            source_name: "Get Booking".to_string(),
        }
    }

    #[test]
    fn given_no_failed_assertions_when_summarized_should_pass_with_good_color() {
        let summary = summarize(&raw(50, 0));

        assert_eq!(summary.outcome, RunOutcome::Passed);
        assert_eq!(summary.severity_color, SeverityColor::Good);
        assert_eq!(summary.pass_rate_label(), "100.00");
        assert_eq!(summary.failure_list_text, NO_TEST_FAILURES);
        assert_eq!(summary.skipped_list_text, NO_SKIPPED_TESTS);
        assert_eq!(summary.effective_assertion_count, 50);
    }

    #[test]
    fn given_failed_assertions_when_summarized_should_fail_with_danger_color() {
        let mut input = raw(45, 5);
        input.failures = vec![booking_failure()];

        let summary = summarize(&input);

        assert_eq!(summary.outcome, RunOutcome::Failed);
        assert_eq!(summary.severity_color, SeverityColor::Danger);
        assert_eq!(summary.pass_rate_label(), "90.00");
        assert_eq!(summary.failure_count, 5);
        assert_eq!(
            summary.failure_list_text,
            "*AssertionError:* Get Booking - Status code is 200 - _expected 404 to equal 200_"
        );
    }

    #[test]
    fn given_several_failures_when_summarized_should_keep_order_and_separate_with_blank_line() {
        let mut second = booking_failure();
        second.source_name = "Delete Booking".to_string();
        second.error_test = "Status code is 201".to_string();
        let mut input = raw(10, 2);
        input.failures = vec![booking_failure(), second];

        let text = summarize(&input).failure_list_text;
        let entries: Vec<&str> = text.split("\n\n").collect();

        assert_eq!(entries.len(), 2);
        assert!(entries[0].contains("Get Booking"));
        assert!(entries[1].contains("Delete Booking"));
        assert_eq!(text.matches("Status code is 200").count(), 1);
    }

    #[test]
    fn given_skipped_assertion_when_summarized_should_reduce_effective_count() {
        let mut input = raw(10, 0);
        input.skipped = Some(vec![SkippedAssertion {
            item_name: "Create Booking".to_string(),
            assertion_description: "Response time check".to_string(),
        }]);

        let summary = summarize(&input);

        assert_eq!(summary.effective_assertion_count, 9);
        assert_eq!(
            summary.skipped_list_text,
            "*Create Booking:* Response time check"
        );
    }

    #[test]
    fn given_empty_skipped_list_when_summarized_should_use_total_and_placeholder() {
        let mut input = raw(10, 0);
        input.skipped = Some(Vec::new());

        let summary = summarize(&input);

        assert_eq!(summary.effective_assertion_count, 10);
        assert_eq!(summary.skipped_list_text, NO_SKIPPED_TESTS);
    }

    #[test]
    fn given_more_skipped_than_total_when_summarized_should_not_go_negative() {
        let mut input = raw(1, 0);
        input.skipped = Some(vec![
            SkippedAssertion {
                item_name: "A".to_string(),
                assertion_description: "a".to_string(),
            },
            SkippedAssertion {
                item_name: "B".to_string(),
                assertion_description: "b".to_string(),
            },
        ]);

        assert_eq!(summarize(&input).effective_assertion_count, 0);
    }

    #[test]
    fn given_no_assertions_when_summarized_should_report_unavailable_pass_rate() {
        let summary = summarize(&raw(0, 0));

        assert_eq!(summary.pass_rate_percent, None);
        assert_eq!(summary.pass_rate_label(), PASS_RATE_UNAVAILABLE);
        assert_eq!(summary.outcome, RunOutcome::Passed);
    }

    #[test]
    fn given_uneven_ratio_when_summarized_should_round_to_two_decimals() {
        let summary = summarize(&raw(2, 1));

        assert_eq!(summary.pass_rate_percent, Some(66.67));
        assert_eq!(summary.pass_rate_label(), "66.67");
    }

    #[test]
    fn given_timings_when_summarized_should_humanize_duration_and_response_time() {
        let summary = summarize(&raw(1, 0));

        assert_eq!(summary.duration_humanized, "1m 32.4s");
        assert_eq!(summary.average_response_time, "48.50ms");
    }

    #[test]
    fn given_same_input_when_summarized_twice_should_be_identical() {
        let mut input = raw(45, 5);
        input.failures = vec![booking_failure()];

        assert_eq!(summarize(&input), summarize(&input));
    }

    #[test]
    fn given_any_counts_when_summarized_should_keep_pass_rate_in_range() {
        for (total, failed) in [(1, 0), (1, 1), (3, 7), (1_000, 1), (7, 7)] {
            let rate = summarize(&raw(total, failed)).pass_rate_percent.unwrap();
            assert!((0.0..=100.0).contains(&rate), "{total}/{failed} -> {rate}");
        }
    }
}
