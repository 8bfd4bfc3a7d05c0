use tracing::field;
use tracing::info_span;
use tracing::Span;
use tracing_futures::Instrument;
use vigil_telemetry::events::{GUARD_TARGET, SPAN_GUARD_EVALUATION};

use crate::error::GuardResult;
use crate::types::{DecorativeGuard, Guard, GuardOutcome, GuardType};

/// Runs every call of the inner guard inside a `guard_evaluation` span.
pub struct TracedGuard {
    inner: Box<dyn Guard>,
}

impl TracedGuard {
    pub fn new(inner: Box<dyn Guard>) -> Self {
        Self { inner }
    }

    fn span(&self, operation: &'static str) -> Span {
        info_span!(
            target: GUARD_TARGET,
            SPAN_GUARD_EVALUATION,
            guard = %self.inner.name(),
            guard_type = %self.inner.guard_type(),
            operation,
            score = field::Empty,
            success = field::Empty,
            error = field::Empty,
        )
    }

    fn record(&self, span: &Span, result: &GuardResult<f64>) {
        match result {
            Ok(score) => {
                span.record("score", *score);
                if let Some(success) = self.inner.outcome().success {
                    span.record("success", success);
                }
            }
            Err(e) => {
                span.record("error", field::display(e));
            }
        }
    }
}

impl DecorativeGuard for TracedGuard {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn guard_type(&self) -> GuardType {
        self.inner.guard_type()
    }

    fn outcome(&self) -> &GuardOutcome {
        self.inner.outcome()
    }
}

#[async_trait::async_trait]
impl Guard for TracedGuard {
    fn guard_input(&mut self, input: &str) -> GuardResult<f64> {
        let span = self.span("guard_input");
        let result = span.in_scope(|| self.inner.guard_input(input));
        self.record(&span, &result);
        result
    }

    async fn a_guard_input(&mut self, input: &str) -> GuardResult<f64> {
        let span = self.span("a_guard_input");
        let result = self
            .inner
            .a_guard_input(input)
            .instrument(span.clone())
            .await;
        self.record(&span, &result);
        result
    }

    fn guard_response(&mut self, response: &str) -> GuardResult<f64> {
        let span = self.span("guard_response");
        let result = span.in_scope(|| self.inner.guard_response(response));
        self.record(&span, &result);
        result
    }

    async fn a_guard_response(&mut self, response: &str) -> GuardResult<f64> {
        let span = self.span("a_guard_response");
        let result = self
            .inner
            .a_guard_response(response)
            .instrument(span.clone())
            .await;
        self.record(&span, &result);
        result
    }
}
