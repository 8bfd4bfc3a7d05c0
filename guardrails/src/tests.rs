use crate::error::{GuardError, GuardResult};
use crate::types::*;
use serde_json::json;

/// Keyword guard that only implements the blocking operations.
struct BannedWordGuard {
    banned: Vec<&'static str>,
    outcome: GuardOutcome,
}

impl BannedWordGuard {
    fn new() -> Self {
        Self {
            banned: vec!["password", "ssn"],
            outcome: GuardOutcome::default(),
        }
    }

    fn score(&mut self, text: &str) -> GuardResult<f64> {
        let lowered = text.to_lowercase();
        let hits: Vec<&str> = self
            .banned
            .iter()
            .copied()
            .filter(|word| lowered.contains(word))
            .collect();
        let score = if hits.is_empty() { 0.0 } else { 1.0 };

        self.outcome = GuardOutcome {
            score: Some(score),
            reason: Some(if hits.is_empty() {
                "no banned words".to_string()
            } else {
                format!("found: {}", hits.join(", "))
            }),
            success: Some(hits.is_empty()),
            ..Default::default()
        };
        Ok(score)
    }
}

impl DecorativeGuard for BannedWordGuard {
    fn name(&self) -> &str {
        "Banned Word Guard"
    }

    fn guard_type(&self) -> GuardType {
        GuardType::Input
    }

    fn outcome(&self) -> &GuardOutcome {
        &self.outcome
    }
}

impl Guard for BannedWordGuard {
    fn guard_input(&mut self, input: &str) -> GuardResult<f64> {
        self.score(input)
    }

    fn guard_response(&mut self, response: &str) -> GuardResult<f64> {
        self.score(response)
    }
}

/// Guard that implements nothing but the attributes.
struct InputOnlyStub {
    outcome: GuardOutcome,
}

impl DecorativeGuard for InputOnlyStub {
    fn name(&self) -> &str {
        "Stub"
    }

    fn guard_type(&self) -> GuardType {
        GuardType::Input
    }

    fn outcome(&self) -> &GuardOutcome {
        &self.outcome
    }
}

#[async_trait::async_trait]
impl Guard for InputOnlyStub {
    fn guard_input(&mut self, _input: &str) -> GuardResult<f64> {
        Ok(0.0)
    }

    async fn a_guard_input(&mut self, _input: &str) -> GuardResult<f64> {
        Ok(0.0)
    }
}

#[test]
fn outcome_is_empty_before_first_call() {
    let guard = BannedWordGuard::new();
    assert!(!guard.outcome().is_evaluated());
    assert_eq!(guard.outcome(), &GuardOutcome::default());
}

#[test]
fn sync_call_populates_outcome() {
    let mut guard = BannedWordGuard::new();
    let score = guard.guard_input("my password is hunter2").unwrap();

    assert_eq!(score, 1.0);
    assert_eq!(guard.outcome().success, Some(false));
    assert_eq!(guard.outcome().reason.as_deref(), Some("found: password"));

    let score = guard.guard_response("the weather is nice").unwrap();
    assert_eq!(score, 0.0);
    assert_eq!(guard.outcome().success, Some(true));
}

#[tokio::test]
async fn async_input_without_override_is_unsupported() {
    let mut guard = BannedWordGuard::new();
    let err = guard.a_guard_input("hello").await.unwrap_err();
    match &err {
        GuardError::UnsupportedAsync { guard } => assert_eq!(guard, "BannedWordGuard"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(
        err.to_string(),
        "Async execution for BannedWordGuard not supported yet."
    );
}

#[tokio::test]
async fn async_response_without_override_is_unsupported_through_dyn() {
    let mut guard: Box<dyn Guard> = Box::new(BannedWordGuard::new());
    let err = guard.a_guard_response("hello").await.unwrap_err();
    assert!(
        matches!(err, GuardError::UnsupportedAsync { ref guard } if guard == "BannedWordGuard"),
        "{err:?}"
    );
}

#[tokio::test]
async fn missing_operations_are_not_implemented() {
    let mut guard: Box<dyn Guard> = Box::new(InputOnlyStub {
        outcome: GuardOutcome::default(),
    });

    assert_eq!(guard.a_guard_input("x").await.unwrap(), 0.0);

    let err = guard.guard_response("x").unwrap_err();
    match err {
        GuardError::NotImplemented { guard, operation } => {
            assert_eq!(guard, "InputOnlyStub");
            assert_eq!(operation, "guard_response");
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let err = guard.a_guard_response("x").await.unwrap_err();
    assert!(matches!(err, GuardError::UnsupportedAsync { .. }));
}

#[test]
fn guard_type_serialization() {
    assert_eq!(serde_json::to_value(GuardType::Input).unwrap(), json!("input"));
    let parsed: GuardType = serde_json::from_value(json!("output")).unwrap();
    assert_eq!(parsed, GuardType::Output);
    assert_eq!(GuardType::Output.to_string(), "Output Guard");
}

#[test]
fn outcome_serialization_skips_unset_fields() {
    let outcome = GuardOutcome {
        score: Some(0.0),
        success: Some(true),
        ..Default::default()
    };
    assert_eq!(
        serde_json::to_value(&outcome).unwrap(),
        json!({"score": 0.0, "success": true})
    );
}
