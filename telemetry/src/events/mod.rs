//! Span names and log targets shared by the Vigil crates.

pub const SPAN_ANTHROPIC: &str = "anthropic";

pub const SPAN_GUARD_EVALUATION: &str = "guard_evaluation";

/// Guard evaluation spans sit under the `vigil::user_tracing` prefix shared
/// with model calls; filter on it with `RUST_LOG=vigil::user_tracing=debug`.
pub const GUARD_TARGET: &str = "vigil::user_tracing::guard";
