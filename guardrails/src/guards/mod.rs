pub mod config;
pub mod llm_judge;
pub mod traced;


pub use config::{build_guards, load_default_guards, load_guards_from_yaml, GuardDefinition};
pub use llm_judge::{JudgeGuard, JudgeVerdict};
pub use traced::TracedGuard;
