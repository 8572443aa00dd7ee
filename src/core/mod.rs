// Public modules
pub mod artifacts;
pub mod config;
pub mod engine;
pub mod error;
pub mod lock;
pub mod logging;
pub mod orchestrator;
pub mod output;
pub mod plan;
pub mod runner;

// Re-export common types for convenience
pub use error::{Error, ErrorCode, Result};
pub use lock::RunLock;
pub use logging::{is_debug, is_quiet, set_debug, set_quiet};
pub use orchestrator::Policy;
pub use output::{RunReport, StepReport};
pub use plan::{BuildPlan, CacheBust, Step, StepKind};
pub use runner::{ProcessRunner, StepOutcome, StepRunner};
