use thiserror::Error;

/// A rule implementation hit malformed window data. Isolated per
/// (code, window): the failing rule's contribution is dropped and the other
/// rules still run.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("non-finite value in scoring window: {0}")]
    NonFiniteWindowValue(String),

    #[error("scoring window is inconsistent: {0}")]
    InconsistentWindow(String),
}

/// Engine-level failures surfaced by a pipeline pass. Per-record and
/// per-rule problems never reach this type; a pass only fails wholesale
/// when the runtime cannot execute it.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("partition scoring task failed: {0}")]
    PartitionJoin(String),
}
