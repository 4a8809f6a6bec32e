use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("operation table parse error: {0}")]
    Parse(String),

    #[error("operation {0:?} is defined more than once")]
    DuplicateOperation(String),

    #[error("operation {operation:?} depends on unknown operation {dependency:?}")]
    UnknownDependency { operation: String, dependency: String },

    #[error("dependency cycle among operations: {}", .0.join(", "))]
    CycleDetected(Vec<String>),

    #[error("unknown simulation variant {0:?}: expected \"manual\" or \"automated\"")]
    UnknownVariant(String),

    #[error("unknown operation {0:?}")]
    UnknownOperation(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
