use apron_core::{CoreError, OpId};
use apron_mobility::MobilityError;
use apron_schedule::ScheduleError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Config(#[from] CoreError),

    #[error("no operation with id {0}")]
    UnknownOperation(OpId),

    #[error("schedule error: {0}")]
    Schedule(#[from] ScheduleError),

    #[error("mobility error: {0}")]
    Mobility(#[from] MobilityError),
}

pub type SimResult<T> = Result<T, SimError>;
