use thiserror::Error;

use apron_spatial::SpatialError;

#[derive(Debug, Error)]
pub enum MobilityError {
    #[error("itinerary references unknown operation {0:?}")]
    UnknownOperation(String),

    #[error("vehicle references unknown archetype {0:?}")]
    UnknownArchetype(String),

    #[error("archetype references unknown grid {0:?}")]
    UnknownGrid(String),

    #[error("vehicle {0:?} has no itinerary legs")]
    EmptyItinerary(String),

    #[error("path planning failed for vehicle {vehicle:?}: {source}")]
    Planning {
        vehicle: String,
        #[source]
        source: SpatialError,
    },

    #[error("fleet parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type MobilityResult<T> = Result<T, MobilityError>;
