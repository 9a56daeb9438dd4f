//! Error types for the simulation.
//!
//! Apart from configuration and I/O failures, every variant here marks an
//! internal consistency violation between the grid and the entity store.

use crate::types::{EntityId, Position};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Entity {id} is already placed at {at}")]
    AlreadyPlaced { id: EntityId, at: Position },

    #[error("Entity {0} is not on the grid")]
    NotOnGrid(EntityId),

    #[error("Unknown entity: {0}")]
    UnknownEntity(EntityId),

    #[error("Already exists: {0}")]
    AlreadyExists(EntityId),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<bincode::Error> for Error {
    fn from(err: bincode::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
