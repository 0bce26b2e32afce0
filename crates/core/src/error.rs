//! Error types shared by the record store and the save codec.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Rejection of a single store operation. The store is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// An airport with this name is already registered.
    #[error("airport with the same name already exists: {0}")]
    DuplicateAirport(String),
    /// The named airport is not registered.
    #[error("airport not found: {0}")]
    AirportNotFound(String),
    /// At least one end of a prospective route is not registered.
    #[error("one or both airports do not exist: {departure}, {arrival}")]
    UnknownAirports {
        /// Requested departure airport.
        departure: String,
        /// Requested arrival airport.
        arrival: String,
    },
    /// Departure and arrival name the same airport.
    #[error("departure airport and arrival airport cannot be the same: {0}")]
    SameAirport(String),
    /// No airplane is stationed at the departure airport.
    #[error("there are no airplanes available at {0}")]
    NoAirplanes(String),
    /// The actor declined to pick an airplane.
    #[error("airplane selection cancelled")]
    SelectionAborted,
    /// Airplane position outside `1..=count`.
    #[error("invalid airplane index {index} (expected 1..={count})")]
    InvalidAirplaneIndex {
        /// Position supplied by the actor.
        index: usize,
        /// Number of candidates that were offered.
        count: usize,
    },
    /// No fleet record carries this airplane name.
    #[error("airplane not found: {0}")]
    AirplaneNotFound(String),
    /// The chosen airplane cannot fly the requested distance.
    #[error("airplane {airplane} has a range of {range} km, route needs {distance} km")]
    InsufficientRange {
        /// Name of the chosen airplane.
        airplane: String,
        /// Range of the chosen airplane in km.
        range: u32,
        /// Requested route distance in km.
        distance: u32,
    },
    /// Route position outside `1..=count`.
    #[error("invalid route index {index} (expected 1..={count})")]
    InvalidRouteIndex {
        /// Position supplied by the actor.
        index: usize,
        /// Number of stored routes.
        count: usize,
    },
    /// Flight index outside `0..count`.
    #[error("invalid flight index {index} ({count} flights)")]
    InvalidFlightIndex {
        /// Index supplied by the actor.
        index: usize,
        /// Number of stored flights.
        count: usize,
    },
    /// Client position outside `1..=count`.
    #[error("invalid client index {index} (expected 1..={count})")]
    InvalidClientIndex {
        /// Position supplied by the actor.
        index: usize,
        /// Number of stored clients.
        count: usize,
    },
    /// A client handle no longer resolves, e.g. after the directory was cleared.
    #[error("unknown client handle")]
    UnknownClient,
}

/// Failure while writing or reading the save file.
#[derive(Debug, Error)]
pub enum SaveError {
    /// The save file could not be opened or created.
    #[error("failed to open {}: {source}", path.display())]
    Open {
        /// Location of the save file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// Reading or writing failed after the file was opened.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// The file content does not follow the section layout.
    #[error("malformed save data at line {line}: {reason}")]
    Malformed {
        /// 1-based line number of the offending line (or end of file).
        line: usize,
        /// What was expected.
        reason: String,
    },
}
