#![warn(clippy::all, missing_docs)]

//! Core domain logic for the Belavia operator console.
//!
//! This crate hosts the record store for airports, airplanes, routes,
//! flights, clients and tickets, the validation rules applied when they are
//! created, the plain-text save format, and configuration handling used by
//! the terminal UI and any future frontends.

pub mod airplane;
pub mod airport;
pub mod client;
pub mod config;
pub mod error;
pub mod flight;
pub mod models;
pub mod route;
pub mod save;
pub mod store;

pub use airplane::AirplaneFleet;
pub use airport::AirportRegistry;
pub use client::{ClientDirectory, TicketLedger};
pub use crate::config::AppConfig;
pub use error::{SaveError, ValidationError};
pub use flight::{FlightCatalog, FlightSchedule};
pub use models::{Airplane, Client, ClientId, Route, Ticket, TicketId};
pub use route::{AirplaneChoice, AirplaneSelector, FixedSelection, RouteGraph};
pub use save::SaveManager;
pub use store::FleetStore;
