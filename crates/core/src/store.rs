//! Aggregate of every component plus the operations a frontend invokes.

use tracing::warn;

use crate::{
    airplane::AirplaneFleet,
    airport::AirportRegistry,
    client::{ClientDirectory, TicketLedger},
    error::ValidationError,
    flight::{FlightCatalog, FlightSchedule},
    models::{Airplane, ClientId, Route, TicketId},
    route::{AirplaneChoice, AirplaneSelector, RouteGraph},
};

/// In-memory state of the operator: airports, fleet, routes, flights, clients
/// and tickets.
#[derive(Debug, Clone, Default)]
pub struct FleetStore {
    pub(crate) airports: AirportRegistry,
    pub(crate) fleet: AirplaneFleet,
    pub(crate) routes: RouteGraph,
    pub(crate) flights: FlightCatalog,
    pub(crate) clients: ClientDirectory,
    pub(crate) tickets: TicketLedger,
}

impl FleetStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registered airports.
    pub fn airports(&self) -> &AirportRegistry {
        &self.airports
    }

    /// Airplane records.
    pub fn fleet(&self) -> &AirplaneFleet {
        &self.fleet
    }

    /// Stored routes.
    pub fn routes(&self) -> &RouteGraph {
        &self.routes
    }

    /// Flight records.
    pub fn flights(&self) -> &FlightCatalog {
        &self.flights
    }

    /// Clients.
    pub fn clients(&self) -> &ClientDirectory {
        &self.clients
    }

    /// Booked tickets.
    pub fn tickets(&self) -> &TicketLedger {
        &self.tickets
    }

    /// Register an airport.
    pub fn create_airport(&mut self, name: &str) -> Result<(), ValidationError> {
        self.airports.create(name)
    }

    /// Remove an airport and its association list. Nothing else is touched.
    pub fn delete_airport(&mut self, name: &str) -> Option<Vec<String>> {
        self.airports.delete(name)
    }

    /// Record an airplane stationed at `airport`.
    pub fn create_airplane(
        &mut self,
        name: &str,
        seat_count: u32,
        range_km: u32,
        airport: &str,
    ) -> Result<&Airplane, ValidationError> {
        self.fleet
            .create(&mut self.airports, name, seat_count, range_km, airport)
    }

    /// Remove the first airplane called `name` from the fleet.
    pub fn delete_airplane(&mut self, name: &str) -> Result<Airplane, ValidationError> {
        self.fleet.delete(name)
    }

    /// Airplanes a route from `departure` to `arrival` could be flown with.
    pub fn route_candidates(
        &self,
        departure: &str,
        arrival: &str,
    ) -> Result<Vec<AirplaneChoice<'_>>, ValidationError> {
        RouteGraph::eligible_airplanes(&self.airports, &self.fleet, departure, arrival)
    }

    /// Create a route, asking `selector` which stationed airplane flies it.
    pub fn create_route(
        &mut self,
        departure: &str,
        arrival: &str,
        distance_km: u32,
        selector: &mut dyn AirplaneSelector,
    ) -> Result<Route, ValidationError> {
        self.routes.create(
            &self.airports,
            &self.fleet,
            departure,
            arrival,
            distance_km,
            selector,
        )
    }

    /// Remove the route at a 1-based position.
    pub fn delete_route(&mut self, position: usize) -> Result<String, ValidationError> {
        self.routes
            .delete(position)
            .inspect_err(|err| warn!(position, %err, "Route deletion rejected"))
    }

    /// Create a flight on the route at a 1-based position.
    pub fn create_flight(
        &mut self,
        name: &str,
        route_position: usize,
        schedule: &FlightSchedule,
    ) -> Result<String, ValidationError> {
        let route = self
            .routes
            .get(route_position)
            .ok_or(ValidationError::InvalidRouteIndex {
                index: route_position,
                count: self.routes.len(),
            })?;
        Ok(self.flights.create(name, &route.key, schedule).to_string())
    }

    /// Register a client.
    pub fn create_client(
        &mut self,
        name: &str,
        phone: &str,
        is_company: bool,
        airplane_count: u32,
    ) -> ClientId {
        self.clients.create(name, phone, is_company, airplane_count)
    }

    /// Book the flight at a 0-based index for the client at a 1-based position.
    pub fn book_ticket(
        &mut self,
        flight_index: usize,
        client_position: usize,
    ) -> Result<TicketId, ValidationError> {
        let flight = self
            .flights
            .get(flight_index)
            .ok_or(ValidationError::InvalidFlightIndex {
                index: flight_index,
                count: self.flights.len(),
            })?
            .to_string();
        let client = self
            .clients
            .id_at(client_position)
            .ok_or(ValidationError::InvalidClientIndex {
                index: client_position,
                count: self.clients.len(),
            })?;
        self.tickets.create(&mut self.clients, &flight, client)
    }

    /// Drop all state.
    pub fn clear(&mut self) {
        self.airports.clear();
        self.fleet.clear();
        self.routes.clear();
        self.flights.clear();
        self.clients.clear();
        self.tickets.clear();
    }
}
