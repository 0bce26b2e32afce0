//! Flight catalogue of denormalized schedule records.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::info;

/// Departure and arrival time/date text as entered by the operator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlightSchedule {
    /// Departure time, e.g. `10:15`.
    pub departure_time: String,
    /// Departure date, e.g. `2024-05-01`.
    pub departure_date: String,
    /// Arrival time.
    pub arrival_time: String,
    /// Arrival date.
    pub arrival_date: String,
}

/// Build the single-line record stored for a flight.
pub fn flight_record(name: &str, route: &str, schedule: &FlightSchedule) -> String {
    format!(
        "{name} | Route: {route} | Departure: {} {} | Arrival: {} {}",
        schedule.departure_time,
        schedule.departure_date,
        schedule.arrival_time,
        schedule.arrival_date
    )
}

/// Display fields recovered from a stored record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlightSummary<'a> {
    /// Flight name.
    pub name: &'a str,
    /// Route key the flight was created on.
    pub route: &'a str,
    /// Departure time and date.
    pub departure: &'a str,
    /// Arrival time and date.
    pub arrival: &'a str,
}

static RECORD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<name>.*?) \| Route: (?P<route>.*) \| Departure: (?P<dep>.*) \| Arrival: (?P<arr>.*)$")
        .expect("failed to compile flight record regex")
});

/// Split a stored record into its display fields, if it has the usual shape.
pub fn summarize(record: &str) -> Option<FlightSummary<'_>> {
    let caps = RECORD_RE.captures(record)?;
    Some(FlightSummary {
        name: caps.name("name")?.as_str(),
        route: caps.name("route")?.as_str(),
        departure: caps.name("dep")?.as_str(),
        arrival: caps.name("arr")?.as_str(),
    })
}

/// Flight records in creation order. Records keep no link to the route graph.
#[derive(Debug, Clone, Default)]
pub struct FlightCatalog {
    flights: Vec<String>,
}

impl FlightCatalog {
    /// Create an empty catalogue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build and store a record. Never fails.
    pub fn create(&mut self, name: &str, route: &str, schedule: &FlightSchedule) -> &str {
        let record = flight_record(name, route, schedule);
        info!(flight = %record, "Flight created");
        self.insert(record)
    }

    /// Store an already-built record verbatim.
    pub fn insert(&mut self, record: String) -> &str {
        self.flights.push(record);
        self.flights.last().map(String::as_str).unwrap_or_default()
    }

    /// Remove the first record equal to `record`. Returns whether one was removed.
    pub fn delete(&mut self, record: &str) -> bool {
        match self.flights.iter().position(|flight| flight == record) {
            Some(index) => {
                self.flights.remove(index);
                info!(flight = record, "Flight deleted");
                true
            }
            None => false,
        }
    }

    /// Record at a 0-based index.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.flights.get(index).map(String::as_str)
    }

    /// Records in creation order.
    pub fn list(&self) -> &[String] {
        &self.flights
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.flights.len()
    }

    /// Whether no flight is stored.
    pub fn is_empty(&self) -> bool {
        self.flights.is_empty()
    }

    /// Drop every record.
    pub fn clear(&mut self) {
        self.flights.clear();
    }
}
