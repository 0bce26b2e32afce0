//! Save-file persistence for the whole store.
//!
//! The file is plain text split into five sections, each introduced by a
//! literal header line, written in this order:
//!
//! ```text
//! Airports:
//! WAW
//!   B737
//! Routes:
//! WAW - JFK
//! 2000
//! Flights:
//! LO26 | Route: WAW - JFK | Departure: 10:15 2024-05-01 | Arrival: 13:40 2024-05-01
//! Clients:
//! Ann
//! 123
//! false
//! 0
//! Tickets:
//! LO26 | Route: WAW - JFK | Departure: 10:15 2024-05-01 | Arrival: 13:40 2024-05-01
//! Ann
//! ```
//!
//! Airplane lines under `Airports:` carry a two-space prefix. Only association
//! names are persisted, not airplane records.

use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
    str::FromStr,
};

use tracing::{info, warn};

use crate::{error::SaveError, store::FleetStore};

/// File name used when no location is configured.
pub const DEFAULT_SAVE_FILE: &str = "data.txt";

const AIRPLANE_PREFIX: &str = "  ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Airports,
    Routes,
    Flights,
    Clients,
    Tickets,
}

impl Section {
    fn header(self) -> &'static str {
        match self {
            Self::Airports => "Airports:",
            Self::Routes => "Routes:",
            Self::Flights => "Flights:",
            Self::Clients => "Clients:",
            Self::Tickets => "Tickets:",
        }
    }

    fn from_header(line: &str) -> Option<Self> {
        [
            Self::Airports,
            Self::Routes,
            Self::Flights,
            Self::Clients,
            Self::Tickets,
        ]
        .into_iter()
        .find(|section| section.header() == line)
    }
}

/// Write every record of `store` to `writer` in section order.
pub fn encode<W: Write>(store: &FleetStore, writer: &mut W) -> Result<(), SaveError> {
    writeln!(writer, "{}", Section::Airports.header())?;
    for airport in store.airports.list() {
        writeln!(writer, "{airport}")?;
        for airplane in store.airports.airplanes_of(airport).unwrap_or_default() {
            writeln!(writer, "{AIRPLANE_PREFIX}{airplane}")?;
        }
    }

    writeln!(writer, "{}", Section::Routes.header())?;
    for route in store.routes.list() {
        writeln!(writer, "{}", route.key)?;
        writeln!(writer, "{}", route.distance_km)?;
    }

    writeln!(writer, "{}", Section::Flights.header())?;
    for flight in store.flights.list() {
        writeln!(writer, "{flight}")?;
    }

    writeln!(writer, "{}", Section::Clients.header())?;
    for client in store.clients.list() {
        writeln!(writer, "{}", client.name)?;
        writeln!(writer, "{}", client.phone)?;
        writeln!(writer, "{}", client.is_company)?;
        writeln!(writer, "{}", client.airplane_count)?;
    }

    writeln!(writer, "{}", Section::Tickets.header())?;
    for ticket in store.tickets.list() {
        let owner = store
            .clients
            .get(ticket.client)
            .map(|client| client.name.as_str())
            .unwrap_or_default();
        writeln!(writer, "{}", ticket.flight)?;
        writeln!(writer, "{owner}")?;
    }

    Ok(())
}

/// Rebuild a store from save-file text.
///
/// Tickets resolve their client by name among clients read so far; a ticket
/// whose client is not found is dropped.
pub fn decode<R: BufRead>(reader: R) -> Result<FleetStore, SaveError> {
    let mut decoder = Decoder {
        lines: reader.lines(),
        line_no: 0,
        store: FleetStore::new(),
    };
    decoder.run()?;
    Ok(decoder.store)
}

struct Decoder<L> {
    lines: L,
    line_no: usize,
    store: FleetStore,
}

impl<L> Decoder<L>
where
    L: Iterator<Item = std::io::Result<String>>,
{
    fn run(&mut self) -> Result<(), SaveError> {
        let mut section: Option<Section> = None;
        let mut current_airport: Option<String> = None;

        while let Some(line) = self.next_line()? {
            if let Some(next) = Section::from_header(&line) {
                section = Some(next);
                continue;
            }
            match section {
                None => {
                    warn!(line = self.line_no, "Ignoring line before the first section header");
                }
                Some(Section::Airports) => {
                    if line.starts_with(AIRPLANE_PREFIX) {
                        let airplane = line.trim();
                        let Some(airport) = current_airport.as_deref() else {
                            warn!(line = self.line_no, airplane, "Skipping airplane listed before any airport");
                            continue;
                        };
                        if let Err(err) = self.store.airports.add_airplane(airport, airplane) {
                            warn!(line = self.line_no, airplane, %err, "Skipping airplane");
                        }
                    } else {
                        let name = line.trim().to_string();
                        if let Err(err) = self.store.airports.create(&name) {
                            warn!(line = self.line_no, %err, "Skipping airport");
                        }
                        current_airport = Some(name);
                    }
                }
                Some(Section::Routes) => {
                    let key = line.trim().to_string();
                    let distance = self.next_value::<u32>("route distance")?;
                    self.store.routes.insert(key, distance);
                }
                Some(Section::Flights) => {
                    self.store.flights.insert(line.trim().to_string());
                }
                Some(Section::Clients) => {
                    let name = line.trim().to_string();
                    let phone = self.next_field("client phone")?;
                    let is_company = self.next_value::<bool>("client company flag")?;
                    let airplane_count = self.next_value::<u32>("client airplane count")?;
                    self.store
                        .clients
                        .create(&name, &phone, is_company, airplane_count);
                }
                Some(Section::Tickets) => {
                    let flight = line.trim().to_string();
                    let client_name = self.next_field("ticket client")?;
                    match self.store.clients.find_by_name(&client_name) {
                        Some(client) => {
                            let booked =
                                self.store
                                    .tickets
                                    .create(&mut self.store.clients, &flight, client);
                            booked.map_err(|err| self.malformed(&err.to_string()))?;
                        }
                        None => {
                            warn!(line = self.line_no, client = %client_name, "Dropping ticket for unknown client");
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn next_line(&mut self) -> Result<Option<String>, SaveError> {
        match self.lines.next() {
            Some(line) => {
                self.line_no += 1;
                let mut line = line?;
                if line.ends_with('\r') {
                    line.pop();
                }
                Ok(Some(line))
            }
            None => Ok(None),
        }
    }

    fn next_field(&mut self, what: &str) -> Result<String, SaveError> {
        match self.next_line()? {
            Some(line) => Ok(line.trim().to_string()),
            None => Err(SaveError::Malformed {
                line: self.line_no + 1,
                reason: format!("unexpected end of file, expected {what}"),
            }),
        }
    }

    fn next_value<T: FromStr>(&mut self, what: &str) -> Result<T, SaveError> {
        let raw = self.next_field(what)?;
        raw.parse()
            .map_err(|_| self.malformed(&format!("invalid {what}: {raw:?}")))
    }

    fn malformed(&self, reason: &str) -> SaveError {
        SaveError::Malformed {
            line: self.line_no,
            reason: reason.to_string(),
        }
    }
}

/// Reads and writes the store at a single file location.
#[derive(Debug, Clone)]
pub struct SaveManager {
    path: PathBuf,
}

impl SaveManager {
    /// Create a manager for the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the save file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrite the save file with the current store. The store is not modified.
    pub fn save(&self, store: &FleetStore) -> Result<(), SaveError> {
        let file = File::create(&self.path).map_err(|source| SaveError::Open {
            path: self.path.clone(),
            source,
        })?;
        let mut writer = BufWriter::new(file);
        encode(store, &mut writer)?;
        writer.flush()?;
        info!(path = %self.path.display(), "Data saved");
        Ok(())
    }

    /// Replace the store with the save file content.
    ///
    /// The store is cleared first. On any failure it stays empty.
    pub fn load(&self, store: &mut FleetStore) -> Result<(), SaveError> {
        store.clear();
        let file = File::open(&self.path).map_err(|source| SaveError::Open {
            path: self.path.clone(),
            source,
        })?;
        *store = decode(BufReader::new(file))?;
        info!(
            path = %self.path.display(),
            airports = store.airports.len(),
            routes = store.routes.len(),
            flights = store.flights.len(),
            clients = store.clients.len(),
            tickets = store.tickets.len(),
            "Data loaded"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::ValidationError, flight::FlightSchedule, route::FixedSelection};
    use anyhow::Result;
    use std::{fs, io::Cursor};
    use tempfile::tempdir;

    fn populated() -> FleetStore {
        let mut store = FleetStore::new();
        store.create_airport("WAW").unwrap();
        store.create_airport("JFK").unwrap();
        store.create_airplane("B737", 180, 3000, "WAW").unwrap();
        store.create_airplane("B787", 250, 13000, "WAW").unwrap();
        store.create_airplane("A320", 150, 6000, "JFK").unwrap();
        store
            .create_route("WAW", "JFK", 6900, &mut FixedSelection(2))
            .unwrap();
        store
            .create_route("JFK", "WAW", 5000, &mut FixedSelection(1))
            .unwrap();
        let schedule = FlightSchedule {
            departure_time: "10:15".into(),
            departure_date: "2024-05-01".into(),
            arrival_time: "13:40".into(),
            arrival_date: "2024-05-01".into(),
        };
        store.create_flight("LO26", 1, &schedule).unwrap();
        store.create_flight("LO27", 2, &schedule).unwrap();
        store.create_client("Ann", "123", false, 0);
        store.create_client("LOT", "555", true, 12);
        store.book_ticket(0, 1).unwrap();
        store.book_ticket(1, 2).unwrap();
        store.book_ticket(1, 1).unwrap();
        store
    }

    fn encoded(store: &FleetStore) -> String {
        let mut buffer = Vec::new();
        encode(store, &mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    fn ticket_pairs(store: &FleetStore) -> Vec<(String, String)> {
        store
            .tickets()
            .list()
            .iter()
            .map(|ticket| {
                let client = store.clients().get(ticket.client).unwrap();
                (ticket.flight.clone(), client.name.clone())
            })
            .collect()
    }

    #[test]
    fn writes_sections_in_order() {
        let mut store = FleetStore::new();
        store.create_airport("WAW").unwrap();
        store.create_airplane("B737", 180, 3000, "WAW").unwrap();
        store.create_client("LOT", "555", true, 12);

        assert_eq!(
            encoded(&store),
            "Airports:\nWAW\n  B737\nRoutes:\nFlights:\nClients:\nLOT\n555\ntrue\n12\nTickets:\n"
        );
    }

    #[test]
    fn save_round_trip() -> Result<()> {
        let dir = tempdir()?;
        let manager = SaveManager::new(dir.path().join("data.txt"));
        let original = populated();

        manager.save(&original)?;
        let mut restored = FleetStore::new();
        restored.create_airport("STALE")?;
        manager.load(&mut restored)?;

        assert_eq!(
            restored.airports().list().collect::<Vec<_>>(),
            vec!["WAW", "JFK"]
        );
        assert_eq!(
            restored.airports().airplanes_of("WAW"),
            original.airports().airplanes_of("WAW")
        );
        assert_eq!(restored.routes().list(), original.routes().list());
        assert_eq!(restored.flights().list(), original.flights().list());
        assert_eq!(restored.clients().list().len(), 2);
        for (left, right) in restored.clients().list().iter().zip(original.clients().list()) {
            assert_eq!(left.name, right.name);
            assert_eq!(left.phone, right.phone);
            assert_eq!(left.is_company, right.is_company);
            assert_eq!(left.airplane_count, right.airplane_count);
            assert_eq!(left.tickets.len(), right.tickets.len());
        }
        assert_eq!(ticket_pairs(&restored), ticket_pairs(&original));
        assert!(restored.fleet().list().is_empty());

        assert_eq!(encoded(&restored), fs::read_to_string(manager.path())?);
        Ok(())
    }

    #[test]
    fn save_leaves_store_untouched() -> Result<()> {
        let dir = tempdir()?;
        let store = populated();
        let before = encoded(&store);
        SaveManager::new(dir.path().join("data.txt")).save(&store)?;
        assert_eq!(encoded(&store), before);

        let missing_dir = SaveManager::new(dir.path().join("missing").join("data.txt"));
        let err = missing_dir.save(&store).unwrap_err();
        assert!(matches!(err, SaveError::Open { .. }));
        assert_eq!(encoded(&store), before);
        Ok(())
    }

    #[test]
    fn missing_file_leaves_store_cleared() -> Result<()> {
        let dir = tempdir()?;
        let manager = SaveManager::new(dir.path().join("absent.txt"));
        let mut store = populated();
        let err = manager.load(&mut store).unwrap_err();
        assert!(matches!(err, SaveError::Open { .. }));
        assert!(store.airports().is_empty());
        assert!(store.tickets().is_empty());
        Ok(())
    }

    #[test]
    fn malformed_record_fails_whole_load() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("data.txt");
        fs::write(&path, "Airports:\nWAW\nRoutes:\nWAW - JFK\nfar\n")?;
        let mut store = populated();
        let err = SaveManager::new(&path).load(&mut store).unwrap_err();
        match err {
            SaveError::Malformed { line, reason } => {
                assert_eq!(line, 5);
                assert!(reason.contains("route distance"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(store.airports().is_empty());
        Ok(())
    }

    #[test]
    fn rejects_non_boolean_company_flag() {
        let text = "Clients:\nAnn\n123\nyes\n0\n";
        let err = decode(Cursor::new(text)).unwrap_err();
        assert!(matches!(err, SaveError::Malformed { line: 4, .. }));
    }

    #[test]
    fn rejects_truncated_client() {
        let text = "Clients:\nAnn\n123\nfalse\n";
        let err = decode(Cursor::new(text)).unwrap_err();
        assert!(matches!(err, SaveError::Malformed { line: 5, .. }));
    }

    #[test]
    fn skips_lines_before_first_header() -> Result<()> {
        let store = decode(Cursor::new("# note\nAirports:\nWAW\n"))?;
        assert_eq!(store.airports().list().collect::<Vec<_>>(), vec!["WAW"]);
        Ok(())
    }

    #[test]
    fn skips_airplane_before_any_airport() -> Result<()> {
        let store = decode(Cursor::new("Airports:\n  B737\nWAW\n  A320\n"))?;
        assert_eq!(
            store.airports().airplanes_of("WAW"),
            Some(&["A320".to_string()][..])
        );
        Ok(())
    }

    #[test]
    fn tickets_without_clients_are_dropped() -> Result<()> {
        let text = "Airports:\nWAW\nRoutes:\nFlights:\nLO26\nTickets:\nLO26\nAnn\n";
        let store = decode(Cursor::new(text))?;
        assert_eq!(store.flights().len(), 1);
        assert!(store.tickets().is_empty());
        assert!(store.clients().is_empty());
        Ok(())
    }

    #[test]
    fn tickets_resolve_first_client_with_name() -> Result<()> {
        let text = "Clients:\nAnn\n1\nfalse\n0\nAnn\n2\nfalse\n0\nTickets:\nLO26\nAnn\n";
        let store = decode(Cursor::new(text))?;
        let first = store.clients().find_by_name("Ann").unwrap();
        assert_eq!(store.clients().get(first).unwrap().tickets.len(), 1);
        assert_eq!(store.clients().list()[1].tickets.len(), 0);
        Ok(())
    }

    #[test]
    fn duplicate_airport_lines_merge_associations() -> Result<()> {
        let text = "Airports:\nWAW\n  B737\nWAW\n  A320\r\n";
        let store = decode(Cursor::new(text))?;
        assert_eq!(store.airports().len(), 1);
        assert_eq!(
            store.airports().airplanes_of("WAW"),
            Some(&["B737".to_string(), "A320".to_string()][..])
        );
        Ok(())
    }

    #[test]
    fn loaded_associations_have_no_fleet_records() -> Result<()> {
        let text = "Airports:\nWAW\n  B737\nJFK\n";
        let store = decode(Cursor::new(text))?;
        let mut store = store;
        let err = store
            .create_route("WAW", "JFK", 100, &mut FixedSelection(1))
            .unwrap_err();
        assert_eq!(err, ValidationError::AirplaneNotFound("B737".into()));
        Ok(())
    }
}
