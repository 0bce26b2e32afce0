//! Shared record types.

use std::fmt;

/// Separator between departure and arrival inside a route key.
pub const ROUTE_KEY_SEPARATOR: &str = " - ";

/// Build the literal `"<departure> - <arrival>"` key identifying a route.
pub fn route_key(departure: &str, arrival: &str) -> String {
    format!("{departure}{ROUTE_KEY_SEPARATOR}{arrival}")
}

/// Airplane stationed at an airport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Airplane {
    /// Display name; several airplanes may share it.
    pub name: String,
    /// Number of passenger seats.
    pub seat_count: u32,
    /// Maximum distance in km.
    pub range_km: u32,
    /// Airport the airplane was stationed at when created.
    pub home_airport: String,
}

impl fmt::Display for Airplane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Name: {}, Seats: {}, Range: {} km",
            self.name, self.seat_count, self.range_km
        )
    }
}

/// Route between two airports. The airplane validated at creation is not kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// `"<departure> - <arrival>"`.
    pub key: String,
    /// Distance in km.
    pub distance_km: u32,
}

impl Route {
    /// Split the key back into departure and arrival, if it has the usual shape.
    pub fn endpoints(&self) -> Option<(&str, &str)> {
        self.key.split_once(ROUTE_KEY_SEPARATOR)
    }
}

/// Handle of a client inside [`crate::ClientDirectory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientId(pub(crate) usize);

/// Handle of a ticket inside [`crate::TicketLedger`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TicketId(pub(crate) usize);

/// Individual or company customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Client {
    /// Display name; not unique.
    pub name: String,
    /// Contact phone as entered.
    pub phone: String,
    /// Company rather than individual.
    pub is_company: bool,
    /// Only meaningful for companies, stored regardless.
    pub airplane_count: u32,
    /// Tickets booked for this client, in booking order.
    pub tickets: Vec<TicketId>,
}

impl Client {
    /// Build a client with no tickets.
    pub fn new(name: String, phone: String, is_company: bool, airplane_count: u32) -> Self {
        Self {
            name,
            phone,
            is_company,
            airplane_count,
            tickets: Vec::new(),
        }
    }

    /// `"Company"` or `"Individual"`.
    pub fn kind_label(&self) -> &'static str {
        if self.is_company {
            "Company"
        } else {
            "Individual"
        }
    }
}

impl fmt::Display for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} Name: {}, Phone: {}",
            self.kind_label(),
            self.name,
            self.phone
        )?;
        if self.is_company {
            write!(f, ", Airplane Count: {}", self.airplane_count)?;
        }
        Ok(())
    }
}

/// Booking of a flight description for one client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    /// Flight record text as it was when booked.
    pub flight: String,
    /// Owner of the ticket.
    pub client: ClientId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_key_joins_with_dash() {
        let route = Route {
            key: route_key("WAW", "JFK"),
            distance_km: 2000,
        };
        assert_eq!(route.key, "WAW - JFK");
        assert_eq!(route.endpoints(), Some(("WAW", "JFK")));
    }

    #[test]
    fn client_display_mentions_fleet_only_for_companies() {
        let person = Client::new("Ann".into(), "123".into(), false, 7);
        assert_eq!(person.to_string(), "Individual Name: Ann, Phone: 123");

        let company = Client::new("LOT".into(), "555".into(), true, 12);
        assert_eq!(
            company.to_string(),
            "Company Name: LOT, Phone: 555, Airplane Count: 12"
        );
    }
}
