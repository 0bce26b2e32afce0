//! Client directory and the ticket ledger.
//!
//! Tickets live in an arena owned by [`TicketLedger`]; clients refer to their
//! tickets by [`TicketId`] and tickets refer to their owner by [`ClientId`].

#![allow(missing_docs)]

use tracing::info;

use crate::{
    error::ValidationError,
    models::{Client, ClientId, Ticket, TicketId},
};

/// Clients in creation order. Names are not unique.
#[derive(Debug, Clone, Default)]
pub struct ClientDirectory {
    clients: Vec<Client>,
}

impl ClientDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a client. Never fails.
    pub fn create(
        &mut self,
        name: &str,
        phone: &str,
        is_company: bool,
        airplane_count: u32,
    ) -> ClientId {
        self.clients.push(Client::new(
            name.to_string(),
            phone.to_string(),
            is_company,
            airplane_count,
        ));
        info!(client = name, company = is_company, "Client created");
        ClientId(self.clients.len() - 1)
    }

    pub fn get(&self, id: ClientId) -> Option<&Client> {
        self.clients.get(id.0)
    }

    /// Handle of the client at a 1-based position.
    pub fn id_at(&self, position: usize) -> Option<ClientId> {
        let index = position.checked_sub(1)?;
        (index < self.clients.len()).then_some(ClientId(index))
    }

    /// First client whose name matches exactly.
    pub fn find_by_name(&self, name: &str) -> Option<ClientId> {
        self.clients
            .iter()
            .position(|client| client.name == name)
            .map(ClientId)
    }

    pub fn list(&self) -> &[Client] {
        &self.clients
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    pub fn clear(&mut self) {
        self.clients.clear();
    }

    fn get_mut(&mut self, id: ClientId) -> Option<&mut Client> {
        self.clients.get_mut(id.0)
    }
}

/// Every booked ticket, in booking order.
#[derive(Debug, Clone, Default)]
pub struct TicketLedger {
    tickets: Vec<Ticket>,
}

impl TicketLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Book `flight` for `client`, linking the ticket from both sides.
    pub fn create(
        &mut self,
        clients: &mut ClientDirectory,
        flight: &str,
        client: ClientId,
    ) -> Result<TicketId, ValidationError> {
        let owner = clients.get_mut(client).ok_or(ValidationError::UnknownClient)?;
        let id = TicketId(self.tickets.len());
        owner.tickets.push(id);
        self.tickets.push(Ticket {
            flight: flight.to_string(),
            client,
        });
        info!(flight, client = %owner.name, "Ticket booked");
        Ok(id)
    }

    pub fn get(&self, id: TicketId) -> Option<&Ticket> {
        self.tickets.get(id.0)
    }

    /// Tickets held by `client`, in booking order.
    pub fn of_client<'a>(&'a self, client: &'a Client) -> impl Iterator<Item = &'a Ticket> + 'a {
        client.tickets.iter().filter_map(|id| self.get(*id))
    }

    pub fn list(&self) -> &[Ticket] {
        &self.tickets
    }

    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }

    pub fn clear(&mut self) {
        self.tickets.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booking_links_both_sides() {
        let mut clients = ClientDirectory::new();
        let mut ledger = TicketLedger::new();
        let ann = clients.create("Ann", "123", false, 0);
        let lot = clients.create("LOT", "555", true, 12);

        let first = ledger.create(&mut clients, "LO26 | Route: WAW - JFK", ann).unwrap();
        assert_eq!(ledger.len(), 1);
        assert_eq!(clients.get(ann).unwrap().tickets, vec![first]);
        assert!(clients.get(lot).unwrap().tickets.is_empty());

        ledger.create(&mut clients, "LO27", ann).unwrap();
        assert_eq!(ledger.len(), 2);
        let ann_flights: Vec<_> = ledger
            .of_client(clients.get(ann).unwrap())
            .map(|ticket| ticket.flight.as_str())
            .collect();
        assert_eq!(ann_flights, vec!["LO26 | Route: WAW - JFK", "LO27"]);
        assert_eq!(ledger.get(first).map(|t| t.client), Some(ann));
    }

    #[test]
    fn stale_handle_is_rejected() {
        let mut clients = ClientDirectory::new();
        let mut ledger = TicketLedger::new();
        let ann = clients.create("Ann", "123", false, 0);
        clients.clear();
        assert_eq!(
            ledger.create(&mut clients, "LO26", ann),
            Err(ValidationError::UnknownClient)
        );
        assert!(ledger.is_empty());
    }

    #[test]
    fn lookup_by_position_and_name() {
        let mut clients = ClientDirectory::new();
        let first = clients.create("Ann", "123", false, 0);
        let second = clients.create("Ann", "456", false, 0);

        assert_eq!(clients.id_at(0), None);
        assert_eq!(clients.id_at(2), Some(second));
        assert_eq!(clients.id_at(3), None);
        assert_eq!(clients.find_by_name("Ann"), Some(first));
        assert_eq!(clients.find_by_name("Bob"), None);
    }
}
