//! Airplane fleet records.

use tracing::{info, warn};

use crate::{airport::AirportRegistry, error::ValidationError, models::Airplane};

/// Every airplane ever created, in creation order.
///
/// Names are not unique; lookups resolve to the first record with a matching
/// name.
#[derive(Debug, Clone, Default)]
pub struct AirplaneFleet {
    airplanes: Vec<Airplane>,
}

impl AirplaneFleet {
    /// Create an empty fleet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new airplane and station it at `home_airport`.
    pub fn create(
        &mut self,
        registry: &mut AirportRegistry,
        name: &str,
        seat_count: u32,
        range_km: u32,
        home_airport: &str,
    ) -> Result<&Airplane, ValidationError> {
        if !registry.exists(home_airport) {
            warn!(airplane = name, airport = home_airport, "Airplane rejected");
            return Err(ValidationError::AirportNotFound(home_airport.to_string()));
        }
        registry.add_airplane(home_airport, name)?;
        self.airplanes.push(Airplane {
            name: name.to_string(),
            seat_count,
            range_km,
            home_airport: home_airport.to_string(),
        });
        info!(
            airplane = name,
            seats = seat_count,
            range = range_km,
            airport = home_airport,
            "Airplane created"
        );
        self.airplanes
            .last()
            .ok_or_else(|| ValidationError::AirplaneNotFound(name.to_string()))
    }

    /// Remove the first airplane called `name`.
    ///
    /// The airport association list still names the airplane afterwards.
    pub fn delete(&mut self, name: &str) -> Result<Airplane, ValidationError> {
        let Some(index) = self.airplanes.iter().position(|plane| plane.name == name) else {
            warn!(airplane = name, "Airplane not found");
            return Err(ValidationError::AirplaneNotFound(name.to_string()));
        };
        let removed = self.airplanes.remove(index);
        info!(airplane = name, "Airplane deleted");
        Ok(removed)
    }

    /// First airplane called `name`.
    pub fn find(&self, name: &str) -> Option<&Airplane> {
        self.airplanes.iter().find(|plane| plane.name == name)
    }

    /// Airplanes in creation order.
    pub fn list(&self) -> &[Airplane] {
        &self.airplanes
    }

    /// Drop every airplane record.
    pub fn clear(&mut self) {
        self.airplanes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with(names: &[&str]) -> AirportRegistry {
        let mut registry = AirportRegistry::new();
        for name in names {
            registry.create(name).unwrap();
        }
        registry
    }

    #[test]
    fn create_requires_existing_airport() {
        let mut registry = registry_with(&[]);
        let mut fleet = AirplaneFleet::new();
        let err = fleet
            .create(&mut registry, "B737", 180, 3000, "WAW")
            .unwrap_err();
        assert_eq!(err, ValidationError::AirportNotFound("WAW".into()));
        assert!(fleet.list().is_empty());
    }

    #[test]
    fn create_registers_station() {
        let mut registry = registry_with(&["WAW"]);
        let mut fleet = AirplaneFleet::new();
        let plane = fleet
            .create(&mut registry, "B737", 180, 3000, "WAW")
            .unwrap();
        assert_eq!(plane.home_airport, "WAW");
        assert_eq!(plane.to_string(), "Name: B737, Seats: 180, Range: 3000 km");
        assert_eq!(registry.airplanes_of("WAW"), Some(&["B737".to_string()][..]));
    }

    #[test]
    fn duplicate_names_resolve_to_first_record() {
        let mut registry = registry_with(&["WAW", "JFK"]);
        let mut fleet = AirplaneFleet::new();
        fleet.create(&mut registry, "Dash", 70, 1500, "WAW").unwrap();
        fleet.create(&mut registry, "Dash", 78, 2000, "JFK").unwrap();

        assert_eq!(fleet.find("Dash").map(|p| p.range_km), Some(1500));
        fleet.delete("Dash").unwrap();
        assert_eq!(fleet.find("Dash").map(|p| p.range_km), Some(2000));
    }

    #[test]
    fn delete_keeps_airport_association() {
        let mut registry = registry_with(&["WAW"]);
        let mut fleet = AirplaneFleet::new();
        fleet.create(&mut registry, "B737", 180, 3000, "WAW").unwrap();

        let removed = fleet.delete("B737").unwrap();
        assert_eq!(removed.name, "B737");
        assert!(fleet.find("B737").is_none());
        assert_eq!(registry.airplanes_of("WAW"), Some(&["B737".to_string()][..]));

        assert_eq!(
            fleet.delete("B737"),
            Err(ValidationError::AirplaneNotFound("B737".into()))
        );
    }
}
