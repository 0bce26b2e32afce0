//! Airport registry with per-airport airplane association lists.

use tracing::{info, warn};

use crate::error::ValidationError;

#[derive(Debug, Clone, Default)]
struct AirportEntry {
    name: String,
    airplanes: Vec<String>,
}

/// Registered airports in creation order.
///
/// Each airport carries the names of the airplanes stationed there. The list
/// is a plain name link: it is not kept in sync with [`crate::AirplaneFleet`].
#[derive(Debug, Clone, Default)]
pub struct AirportRegistry {
    airports: Vec<AirportEntry>,
}

impl AirportRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new airport with no airplanes.
    pub fn create(&mut self, name: &str) -> Result<(), ValidationError> {
        if self.exists(name) {
            warn!(airport = name, "Duplicate airport rejected");
            return Err(ValidationError::DuplicateAirport(name.to_string()));
        }
        self.airports.push(AirportEntry {
            name: name.to_string(),
            airplanes: Vec::new(),
        });
        info!(airport = name, "Airport created");
        Ok(())
    }

    /// Remove an airport together with its association list.
    ///
    /// Returns the dropped association list, or `None` when the airport was
    /// not registered. Airplanes, routes and flights naming the airport are
    /// left as they are.
    pub fn delete(&mut self, name: &str) -> Option<Vec<String>> {
        let position = self.position(name)?;
        let entry = self.airports.remove(position);
        info!(
            airport = name,
            airplanes = entry.airplanes.len(),
            "Airport deleted"
        );
        Some(entry.airplanes)
    }

    /// Append an airplane name to an airport's association list.
    pub fn add_airplane(&mut self, airport: &str, airplane: &str) -> Result<(), ValidationError> {
        let entry = self.entry_mut(airport)?;
        entry.airplanes.push(airplane.to_string());
        Ok(())
    }

    /// Remove the first occurrence of an airplane name from an airport's list.
    pub fn remove_airplane(&mut self, airport: &str, airplane: &str) -> Result<(), ValidationError> {
        let entry = self.entry_mut(airport)?;
        if let Some(index) = entry.airplanes.iter().position(|name| name == airplane) {
            entry.airplanes.remove(index);
        }
        Ok(())
    }

    /// Whether the airport is registered.
    pub fn exists(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Whether at least one airplane name is associated with the airport.
    pub fn has_airplanes(&self, name: &str) -> bool {
        self.airplanes_of(name)
            .map(|airplanes| !airplanes.is_empty())
            .unwrap_or(false)
    }

    /// Airport names in creation order.
    pub fn list(&self) -> impl Iterator<Item = &str> + '_ {
        self.airports.iter().map(|entry| entry.name.as_str())
    }

    /// Airplane names associated with an airport, `None` if it is unknown.
    pub fn airplanes_of(&self, name: &str) -> Option<&[String]> {
        self.airports
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.airplanes.as_slice())
    }

    /// Number of registered airports.
    pub fn len(&self) -> usize {
        self.airports.len()
    }

    /// Whether no airport is registered.
    pub fn is_empty(&self) -> bool {
        self.airports.is_empty()
    }

    /// Drop every airport.
    pub fn clear(&mut self) {
        self.airports.clear();
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.airports.iter().position(|entry| entry.name == name)
    }

    fn entry_mut(&mut self, name: &str) -> Result<&mut AirportEntry, ValidationError> {
        self.airports
            .iter_mut()
            .find(|entry| entry.name == name)
            .ok_or_else(|| ValidationError::AirportNotFound(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_airport_leaves_registry_unchanged() {
        let mut registry = AirportRegistry::new();
        registry.create("WAW").unwrap();
        registry.add_airplane("WAW", "B737").unwrap();

        let err = registry.create("WAW").unwrap_err();
        assert_eq!(err, ValidationError::DuplicateAirport("WAW".into()));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.airplanes_of("WAW"), Some(&["B737".to_string()][..]));
    }

    #[test]
    fn association_requires_known_airport() {
        let mut registry = AirportRegistry::new();
        assert_eq!(
            registry.add_airplane("KRK", "A320"),
            Err(ValidationError::AirportNotFound("KRK".into()))
        );
        assert_eq!(
            registry.remove_airplane("KRK", "A320"),
            Err(ValidationError::AirportNotFound("KRK".into()))
        );
        assert!(registry.airplanes_of("KRK").is_none());
        assert!(!registry.has_airplanes("KRK"));
    }

    #[test]
    fn remove_airplane_drops_first_match_only() {
        let mut registry = AirportRegistry::new();
        registry.create("WAW").unwrap();
        registry.add_airplane("WAW", "B737").unwrap();
        registry.add_airplane("WAW", "B737").unwrap();
        registry.remove_airplane("WAW", "B737").unwrap();
        assert_eq!(registry.airplanes_of("WAW").map(<[String]>::len), Some(1));
        assert!(registry.has_airplanes("WAW"));
    }

    #[test]
    fn delete_is_silent_for_unknown_airport() {
        let mut registry = AirportRegistry::new();
        registry.create("WAW").unwrap();
        registry.add_airplane("WAW", "B737").unwrap();
        registry.create("JFK").unwrap();

        assert_eq!(registry.delete("LHR"), None);
        assert_eq!(registry.delete("WAW"), Some(vec!["B737".to_string()]));
        assert_eq!(registry.list().collect::<Vec<_>>(), vec!["JFK"]);

        registry.clear();
        assert!(registry.is_empty());
    }
}
