//! Route graph and the airplane-selection step of route creation.

use std::{collections::HashMap, fmt};

use tracing::{info, warn};

use crate::{
    airplane::AirplaneFleet,
    airport::AirportRegistry,
    error::ValidationError,
    models::{route_key, Airplane, Route},
};

/// Airplane offered to the actor while a route is being created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AirplaneChoice<'a> {
    /// Name from the departure airport's association list.
    pub name: &'a str,
    /// Fleet record for that name, if one still exists.
    pub airplane: Option<&'a Airplane>,
}

impl fmt::Display for AirplaneChoice<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.airplane {
            Some(airplane) => airplane.fmt(f),
            None => write!(f, "Name: {}, no fleet record", self.name),
        }
    }
}

/// Synchronous request for an airplane during route creation.
pub trait AirplaneSelector {
    /// Return the 1-based position of the chosen airplane, or `None` to abort.
    fn select(&mut self, departure: &str, choices: &[AirplaneChoice<'_>]) -> Option<usize>;
}

/// Selector that always answers with the same position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedSelection(pub usize);

impl AirplaneSelector for FixedSelection {
    fn select(&mut self, _departure: &str, _choices: &[AirplaneChoice<'_>]) -> Option<usize> {
        Some(self.0)
    }
}

/// Routes in creation order plus their distances keyed by route key.
#[derive(Debug, Clone, Default)]
pub struct RouteGraph {
    keys: Vec<String>,
    distances: HashMap<String, u32>,
}

impl RouteGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check both airports and list the airplanes stationed at `departure`.
    ///
    /// Performs no mutation.
    pub fn eligible_airplanes<'a>(
        registry: &'a AirportRegistry,
        fleet: &'a AirplaneFleet,
        departure: &str,
        arrival: &str,
    ) -> Result<Vec<AirplaneChoice<'a>>, ValidationError> {
        if !registry.exists(departure) || !registry.exists(arrival) {
            return Err(ValidationError::UnknownAirports {
                departure: departure.to_string(),
                arrival: arrival.to_string(),
            });
        }
        if departure == arrival {
            return Err(ValidationError::SameAirport(departure.to_string()));
        }
        let stationed = registry.airplanes_of(departure).unwrap_or_default();
        if stationed.is_empty() {
            return Err(ValidationError::NoAirplanes(departure.to_string()));
        }
        Ok(stationed
            .iter()
            .map(|name| AirplaneChoice {
                name,
                airplane: fleet.find(name),
            })
            .collect())
    }

    /// Validate and store a route from `departure` to `arrival`.
    ///
    /// The selector is consulted once the airports pass validation. Nothing is
    /// stored unless every check passes.
    pub fn create(
        &mut self,
        registry: &AirportRegistry,
        fleet: &AirplaneFleet,
        departure: &str,
        arrival: &str,
        distance_km: u32,
        selector: &mut dyn AirplaneSelector,
    ) -> Result<Route, ValidationError> {
        let choices = Self::eligible_airplanes(registry, fleet, departure, arrival)
            .inspect_err(|err| warn!(departure, arrival, %err, "Route rejected"))?;

        let index = selector
            .select(departure, &choices)
            .ok_or(ValidationError::SelectionAborted)?;
        if index < 1 || index > choices.len() {
            return Err(ValidationError::InvalidAirplaneIndex {
                index,
                count: choices.len(),
            });
        }

        let choice = choices[index - 1];
        let airplane = choice
            .airplane
            .ok_or_else(|| ValidationError::AirplaneNotFound(choice.name.to_string()))?;
        if airplane.range_km < distance_km {
            warn!(
                departure,
                arrival,
                airplane = %airplane.name,
                range = airplane.range_km,
                distance = distance_km,
                "Route rejected: insufficient range"
            );
            return Err(ValidationError::InsufficientRange {
                airplane: airplane.name.clone(),
                range: airplane.range_km,
                distance: distance_km,
            });
        }

        let route = self.insert(route_key(departure, arrival), distance_km);
        info!(route = %route.key, distance = distance_km, airplane = %airplane.name, "Route created");
        Ok(route)
    }

    /// Store a route read back from a save file, skipping airplane validation.
    pub fn insert(&mut self, key: String, distance_km: u32) -> Route {
        self.distances.insert(key.clone(), distance_km);
        self.keys.push(key.clone());
        Route { key, distance_km }
    }

    /// Remove the route at a 1-based position and return its key.
    ///
    /// The stored distance for the key is kept.
    pub fn delete(&mut self, position: usize) -> Result<String, ValidationError> {
        if position < 1 || position > self.keys.len() {
            return Err(ValidationError::InvalidRouteIndex {
                index: position,
                count: self.keys.len(),
            });
        }
        let key = self.keys.remove(position - 1);
        info!(route = %key, "Route deleted");
        Ok(key)
    }

    /// Route at a 1-based position.
    pub fn get(&self, position: usize) -> Option<Route> {
        let key = self.keys.get(position.checked_sub(1)?)?;
        Some(Route {
            key: key.clone(),
            distance_km: self.distance_of(key),
        })
    }

    /// Routes in creation order.
    pub fn list(&self) -> Vec<Route> {
        self.keys
            .iter()
            .map(|key| Route {
                key: key.clone(),
                distance_km: self.distance_of(key),
            })
            .collect()
    }

    /// Distance stored for a route key, 0 when unknown.
    pub fn distance_of(&self, key: &str) -> u32 {
        self.distances.get(key).copied().unwrap_or(0)
    }

    /// Number of stored routes.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether no route is stored.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Drop every route.
    pub fn clear(&mut self) {
        self.keys.clear();
        self.distances.clear();
    }
}
