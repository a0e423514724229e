use crate::core::config::DEFAULT_PROBABILITY_TOLERANCE;
use crate::core::errors::InvariantViolation;
use crate::core::types::StationId;
use rand::Rng;

/// One outbound route of a queue station
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Route {
    pub probability: f64,
    pub destination: StationId,
}

/// Ordered routes of a queue station; probabilities are checked to sum to 1 at load time
#[derive(Debug, Clone, PartialEq)]
pub struct RouteTable {
    routes: Vec<Route>,
    /// Shortfall of the cumulative sum that still counts as a full table
    tolerance: f64,
}

impl RouteTable {
    pub fn new(routes: Vec<Route>) -> Self {
        Self {
            routes,
            tolerance: DEFAULT_PROBABILITY_TOLERANCE,
        }
    }

    /// Use the tolerance the table was validated with
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Sum of the route probabilities
    pub fn total_probability(&self) -> f64 {
        self.routes.iter().map(|r| r.probability).sum()
    }

    /// Pick the destination whose cumulative interval contains `draw`.
    ///
    /// Routes are scanned in declaration order, accumulating probability
    /// until the running sum reaches `draw`. A draw that lands in the
    /// rounding gap above the total (at most the tolerance) goes to the
    /// last route with positive probability.
    pub fn select(&self, station: StationId, draw: f64) -> Result<StationId, InvariantViolation> {
        let mut cumulative = 0.0;
        for route in &self.routes {
            cumulative += route.probability;
            if draw <= cumulative {
                return Ok(route.destination);
            }
        }
        if draw - cumulative <= self.tolerance {
            if let Some(last) = self.routes.iter().rev().find(|r| r.probability > 0.0) {
                return Ok(last.destination);
            }
        }
        Err(InvariantViolation::RoutingExhausted {
            station,
            draw,
            total: cumulative,
        })
    }

    /// Draw a uniform number in [0, 1) and select a destination with it
    pub fn choose<R: Rng + ?Sized>(
        &self,
        station: StationId,
        rng: &mut R,
    ) -> Result<StationId, InvariantViolation> {
        let draw: f64 = rng.gen();
        self.select(station, draw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn table(pairs: &[(f64, u32)]) -> RouteTable {
        RouteTable::new(
            pairs
                .iter()
                .map(|&(probability, id)| Route {
                    probability,
                    destination: StationId(id),
                })
                .collect(),
        )
    }

    #[test]
    fn test_select_uses_cumulative_intervals() {
        let routes = table(&[(0.2, 1), (0.3, 2), (0.5, 3)]);
        let from = StationId(0);
        assert_eq!(routes.select(from, 0.0), Ok(StationId(1)));
        assert_eq!(routes.select(from, 0.2), Ok(StationId(1)));
        assert_eq!(routes.select(from, 0.21), Ok(StationId(2)));
        assert_eq!(routes.select(from, 0.5), Ok(StationId(2)));
        assert_eq!(routes.select(from, 0.99), Ok(StationId(3)));
    }

    #[test]
    fn test_zero_probability_route_is_skipped() {
        let routes = table(&[(0.0, 1), (1.0, 2)]);
        assert_eq!(routes.select(StationId(0), 0.3), Ok(StationId(2)));
    }

    #[test]
    fn test_rounding_gap_goes_to_last_positive_route() {
        // Sums to 1 - 5e-10, inside the default tolerance
        let routes = table(&[(0.5, 1), (0.4999999995, 2), (0.0, 3)]);
        assert_eq!(routes.select(StationId(4), 0.9999999999), Ok(StationId(2)));
    }

    #[test]
    fn test_exhausted_when_mass_falls_short() {
        let routes = table(&[(0.5, 1), (0.4, 2)]);
        let err = routes.select(StationId(4), 0.95).unwrap_err();
        assert!(matches!(
            err,
            InvariantViolation::RoutingExhausted { station: StationId(4), .. }
        ));

        // A tighter tolerance turns the rounding gap into an error
        let strict = table(&[(0.5, 1), (0.4999999995, 2)]).with_tolerance(0.0);
        assert!(strict.select(StationId(4), 0.9999999999).is_err());
    }

    #[test]
    fn test_even_split_is_balanced() {
        let routes = table(&[(0.5, 1), (0.5, 2)]);
        let mut rng = StdRng::seed_from_u64(11);
        let trials = 100_000;
        let to_first = (0..trials)
            .filter(|_| routes.choose(StationId(0), &mut rng).unwrap() == StationId(1))
            .count();
        let share = to_first as f64 / trials as f64;
        assert!((share - 0.5).abs() < 0.01, "share was {}", share);
    }
}
