//! Network description parser.
//!
//! The description is a whitespace separated token stream:
//!
//! ```text
//! N
//! id G <mean_interarrival> <destination>
//! id E
//! id Q <mean_service> <k> <p_1> .. <p_k> <dest_1> .. <dest_k>
//! ```

use crate::core::errors::ConfigError;
use crate::core::types::StationId;
use log::{info, warn};
use std::collections::BTreeMap;
use std::str::{FromStr, SplitWhitespace};

/// One declared component, as read from the description
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentSpec {
    Generator {
        id: StationId,
        mean_interarrival: f64,
        destination: StationId,
    },
    Exit {
        id: StationId,
    },
    Queue {
        id: StationId,
        mean_service: f64,
        probabilities: Vec<f64>,
        destinations: Vec<StationId>,
    },
}

impl ComponentSpec {
    pub fn id(&self) -> StationId {
        match self {
            ComponentSpec::Generator { id, .. }
            | ComponentSpec::Exit { id }
            | ComponentSpec::Queue { id, .. } => *id,
        }
    }

    /// Stations this component sends customers to
    fn destinations(&self) -> Vec<StationId> {
        match self {
            ComponentSpec::Generator { destination, .. } => vec![*destination],
            ComponentSpec::Exit { .. } => Vec::new(),
            ComponentSpec::Queue { destinations, .. } => destinations.clone(),
        }
    }
}

/// A validated network: unique ids, summing probabilities, and every
/// destination declared as a queue or an exit
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkDescription {
    components: Vec<ComponentSpec>,
}

impl NetworkDescription {
    /// Components in declaration order
    pub fn components(&self) -> &[ComponentSpec] {
        &self.components
    }

    /// Parse and validate a description
    pub fn parse(input: &str, tolerance: f64) -> Result<Self, ConfigError> {
        let mut tokens = Tokens::new(input);

        let count_token = tokens.next_raw("component count")?;
        let count = match count_token.parse::<usize>() {
            Ok(n) if n > 0 => n,
            _ => return Err(ConfigError::InvalidComponentCount(count_token.to_string())),
        };

        // Counts come from the file; grow as records are actually read
        let mut components = Vec::new();
        for _ in 0..count {
            let id = StationId(tokens.next::<u32>("component id")?);
            let tag = tokens.next_raw("component type")?;
            let component = match tag {
                "G" => ComponentSpec::Generator {
                    id,
                    mean_interarrival: tokens.next("mean interarrival time")?,
                    destination: StationId(tokens.next("destination id")?),
                },
                "E" => ComponentSpec::Exit { id },
                "Q" => parse_queue(id, &mut tokens, tolerance)?,
                other => {
                    return Err(ConfigError::InvalidComponentType {
                        id,
                        tag: other.to_string(),
                    })
                }
            };
            components.push(component);
        }

        let trailing = tokens.remaining();
        if trailing > 0 {
            warn!(
                "Ignoring {} trailing tokens after {} components",
                trailing, count
            );
        }

        let description = Self { components };
        description.validate()?;
        info!("Loaded network with {} components", count);
        Ok(description)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut tags: BTreeMap<StationId, char> = BTreeMap::new();
        for component in &self.components {
            let tag = match component {
                ComponentSpec::Generator { .. } => 'G',
                ComponentSpec::Exit { .. } => 'E',
                ComponentSpec::Queue { .. } => 'Q',
            };
            if tags.insert(component.id(), tag).is_some() {
                return Err(ConfigError::DuplicateStation(component.id()));
            }
        }

        for component in &self.components {
            let from = component.id();
            if let ComponentSpec::Generator {
                mean_interarrival: mean,
                ..
            }
            | ComponentSpec::Queue {
                mean_service: mean,
                ..
            } = component
            {
                if !(mean.is_finite() && *mean > 0.0) {
                    return Err(ConfigError::InvalidMean {
                        station: from,
                        value: *mean,
                    });
                }
            }
            for to in component.destinations() {
                match tags.get(&to) {
                    None => return Err(ConfigError::UnknownDestination { from, to }),
                    Some('G') => return Err(ConfigError::InvalidDestination { from, to }),
                    Some(_) => {}
                }
            }
        }
        Ok(())
    }
}

fn parse_queue(
    id: StationId,
    tokens: &mut Tokens<'_>,
    tolerance: f64,
) -> Result<ComponentSpec, ConfigError> {
    let mean_service = tokens.next("mean service time")?;
    let route_token = tokens.next_raw("route count")?;
    let route_count = match route_token.parse::<usize>() {
        Ok(k) if k > 0 => k,
        _ => {
            return Err(ConfigError::InvalidRouteCount {
                station: id,
                count: route_token.to_string(),
            })
        }
    };

    let mut probabilities = Vec::new();
    for _ in 0..route_count {
        let p: f64 = tokens.next("route probability")?;
        if !(0.0..=1.0).contains(&p) {
            return Err(ConfigError::InvalidProbability {
                station: id,
                value: p,
            });
        }
        probabilities.push(p);
    }
    let total: f64 = probabilities.iter().sum();
    if (total - 1.0).abs() > tolerance {
        return Err(ConfigError::ProbabilitiesDoNotSum { station: id, total });
    }

    let mut destinations = Vec::new();
    for _ in 0..route_count {
        destinations.push(StationId(tokens.next("route destination id")?));
    }

    Ok(ComponentSpec::Queue {
        id,
        mean_service,
        probabilities,
        destinations,
    })
}

struct Tokens<'a> {
    inner: SplitWhitespace<'a>,
}

impl<'a> Tokens<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            inner: input.split_whitespace(),
        }
    }

    fn next_raw(&mut self, expected: &str) -> Result<&'a str, ConfigError> {
        self.inner.next().ok_or_else(|| ConfigError::MissingToken {
            expected: expected.to_string(),
        })
    }

    fn next<T: FromStr>(&mut self, expected: &str) -> Result<T, ConfigError> {
        let token = self.next_raw(expected)?;
        token.parse().map_err(|_| ConfigError::InvalidNumber {
            token: token.to_string(),
            expected: expected.to_string(),
        })
    }

    fn remaining(self) -> usize {
        self.inner.count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-9;

    #[test]
    fn test_parse_simple_chain() {
        let desc = NetworkDescription::parse("3\n0 G 5 1\n1 Q 3 1 1.0 2\n2 E\n", TOL).unwrap();
        assert_eq!(
            desc.components(),
            &[
                ComponentSpec::Generator {
                    id: StationId(0),
                    mean_interarrival: 5.0,
                    destination: StationId(1),
                },
                ComponentSpec::Queue {
                    id: StationId(1),
                    mean_service: 3.0,
                    probabilities: vec![1.0],
                    destinations: vec![StationId(2)],
                },
                ComponentSpec::Exit { id: StationId(2) },
            ]
        );
    }

    #[test]
    fn test_destinations_may_be_declared_later() {
        let text = "4 0 G 2 1  1 Q 1 2 0.25 0.75 3 2  2 E  3 E";
        assert!(NetworkDescription::parse(text, TOL).is_ok());
    }

    #[test]
    fn test_rejects_zero_or_garbage_count() {
        assert_eq!(
            NetworkDescription::parse("0", TOL),
            Err(ConfigError::InvalidComponentCount("0".to_string()))
        );
        assert!(matches!(
            NetworkDescription::parse("abc", TOL),
            Err(ConfigError::InvalidComponentCount(_))
        ));
        assert!(matches!(
            NetworkDescription::parse("", TOL),
            Err(ConfigError::MissingToken { .. })
        ));
    }

    #[test]
    fn test_huge_counts_report_truncated_input() {
        for text in [
            "18446744073709551615 0 E",
            "1000000000000 0 E",
            "1 0 Q 1 18446744073709551615 1.0",
            "1 0 Q 1 1000000000000 0.5 0.5",
        ] {
            assert!(
                matches!(
                    NetworkDescription::parse(text, TOL),
                    Err(ConfigError::MissingToken { .. })
                ),
                "{}",
                text
            );
        }
    }

    #[test]
    fn test_rejects_unknown_type() {
        assert_eq!(
            NetworkDescription::parse("1 0 X", TOL),
            Err(ConfigError::InvalidComponentType {
                id: StationId(0),
                tag: "X".to_string()
            })
        );
    }

    #[test]
    fn test_rejects_probabilities_not_summing_to_one() {
        let err = NetworkDescription::parse("3 0 G 1 1 1 Q 1 2 0.5 0.4 2 2 2 E", TOL).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::ProbabilitiesDoNotSum { station: StationId(1), .. }
        ));
    }

    #[test]
    fn test_tolerates_rounding_in_probabilities() {
        // 0.1 + 0.2 + 0.7 is not exactly 1.0 in binary floating point
        let text = "5 0 G 1 1 1 Q 1 3 0.1 0.2 0.7 2 3 4 2 E 3 E 4 E";
        assert!(NetworkDescription::parse(text, TOL).is_ok());
    }

    #[test]
    fn test_rejects_unknown_and_generator_destinations() {
        assert_eq!(
            NetworkDescription::parse("2 0 G 1 7 1 E", TOL),
            Err(ConfigError::UnknownDestination {
                from: StationId(0),
                to: StationId(7)
            })
        );
        assert_eq!(
            NetworkDescription::parse("3 0 G 1 1 1 Q 1 1 1.0 0 2 E", TOL),
            Err(ConfigError::InvalidDestination {
                from: StationId(1),
                to: StationId(0)
            })
        );
    }

    #[test]
    fn test_rejects_duplicates_and_bad_means() {
        assert_eq!(
            NetworkDescription::parse("2 1 E 1 E", TOL),
            Err(ConfigError::DuplicateStation(StationId(1)))
        );
        assert!(matches!(
            NetworkDescription::parse("2 0 G 0 1 1 E", TOL),
            Err(ConfigError::InvalidMean { station: StationId(0), .. })
        ));
        assert!(matches!(
            NetworkDescription::parse("2 0 Q -1 1 1.0 1 1 E", TOL),
            Err(ConfigError::InvalidMean { station: StationId(0), .. })
        ));
    }

    #[test]
    fn test_rejects_truncated_and_malformed_records() {
        assert!(matches!(
            NetworkDescription::parse("2 0 G 1", TOL),
            Err(ConfigError::MissingToken { .. })
        ));
        assert!(matches!(
            NetworkDescription::parse("1 0 Q 1 0", TOL),
            Err(ConfigError::InvalidRouteCount { .. })
        ));
        assert!(matches!(
            NetworkDescription::parse("2 0 Q 1 1 1.5 1 1 E", TOL),
            Err(ConfigError::InvalidProbability { .. })
        ));
        assert!(matches!(
            NetworkDescription::parse("1 x E", TOL),
            Err(ConfigError::InvalidNumber { .. })
        ));
    }
}
