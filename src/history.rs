//! The history of the address changes observed during the current day and its
//! aggregation per address.

use crate::address::Address;

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// An address change detected and applied to the DNS record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub address: Address,
    pub timestamp: DateTime<FixedOffset>,
}

/// The observations of the current day in the order that they happened.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DailyHistory(Vec<Observation>);

impl DailyHistory {
    /// Appends an observation.
    pub fn push(&mut self, observation: Observation) {
        self.0.push(observation);
    }

    #[cfg(test)]
    pub fn observations(&self) -> &[Observation] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Groups the observations per address. See [`aggregate`].
    pub fn aggregate(&self) -> Vec<AggregatedRecord> {
        aggregate(&self.0)
    }
}

impl From<Vec<Observation>> for DailyHistory {
    fn from(observations: Vec<Observation>) -> Self {
        DailyHistory(observations)
    }
}

/// The observations of one address.
#[derive(Clone, Debug, PartialEq)]
pub struct AggregatedRecord {
    pub address: Address,
    /// When the address was observed, in the order of the history.
    pub timestamps: Vec<DateTime<FixedOffset>>,
}

impl AggregatedRecord {
    /// How many times the address was observed; it's always 1 or more.
    pub fn occurrence_count(&self) -> usize {
        self.timestamps.len()
    }
}

/// Groups `history` by address.
///
/// There is one record per distinct address and the records are in the order
/// that each address was observed for the first time. The timestamps of each
/// record keep the order of `history`. An empty history returns no records.
pub fn aggregate(history: &[Observation]) -> Vec<AggregatedRecord> {
    let mut records: Vec<AggregatedRecord> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for obs in history {
        match positions.get(obs.address.as_str()) {
            Some(&i) => records[i].timestamps.push(obs.timestamp),
            None => {
                positions.insert(obs.address.as_str(), records.len());
                records.push(AggregatedRecord {
                    address: obs.address.clone(),
                    timestamps: vec![obs.timestamp],
                });
            }
        }
    }

    records
}

#[cfg(test)]
pub(crate) fn observation(address: &str, rfc3339: &str) -> Observation {
    Observation {
        address: crate::address::validate(address).expect("valid address"),
        timestamp: DateTime::parse_from_rfc3339(rfc3339).expect("valid RFC 3339 date-time"),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_aggregate_empty() {
        assert!(aggregate(&[]).is_empty());
        assert!(DailyHistory::default().aggregate().is_empty());
    }

    #[test]
    fn test_aggregate_groups_by_first_seen() {
        let a1 = observation("1.1.1.1", "2024-01-01T00:05:00+08:00");
        let b = observation("2.2.2.2", "2024-01-01T00:10:00+08:00");
        let a2 = observation("1.1.1.1", "2024-01-01T00:15:00+08:00");
        let history = vec![a1.clone(), b.clone(), a2.clone()];

        let records = aggregate(&history);
        assert_eq!(
            records,
            vec![
                AggregatedRecord {
                    address: a1.address.clone(),
                    timestamps: vec![a1.timestamp, a2.timestamp],
                },
                AggregatedRecord {
                    address: b.address.clone(),
                    timestamps: vec![b.timestamp],
                },
            ]
        );
        assert_eq!(records[0].occurrence_count(), 2);
        assert_eq!(records[1].occurrence_count(), 1);
    }

    #[test]
    fn test_aggregate_order_is_not_by_frequency() {
        let history: DailyHistory = vec![
            observation("3.3.3.3", "2024-01-01T01:00:00+08:00"),
            observation("4.4.4.4", "2024-01-01T02:00:00+08:00"),
            observation("4.4.4.4", "2024-01-01T03:00:00+08:00"),
            observation("4.4.4.4", "2024-01-01T04:00:00+08:00"),
        ]
        .into();

        let records = history.aggregate();
        let addresses: Vec<&str> = records.iter().map(|r| r.address.as_str()).collect();
        assert_eq!(addresses, vec!["3.3.3.3", "4.4.4.4"]);
        assert_eq!(records[1].occurrence_count(), 3);
    }

    #[test]
    fn test_aggregate_compares_addresses_literally() {
        let history = vec![
            observation("1.2.3.4", "2024-01-01T01:00:00+08:00"),
            observation("01.2.3.4", "2024-01-01T02:00:00+08:00"),
        ];

        assert_eq!(aggregate(&history).len(), 2);
    }

    #[test]
    fn test_aggregate_keeps_input_untouched() {
        let history = vec![
            observation("1.1.1.1", "2024-01-01T00:05:00+08:00"),
            observation("2.2.2.2", "2024-01-01T00:10:00+08:00"),
            observation("1.1.1.1", "2024-01-01T00:15:00+08:00"),
        ];
        let before = history.clone();

        let first = aggregate(&history);
        let second = aggregate(&history);
        assert_eq!(first, second);
        assert_eq!(history, before);
    }

    #[test]
    fn test_history_serialization() {
        let history: DailyHistory =
            vec![observation("1.1.1.1", "2024-01-01T00:05:00+08:00")].into();

        let json = serde_json::to_string(&history).unwrap();
        assert_eq!(
            json,
            r#"[{"address":"1.1.1.1","timestamp":"2024-01-01T00:05:00+08:00"}]"#
        );
        assert_eq!(serde_json::from_str::<DailyHistory>(&json).unwrap(), history);
    }
}
