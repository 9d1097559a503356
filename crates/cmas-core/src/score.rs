use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;
use crate::observation::Observation;
use crate::test_id::TestId;

/// Ordinal score awarded for one test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubScore(u8);

impl SubScore {
    pub const ZERO: SubScore = SubScore(0);

    pub fn new(value: u8) -> Self {
        Self(value)
    }

    /// Construct a score, checking it against the test's range.
    pub fn for_test(test: TestId, value: u8) -> Result<Self, CoreError> {
        let max = test.max_score();
        if value > max {
            return Err(CoreError::ScoreOutOfRange { test, value, max });
        }
        Ok(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl From<SubScore> for u32 {
    fn from(score: SubScore) -> u32 {
        u32::from(score.0)
    }
}

/// Sub-scores collected so far, keyed by test in battery order.
///
/// A result with fewer than fourteen entries is a valid intermediate state
/// but has no total.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatteryResult {
    scores: BTreeMap<TestId, SubScore>,
}

impl BatteryResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a sub-score, replacing any earlier score for the same test.
    pub fn record(&mut self, test: TestId, score: SubScore) -> Result<Option<SubScore>, CoreError> {
        SubScore::for_test(test, score.value())?;
        Ok(self.scores.insert(test, score))
    }

    pub fn get(&self, test: TestId) -> Option<SubScore> {
        self.scores.get(&test).copied()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        TestId::ALL.iter().all(|t| self.scores.contains_key(t))
    }

    /// Tests still without a score, in battery order.
    pub fn missing(&self) -> Vec<TestId> {
        TestId::ALL
            .into_iter()
            .filter(|t| !self.scores.contains_key(t))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TestId, SubScore)> + '_ {
        self.scores.iter().map(|(t, s)| (*t, *s))
    }

    /// All fourteen scores in battery order, once complete.
    pub fn to_array(&self) -> Option<[SubScore; 14]> {
        let mut out = [SubScore::ZERO; 14];
        for (slot, test) in out.iter_mut().zip(TestId::ALL) {
            *slot = self.get(test)?;
        }
        Some(out)
    }

    /// Sum of whatever has been recorded. For progress display only; this is
    /// not a battery total.
    pub fn partial_sum(&self) -> u32 {
        self.scores.values().copied().map(u32::from).sum()
    }
}

/// One scored test in a report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportEntry {
    pub test: TestId,
    pub name: String,
    pub score: SubScore,
    pub max_score: u8,
    pub observation: Observation,
}

/// A printable record of one administration of some or all of the battery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatteryReport {
    pub id: Uuid,
    pub administered_at: jiff::Timestamp,
    pub entries: Vec<ReportEntry>,
    /// Present only when all fourteen tests were scored.
    pub total: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_rejects_out_of_range_scores() {
        let mut result = BatteryResult::new();
        assert!(result.record(TestId::LegRaise, SubScore::new(3)).is_err());
        assert!(result.record(TestId::LegRaise, SubScore::new(2)).is_ok());
        assert_eq!(result.get(TestId::LegRaise), Some(SubScore::new(2)));
    }

    #[test]
    fn partial_result_has_no_array() {
        let mut result = BatteryResult::new();
        result.record(TestId::SitUps, SubScore::new(4)).unwrap();
        assert!(!result.is_complete());
        assert_eq!(result.missing().len(), 13);
        assert!(result.to_array().is_none());
        assert_eq!(result.partial_sum(), 4);
    }

    #[test]
    fn complete_result_orders_by_battery() {
        let mut result = BatteryResult::new();
        for test in TestId::ALL.into_iter().rev() {
            result.record(test, SubScore::new(1)).unwrap();
        }
        assert!(result.is_complete());
        let order: Vec<_> = result.iter().map(|(t, _)| t).collect();
        assert_eq!(order, TestId::ALL.to_vec());
        assert_eq!(result.to_array().unwrap(), [SubScore::new(1); 14]);
    }

    #[test]
    fn serializes_keyed_by_test_id() {
        let mut result = BatteryResult::new();
        result.record(TestId::ChairRise, SubScore::new(4)).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["chair_rise"], 4);

        let back: BatteryResult = serde_json::from_value(json).unwrap();
        assert_eq!(back, result);
    }
}
