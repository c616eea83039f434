use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};

/// Defect subtype locator -> count, `total` included when the server sends it
pub type DefectCounts = BTreeMap<String, u64>;

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Statistics {
    pub executions: Option<Executions>,
    pub defects: Option<Defects>,
}

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Executions {
    #[serde(deserialize_with = "number_or_string")]
    pub total: u64,
    #[serde(deserialize_with = "number_or_string")]
    pub passed: u64,
    #[serde(deserialize_with = "number_or_string")]
    pub failed: u64,
    #[serde(deserialize_with = "number_or_string")]
    pub skipped: u64,
}

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Defects {
    pub product_bug: DefectCounts,
    pub automation_bug: DefectCounts,
    pub system_issue: DefectCounts,
    pub to_investigate: DefectCounts,
    pub no_defect: DefectCounts,
}

impl Defects {
    /// Sum of every subtype count except the server-computed `total`
    pub fn count(counts: &DefectCounts) -> u64 {
        counts
            .iter()
            .filter(|(subtype, _)| subtype.as_str() != "total")
            .map(|(_, count)| count)
            .sum()
    }

    pub fn total(&self) -> u64 {
        [
            &self.product_bug,
            &self.automation_bug,
            &self.system_issue,
            &self.to_investigate,
            &self.no_defect,
        ]
        .into_iter()
        .map(Self::count)
        .sum()
    }
}

/// Older servers send execution counters as strings
fn number_or_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Counter {
        Number(u64),
        Text(String),
    }

    match Counter::deserialize(deserializer)? {
        Counter::Number(value) => Ok(value),
        Counter::Text(value) => value.trim().parse().map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(r#"{"total": 10, "passed": 7, "failed": 3}"#; "numbers")]
    #[test_case(r#"{"total": "10", "passed": "7", "failed": "3"}"#; "strings")]
    fn test_parse_executions(json: &str) {
        let executions: Executions = serde_json::from_str(json).unwrap();
        assert_eq!(
            executions,
            Executions { total: 10, passed: 7, failed: 3, skipped: 0 }
        );
    }

    #[test]
    fn test_parse_executions_invalid_counter() {
        assert!(serde_json::from_str::<Executions>(r#"{"total": "many"}"#).is_err());
    }

    #[test]
    fn test_defects_total() {
        let json = r#"{
            "product_bug": {"total": 3, "pb001": 2, "pb_custom": 1},
            "to_investigate": {"total": 4, "ti001": 4},
            "no_defect": {}
        }"#;
        let defects: Defects = serde_json::from_str(json).unwrap();
        assert_eq!(defects.product_bug["pb001"], 2);
        assert_eq!(Defects::count(&defects.product_bug), 3);
        assert_eq!(defects.total(), 7);
        assert!(defects.system_issue.is_empty());
    }
}
