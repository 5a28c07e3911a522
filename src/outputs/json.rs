//! JSON serialization of the conditions record.
//!
//! The cache value and the `--dry-run` output are the same document.

use crate::errors::ConditionsError;
use crate::models::ConditionsRecord;

pub fn to_json(record: &ConditionsRecord) -> Result<String, ConditionsError> {
    serde_json::to_string(record).map_err(ConditionsError::Serialize)
}

pub fn to_json_pretty(record: &ConditionsRecord) -> Result<String, ConditionsError> {
    serde_json::to_string_pretty(record).map_err(ConditionsError::Serialize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_record() {
        let record = ConditionsRecord::new(Vec::new());
        let value: serde_json::Value = serde_json::from_str(&to_json(&record).unwrap()).unwrap();
        assert_eq!(value["data"], serde_json::json!([]));
        assert!(value["updatedAt"].is_string());
    }

    #[test]
    fn test_pretty_matches_compact() {
        let record = ConditionsRecord::new(Vec::new());
        let compact: ConditionsRecord = serde_json::from_str(&to_json(&record).unwrap()).unwrap();
        let pretty: ConditionsRecord =
            serde_json::from_str(&to_json_pretty(&record).unwrap()).unwrap();
        assert_eq!(compact, pretty);
    }
}
