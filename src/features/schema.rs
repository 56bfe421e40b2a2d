//! Declared column layout of a feature row.

use serde::Serialize;

use super::profile::ProfileKind;

/// One of the four metric vectors concatenated into a feature row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FeatureSlot {
    HomeOffense,
    HomeDefense,
    AwayOffense,
    AwayDefense,
}

impl FeatureSlot {
    /// Concatenation order of the slots
    pub const ORDER: [FeatureSlot; 4] = [
        FeatureSlot::HomeOffense,
        FeatureSlot::HomeDefense,
        FeatureSlot::AwayOffense,
        FeatureSlot::AwayDefense,
    ];

    /// Column name suffix
    pub fn suffix(&self) -> &'static str {
        match self {
            FeatureSlot::HomeOffense => "home_off",
            FeatureSlot::HomeDefense => "home_def",
            FeatureSlot::AwayOffense => "away_off",
            FeatureSlot::AwayDefense => "away_def",
        }
    }

    pub fn is_home(&self) -> bool {
        matches!(self, FeatureSlot::HomeOffense | FeatureSlot::HomeDefense)
    }

    /// Profile table the slot reads from
    pub fn kind(&self) -> ProfileKind {
        match self {
            FeatureSlot::HomeOffense | FeatureSlot::AwayOffense => ProfileKind::Offense,
            FeatureSlot::HomeDefense | FeatureSlot::AwayDefense => ProfileKind::Defense,
        }
    }
}

impl std::fmt::Display for FeatureSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Ordered metric names × four slots, built once per run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSchema {
    metrics: Vec<String>,
}

impl FeatureSchema {
    pub fn new(metrics: Vec<String>) -> Self {
        Self { metrics }
    }

    pub fn metrics(&self) -> &[String] {
        &self.metrics
    }

    /// Number of metrics per slot
    pub fn metric_count(&self) -> usize {
        self.metrics.len()
    }

    /// Total feature row width
    pub fn width(&self) -> usize {
        self.metrics.len() * FeatureSlot::ORDER.len()
    }

    /// Column names in model input order: `<metric>_<slot suffix>`
    pub fn column_names(&self) -> Vec<String> {
        FeatureSlot::ORDER
            .iter()
            .flat_map(|slot| {
                self.metrics
                    .iter()
                    .map(move |metric| format!("{}_{}", metric, slot.suffix()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_names_order() {
        let schema = FeatureSchema::new(vec!["ypp".to_string(), "ppg".to_string()]);

        assert_eq!(schema.width(), 8);
        assert_eq!(
            schema.column_names(),
            vec![
                "ypp_home_off",
                "ppg_home_off",
                "ypp_home_def",
                "ppg_home_def",
                "ypp_away_off",
                "ppg_away_off",
                "ypp_away_def",
                "ppg_away_def",
            ]
        );
    }

    #[test]
    fn test_column_names_unique() {
        let schema = FeatureSchema::new(vec!["a".into(), "b".into(), "c".into()]);
        let names = schema.column_names();
        let unique: std::collections::HashSet<_> = names.iter().collect();
        assert_eq!(unique.len(), names.len());
    }

    #[test]
    fn test_slot_kinds() {
        assert_eq!(FeatureSlot::HomeOffense.kind(), ProfileKind::Offense);
        assert_eq!(FeatureSlot::AwayDefense.kind(), ProfileKind::Defense);
        assert!(FeatureSlot::HomeDefense.is_home());
        assert!(!FeatureSlot::AwayOffense.is_home());
    }
}
