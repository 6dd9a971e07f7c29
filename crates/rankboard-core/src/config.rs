use rankboard_common::DataError;
use serde::{Deserialize, Serialize};

use crate::aggregate::DEFAULT_TOP_N;
use crate::classify::DEFAULT_DATE_SAMPLE;
use crate::format::{DEFAULT_DATE_PATTERN, NumberFormat, is_valid_date_pattern};

/// Knobs for one dashboard: top-N cuts, filter discovery limits and
/// display formats. Every field has a default, so a partial YAML document
/// is valid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    pub chart_top_n: usize,
    pub ranking_top_n: usize,
    pub detail_rows: usize,
    pub max_filter_columns: usize,
    pub max_filter_cardinality: usize,
    pub date_sample_size: usize,
    pub number_format: NumberFormat,
    pub date_pattern: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            chart_top_n: DEFAULT_TOP_N,
            ranking_top_n: 15,
            detail_rows: 50,
            max_filter_columns: 3,
            max_filter_cardinality: 50,
            date_sample_size: DEFAULT_DATE_SAMPLE,
            number_format: NumberFormat::default(),
            date_pattern: DEFAULT_DATE_PATTERN.to_string(),
        }
    }
}

impl DashboardConfig {
    pub fn from_yaml_reader<R: std::io::Read>(reader: R) -> Result<Self, DataError> {
        let cfg: Self = serde_yaml::from_reader(reader)
            .map_err(|e| DataError::invalid_spec(format!("config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, DataError> {
        let cfg: Self = serde_yaml::from_str(yaml)
            .map_err(|e| DataError::invalid_spec(format!("config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    pub fn validate(&self) -> Result<(), DataError> {
        let positive = [
            ("chart_top_n", self.chart_top_n),
            ("ranking_top_n", self.ranking_top_n),
            ("date_sample_size", self.date_sample_size),
        ];
        for (name, v) in positive {
            if v == 0 {
                return Err(DataError::invalid_spec(format!("config: {name} must be positive")));
            }
        }
        if self.date_pattern.trim().is_empty() {
            return Err(DataError::invalid_spec("config: date_pattern is empty"));
        }
        if !is_valid_date_pattern(&self.date_pattern) {
            return Err(DataError::invalid_spec(format!(
                "config: date_pattern '{}' cannot render a date",
                self.date_pattern
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let cfg = DashboardConfig::from_yaml_str("ranking_top_n: 5\nnumber_format:\n  decimals: 2\n")
            .unwrap();
        assert_eq!(cfg.ranking_top_n, 5);
        assert_eq!(cfg.chart_top_n, 10);
        assert_eq!(cfg.number_format.decimals, 2);
        assert_eq!(cfg.number_format.thousands_separator, Some(','));
    }

    #[test]
    fn rejects_zero_top_n_and_unknown_keys() {
        assert!(DashboardConfig::from_yaml_str("chart_top_n: 0").is_err());
        assert!(DashboardConfig::from_yaml_str("chart_topn: 4").is_err());
    }

    #[test]
    fn rejects_unrenderable_date_patterns() {
        let err = DashboardConfig::from_yaml_str("date_pattern: \"%Q\"").unwrap_err();
        assert_eq!(err.kind, rankboard_common::DataErrorKind::InvalidSpecification);
        assert!(DashboardConfig::from_yaml_str("date_pattern: \"%H:%M\"").is_err());
        assert!(DashboardConfig::from_yaml_str("date_pattern: \"%Y-%m-%d\"").is_ok());
    }

    #[test]
    fn yaml_roundtrip() {
        let cfg = DashboardConfig::default();
        let back = DashboardConfig::from_yaml_str(&cfg.to_yaml().unwrap()).unwrap();
        assert_eq!(back, cfg);
    }
}
