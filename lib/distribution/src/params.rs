use serde::{Deserialize, Serialize};

use crate::error::{Result, check_range, check_rate};

/// Everything one computation pass needs, passed around by value.
///
/// `query_point` is unconstrained: it may lie outside
/// `[range_min, range_max]`, see [`DistributionParameters::query_in_range`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistributionParameters {
    pub rate: f64,
    pub range_min: u64,
    pub range_max: u64,
    pub query_point: i64,
}

impl Default for DistributionParameters {
    fn default() -> Self {
        Self {
            rate: 12.0,
            range_min: 0,
            range_max: 30,
            query_point: 10,
        }
    }
}

impl DistributionParameters {
    /// # Errors
    ///
    /// `InvalidParameter` if `rate` is not positive, `InvalidRange` if
    /// `range_min >= range_max`.
    pub fn new(rate: f64, range_min: u64, range_max: u64, query_point: i64) -> Result<Self> {
        let params = Self {
            rate,
            range_min,
            range_max,
            query_point,
        };
        params.validate()?;
        Ok(params)
    }

    /// Re-checks the invariants, for values that came in through serde.
    pub fn validate(&self) -> Result<()> {
        check_rate(self.rate)?;
        check_range(self.range_min, self.range_max)
    }

    pub fn query_in_range(&self) -> bool {
        self.query_point >= 0
            && (self.range_min..=self.range_max).contains(&(self.query_point as u64))
    }

    pub fn with_rate(self, rate: f64) -> Result<Self> {
        Self::new(rate, self.range_min, self.range_max, self.query_point)
    }

    pub fn with_query_point(self, query_point: i64) -> Self {
        Self {
            query_point,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DistError;
    use serde_json::json;

    #[test]
    fn test_default_parameters_are_valid() {
        let params = DistributionParameters::default();
        assert!(params.validate().is_ok());
        assert!(params.query_in_range());
    }

    #[test]
    fn test_new_rejects_bad_input() {
        assert_eq!(
            DistributionParameters::new(3.0, 10, 10, 0),
            Err(DistError::InvalidRange { min: 10, max: 10 })
        );
        assert!(matches!(
            DistributionParameters::new(0.0, 0, 10, 0),
            Err(DistError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_query_in_range() {
        let params = DistributionParameters::new(4.0, 2, 8, 2).expect("valid parameters");
        assert!(params.query_in_range());
        assert!(params.with_query_point(8).query_in_range());
        assert!(!params.with_query_point(9).query_in_range());
        assert!(!params.with_query_point(1).query_in_range());
        assert!(!params.with_query_point(-1).query_in_range());
    }

    #[test]
    fn test_deserialize_then_validate() {
        let params: DistributionParameters = serde_json::from_value(
            json!({"rate": 2.5, "range_min": 4, "range_max": 1, "query_point": 3}),
        )
        .expect("Failed to parse parameters");
        assert_eq!(
            params.validate(),
            Err(DistError::InvalidRange { min: 4, max: 1 })
        );
    }

    #[test]
    fn test_with_rate_validates() {
        let params = DistributionParameters::default();
        assert_eq!(params.with_rate(30.0).map(|p| p.rate), Ok(30.0));
        assert!(params.with_rate(-1.0).is_err());
    }
}
