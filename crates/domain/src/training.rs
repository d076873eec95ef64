use derive_more::{Display, Into};

#[derive(Debug, Default, Display, Clone, Copy, Into, PartialEq, Eq, PartialOrd, Ord)]
pub struct Sets(u32);

impl Sets {
    pub fn new(value: u32) -> Result<Self, SetsError> {
        if !(1..1000).contains(&value) {
            return Err(SetsError::OutOfRange);
        }

        Ok(Self(value))
    }
}

impl TryFrom<&str> for Sets {
    type Error = SetsError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.parse::<u32>() {
            Ok(parsed_value) => Sets::new(parsed_value),
            Err(_) => Err(SetsError::ParseError),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum SetsError {
    #[error("Sets must be in the range 1 to 999")]
    OutOfRange,
    #[error("Sets must be an integer")]
    ParseError,
}

#[derive(Debug, Default, Display, Clone, Copy, Into, PartialEq, Eq, PartialOrd, Ord)]
pub struct Reps(u32);

impl Reps {
    pub fn new(value: u32) -> Result<Self, RepsError> {
        if !(1..1000).contains(&value) {
            return Err(RepsError::OutOfRange);
        }

        Ok(Self(value))
    }
}

impl TryFrom<&str> for Reps {
    type Error = RepsError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.parse::<u32>() {
            Ok(parsed_value) => Reps::new(parsed_value),
            Err(_) => Err(RepsError::ParseError),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum RepsError {
    #[error("Reps must be in the range 1 to 999")]
    OutOfRange,
    #[error("Reps must be an integer")]
    ParseError,
}

#[derive(Debug, Default, Display, Clone, Copy, Into, PartialEq, PartialOrd)]
pub struct Weight(f32);

impl Weight {
    pub fn new(value: f32) -> Result<Self, WeightError> {
        if !(0.0..1000.0).contains(&value) {
            return Err(WeightError::OutOfRange);
        }

        if (value * 10.0 % 1.0).abs() > f32::EPSILON {
            return Err(WeightError::InvalidResolution);
        }

        Ok(Self(value))
    }
}

impl TryFrom<&str> for Weight {
    type Error = WeightError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.parse::<f32>() {
            Ok(parsed_value) => Weight::new(parsed_value),
            Err(_) => Err(WeightError::ParseError),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum WeightError {
    #[error("Weight must be in the range 0.0 to 999.9 kg")]
    OutOfRange,
    #[error("Weight must be a multiple of 0.1 kg")]
    InvalidResolution,
    #[error("Weight must be a decimal")]
    ParseError,
}

/// Position of an exercise within a session template, or of a session
/// template within a plan. One-based.
#[derive(Debug, Display, Clone, Copy, Into, PartialEq, Eq, PartialOrd, Ord)]
pub struct OrderIndex(u32);

impl OrderIndex {
    /// Upper bound on session templates attached to a single plan.
    pub const MAX_PER_PLAN: u32 = 30;

    pub fn new(value: u32) -> Result<Self, OrderIndexError> {
        if value < 1 {
            return Err(OrderIndexError::OutOfRange);
        }

        Ok(Self(value))
    }
}

impl TryFrom<&str> for OrderIndex {
    type Error = OrderIndexError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.parse::<u32>() {
            Ok(parsed_value) => OrderIndex::new(parsed_value),
            Err(_) => Err(OrderIndexError::ParseError),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum OrderIndexError {
    #[error("Order index must be 1 or greater")]
    OutOfRange,
    #[error("Order index must be an integer")]
    ParseError,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("3", Ok(Sets(3)))]
    #[case("0", Err(SetsError::OutOfRange))]
    #[case("1000", Err(SetsError::OutOfRange))]
    #[case("three", Err(SetsError::ParseError))]
    fn test_sets_try_from(#[case] value: &str, #[case] expected: Result<Sets, SetsError>) {
        assert_eq!(Sets::try_from(value), expected);
    }

    #[rstest]
    #[case("12", Ok(Reps(12)))]
    #[case("0", Err(RepsError::OutOfRange))]
    #[case("1000", Err(RepsError::OutOfRange))]
    #[case("twelve", Err(RepsError::ParseError))]
    fn test_reps_try_from(#[case] value: &str, #[case] expected: Result<Reps, RepsError>) {
        assert_eq!(Reps::try_from(value), expected);
    }

    #[rstest]
    #[case("0.0", Ok(Weight(0.0)))]
    #[case("82.5", Ok(Weight(82.5)))]
    #[case("-0.1", Err(WeightError::OutOfRange))]
    #[case("1000.0", Err(WeightError::OutOfRange))]
    #[case("80.05", Err(WeightError::InvalidResolution))]
    #[case("heavy", Err(WeightError::ParseError))]
    fn test_weight_try_from(#[case] value: &str, #[case] expected: Result<Weight, WeightError>) {
        assert_eq!(Weight::try_from(value), expected);
    }

    #[rstest]
    #[case("1", Ok(OrderIndex(1)))]
    #[case("30", Ok(OrderIndex(30)))]
    #[case("0", Err(OrderIndexError::OutOfRange))]
    #[case("first", Err(OrderIndexError::ParseError))]
    fn test_order_index_try_from(
        #[case] value: &str,
        #[case] expected: Result<OrderIndex, OrderIndexError>,
    ) {
        assert_eq!(OrderIndex::try_from(value), expected);
    }
}
