use crate::error::{Error, Result};
use crate::model::FloaterType;

/// Parse a free-text ages field: "28" or "30,28,5". Split on comma, trim,
/// drop empty tokens, drop anything non-numeric or non-positive.
pub fn parse_ages(text: &str) -> Vec<u32> {
    text.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .filter_map(|t| t.parse::<u32>().ok())
        .filter(|n| *n > 0)
        .collect()
}

/// Floater rules: individual covers exactly one person, family at least two.
/// Runs before any network call; a violation blocks submission.
pub fn check_floater_ages(floater: FloaterType, ages: &[u32]) -> Result<()> {
    match floater {
        FloaterType::Individual if ages.len() != 1 => Err(Error::Validation(
            "individual floater takes exactly 1 age (example: 28)".into(),
        )),
        FloaterType::Family if ages.len() < 2 => Err(Error::Validation(
            "family floater needs 2 or more ages (example: 30,28,5)".into(),
        )),
        _ => Ok(()),
    }
}

/// Premium amounts on the conversion form default to 0 when blank or
/// unparseable; they never fail validation locally.
pub fn coerce_premium(text: &str) -> f64 {
    text.trim().parse().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_ages_drops_bad_tokens() {
        assert_eq!(parse_ages("28,abc,-5,0,30"), vec![28, 30]);
    }

    #[test]
    fn parse_ages_rejects_out_of_range_tokens() {
        // tokens past u32 must be dropped, not wrapped into small values
        assert_eq!(parse_ages("4294967297"), Vec::<u32>::new());
        assert_eq!(parse_ages("28,4294967297,30"), vec![28, 30]);
    }

    #[test]
    fn parse_ages_trims_and_skips_empties() {
        assert_eq!(parse_ages(" 30 , ,28,  5"), vec![30, 28, 5]);
        assert_eq!(parse_ages(""), Vec::<u32>::new());
        assert_eq!(parse_ages(",,,"), Vec::<u32>::new());
    }

    #[test]
    fn individual_floater_wants_exactly_one_age() {
        assert!(check_floater_ages(FloaterType::Individual, &parse_ages("28")).is_ok());
        assert!(check_floater_ages(FloaterType::Individual, &parse_ages("28,30")).is_err());
        assert!(check_floater_ages(FloaterType::Individual, &[]).is_err());
    }

    #[test]
    fn family_floater_wants_two_or_more() {
        assert!(check_floater_ages(FloaterType::Family, &parse_ages("30")).is_err());
        assert!(check_floater_ages(FloaterType::Family, &parse_ages("30,28,5")).is_ok());
    }

    #[test]
    fn floater_violation_is_a_validation_error() {
        let err = check_floater_ages(FloaterType::Family, &[30]).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn premium_coercion_never_fails() {
        assert_eq!(coerce_premium("1234.50"), 1234.50);
        assert_eq!(coerce_premium(""), 0.0);
        assert_eq!(coerce_premium("  "), 0.0);
        assert_eq!(coerce_premium("n/a"), 0.0);
    }
}
