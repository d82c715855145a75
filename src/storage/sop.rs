/// State of power: available peak power as a percentage of nominal power.
///
/// Returns `None` when `p_nominal` is not a positive finite number.
///
/// ```
/// use bess_dispatch::storage::state_of_power;
///
/// assert_eq!(state_of_power(75.0, 150.0), Some(50.0));
/// assert_eq!(state_of_power(75.0, 0.0), None);
/// ```
pub fn state_of_power(p_max: f64, p_nominal: f64) -> Option<f64> {
    if p_nominal.is_finite() && p_nominal > 0.0 {
        Some(p_max / p_nominal * 100.0)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::state_of_power;

    #[test]
    fn full_power_is_one_hundred_percent() {
        assert_eq!(state_of_power(150.0, 150.0), Some(100.0));
    }

    #[test]
    fn derated_unit() {
        assert_eq!(state_of_power(120.0, 150.0), Some(80.0));
    }

    #[test]
    fn negative_nominal_is_undefined() {
        assert_eq!(state_of_power(10.0, -5.0), None);
    }
}
