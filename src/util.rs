/// Checks that a numerical value is in the provided interval `[a,b]` and returns
/// early with an [`Error::OutOfInterval`](crate::Error::OutOfInterval) if not
///
/// ### Example
/// ```
/// use deriv_rl::{ensure_interval, Error};
///
/// fn check(alpha: f64) -> Result<(), Error> {
///     ensure_interval!(alpha, 0.0, 1.0);
///     Ok(())
/// }
///
/// assert!(check(0.5).is_ok());
/// assert!(check(2.0).is_err());
/// ```
/// The error message for the failing call reads "invalid value for `alpha`: 2 is not in the interval [0, 1]".
#[macro_export]
macro_rules! ensure_interval {
    ($var:expr, $a:expr, $b:expr) => {
        // NaN fails both comparisons
        if !($var >= $a && $var <= $b) {
            return Err($crate::Error::OutOfInterval {
                name: stringify!($var),
                value: $var as f64,
                min: $a as f64,
                max: $b as f64,
            });
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::Error;

    fn check(epsilon: f64) -> Result<f64, Error> {
        ensure_interval!(epsilon, 0.0, 1.0);
        Ok(epsilon)
    }

    #[test]
    fn ensure_interval_functional() {
        assert_eq!(check(0.0).unwrap(), 0.0);
        assert_eq!(check(1.0).unwrap(), 1.0);
        assert!(check(-0.1).is_err());
        assert!(check(f64::NAN).is_err());

        let err = check(1.5).unwrap_err();
        assert!(matches!(
            err,
            Error::OutOfInterval { name: "epsilon", value, .. } if value == 1.5
        ));
    }
}
