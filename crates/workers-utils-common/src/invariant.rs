//! Precondition checks that fail with formatted [`Error::Invariant`] errors

use serde_json::Value;
use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt::Display;
use std::hash::{BuildHasher, Hash};

use crate::error::{Error, Result};
use crate::format::util_format;

/// Fail with `fmt` (formatted with `args`) unless `condition` holds.
pub fn invariant(condition: bool, fmt: &str, args: &[Value]) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(Error::Invariant(util_format(fmt, args)))
    }
}

/// Unwrap `thing`, failing with the formatted message when it is `None`.
pub fn thing_or_err<T>(thing: Option<T>, fmt: &str, args: &[Value]) -> Result<T> {
    thing.ok_or_else(|| Error::Invariant(util_format(fmt, args)))
}

/// Look up `key` in `map`, failing when it is absent.
pub fn thing_from_map_or_err<'a, K, Q, V, S>(map: &'a HashMap<K, V, S>, key: &Q) -> Result<&'a V>
where
    K: Borrow<Q> + Eq + Hash,
    Q: Eq + Hash + Display + ?Sized,
    S: BuildHasher,
{
    map.get(key)
        .ok_or_else(|| Error::Invariant(format!("Object does not contain key `{key}`")))
}

/// Return early with an [`Error::Invariant`] unless the condition holds.
///
/// ```
/// use workers_utils_common::{invariant, Result};
///
/// fn check(key: u32) -> Result<()> {
///     invariant!(key & key.wrapping_sub(1) == 0, "Key `%s` must be zero or a power of 2", key);
///     Ok(())
/// }
///
/// assert!(check(8).is_ok());
/// assert!(check(6).is_err());
/// ```
#[macro_export]
macro_rules! invariant {
    ($cond:expr, $fmt:expr $(, $arg:expr)* $(,)?) => {
        if !$cond {
            return Err($crate::Error::Invariant($crate::util_format!($fmt $(, $arg)*)).into());
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_invariant_passes_and_fails() {
        assert!(invariant(true, "never shown", &[]).is_ok());

        let err = invariant(false, "Vendor %s is missing required data", &[json!(350061650)])
            .expect_err("invariant should fail");
        assert_eq!(err.to_string(), "Vendor 350061650 is missing required data");
    }

    #[test]
    fn test_thing_or_err() {
        assert_eq!(thing_or_err(Some(3), "missing", &[]).ok(), Some(3));

        let err = thing_or_err::<u32>(None, "No collectibles data for hash %s", &[json!(615947643)])
            .expect_err("None should fail");
        assert!(matches!(err, Error::Invariant(_)));
        assert_eq!(err.to_string(), "No collectibles data for hash 615947643");
    }

    #[test]
    fn test_thing_from_map_or_err() {
        let mut map = HashMap::new();
        map.insert("apiKey".to_string(), "abc".to_string());

        assert_eq!(thing_from_map_or_err(&map, "apiKey").ok().map(String::as_str), Some("abc"));
        let err = thing_from_map_or_err(&map, "apiOrigin").expect_err("absent key should fail");
        assert_eq!(err.to_string(), "Object does not contain key `apiOrigin`");
    }

    fn checked(value: u32) -> Result<u32> {
        invariant!(value > 2, "Value %d is too small", value);
        Ok(value)
    }

    #[test]
    fn test_invariant_macro() {
        assert_eq!(checked(5).ok(), Some(5));
        assert_eq!(
            checked(1).expect_err("should fail").to_string(),
            "Value 1 is too small"
        );
    }
}
