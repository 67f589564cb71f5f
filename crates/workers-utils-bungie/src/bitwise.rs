//! Bit-flag decoding

use std::collections::{BTreeMap, BTreeSet};
use workers_utils_common::{Result, invariant};

/// Decoder from an integer bit field to the names of its set flags
///
/// Keys must be zero or a power of two. A zero key is accepted for
/// completeness but has no bits, so it is never reported.
#[derive(Debug, Clone)]
pub struct BitwiseSplit<T> {
    names: BTreeMap<u32, T>,
}

impl<T: Clone + Ord> BitwiseSplit<T> {
    pub fn new(pairs: impl IntoIterator<Item = (u32, T)>) -> Result<Self> {
        let mut names = BTreeMap::new();
        for (key, name) in pairs {
            invariant!(
                key & key.wrapping_sub(1) == 0,
                "Key `%s` must be zero or a power of 2",
                key
            );
            names.insert(key, name);
        }
        Ok(Self { names })
    }

    /// Names of every flag set in `value`
    pub fn split(&self, value: u32) -> BTreeSet<T> {
        self.names
            .iter()
            .filter(|&(&bit, _)| bit != 0 && value & bit == bit)
            .map(|(_, name)| name.clone())
            .collect()
    }
}
