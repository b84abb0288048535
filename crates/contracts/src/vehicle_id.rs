//! VehicleId - key under which a trace and its report travel.
//!
//! Backed by `Arc<str>`: batch processing clones the id into every report,
//! log span and metric label without reallocating.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// Vehicle identifier.
///
/// # Examples
/// ```
/// use contracts::VehicleId;
///
/// let id: VehicleId = "van-07".into();
/// let copy = id.clone();
/// assert_eq!(copy, "van-07");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VehicleId(Arc<str>);

impl VehicleId {
    /// Placeholder used when an input document carries no id
    pub const UNASSIGNED: &'static str = "unassigned";

    #[inline]
    pub fn new(s: &str) -> Self {
        Self(Arc::from(s))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for VehicleId {
    fn default() -> Self {
        Self::new(Self::UNASSIGNED)
    }
}

impl Deref for VehicleId {
    type Target = str;

    #[inline]
    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for VehicleId {
    #[inline]
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for VehicleId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for VehicleId {
    fn from(s: String) -> Self {
        Self(Arc::from(s))
    }
}

impl PartialEq<&str> for VehicleId {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VehicleId({:?})", &*self.0)
    }
}

impl Serialize for VehicleId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for VehicleId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::from)
    }
}
