//! Region content capabilities.
//!
//! A region package can carry several kinds of content. The base map is
//! always required; routing data depends on it. [`CapabilitySet`] is a small
//! named set with those dependency rules built in, so callers never have to
//! combine raw flags by hand.
//!
//! # Example
//!
//! ```
//! use mapkeeper::{Capability, CapabilitySet};
//!
//! // Downloads always include the base map.
//! let requested = CapabilitySet::from(Capability::RoutingData).for_download();
//! assert!(requested.contains(Capability::BaseMap));
//!
//! // Deleting the base map takes routing with it.
//! let removed = CapabilitySet::base_map().for_delete();
//! assert_eq!(removed, CapabilitySet::all());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single kind of content a region package can provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Renderable map data. Every installed region has it.
    BaseMap,
    /// Car routing graph for the region.
    RoutingData,
}

impl Capability {
    /// All capabilities, prerequisites first.
    pub const ALL: [Capability; 2] = [Capability::BaseMap, Capability::RoutingData];

    /// The capability this one cannot exist without, if any.
    pub fn prerequisite(self) -> Option<Capability> {
        match self {
            Self::BaseMap => None,
            Self::RoutingData => Some(Self::BaseMap),
        }
    }

    /// Short lowercase name used in logs and CLI output.
    pub fn name(self) -> &'static str {
        match self {
            Self::BaseMap => "map",
            Self::RoutingData => "routing",
        }
    }

    fn bit(self) -> u8 {
        match self {
            Self::BaseMap => 0b01,
            Self::RoutingData => 0b10,
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A set of [`Capability`] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Capability>", into = "Vec<Capability>")]
pub struct CapabilitySet {
    bits: u8,
}

impl CapabilitySet {
    /// The empty set.
    pub const fn empty() -> Self {
        Self { bits: 0 }
    }

    /// Just the base map.
    pub fn base_map() -> Self {
        Self::from(Capability::BaseMap)
    }

    /// Every capability.
    pub fn all() -> Self {
        Capability::ALL.into_iter().collect()
    }

    /// Returns `true` if the set has no capabilities.
    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Returns `true` if `capability` is in the set.
    pub fn contains(&self, capability: Capability) -> bool {
        self.bits & capability.bit() != 0
    }

    /// Returns a copy of the set with `capability` added.
    pub fn with(mut self, capability: Capability) -> Self {
        self.bits |= capability.bit();
        self
    }

    /// Returns a copy of the set with `capability` removed.
    pub fn without(mut self, capability: Capability) -> Self {
        self.bits &= !capability.bit();
        self
    }

    /// Set union.
    pub fn union(self, other: Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    /// Capabilities in `self` that are not in `other`.
    pub fn difference(self, other: Self) -> Self {
        Self {
            bits: self.bits & !other.bits,
        }
    }

    /// Iterate over the capabilities in the set, prerequisites first.
    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        Capability::ALL.into_iter().filter(|c| self.contains(*c))
    }

    /// Normalize a set for a download request.
    ///
    /// Every prerequisite of a requested capability is added, and the base
    /// map is always included.
    pub fn for_download(self) -> Self {
        let mut normalized = self.with(Capability::BaseMap);
        for capability in self.iter() {
            if let Some(required) = capability.prerequisite() {
                normalized = normalized.with(required);
            }
        }
        normalized
    }

    /// Normalize a set for a delete request.
    ///
    /// Removing a capability removes everything that depends on it.
    pub fn for_delete(self) -> Self {
        let mut normalized = self;
        for dependent in Capability::ALL {
            if let Some(required) = dependent.prerequisite() {
                if normalized.contains(required) {
                    normalized = normalized.with(dependent);
                }
            }
        }
        normalized
    }

    /// Returns `true` if every capability's prerequisite is also present.
    pub fn is_consistent(&self) -> bool {
        self.iter()
            .all(|c| c.prerequisite().map_or(true, |p| self.contains(p)))
    }
}

impl From<Capability> for CapabilitySet {
    fn from(capability: Capability) -> Self {
        Self::empty().with(capability)
    }
}

impl FromIterator<Capability> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), Self::with)
    }
}

impl From<Vec<Capability>> for CapabilitySet {
    fn from(capabilities: Vec<Capability>) -> Self {
        capabilities.into_iter().collect()
    }
}

impl From<CapabilitySet> for Vec<Capability> {
    fn from(set: CapabilitySet) -> Self {
        set.iter().collect()
    }
}

impl fmt::Display for CapabilitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        let names: Vec<&str> = self.iter().map(Capability::name).collect();
        f.write_str(&names.join("+"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_always_includes_base_map() {
        assert_eq!(CapabilitySet::empty().for_download(), CapabilitySet::base_map());
        assert_eq!(
            CapabilitySet::from(Capability::RoutingData).for_download(),
            CapabilitySet::all()
        );
        assert_eq!(CapabilitySet::all().for_download(), CapabilitySet::all());
    }

    #[test]
    fn test_delete_base_map_implies_routing() {
        assert_eq!(CapabilitySet::base_map().for_delete(), CapabilitySet::all());

        // Routing alone can go without touching the base map.
        let routing = CapabilitySet::from(Capability::RoutingData);
        assert_eq!(routing.for_delete(), routing);
    }

    #[test]
    fn test_consistency() {
        assert!(CapabilitySet::empty().is_consistent());
        assert!(CapabilitySet::base_map().is_consistent());
        assert!(CapabilitySet::all().is_consistent());
        assert!(!CapabilitySet::from(Capability::RoutingData).is_consistent());
    }

    #[test]
    fn test_set_operations() {
        let all = CapabilitySet::all();
        assert_eq!(all.without(Capability::RoutingData), CapabilitySet::base_map());
        assert_eq!(
            all.difference(CapabilitySet::base_map()),
            CapabilitySet::from(Capability::RoutingData)
        );
        assert_eq!(
            CapabilitySet::base_map().union(Capability::RoutingData.into()),
            all
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(CapabilitySet::empty().to_string(), "none");
        assert_eq!(CapabilitySet::base_map().to_string(), "map");
        assert_eq!(CapabilitySet::all().to_string(), "map+routing");
    }

    #[test]
    fn test_serde_as_name_list() {
        let json = serde_json::to_string(&CapabilitySet::all()).unwrap();
        assert_eq!(json, r#"["base_map","routing_data"]"#);

        let parsed: CapabilitySet = serde_json::from_str(r#"["base_map"]"#).unwrap();
        assert_eq!(parsed, CapabilitySet::base_map());
    }
}
