use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Plot feature a user can request.
///
/// Declaration order is the chart order: `Ord` follows it, so every
/// ordered collection of features iterates Open, Close, Range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Feature {
    Open,
    Close,
    Range,
}

impl Feature {
    pub const ALL: [Self; 3] = [Self::Open, Self::Close, Self::Range];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::Close => "Close",
            Self::Range => "Range",
        }
    }
}

impl Display for Feature {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Feature {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "close" => Ok(Self::Close),
            "range" => Ok(Self::Range),
            _ => Err(ValidationError::InvalidFeature {
                value: value.to_owned(),
            }),
        }
    }
}

/// Ordered, duplicate-free selection of plot features.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureSet(BTreeSet<Feature>);

impl FeatureSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn all() -> Self {
        Feature::ALL.into_iter().collect()
    }

    pub fn insert(&mut self, feature: Feature) -> bool {
        self.0.insert(feature)
    }

    pub fn contains(&self, feature: Feature) -> bool {
        self.0.contains(&feature)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Features in chart order, independent of insertion order.
    pub fn iter(&self) -> impl Iterator<Item = Feature> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<Feature> for FeatureSet {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
