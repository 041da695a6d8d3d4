//! Nearest-reference classification of color distributions
//!
//! A block is compared against the background and object reference sets and
//! takes the label of the set holding its closest member.
//!
//! Ties go to the background: the object label is only chosen when its
//! minimum distance is strictly smaller. An empty reference set counts as
//! infinitely far away, so with no object references every block is
//! background, and with both sets empty every block is background too.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::histogram::{ColorDistribution, ReferenceSet};

/// Class assigned to a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Background,
    Object,
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Background => write!(f, "background"),
            Label::Object => write!(f, "object"),
        }
    }
}

/// Classification outcome with the distances that decided it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub label: Label,
    /// Minimum distance to the background set, `+inf` if it is empty
    pub background_distance: f32,
    /// Minimum distance to the object set, `+inf` if it is empty
    pub object_distance: f32,
}

/// Label a block distribution by its nearest reference set.
///
/// Background wins ties; see the module documentation.
pub fn classify(
    block: &ColorDistribution,
    background: &ReferenceSet,
    object: &ReferenceSet,
) -> Label {
    classify_detailed(block, background, object).label
}

/// Like [`classify`], also reporting both minimum distances.
pub fn classify_detailed(
    block: &ColorDistribution,
    background: &ReferenceSet,
    object: &ReferenceSet,
) -> Classification {
    let background_distance = background.minimum_distance(block).unwrap_or(f32::INFINITY);
    let object_distance = object.minimum_distance(block).unwrap_or(f32::INFINITY);

    // Strict comparison: equal distances keep the background label
    let label = if object_distance < background_distance {
        Label::Object
    } else {
        Label::Background
    };

    Classification {
        label,
        background_distance,
        object_distance,
    }
}
