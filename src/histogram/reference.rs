//! Reference sets: the color distributions that define one class

use super::distribution::ColorDistribution;

/// Ordered collection of reference distributions for one class
#[derive(Debug, Clone, Default)]
pub struct ReferenceSet {
    members: Vec<ColorDistribution>,
}

impl ReferenceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard every stored distribution
    pub fn clear(&mut self) {
        self.members.clear();
    }

    /// Add one finished distribution
    pub fn append(&mut self, distribution: ColorDistribution) {
        self.members.push(distribution);
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ColorDistribution> {
        self.members.iter()
    }

    /// Smallest distance between `query` and any member.
    ///
    /// Returns `None` when the set is empty: an empty class has no distance at
    /// all, which is different from being far away.
    pub fn minimum_distance(&self, query: &ColorDistribution) -> Option<f32> {
        self.members
            .iter()
            .map(|member| query.distance(member))
            .reduce(f32::min)
    }
}

impl FromIterator<ColorDistribution> for ReferenceSet {
    fn from_iter<T: IntoIterator<Item = ColorDistribution>>(iter: T) -> Self {
        Self {
            members: iter.into_iter().collect(),
        }
    }
}

impl Extend<ColorDistribution> for ReferenceSet {
    fn extend<T: IntoIterator<Item = ColorDistribution>>(&mut self, iter: T) {
        self.members.extend(iter);
    }
}

impl<'a> IntoIterator for &'a ReferenceSet {
    type Item = &'a ColorDistribution;
    type IntoIter = std::slice::Iter<'a, ColorDistribution>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}
