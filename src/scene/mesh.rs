use crate::animation::MorphWeightData;

/// Upper bound on morph targets a single mesh can expose.
pub const MAX_MORPH_TARGETS: usize = 32;

/// Named blend-shape influences of one mesh.
///
/// Every write goes through [`set`](Self::set) or
/// [`set_from_weights`](Self::set_from_weights), which clamp into `[0, 1]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MorphTargets {
    names: Vec<String>,
    influences: Vec<f32>,
}

impl MorphTargets {
    /// Creates influences for `count` targets. Missing names are filled in as
    /// `target_<index>`; surplus names are dropped.
    #[must_use]
    pub fn new(count: usize, names: &[String], defaults: Option<&[f32]>) -> Self {
        let count = count.min(MAX_MORPH_TARGETS);
        let names = (0..count)
            .map(|i| names.get(i).cloned().unwrap_or_else(|| format!("target_{i}")))
            .collect();
        let influences = (0..count)
            .map(|i| {
                defaults
                    .and_then(|d| d.get(i).copied())
                    .unwrap_or(0.0)
                    .clamp(0.0, 1.0)
            })
            .collect();
        Self { names, influences }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.influences.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.influences.is_empty()
    }

    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    #[must_use]
    pub fn influences(&self) -> &[f32] {
        &self.influences
    }

    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<f32> {
        self.influences.get(index).copied()
    }

    /// Writes one influence, clamped into `[0, 1]`. Returns the stored value,
    /// or `None` when the index is out of range.
    pub fn set(&mut self, index: usize, value: f32) -> Option<f32> {
        let slot = self.influences.get_mut(index)?;
        *slot = if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) };
        Some(*slot)
    }

    /// Copies animated weights into the influences (clamped).
    pub fn set_from_weights(&mut self, weights: &MorphWeightData) {
        for (slot, w) in self.influences.iter_mut().zip(weights.weights.iter()) {
            *slot = if w.is_nan() { 0.0 } else { w.clamp(0.0, 1.0) };
        }
    }

    /// Packs the current influences into a fixed-size weight block.
    #[must_use]
    pub fn to_weights(&self) -> MorphWeightData {
        let mut data = MorphWeightData::default();
        data.weights[..self.influences.len()].copy_from_slice(&self.influences);
        data
    }
}

/// A mesh instance. Geometry lives with the render backend; the viewer only
/// tracks identity and morph-target state.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub name: String,
    pub primitive_count: usize,
    pub morph_targets: MorphTargets,
    pub visible: bool,
}

impl Mesh {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            primitive_count: 0,
            morph_targets: MorphTargets::default(),
            visible: true,
        }
    }

    #[must_use]
    pub fn with_morph_targets(mut self, morph_targets: MorphTargets) -> Self {
        self.morph_targets = morph_targets;
        self
    }

    #[inline]
    #[must_use]
    pub fn has_morph_targets(&self) -> bool {
        !self.morph_targets.is_empty()
    }
}
