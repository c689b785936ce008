use ts_core::Image;

/// Per-pixel object ids: `0` is background, `1..=K` are objects.
pub type LabelMask = Image<u32>;

/// Voted class of each object id in `1..=K`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectClasses {
    classes: Vec<usize>,
}

impl ObjectClasses {
    pub fn new(classes: Vec<usize>) -> Self {
        Self { classes }
    }

    /// Number of objects `K`.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn class_of(&self, id: u32) -> Option<usize> {
        let idx = (id as usize).checked_sub(1)?;
        self.classes.get(idx).copied()
    }

    /// Classes in id order; entry `i` belongs to object `i + 1`.
    pub fn as_slice(&self) -> &[usize] {
        &self.classes
    }

    /// `(id, class)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, usize)> + '_ {
        self.classes
            .iter()
            .enumerate()
            .map(|(i, &class)| (i as u32 + 1, class))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SegmentationStats {
    pub num_pixels: usize,
    /// In-bounds edges produced by the pixel graph.
    pub edges: usize,
    /// Edges at or below the prune threshold.
    pub pruned: usize,
    /// Edges whose endpoints already shared a component.
    pub redundant: usize,
    pub merges: usize,
    pub objects: usize,
    pub background_pixels: usize,
}

#[cfg(test)]
mod tests {
    use super::ObjectClasses;

    #[test]
    fn ids_are_one_based() {
        let classes = ObjectClasses::new(vec![2, 0, 1]);

        assert_eq!(classes.len(), 3);
        assert_eq!(classes.class_of(0), None);
        assert_eq!(classes.class_of(1), Some(2));
        assert_eq!(classes.class_of(3), Some(1));
        assert_eq!(classes.class_of(4), None);
        assert_eq!(
            classes.iter().collect::<Vec<_>>(),
            vec![(1, 2), (2, 0), (3, 1)]
        );
    }
}
