use std::collections::HashSet;
use std::iter::FusedIterator;

use ts_core::{Error, Offset, PlaneStack};

use crate::{ClassEncoding, PixelClasses};

/// One candidate merge between a pixel and its neighbour at a configured
/// offset. Pixels are row-major flat indices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelEdge<'g> {
    pub a: usize,
    pub b: usize,
    pub offset: usize,
    pub raw: f32,
    pub class_a: &'g [f32],
    pub class_b: &'g [f32],
}

/// Sparse pixel graph implied by class and adjacency planes.
///
/// Edges are not materialized; [`PixelGraph::edges`] walks pixels in
/// row-major order and, per pixel, offsets in configuration order. Targets
/// outside the image are skipped.
#[derive(Debug, Clone)]
pub struct PixelGraph<'a> {
    width: usize,
    height: usize,
    offsets: &'a [Offset],
    adjacency: &'a PlaneStack<f32>,
    classes: PixelClasses,
}

impl<'a> PixelGraph<'a> {
    pub fn new(
        class_probs: &PlaneStack<f32>,
        adjacency: &'a PlaneStack<f32>,
        num_classes: usize,
        offsets: &'a [Offset],
        class_encoding: ClassEncoding,
    ) -> Result<Self, Error> {
        validate_inputs(class_probs, adjacency, num_classes, offsets)?;

        Ok(Self {
            width: class_probs.width(),
            height: class_probs.height(),
            offsets,
            adjacency,
            classes: PixelClasses::from_planes(class_probs, class_encoding),
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn num_pixels(&self) -> usize {
        self.width * self.height
    }

    pub fn offsets(&self) -> &'a [Offset] {
        self.offsets
    }

    pub fn classes(&self) -> &PixelClasses {
        &self.classes
    }

    /// A fresh pass over every in-bounds edge.
    pub fn edges(&self) -> Edges<'_> {
        Edges {
            graph: self,
            pixel: 0,
            offset: 0,
        }
    }

    fn edge_at(&self, pixel: usize, offset: usize) -> Option<PixelEdge<'_>> {
        let (x, y) = (pixel % self.width, pixel / self.width);
        let (nx, ny) = self.offsets[offset].apply(x, y, self.width, self.height)?;
        let b = ny * self.width + nx;
        let raw = *self
            .adjacency
            .at(offset, pixel)
            .expect("validated adjacency plane covers every pixel");

        Some(PixelEdge {
            a: pixel,
            b,
            offset,
            raw,
            class_a: self.classes.pixel(pixel),
            class_b: self.classes.pixel(b),
        })
    }
}

/// Lazy edge sequence returned by [`PixelGraph::edges`].
#[derive(Debug, Clone)]
pub struct Edges<'g> {
    graph: &'g PixelGraph<'g>,
    pixel: usize,
    offset: usize,
}

impl<'g> Iterator for Edges<'g> {
    type Item = PixelEdge<'g>;

    fn next(&mut self) -> Option<Self::Item> {
        let num_pixels = self.graph.num_pixels();
        let num_offsets = self.graph.offsets.len();

        while self.pixel < num_pixels {
            let (pixel, offset) = (self.pixel, self.offset);
            self.offset += 1;
            if self.offset == num_offsets {
                self.offset = 0;
                self.pixel += 1;
            }

            if let Some(edge) = self.graph.edge_at(pixel, offset) {
                return Some(edge);
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let num_offsets = self.graph.offsets.len();
        let remaining = (self.graph.num_pixels() - self.pixel.min(self.graph.num_pixels()))
            * num_offsets
            - self.offset;
        (0, Some(remaining))
    }
}

impl FusedIterator for Edges<'_> {}

fn validate_inputs(
    class_probs: &PlaneStack<f32>,
    adjacency: &PlaneStack<f32>,
    num_classes: usize,
    offsets: &[Offset],
) -> Result<(), Error> {
    if num_classes == 0 {
        return Err(Error::invalid_input("num_classes must be at least 1"));
    }
    if class_probs.channels() != num_classes {
        return Err(Error::invalid_input(format!(
            "class map has {} planes, expected num_classes = {num_classes}",
            class_probs.channels()
        )));
    }
    if offsets.is_empty() {
        return Err(Error::invalid_input("offset list is empty"));
    }
    if adjacency.channels() != offsets.len() {
        return Err(Error::invalid_input(format!(
            "adjacency map has {} planes, expected one per offset ({})",
            adjacency.channels(),
            offsets.len()
        )));
    }
    if (class_probs.height(), class_probs.width()) != (adjacency.height(), adjacency.width()) {
        return Err(Error::invalid_input(format!(
            "class map is {}x{} but adjacency map is {}x{}",
            class_probs.width(),
            class_probs.height(),
            adjacency.width(),
            adjacency.height()
        )));
    }
    if class_probs.plane_len() > u32::MAX as usize {
        return Err(Error::invalid_input(format!(
            "image has {} pixels, more than the supported {}",
            class_probs.plane_len(),
            u32::MAX
        )));
    }

    let mut seen = HashSet::with_capacity(offsets.len());
    for o in offsets {
        if o.is_zero() {
            return Err(Error::invalid_input("offset [0, 0] links a pixel to itself"));
        }
        if !seen.insert(*o) {
            return Err(Error::invalid_input(format!(
                "offset [{}, {}] is listed twice",
                o.dy, o.dx
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use ts_core::{Error, Offset, PlaneStack};

    use super::PixelGraph;
    use crate::ClassEncoding;

    fn uniform(channels: usize, height: usize, width: usize, v: f32) -> PlaneStack<f32> {
        PlaneStack::from_vec(channels, height, width, vec![v; channels * height * width])
            .expect("valid planes")
    }

    #[test]
    fn enumerates_in_bounds_edges_in_scan_order() {
        let classes = uniform(1, 2, 3, 1.0);
        let adjacency =
            PlaneStack::from_vec(2, 2, 3, (0..12).map(|v| v as f32).collect()).expect("valid");
        let offsets = Offset::c4();
        let graph = PixelGraph::new(&classes, &adjacency, 1, &offsets, ClassEncoding::Probability)
            .expect("valid graph");

        let edges: Vec<_> = graph.edges().map(|e| (e.a, e.b, e.offset, e.raw)).collect();
        // 2x3 grid: 4 horizontal + 3 vertical links.
        assert_eq!(
            edges,
            vec![
                (0, 1, 0, 0.0),
                (0, 3, 1, 6.0),
                (1, 2, 0, 1.0),
                (1, 4, 1, 7.0),
                (2, 5, 1, 8.0),
                (3, 4, 0, 3.0),
                (4, 5, 0, 4.0),
            ]
        );

        // A new call restarts the enumeration.
        assert_eq!(graph.edges().count(), 7);
    }

    #[test]
    fn negative_offsets_are_clipped_without_wraparound() {
        let classes = uniform(1, 2, 2, 1.0);
        let adjacency = uniform(1, 2, 2, 0.0);
        let offsets = [Offset::new(-1, 1)];
        let graph = PixelGraph::new(&classes, &adjacency, 1, &offsets, ClassEncoding::Probability)
            .expect("valid graph");

        let edges: Vec<_> = graph.edges().map(|e| (e.a, e.b)).collect();
        assert_eq!(edges, vec![(2, 1)]);
    }

    #[test]
    fn exposes_both_class_vectors() {
        let classes = PlaneStack::from_vec(2, 1, 2, vec![1.0, 0.0, 0.0, 1.0]).expect("valid");
        let adjacency = uniform(1, 1, 2, 5.0);
        let offsets = [Offset::new(0, 1)];
        let graph = PixelGraph::new(&classes, &adjacency, 2, &offsets, ClassEncoding::Probability)
            .expect("valid graph");

        let edge = graph.edges().next().expect("one edge");
        assert_eq!(edge.class_a, &[1.0, 0.0]);
        assert_eq!(edge.class_b, &[0.0, 1.0]);
        assert_eq!(edge.raw, 5.0);
    }

    #[test]
    fn rejects_malformed_inputs() {
        let classes = uniform(2, 3, 3, 0.5);
        let adjacency = uniform(2, 3, 3, 0.0);
        let c4 = Offset::c4();
        fn new(
            classes: &PlaneStack<f32>,
            adjacency: &PlaneStack<f32>,
            num_classes: usize,
            offsets: &[Offset],
        ) -> Result<(), Error> {
            PixelGraph::new(classes, adjacency, num_classes, offsets, ClassEncoding::Probability)
                .map(|_| ())
        }

        assert!(matches!(
            new(&classes, &adjacency, 3, &c4),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            new(&classes, &adjacency, 2, &[]),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            new(&classes, &adjacency, 2, &Offset::c8()),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            new(&classes, &uniform(2, 3, 4, 0.0), 2, &c4),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            new(&classes, &adjacency, 2, &[Offset::new(0, 1), Offset::new(0, 1)]),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            new(&classes, &adjacency, 2, &[Offset::new(0, 0), Offset::new(0, 1)]),
            Err(Error::InvalidInput(_))
        ));
        assert!(new(&classes, &adjacency, 2, &c4).is_ok());
    }
}
