use serde::{Deserialize, Serialize};

/// Displacement from a pixel to the neighbour an adjacency plane scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[isize; 2]", into = "[isize; 2]")]
pub struct Offset {
    pub dy: isize,
    pub dx: isize,
}

impl Offset {
    pub const fn new(dy: isize, dx: isize) -> Self {
        Self { dy, dx }
    }

    pub fn is_zero(&self) -> bool {
        self.dy == 0 && self.dx == 0
    }

    /// Target of `(x, y) + self`, or `None` outside a `width x height` grid.
    pub fn apply(&self, x: usize, y: usize, width: usize, height: usize) -> Option<(usize, usize)> {
        let nx = x.checked_add_signed(self.dx)?;
        let ny = y.checked_add_signed(self.dy)?;
        (nx < width && ny < height).then_some((nx, ny))
    }

    /// Right and down neighbours.
    pub fn c4() -> Vec<Offset> {
        vec![Offset::new(0, 1), Offset::new(1, 0)]
    }

    /// Right, down and both forward diagonals.
    pub fn c8() -> Vec<Offset> {
        vec![
            Offset::new(0, 1),
            Offset::new(1, 0),
            Offset::new(1, 1),
            Offset::new(-1, 1),
        ]
    }
}

impl From<[isize; 2]> for Offset {
    fn from([dy, dx]: [isize; 2]) -> Self {
        Self { dy, dx }
    }
}

impl From<Offset> for [isize; 2] {
    fn from(o: Offset) -> Self {
        [o.dy, o.dx]
    }
}

#[cfg(test)]
mod tests {
    use super::Offset;

    #[test]
    fn apply_skips_out_of_bounds_without_wraparound() {
        let right = Offset::new(0, 1);
        assert_eq!(right.apply(0, 0, 3, 2), Some((1, 0)));
        assert_eq!(right.apply(2, 0, 3, 2), None);

        let up_right = Offset::new(-1, 1);
        assert_eq!(up_right.apply(0, 1, 3, 2), Some((1, 0)));
        assert_eq!(up_right.apply(0, 0, 3, 2), None);

        let far = Offset::new(0, -4);
        assert_eq!(far.apply(3, 0, 8, 1), None);
    }

    #[test]
    fn serializes_as_pair() {
        let offsets: Vec<Offset> = serde_json::from_str("[[0,1],[1,0],[-1,1]]").expect("valid");
        assert_eq!(offsets[2], Offset::new(-1, 1));
        assert_eq!(
            serde_json::to_string(&Offset::new(2, -3)).expect("serializes"),
            "[2,-3]"
        );
        assert_eq!(Offset::c8().len(), 4);
        assert!(Offset::new(0, 0).is_zero());
    }
}
