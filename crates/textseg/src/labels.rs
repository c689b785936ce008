use std::io::{self, Write};

use ts_geom::Quad;

use crate::pipeline::TextRegion;

/// `x1,y1,x2,y2,x3,y3,x4,y4` with corners rounded to integers, clockwise from
/// the top-left one.
pub fn format_label_line(quad: &Quad) -> String {
    quad.rounded()
        .iter()
        .map(|(x, y)| format!("{x},{y}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Writes one line per region in ICDAR 2015 result format.
pub fn write_labels<W: Write>(mut out: W, regions: &[TextRegion]) -> io::Result<()> {
    for region in regions {
        writeln!(out, "{}", format_label_line(&region.quad))?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use ts_core::Point2f;
    use ts_geom::Quad;

    use super::{format_label_line, write_labels};
    use crate::pipeline::TextRegion;

    fn quad(points: [(f32, f32); 4]) -> Quad {
        Quad {
            points: points.map(|(x, y)| Point2f::new(x, y)),
        }
    }

    #[test]
    fn rounds_corners_into_one_line() {
        let q = quad([(10.4, 5.6), (40.5, 5.0), (40.0, 20.49), (9.6, 21.0)]);
        assert_eq!(format_label_line(&q), "10,6,41,5,40,20,10,21");
    }

    #[test]
    fn one_line_per_region() {
        let regions = [
            TextRegion {
                id: 1,
                class: 1,
                quad: quad([(0.0, 0.0), (8.0, 0.0), (8.0, 2.0), (0.0, 2.0)]),
            },
            TextRegion {
                id: 2,
                class: 1,
                quad: quad([(1.0, 4.0), (3.0, 4.0), (3.0, 5.0), (1.0, 5.0)]),
            },
        ];

        let mut buf = Vec::new();
        write_labels(&mut buf, &regions).expect("write to vec");
        assert_eq!(
            String::from_utf8(buf).expect("utf8"),
            "0,0,8,0,8,2,0,2\n1,4,3,4,3,5,1,5\n"
        );

        let mut empty = Vec::new();
        write_labels(&mut empty, &[]).expect("write to vec");
        assert!(empty.is_empty());
    }
}
