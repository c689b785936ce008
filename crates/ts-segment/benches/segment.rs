use criterion::{Criterion, black_box, criterion_group, criterion_main};
use ts_core::{Offset, PlaneStack};
use ts_graph::SegmenterOptions;
use ts_segment::ObjectSegmenter;

/// Horizontal text-line bands separated by gaps, two classes, C8 offsets.
fn synthetic_page(width: usize, height: usize) -> (PlaneStack<f32>, PlaneStack<f32>, Vec<Offset>) {
    let offsets = Offset::c8();
    let n = width * height;
    let in_line = |y: usize| y % 24 < 16;

    let mut classes = vec![0.0f32; 2 * n];
    for y in 0..height {
        for x in 0..width {
            let p = y * width + x;
            let text = if in_line(y) { 0.9 } else { 0.1 };
            classes[p] = 1.0 - text;
            classes[n + p] = text;
        }
    }

    let mut adjacency = vec![0.0f32; offsets.len() * n];
    for (k, o) in offsets.iter().enumerate() {
        for y in 0..height {
            for x in 0..width {
                let same = match o.apply(x, y, width, height) {
                    Some((_, ny)) => in_line(y) == in_line(ny),
                    None => false,
                };
                adjacency[k * n + y * width + x] = if same { 4.0 } else { -4.0 };
            }
        }
    }

    (
        PlaneStack::from_vec(2, height, width, classes).expect("valid class planes"),
        PlaneStack::from_vec(offsets.len(), height, width, adjacency)
            .expect("valid adjacency planes"),
        offsets,
    )
}

fn bench_segment_page(c: &mut Criterion) {
    let (classes, adjacency, offsets) = synthetic_page(512, 384);
    let options = SegmenterOptions::default();

    c.bench_function("ts_segment_512x384_c8", |b| {
        b.iter(|| {
            let seg = ObjectSegmenter::new(
                black_box(&classes),
                black_box(&adjacency),
                2,
                &offsets,
                options.clone(),
            )
            .expect("valid inputs");
            let (mask, object_classes) = seg.run_segmentation();
            black_box((mask.len(), object_classes.len()));
        });
    });
}

criterion_group!(benches, bench_segment_page);
criterion_main!(benches);
