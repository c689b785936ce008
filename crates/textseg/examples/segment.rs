//! Example: segment recorded predictions into text-region label files.
//!
//! Each `*.json` file under `--predictions` holds a serialized `Prediction`
//! (class and adjacency planes) for one page. Pages are sharded across jobs
//! with `--job/--num-jobs`; pages whose label file already exists are skipped.
//!
//! Outputs, for page `<stem>`:
//!   <dir>/lbl/res_<stem>.txt   one `x1,y1,...,x4,y4` line per object
//!   <dir>/img/res_<stem>.png   colour overlay (only with `--images`)
//!
//! Run from the workspace root:
//!   cargo run -p textseg --example segment -- --help

use std::fs;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::Parser;
use image::{Rgb, RgbImage};
use textseg::{CoreConfig, LabelMask, PageSegmenter, PlaneStack, Prediction, Predictor, write_labels};
use tracing_subscriber::EnvFilter;

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(about = "Segment recorded class/adjacency predictions into text regions")]
struct Args {
    /// Core configuration JSON (classes, colours, offsets, segmenter block)
    #[arg(long)]
    config: PathBuf,

    /// Directory of prediction JSON files, one per page
    #[arg(long)]
    predictions: PathBuf,

    /// Directory of page images named `<stem>.png` or `<stem>.jpg`
    #[arg(long)]
    images: Option<PathBuf>,

    /// Output directory for `lbl/` and `img/`
    #[arg(long)]
    dir: PathBuf,

    /// Scale on adjacency scores (default: 1 / number of offsets)
    #[arg(long)]
    object_merge_factor: Option<f32>,

    /// Bias for same/different decisions; larger values split more
    #[arg(long)]
    same_different_bias: Option<f32>,

    /// Added to every merge score
    #[arg(long)]
    merge_logprob_bias: Option<f32>,

    /// Merges scoring at or below this are pruned
    #[arg(long)]
    prune_threshold: Option<f32>,

    #[arg(long, default_value_t = 0)]
    job: usize,

    #[arg(long, default_value_t = 1)]
    num_jobs: usize,
}

// ── Predictor ─────────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
#[error("no prediction recorded for this page")]
struct NothingRecorded;

/// Replays predictions read from disk.
#[derive(Default)]
struct RecordedPredictor {
    pending: Option<Prediction>,
}

impl RecordedPredictor {
    fn record(&mut self, prediction: Prediction) {
        self.pending = Some(prediction);
    }
}

impl Predictor for RecordedPredictor {
    type Error = NothingRecorded;

    fn predict(&mut self, _page: &PlaneStack<f32>) -> Result<Prediction, Self::Error> {
        self.pending.take().ok_or(NothingRecorded)
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn prediction_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("listing {}", dir.display()))? {
        let path = entry?.path();
        if path.extension().is_some_and(|e| e == "json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn find_image(dir: &Path, stem: &str) -> Option<PathBuf> {
    ["png", "jpg", "jpeg"]
        .iter()
        .map(|ext| dir.join(format!("{stem}.{ext}")))
        .find(|p| p.is_file())
}

fn page_from_image(img: &RgbImage, num_colors: usize) -> Result<PlaneStack<f32>> {
    if num_colors != 1 && num_colors != 3 {
        bail!("unsupported num_colors={num_colors} for image input");
    }

    let (w, h) = (img.width() as usize, img.height() as usize);
    let mut data = vec![0.0f32; num_colors * w * h];
    for (x, y, px) in img.enumerate_pixels() {
        let p = y as usize * w + x as usize;
        let [r, g, b] = px.0.map(|v| v as f32 / 255.0);
        if num_colors == 1 {
            data[p] = 0.299 * r + 0.587 * g + 0.114 * b;
        } else {
            data[p] = r;
            data[w * h + p] = g;
            data[2 * w * h + p] = b;
        }
    }
    PlaneStack::from_vec(num_colors, h, w, data).context("building page planes")
}

fn blank_page(prediction: &Prediction, num_colors: usize) -> Result<PlaneStack<f32>> {
    let (w, h) = (prediction.class_probs.width(), prediction.class_probs.height());
    PlaneStack::from_vec(num_colors, h, w, vec![0.0; num_colors * w * h])
        .context("building blank page")
}

fn object_color(id: u32) -> [u8; 3] {
    let h = id.wrapping_mul(2_654_435_761);
    [(h >> 16) as u8 | 0x40, (h >> 8) as u8 | 0x40, h as u8 | 0x40]
}

/// Blends each object's colour over the page; background is left untouched.
fn overlay(img: &RgbImage, mask: &LabelMask) -> RgbImage {
    RgbImage::from_fn(img.width(), img.height(), |x, y| {
        let base = img.get_pixel(x, y).0;
        match mask.get(x as usize, y as usize) {
            Some(&id) if id > 0 => {
                let c = object_color(id);
                Rgb([0usize, 1, 2].map(|k| ((u16::from(base[k]) + u16::from(c[k])) / 2) as u8))
            }
            _ => Rgb(base),
        }
    })
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    if args.num_jobs == 0 || args.job >= args.num_jobs {
        bail!("--job must be in 0..{} (got {})", args.num_jobs, args.job);
    }

    let mut config = CoreConfig::from_path(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    let opts = &mut config.segmenter;
    if let Some(v) = args.object_merge_factor {
        opts.object_merge_factor = Some(v);
    }
    if let Some(v) = args.same_different_bias {
        opts.same_different_bias = v;
    }
    if let Some(v) = args.merge_logprob_bias {
        opts.merge_logprob_bias = v;
    }
    if let Some(v) = args.prune_threshold {
        opts.prune_threshold = v;
    }
    tracing::info!(offsets = ?config.offsets, options = ?config.segmenter, "using core configuration");

    let num_colors = config.num_colors;
    let mut pipeline = PageSegmenter::new(RecordedPredictor::default(), config)
        .context("validating configuration")?;

    let lbl_dir = args.dir.join("lbl");
    let img_dir = args.dir.join("img");
    fs::create_dir_all(&lbl_dir).with_context(|| format!("creating {}", lbl_dir.display()))?;
    if args.images.is_some() {
        fs::create_dir_all(&img_dir).with_context(|| format!("creating {}", img_dir.display()))?;
    }

    let files = prediction_files(&args.predictions)?;
    let shard: Vec<&PathBuf> = files
        .iter()
        .enumerate()
        .filter(|(i, _)| i % args.num_jobs == args.job)
        .map(|(_, f)| f)
        .collect();
    tracing::info!(total = files.len(), shard = shard.len(), job = args.job, "pages to segment");

    let total_start = Instant::now();
    let mut done = 0usize;
    for path in shard {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .with_context(|| format!("no file stem in {}", path.display()))?;
        let id = format!("res_{stem}");
        let lbl_path = lbl_dir.join(format!("{id}.txt"));
        if lbl_path.exists() {
            tracing::debug!(%id, "label file exists, skipping");
            continue;
        }

        let file = fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
        let prediction: Prediction = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("parsing {}", path.display()))?;

        let image = match args.images.as_deref().and_then(|dir| find_image(dir, &stem)) {
            Some(p) => Some(
                image::open(&p)
                    .with_context(|| format!("decoding {}", p.display()))?
                    .to_rgb8(),
            ),
            None => None,
        };
        let page = match &image {
            Some(img) => page_from_image(img, num_colors)?,
            None => blank_page(&prediction, num_colors)?,
        };

        let t0 = Instant::now();
        pipeline.predictor_mut().record(prediction);
        let result = pipeline
            .segment_page(&page)
            .with_context(|| format!("segmenting {stem}"))?;
        let elapsed_ms = t0.elapsed().as_secs_f64() * 1e3;

        let out = fs::File::create(&lbl_path)
            .with_context(|| format!("creating {}", lbl_path.display()))?;
        write_labels(out, &result.regions)
            .with_context(|| format!("writing {}", lbl_path.display()))?;

        if let Some(img) = &image {
            let img_path = img_dir.join(format!("{id}.png"));
            overlay(img, &result.mask)
                .save(&img_path)
                .with_context(|| format!("writing {}", img_path.display()))?;
        }

        tracing::info!(%id, regions = result.regions.len(), elapsed_ms, "page done");
        done += 1;
    }

    let total_ms = total_start.elapsed().as_secs_f64() * 1e3;
    tracing::info!(pages = done, total_ms, "segmentation finished");
    Ok(())
}
