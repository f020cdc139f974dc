use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Builder;
use image::{Rgb, RgbImage};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn, LevelFilter};
use self_assembly_common::{BackupFormat, CheckStrategy, LatticeBackup, Orientation};
use self_assembly_engine::{ClusterDetector, Lattice, LatticeError, SymbolMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Command-line arguments for the visualizer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Backup file (.json, .bin, .msgpack) or a directory of backups
    #[arg(short, long)]
    input: PathBuf,

    /// Directory for the PNG images (defaults to the input's directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Side length in pixels of one lattice cell
    #[arg(long, default_value_t = 4)]
    cell_pixels: u32,

    /// Print the lattice as text instead of writing images
    #[arg(long)]
    text: bool,

    /// Disable colors in text mode
    #[arg(long)]
    monochrome: bool,

    /// Also run a self-assembly check on every backup
    #[arg(long)]
    check: Option<CheckStrategy>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

const EMPTY_COLOR: Rgb<u8> = Rgb([255, 255, 255]);
const HORIZONTAL_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const VERTICAL_COLOR: Rgb<u8> = Rgb([0, 0, 255]);

fn orientation_color(orientation: Option<Orientation>) -> Rgb<u8> {
    match orientation {
        None => EMPTY_COLOR,
        Some(Orientation::Horizontal) => HORIZONTAL_COLOR,
        Some(Orientation::Vertical) => VERTICAL_COLOR,
    }
}

/// Renders every cell as a `cell_pixels` square block.
fn render_image<R>(lattice: &Lattice<R>, cell_pixels: u32) -> Result<RgbImage> {
    // Both the side and the RGB buffer length must fit.
    let side = (lattice.size() as u32)
        .checked_mul(cell_pixels)
        .filter(|&side| {
            (side as usize)
                .checked_mul(side as usize)
                .and_then(|pixels| pixels.checked_mul(3))
                .is_some()
        })
        .with_context(|| {
            format!(
                "A {0}x{0} lattice at {1} pixels per cell is too large for an image",
                lattice.size(),
                cell_pixels
            )
        })?;
    let mut image = RgbImage::from_pixel(side, side, EMPTY_COLOR);

    for y in 0..lattice.size() {
        for x in 0..lattice.size() {
            let color = orientation_color(lattice.get_cell(x, y).map(|p| p.orientation()));
            if color == EMPTY_COLOR {
                continue;
            }
            let (px, py) = (x as u32 * cell_pixels, y as u32 * cell_pixels);
            for dy in 0..cell_pixels {
                for dx in 0..cell_pixels {
                    image.put_pixel(px + dx, py + dy, color);
                }
            }
        }
    }
    Ok(image)
}

/// Errors that point at a bug in the engine rather than at a bad input file.
fn is_internal_failure(error: &anyhow::Error) -> bool {
    matches!(
        error.downcast_ref::<LatticeError>(),
        Some(LatticeError::LabelingInvariant { .. } | LatticeError::InvariantViolation(_))
    )
}

/// Backup files to convert: the input itself, or every backup in the input directory.
fn collect_inputs(input: &Path) -> Result<Vec<PathBuf>> {
    if !input.is_dir() {
        return Ok(vec![input.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(input)
        .with_context(|| format!("Failed to read input directory '{}'", input.display()))?
    {
        let path = entry?.path();
        if path.is_file() && BackupFormat::from_path(&path).is_some() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Loads one backup and writes its image (or prints it) as requested.
fn process_backup(
    path: &Path,
    args: &Args,
    output_dir: &Path,
    detector: &mut ClusterDetector,
) -> Result<Option<PathBuf>> {
    let backup = LatticeBackup::load(path)?;
    let lattice = Lattice::restore(&backup)
        .with_context(|| format!("Backup '{}' is not a valid lattice", path.display()))?;
    debug!(
        "Loaded {}: {} particles at diffusion step {}",
        path.display(),
        lattice.particle_count(),
        lattice.diffusion_steps()
    );

    if let Some(strategy) = args.check {
        let report = detector.analyze(&lattice)?;
        info!(
            "{} | step {} | horizontal {:?} | vertical {:?} | self-assembled ({}): {}",
            backup.file_stem(),
            lattice.diffusion_steps(),
            report.horizontal.ratio(),
            report.vertical.ratio(),
            strategy,
            report.is_self_assembled(strategy.threshold())
        );
    }

    if args.text {
        let symbols = if args.monochrome {
            SymbolMap::default()
        } else {
            SymbolMap::colored()
        };
        println!("{} (step {}):", backup.file_stem(), lattice.diffusion_steps());
        println!("{}", lattice.visualization(&symbols));
        return Ok(None);
    }

    let image_path = output_dir.join(format!("{}.png", backup.file_stem()));
    render_image(&lattice, args.cell_pixels)?
        .save(&image_path)
        .with_context(|| format!("Failed to write image '{}'", image_path.display()))?;
    Ok(Some(image_path))
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    let level = if args.verbose { LevelFilter::Debug } else { LevelFilter::Info };
    Builder::from_default_env().filter(None, level).init();

    if args.cell_pixels == 0 {
        anyhow::bail!("--cell-pixels must be greater than 0.");
    }

    let inputs = collect_inputs(&args.input)?;
    if inputs.is_empty() {
        warn!("No backup files found in '{}'.", args.input.display());
        return Ok(());
    }
    info!("Found {} backup file(s) to process.", inputs.len());

    let output_dir = match &args.output_dir {
        Some(dir) => dir.clone(),
        None if args.input.is_dir() => args.input.clone(),
        None => args
            .input
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
    };
    if !args.text {
        fs::create_dir_all(&output_dir)
            .with_context(|| format!("Failed to create output directory '{}'", output_dir.display()))?;
    }

    let progress_bar = if inputs.len() > 1 && !args.text {
        let bar = ProgressBar::new(inputs.len() as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} images ({percent}%) [{eta}]")?
                .progress_chars("#>-"),
        );
        Some(bar)
    } else {
        None
    };

    let start_time = Instant::now();
    let mut detector = ClusterDetector::new();
    let mut written = 0usize;
    let mut failed = 0usize;
    for path in &inputs {
        match process_backup(path, &args, &output_dir, &mut detector) {
            Ok(Some(image_path)) => {
                written += 1;
                debug!("Wrote {}", image_path.display());
            }
            Ok(None) => {}
            Err(e) if is_internal_failure(&e) => {
                if let Some(bar) = &progress_bar {
                    bar.abandon();
                }
                error!("Aborting on '{}': {:#}", path.display(), e);
                return Err(e);
            }
            Err(e) => {
                failed += 1;
                error!("Skipping '{}': {:#}", path.display(), e);
            }
        }
        if let Some(bar) = &progress_bar {
            bar.inc(1);
        }
    }
    if let Some(bar) = progress_bar {
        bar.finish_with_message("done");
    }

    info!(
        "Processed {} backup(s) in {:.2} s: {} image(s) written to '{}', {} failed.",
        inputs.len(),
        start_time.elapsed().as_secs_f64(),
        written,
        output_dir.display(),
        failed
    );
    if failed == inputs.len() {
        anyhow::bail!("None of the backups could be processed.");
    }
    Ok(())
}
