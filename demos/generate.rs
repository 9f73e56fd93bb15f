use anyhow::Result;
use clap::Parser;
use ndarray::Array2;
use particle_collapse::{Generator, GeneratorConfig, Rgb};
use std::path::PathBuf;

/// Grid generation configuration.
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// YAML generator config; flags below override its values.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// YAML particle catalog.
    #[arg(short = 'k', long)]
    catalog: Option<PathBuf>,

    #[arg(short = 'W', long)]
    width: Option<usize>,

    #[arg(short = 'H', long)]
    height: Option<usize>,

    #[arg(short, long)]
    seed: Option<u64>,

    #[arg(short, long)]
    parallel: bool,

    #[clap(short, long)]
    verbose: bool,
}

fn print_pixels(pixels: &Array2<Option<Rgb>>) {
    // Row 0 is the bottom of the scene
    for y in (0..pixels.nrows()).rev() {
        for pixel in pixels.row(y) {
            match pixel {
                Some(Rgb(r, g, b)) => print!("\x1b[48;2;{r};{g};{b}m  "),
                None => print!("\x1b[0m??"),
            }
        }
        println!("\x1b[0m");
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => GeneratorConfig::load(path)?,
        None => GeneratorConfig::default(),
    };
    if let Some(catalog) = args.catalog {
        config.catalog = Some(catalog);
    }
    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    config.parallel |= args.parallel;

    if args.verbose {
        println!("Grid size         : {}x{}", config.width, config.height);
        println!("Seed              : {:?}", config.seed);
        println!(
            "Catalog           : {}",
            config
                .catalog
                .as_ref()
                .map_or_else(|| "landscape".to_string(), |path| path.display().to_string())
        );
    }

    let generator = Generator::from_config(&config)?;
    if args.verbose {
        println!("Number of particles: {}", generator.catalog().len());
        println!("Symmetric tables  : {}", generator.catalog().is_symmetric());
    }

    let mut pixels = Array2::from_elem((config.height, config.width), None);
    let (events, handle) = generator.generate_channel();
    for event in events {
        pixels[(event.y, event.x)] = Some(event.payload);
    }

    let outcome = handle
        .join()
        .map_err(|_| anyhow::anyhow!("Generator thread panicked"))?;
    print_pixels(&pixels);
    let grid = outcome?;
    if args.verbose {
        println!("{grid}");
    }
    Ok(())
}
