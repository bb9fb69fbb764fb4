use std::{path::PathBuf, time::Instant};

use camera_shake::{ShakeKernel, ShakeParams};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use psf::{Config, PSFs, DEFAULT_SCALE};
use rand::{rngs::StdRng, Rng, SeedableRng};

#[derive(Parser)]
#[command(name = "shake-kernels")]
#[command(about = "Generate and render random camera shake PSFs")]
struct Args {
    /// Number of kernels to render
    #[arg(long, default_value_t = 6)]
    num: usize,

    /// Master random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Output directory
    #[arg(long, default_value = "kernels")]
    out: PathBuf,

    /// Image pixels per kernel pixel
    #[arg(long, default_value_t = DEFAULT_SCALE)]
    scale: u32,

    /// Colormap all kernels with the same range
    #[arg(long)]
    global: bool,

    /// Do not overlay the trajectories
    #[arg(long)]
    no_trajectory: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut config = Config::new(args.scale);
    if args.global {
        config = config.global_range();
    }
    if args.no_trajectory {
        config = config.without_trajectory();
    }
    let mut psfs = PSFs::new(&config);

    let now = Instant::now();
    let process_pb = ProgressBar::new(args.num as u64);
    process_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")?
            .progress_chars("#>-"),
    );
    process_pb.set_message("Generating kernels");

    for _ in 0..args.num {
        let params = ShakeParams::random(&mut rng);
        let seed = rng.gen_range(0..(1u64 << 31) - 1);
        let shake = ShakeKernel::builder(params)
            .seed(seed)
            .keep_trajectory()
            .build()?;
        log::info!(
            "size={}, steps={}, seed={seed}, peak={:.4}",
            params.size,
            params.steps,
            shake.peak()
        );
        psfs.push(shake, params, Some(seed));
        process_pb.inc(1);
    }
    process_pb.finish_with_message("Kernel generation complete");

    psfs.save_all_frames(&args.out)?;
    let summary = args.out.join("kernels.csv");
    psfs.write_summary(&summary)?;

    println!();
    println!(
        "✅ Generated {} kernels in {:.2}s",
        psfs.len(),
        now.elapsed().as_secs_f64()
    );
    println!("📁 Saved kernels to {:?}", args.out);
    println!("🧾 Parameters written to {:?}", summary);
    Ok(())
}
