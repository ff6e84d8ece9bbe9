use std::error::Error;
use std::time::Instant;

use clap::{Parser, ValueEnum};
use log::{info, LevelFilter};

use whitted_rs::raytracing::presets::{self, Preset, PresetOptions};
use whitted_rs::raytracing::scene::RenderConfig;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// the built-in scene to render
    #[arg(short, long, value_enum, default_value_t = Preset::Showcase)]
    preset: Preset,
    /// an OBJ model added to the scene
    #[arg(short, long)]
    model: Option<String>,
    /// an image mapped on the floor in place of the checkerboard
    #[arg(short, long)]
    texture: Option<String>,
    /// the path where the rendered image is saved, the extension picks the format
    #[arg(short, long, default_value = "output.bmp")]
    output: String,
    #[arg(long, default_value_t = 640)]
    width: u32,
    #[arg(long, default_value_t = 480)]
    height: u32,
    /// the deepest reflection and refraction level that is still shaded
    #[arg(long, default_value_t = 3)]
    max_depth: u32,
    /// seed of the random preset
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// apply gamma correction to the final image
    #[arg(long, default_value = "false")]
    gamma_correction: bool,
    /// render on a single thread
    #[arg(long)]
    sequential: bool,
    /// show the render progress
    #[arg(short, long)]
    verbose: bool,
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,
}

fn init_logger(level: LevelFilter) {
    env_logger::Builder::from_default_env().filter_level(level).init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_logger(args.log_level.into());

    let options = PresetOptions {
        max_depth: args.max_depth,
        seed: args.seed,
        model: args.model.clone(),
        texture: args.texture.clone(),
    };
    let scene = presets::build(args.preset, &options)?;

    // measure time
    let start = Instant::now();
    let config = RenderConfig {
        verbose: args.verbose,
        parallel: !args.sequential,
    };
    let image = scene.render(args.width, args.height, &config)?;
    let total_time = start.elapsed();

    image.to_rgb8(args.gamma_correction).save(&args.output)?;
    info!("Rendered {} in {:?}", args.output, total_time);
    Ok(())
}
