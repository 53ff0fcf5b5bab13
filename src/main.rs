// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use inspo_cam::Config;
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "inspo-cam")]
#[command(about = "Camera with a semi-transparent inspiration overlay")]
#[command(version = inspo_cam::constants::app_info::version())]
#[command(subcommand_required = false)]
struct Cli {
    /// Config file (default: <config dir>/inspo-cam/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the live viewer in the terminal (default)
    Terminal {
        /// Reference image to start with
        #[arg(short, long)]
        reference: Option<PathBuf>,
    },

    /// List available cameras
    List,

    /// Rotate and/or mirror an image file
    Normalize {
        /// Input image
        input: PathBuf,

        /// Output image (.jpg or .png)
        output: PathBuf,

        /// Counter-clockwise rotation in degrees (0, 90, 180, 270)
        #[arg(short, long, allow_negative_numbers = true)]
        rotate: Option<i32>,

        /// Mirror horizontally after rotating
        #[arg(short, long)]
        mirror: bool,

        /// Apply an EXIF orientation code (1-8) instead of --rotate/--mirror
        #[arg(short, long, conflicts_with_all = ["rotate", "mirror"])]
        exif: Option<u16>,
    },

    /// Draw a reference image over a frame, like the live preview does
    Compose {
        /// Reference (inspiration) image
        #[arg(short, long)]
        reference: PathBuf,

        /// Camera frame to draw onto
        #[arg(short, long)]
        frame: PathBuf,

        /// Overlay opacity (0.0 - 1.0)
        #[arg(long)]
        opacity: Option<f32>,

        /// Mirror the reference
        #[arg(short, long)]
        mirror: bool,

        /// Output image (.jpg or .png)
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Take a photo and save it to the photo library
    Photo {
        /// Camera index to use (from 'inspo-cam list'); default picks the back camera
        #[arg(short, long)]
        camera: Option<usize>,

        /// Directory to save into (default: ~/Pictures/inspo-cam)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=inspo_cam=debug, RUST_LOG=info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let (config, config_path) = Config::open(cli.config.or_else(Config::default_path));

    match cli.command {
        None => inspo_cam::terminal::run(config, config_path, None),
        Some(Commands::Terminal { reference }) => {
            inspo_cam::terminal::run(config, config_path, reference)
        }
        Some(Commands::List) => cli::list_cameras(&config),
        Some(Commands::Normalize {
            input,
            output,
            rotate,
            mirror,
            exif,
        }) => cli::normalize_image(&input, &output, rotate, mirror, exif, &config),
        Some(Commands::Compose {
            reference,
            frame,
            opacity,
            mirror,
            output,
        }) => cli::compose(&reference, &frame, opacity, mirror, &output, &config),
        Some(Commands::Photo { camera, output }) => cli::take_photo(config, camera, output),
    }
}
