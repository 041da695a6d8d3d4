//! Command-line interface for colorseg
//!
//! Segments still frames, compares regions and replays key sequences over a
//! directory of frames the way the live capture loop would.

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::prelude::*;

use colorseg::image_io::{is_supported_extension, load_frame, save_image};
use colorseg::{
    Command, CommandQueue, Outcome, Region, Result, SegmentationError, SegmenterConfig, Session,
};

#[derive(Parser)]
#[command(name = "colorseg")]
#[command(version, about = "Color-histogram foreground/background segmentation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Segment a frame against captured background and object references
    Segment {
        /// Frame to segment
        #[arg(value_name = "FRAME")]
        frame: PathBuf,

        /// Frame of the empty scene, sampled on the background grid
        #[arg(long, value_name = "FILE")]
        background: PathBuf,

        /// Frame showing the object; repeat to capture several references
        #[arg(long, value_name = "FILE")]
        object: Vec<PathBuf>,

        /// Object capture region (default: centered square)
        #[arg(long, value_name = "X,Y,W,H")]
        object_region: Option<Region>,

        /// JSON configuration file
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Override the classified block size
        #[arg(long, value_name = "PIXELS")]
        block_size: Option<u32>,

        /// Blend the overlay over the grayscale frame
        #[arg(long)]
        blend: bool,

        /// Output image
        #[arg(short, long, value_name = "FILE")]
        out: PathBuf,
    },

    /// Print the color distance between two regions of an image
    Distance {
        #[arg(value_name = "IMAGE")]
        image: PathBuf,

        /// First region (default: left half)
        #[arg(long, value_name = "X,Y,W,H")]
        a: Option<Region>,

        /// Second region (default: right half)
        #[arg(long, value_name = "X,Y,W,H")]
        b: Option<Region>,
    },

    /// Feed a directory of frames through a session, one key per frame
    Replay {
        /// Directory of frames, processed in file name order
        #[arg(value_name = "DIR")]
        frames: PathBuf,

        /// Keys applied to successive frames: b a v r f q, '.' for none
        #[arg(long, value_name = "KEYS", default_value = "")]
        keys: String,

        /// JSON configuration file
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Output directory for rendered frames
        #[arg(short, long, value_name = "DIR")]
        out: PathBuf,
    },

    /// Write the default configuration to a JSON file
    Config {
        #[arg(value_name = "FILE")]
        out: PathBuf,
    },
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,colorseg=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(error) = run(cli.command) {
        eprintln!("colorseg failed: {}", error);
        eprintln!("Suggestion: {}", error.user_message());
        process::exit(1);
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Segment {
            frame,
            background,
            object,
            object_region,
            config,
            block_size,
            blend,
            out,
        } => {
            let mut config = load_config(config.as_deref())?;
            if let Some(block_size) = block_size {
                config.block_size = block_size;
            }
            let mut session = Session::new(config)?;

            session.capture_background(&load_frame(&background)?)?;
            for path in &object {
                session.capture_object(&load_frame(path)?, object_region)?;
            }

            let frame = load_frame(&frame)?;
            let output = if blend {
                session.dispatch(&frame, Command::ToggleRecognition)?;
                session.render(&frame)?
            } else {
                session.segment(&frame)?
            };
            save_image(&output, &out)?;
            info!(path = %out.display(), "Wrote segmentation");
        }
        Commands::Distance { image, a, b } => {
            let frame = load_frame(&image)?;
            let (width, height) = frame.dimensions();
            let a = a.unwrap_or_else(|| Region::left_half(width, height));
            let b = b.unwrap_or_else(|| Region::right_half(width, height));
            let distance = colorseg::region_distance(&frame, &a, &b)?;
            println!("{}", distance);
        }
        Commands::Replay {
            frames,
            keys,
            config,
            out,
        } => {
            let session = Session::new(load_config(config.as_deref())?)?;
            replay(session, &frames, &keys, &out)?;
        }
        Commands::Config { out } => {
            SegmenterConfig::default().to_json_file(&out)?;
            info!(path = %out.display(), "Wrote default configuration");
        }
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<SegmenterConfig> {
    match path {
        Some(path) => SegmenterConfig::from_json_file(path),
        None => Ok(SegmenterConfig::default()),
    }
}

fn find_frames(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| {
        SegmentationError::image_load(format!("Failed to read {}", dir.display()), e)
    })?;

    let mut frames: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(is_supported_extension)
        })
        .collect();
    frames.sort();
    Ok(frames)
}

fn replay(mut session: Session, frames_dir: &Path, keys: &str, out_dir: &Path) -> Result<()> {
    let frames = find_frames(frames_dir)?;
    if frames.is_empty() {
        return Err(SegmentationError::invalid("frames", frames_dir.display()));
    }
    std::fs::create_dir_all(out_dir).map_err(|e| {
        SegmentationError::image_save(format!("Failed to create {}", out_dir.display()), e)
    })?;

    let mut keys = keys.chars();
    let mut queue = CommandQueue::new();
    let mut held = None;

    for (index, path) in frames.iter().enumerate() {
        // A frozen session keeps working on the last frame it saw
        if held.is_none() || !session.is_frozen() {
            held = Some(load_frame(path)?);
        }
        let Some(frame) = held.as_ref() else {
            continue;
        };

        queue.extend(keys.next().and_then(Command::from_key));
        match session.drain(frame, &mut queue) {
            Ok(outcomes) => {
                let mut quit = false;
                for outcome in outcomes {
                    match outcome {
                        Outcome::Quit => quit = true,
                        Outcome::Distance(distance) => println!("{}", distance),
                        outcome => info!(frame = index, ?outcome, "Applied command"),
                    }
                }
                if quit {
                    break;
                }
            }
            Err(error) if error.is_recoverable() => {
                tracing::warn!(frame = index, %error, "Command failed");
            }
            Err(error) => return Err(error),
        }

        let rendered = session.render(frame)?;
        save_image(&rendered, &out_dir.join(format!("frame_{:04}.png", index)))?;
    }

    Ok(())
}
