// src/main.rs
use std::io;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;

use beatscope::{
    analysis::AudioAnalyzer,
    app::{run_headless, App},
    config::Args,
    logging,
    ui::{self, frame_interval},
};

fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = logging::init(&args.log_config())?;

    if args.headless && args.file.is_none() && !args.mic {
        bail!("--headless needs an audio file or --mic");
    }

    let analyzer = AudioAnalyzer::new(args.analyzer_config())
        .context("Failed to create the audio analyzer")?;
    let mut app = App::new(analyzer, args.frame_skip, args.device.clone())?;

    // Fail before the terminal is taken over if the requested source is unusable
    if let Some(path) = &args.file {
        app.open_file(path)?;
    } else if args.mic {
        app.start_mic()?;
    }

    info!("Starting at {} fps, querying every {} frames", args.fps, args.frame_skip);

    if args.headless {
        let mut stdout = io::stdout().lock();
        run_headless(&mut app, args.frames, frame_interval(args.fps), &mut stdout)?;
        app.analyzer.dispose();
        Ok(())
    } else {
        ui::run(app, args.fps)
    }
}
