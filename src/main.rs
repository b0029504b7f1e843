//! Sonic Shapes entry point
//!
//! The browser build is driven from JavaScript through `sonic_shapes::web`.
//! Natively this runs the sketch headless for a fixed number of frames and
//! reports what it would have played.

#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use std::path::PathBuf;

    use anyhow::{Context, Result};
    use clap::Parser;
    use glam::Vec2;

    use sonic_shapes::LogSink;
    use sonic_shapes::settings::Settings;
    use sonic_shapes::sim::{ShapeKind, StepReport};

    #[derive(Parser, Debug)]
    #[command(author, version, about = "Run the sonic shapes sketch headless", long_about = None)]
    struct Args {
        /// Frames to simulate
        #[arg(long, default_value_t = 600)]
        frames: u64,
        #[arg(long)]
        width: Option<f32>,
        #[arg(long)]
        height: Option<f32>,
        /// Fixed RNG seed (defaults to the clock)
        #[arg(long)]
        seed: Option<u64>,
        /// Random shapes to drop in before the first frame
        #[arg(long)]
        shapes: Option<u32>,
        /// Default shape kind (ball, rect, triangle, star)
        #[arg(long)]
        shape: Option<String>,
        /// Settings JSON to start from
        #[arg(long)]
        settings: Option<PathBuf>,
        /// Write the effective settings here
        #[arg(long)]
        save_settings: Option<PathBuf>,
        /// Write the interaction log here as JSON
        #[arg(long)]
        log_out: Option<PathBuf>,
        /// Extra clicks as "x,y", applied before the first frame
        #[arg(long = "click", value_parser = parse_point)]
        clicks: Vec<Vec2>,
    }

    fn parse_point(s: &str) -> Result<Vec2> {
        let (x, y) = s
            .split_once(',')
            .with_context(|| format!("expected x,y but got '{s}'"))?;
        let x: f32 = x.trim().parse().with_context(|| format!("bad x in '{s}'"))?;
        let y: f32 = y.trim().parse().with_context(|| format!("bad y in '{s}'"))?;
        Ok(Vec2::new(x, y))
    }

    fn resolve_settings(args: &Args) -> Result<Settings> {
        let mut settings = match &args.settings {
            Some(path) => Settings::load_from(path),
            None => Settings::default(),
        };
        if let Some(w) = args.width {
            settings.width = w;
        }
        if let Some(h) = args.height {
            settings.height = h;
        }
        if args.seed.is_some() {
            settings.seed = args.seed;
        }
        if let Some(n) = args.shapes {
            settings.initial_shapes = n;
        }
        if let Some(name) = &args.shape {
            settings.shape = ShapeKind::from_str(name)
                .with_context(|| format!("unknown shape kind '{name}'"))?;
        }
        anyhow::ensure!(
            settings.width > 0.0 && settings.height > 0.0,
            "arena must be non-empty, got {}x{}",
            settings.width,
            settings.height
        );
        Ok(settings)
    }

    pub fn run() -> Result<()> {
        let args = Args::parse();
        let mut settings = resolve_settings(&args)?;
        // Pin the seed so a saved settings file reproduces this run
        settings.seed = Some(settings.effective_seed());
        log::info!(
            "Sonic Shapes (native) {}x{} seed {:?}",
            settings.width,
            settings.height,
            settings.seed
        );

        if let Some(path) = &args.save_settings {
            settings
                .save_to(path)
                .with_context(|| format!("writing settings to {}", path.display()))?;
        }

        let mut sink = LogSink::default();
        let mut world = settings.build_world(&mut sink);
        for point in &args.clicks {
            let outcome = world.pointer_down(*point);
            log::info!("click ({:.1}, {:.1}) -> {:?}", point.x, point.y, outcome);
        }

        let mut totals = StepReport::default();
        for _ in 0..args.frames {
            totals.absorb(&world.step(&mut sink));
        }

        log::info!(
            "{} frames, {} shapes, {} regions",
            world.frame(),
            world.entities().len(),
            world.regions().len()
        );
        log::info!(
            "region hits {}, notes {}, dropped {}, edge bounces {}, shape collisions {}",
            totals.region_hits,
            totals.sounds_emitted,
            totals.sounds_dropped,
            totals.edge_bounces,
            totals.pair_collisions
        );

        if let Some(path) = &args.log_out {
            let log = world.take_interaction_log();
            std::fs::write(path, log.to_json())
                .with_context(|| format!("writing interaction log to {}", path.display()))?;
            log::info!("Wrote {} interaction records to {}", log.len(), path.display());
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    cli::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is sonic_shapes::web::start
}
