//! Easel CLI
//!
//! Run the animation engine headless and inspect easing curves.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use easel_animation::{Animated, Easing, Scheduler, TickCallback};
use easel_core::Vec2;
use easel_platform::RunLoop;
use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;
mod sprite;

use config::EaselConfig;
use sprite::Sprite;

#[derive(Parser)]
#[command(name = "easel")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Easel animation engine CLI", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Animate a sprite headless and report frame statistics
    Run {
        /// Configuration file (defaults to ./easel.toml when present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Target frames per second
        #[arg(long)]
        fps: Option<f64>,

        /// Seconds per animation step
        #[arg(short, long)]
        duration: Option<f32>,

        /// Easing curve name
        #[arg(short, long)]
        easing: Option<String>,

        /// Times the two-step sequence is played
        #[arg(short, long)]
        loops: Option<u32>,

        /// Drive ticks from the throttled timer instead of the refresh signal
        #[arg(long)]
        timer: bool,
    },

    /// Print sampled values of every named easing curve
    Easings {
        /// Samples per curve, including both ends
        #[arg(short, long, default_value = "5")]
        samples: usize,
    },

    /// Print the effective configuration as TOML
    Config {
        /// Configuration file (defaults to ./easel.toml when present)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match cli.command {
        Commands::Run {
            config,
            fps,
            duration,
            easing,
            loops,
            timer,
        } => {
            let mut settings = load_config(config)?;
            if let Some(fps) = fps {
                settings.scheduler.frame_rate = fps;
            }
            if let Some(duration) = duration {
                settings.demo.duration = duration;
            }
            if let Some(easing) = easing {
                settings.demo.easing = easing;
            }
            if let Some(loops) = loops {
                settings.demo.loops = loops;
            }
            if timer {
                settings.scheduler.prefer_refresh = false;
            }
            cmd_run(&settings)
        }

        Commands::Easings { samples } => cmd_easings(samples),

        Commands::Config { config } => {
            let settings = load_config(config)?;
            print!("{}", settings.to_toml()?);
            Ok(())
        }
    }
}

fn load_config(path: Option<PathBuf>) -> Result<EaselConfig> {
    let cwd = std::env::current_dir().context("Failed to read the working directory")?;
    EaselConfig::load_or_default(path.as_deref(), &cwd)
}

fn cmd_run(settings: &EaselConfig) -> Result<()> {
    settings
        .scheduler
        .validate()
        .context("Invalid scheduler settings")?;
    let easing = settings.demo.easing()?;
    let demo = &settings.demo;
    if !demo.duration.is_finite() || demo.duration < 0.0 {
        anyhow::bail!("Invalid step duration {}", demo.duration);
    }

    let run_loop = Rc::new(RunLoop::with_refresh_rate(settings.scheduler.frame_rate));
    let scheduler = Scheduler::with_config(run_loop.clone(), &settings.scheduler);

    info!(
        "Running {} loop(s) of 2 x {:.2}s steps, {} easing, {} fps{}",
        demo.loops,
        demo.duration,
        easing,
        settings.scheduler.frame_rate,
        if scheduler.uses_timer_fallback() {
            " (timer)"
        } else {
            ""
        }
    );

    // Frame monitor, ticks ahead of every animation
    let slowest_ms = Rc::new(Cell::new(0.0f32));
    let slowest = slowest_ms.clone();
    let monitor: TickCallback = Rc::new(move |elapsed: f32| {
        let ms = elapsed * 1000.0;
        if ms > slowest.get() {
            slowest.set(ms);
        }
    });
    let subscription = scheduler.add_ticked(monitor, -100);

    let sprite = Sprite::new("sprite", scheduler.handle());
    let step_limit = Duration::from_secs_f32((demo.duration * 2.0 + 1.0).min(86_400.0));
    let started = Instant::now();

    for cycle in 0..demo.loops {
        sprite
            .animate(
                sprite
                    .tween()
                    .to("x", demo.distance)
                    .to("scale", Vec2::new(2.0, 2.0))
                    .duration(demo.duration)
                    .easing(easing),
            )
            .animate(
                sprite
                    .tween()
                    .to("x", 0.0)
                    .to("scale", Vec2::ONE)
                    .duration(demo.duration)
                    .easing(easing),
            );

        run_loop.run_until(step_limit, || !sprite.is_animating());
        if sprite.is_animating() {
            anyhow::bail!("Animation did not finish in cycle {}", cycle + 1);
        }

        info!(
            "Cycle {} done: x = {:.2}, scale = ({:.2}, {:.2})",
            cycle + 1,
            sprite.x(),
            sprite.scale().x,
            sprite.scale().y
        );
    }

    subscription.remove();
    run_loop.run_until_idle(Duration::from_millis(100));

    let frame = scheduler.frame_info();
    let wall = started.elapsed();
    info!(
        "{} frames in {:.2}s ({:.1} fps), {} draws, slowest frame {:.2}ms",
        frame.frame_count,
        wall.as_secs_f64(),
        frame.frame_count as f64 / wall.as_secs_f64().max(f64::EPSILON),
        sprite.draws(),
        slowest_ms.get()
    );

    if scheduler.is_loop_enabled() {
        tracing::warn!("Frame loop still running after the demo finished");
    }

    Ok(())
}

fn cmd_easings(samples: usize) -> Result<()> {
    if samples < 2 {
        anyhow::bail!("Need at least 2 samples, got {}", samples);
    }

    let steps: Vec<f32> = (0..samples)
        .map(|i| i as f32 / (samples - 1) as f32)
        .collect();

    print!("{:<14}", "t");
    for t in &steps {
        print!("{:>8.3}", t);
    }
    println!();

    for (name, easing) in Easing::NAMED {
        print!("{:<14}", name);
        for t in &steps {
            print!("{:>8.3}", easing.apply(*t, 0.0, 1.0));
        }
        println!();
    }

    Ok(())
}
