//! # Lunar Watchface Entry Point
//!
//! Runs the watch face against the desktop emulator host. The binary plays
//! the platform's part: it owns the clock loop, derives which units rolled
//! over each second and hands the tick to the face. With `--stdout` the
//! screen is printed as ASCII every minute.

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::info;
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior};
use watchface_lib::config::{Config, CONFIG_FILE};
use watchface_lib::dispatcher::until_next_second;
use watchface_lib::emulator::EmulatedHost;
use watchface_lib::host::ClockSource;
use watchface_lib::{TickEvent, TimeUnits, WatchFace};

#[derive(Parser, Debug)]
#[command(name = "lunar-watchface")]
#[command(about = "Always-on watch face with a moon-phase glyph, emulated in the terminal")]
struct Cli {
    /// Configuration file
    #[arg(long, default_value = CONFIG_FILE)]
    config: PathBuf,

    #[arg(long, help = "Print the face as ASCII whenever the minute changes")]
    stdout: bool,

    #[arg(long, help = "Stop after this many delivered ticks")]
    ticks: Option<u64>,

    #[arg(long, help = "Write the effective configuration to --config and exit")]
    write_config: bool,

    #[arg(long, help = "Enable debug logging")]
    verbose: bool,
}

/// Main application entry point.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(Env::default().default_filter_or(if cli.verbose {
        "debug"
    } else {
        "info"
    }))
    .format_timestamp_secs()
    .init();

    info!(
        "{} v{} starting",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::load_from_path(&cli.config);
    if cli.write_config {
        config
            .save_to_path(&cli.config)
            .with_context(|| format!("writing {}", cli.config.display()))?;
        return Ok(());
    }

    let mut host = EmulatedHost::new(&config);
    run(&mut host, &config, &cli).await;

    // the face is gone, so every bitmap must be back with the provider
    info!(
        "shut down with {} resident bitmaps",
        host.resident_bitmaps()
    );
    Ok(())
}

/// Tick loop: one event per elapsed second until Ctrl-C or the tick limit.
async fn run(host: &mut EmulatedHost, config: &Config, cli: &Cli) {
    let mut face = WatchFace::new(host, config);
    if cli.stdout {
        print_frame(face.host());
    }

    let mut prev = face.host().now();
    // setup already painted this second; tick on the next boundaries
    let start = Instant::now() + until_next_second(&prev);
    let mut interval = tokio::time::interval_at(start, Duration::from_secs(1));
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut delivered: u64 = 0;
    loop {
        tokio::select! {
            _ = interval.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted");
                break;
            }
        }

        let now = face.host().now();
        let units = TimeUnits::between(Some(&prev), &now);
        if units.is_empty() {
            continue;
        }
        face.handle_tick(&TickEvent::new(now, units));
        prev = now;

        if cli.stdout && units.contains(TimeUnits::MINUTE) {
            print_frame(face.host());
        }

        delivered += 1;
        if cli.ticks.is_some_and(|limit| delivered >= limit) {
            break;
        }
    }
}

fn print_frame(host: &EmulatedHost) {
    println!("{}", host.render().to_ascii());
}
