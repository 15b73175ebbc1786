use anyhow::{anyhow, Context, Result};
use clap::{crate_version, App as Cli, Arg, ArgMatches, SubCommand};
use log::*;
use particle_field::app::App;
use particle_field::config::{Config, MAX_FRAME_RATE};
use particle_field::headless::{Simulation, MAX_SURFACE_SIDE};
use particle_field::logger;
use particle_field::surface::Size;

fn cli<'a, 'b>() -> Cli<'a, 'b> {
    Cli::new("particle-field")
        .version(crate_version!())
        .about("An animated particle backdrop for the terminal")
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("DIR")
                .help("Directory holding config.yml")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("count")
                .short("n")
                .long("count")
                .value_name("N")
                .help("Override the particle count of every field")
                .takes_value(true)
                .global(true),
        )
        .arg(
            Arg::with_name("fps")
                .long("fps")
                .value_name("N")
                .help("Override the frame rate")
                .takes_value(true),
        )
        .subcommand(
            SubCommand::with_name("simulate")
                .about("Run the first field offscreen and print a JSON report")
                .arg(
                    Arg::with_name("frames")
                        .long("frames")
                        .value_name("N")
                        .default_value("600")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("width")
                        .long("width")
                        .value_name("PX")
                        .default_value("1280")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("height")
                        .long("height")
                        .value_name("PX")
                        .default_value("720")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("realtime")
                        .long("realtime")
                        .help("Pace frames at the configured frame rate"),
                )
                .arg(
                    Arg::with_name("seed")
                        .long("seed")
                        .value_name("SEED")
                        .takes_value(true),
                ),
        )
        .subcommand(
            SubCommand::with_name("init-config")
                .about("Write the default configuration if none exists"),
        )
}

fn parse<T: std::str::FromStr>(matches: &ArgMatches, name: &str) -> Result<Option<T>> {
    match matches.value_of(name) {
        Some(value) => value
            .parse::<T>()
            .map(Some)
            .map_err(|_| anyhow!("Invalid value '{}' for --{}", value, name)),
        None => Ok(None),
    }
}

/// Resolve `-n/--count`, given either before or after the subcommand.
///
fn count_override(matches: &ArgMatches) -> Result<Option<usize>> {
    match matches.subcommand() {
        (_, Some(sub)) => Ok(parse::<usize>(sub, "count")?.or(parse(matches, "count")?)),
        _ => parse(matches, "count"),
    }
}

fn surface_size(matches: &ArgMatches) -> Result<Size> {
    let width = parse(matches, "width")?.unwrap_or(1280);
    let height = parse(matches, "height")?.unwrap_or(720);
    if width > MAX_SURFACE_SIDE || height > MAX_SURFACE_SIDE {
        return Err(anyhow!(
            "--width and --height must be at most {}",
            MAX_SURFACE_SIDE
        ));
    }
    Ok(Size::new(width, height))
}

fn simulate(config: &Config, matches: &ArgMatches) -> Result<()> {
    let size = surface_size(matches)?;
    logger::init(LevelFilter::Info, Box::new(|line| eprintln!("{}", line)))?;
    let options = config
        .fields
        .first()
        .cloned()
        .unwrap_or_default();
    let simulation = Simulation {
        options,
        size,
        frames: parse(matches, "frames")?.unwrap_or(600),
        seed: parse(matches, "seed")?,
        realtime_fps: if matches.is_present("realtime") {
            Some(config.frame_rate)
        } else {
            None
        },
    };
    println!("{}", simulation.run().to_json()?);
    Ok(())
}

fn init_config(config: &Config) -> Result<()> {
    let path = config
        .file_path()
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    if config.file_exists() {
        println!("Configuration already exists at {}", path);
        return Ok(());
    }
    config.save().context("Failed to write default configuration")?;
    println!("Wrote default configuration to {}", path);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();

    let mut config = Config::new();
    config.load(matches.value_of("config"))?;

    if let Some(count) = count_override(&matches)? {
        config.set_particle_count(count);
    }
    if let Some(fps) = parse::<u32>(&matches, "fps")? {
        if fps == 0 || fps > MAX_FRAME_RATE {
            return Err(anyhow!("--fps must be between 1 and {}", MAX_FRAME_RATE));
        }
        config.frame_rate = fps;
    }

    match matches.subcommand() {
        ("simulate", Some(sub)) => simulate(&config, sub),
        ("init-config", _) => init_config(&config),
        _ => App::start(config).await,
    }
}
