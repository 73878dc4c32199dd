use chrono::Utc;
use chrono_tz::Tz;
use clap::Parser;

mod cli;

use cli::Args;
use solar_twin::output;
use solar_twin::scene::build_scene;
use solar_twin::solar::{SunClock, SunModel};
use solar_twin::time::{choose_timezone, resolve_instant};

// ===================== MAIN =====================

fn main() {
    env_logger::init();
    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let location = args.location()?;
    let tz = if args.utc {
        Tz::UTC
    } else {
        choose_timezone(&args.timezone, location.map(|p| (p.longitude, p.latitude)))?
    };
    let timestamp = resolve_instant(args.date.as_deref(), args.at.as_deref(), tz, Utc::now())?;
    log::debug!("timezone {}, timestamp {}", tz, timestamp);

    let faults = args.fault_table()?;
    let request = args.scene_request(&faults);
    let sun = args.sun_model()?;
    let clock = SunClock { timestamp, elapsed: args.elapsed };

    let scene = build_scene(&request, &faults, &sun, &clock)?;

    if args.json {
        println!("{}", output::scene_json(&scene)?);
        return Ok(());
    }

    let at = matches!(sun, SunModel::Ephemeris { .. }).then_some(timestamp);
    output::print_scene(&scene, at, args.panels);
    Ok(())
}
