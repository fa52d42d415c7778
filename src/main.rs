use std::error::Error;
use std::time::Duration;

use clap::Parser;
use tracing::info;

use ddm::cli::{Args, Command, VerifyArgs};
use ddm::ddm::{deg2ddm, parse_axis, Axis};
use ddm::harness::{self, Source};
use ddm::logging;
use ddm::oracle::HiddenVision;

fn verify(args: VerifyArgs) -> Result<(), Box<dyn Error>> {
    let checked = match args.generate {
        Some(count) => {
            let seed = args.seed.unwrap_or_else(rand::random);
            let oracle = HiddenVision::new(args.base_url, Duration::from_secs(args.timeout))?;
            harness::run(Source::Generate {
                count,
                seed,
                workers: args.workers,
                output: args.output,
                oracle: &oracle,
            })?
        }
        None => harness::run(Source::Fixture(args.fixture))?,
    };
    info!(checked, "verification finished");
    println!("Everything ok!");
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    logging::init(args.verbose);

    match args.command {
        Some(Command::Convert { lat, lon }) => {
            let ddm = deg2ddm(lat, lon)?;
            println!("{}\n{}", ddm.lat, ddm.lon);
        }
        Some(Command::Parse { text, axis }) => {
            let axis = Axis::from(axis);
            let parsed = parse_axis(&text, axis)?;
            println!(
                "{} deg {} min {} ({})",
                parsed.degrees,
                parsed.minutes,
                parsed.hemisphere,
                parsed.to_decimal(axis)
            );
        }
        Some(Command::Verify(verify_args)) => verify(verify_args)?,
        None => verify(VerifyArgs::default())?,
    }

    Ok(())
}
