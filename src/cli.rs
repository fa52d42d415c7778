use std::path::PathBuf;

use clap::builder::{styling::AnsiColor, Styles};
use clap::{Parser, Subcommand, ValueEnum};

use crate::ddm::Axis;
use crate::harness::DEFAULT_WORKERS;
use crate::oracle::{BASE_URL, DEFAULT_TIMEOUT};

pub const DEFAULT_FIXTURE: &str = "fixtures/examples.json";
pub const DEFAULT_OUTPUT: &str = "examples2.json";
pub const DEFAULT_COUNT: &str = "100";

const ABOUT: &str = "Decimal degrees to NMEA Degrees Decimal Minutes";

const LONG_ABOUT: &str = "
Converts WGS84 decimal-degree coordinates to the Degrees Decimal Minutes (DDMM.fffff,H) strings
used by NMEA navigation equipment, and validates the conversion against reference answers.

Run without a subcommand to replay the answers stored in `fixtures/examples.json` (resolved
against the current directory). Those bundled answers were computed offline with the same
conversion formula, not fetched from the online converter, so a passing replay is a regression
check only. Use `verify --generate N` to draw fresh random coordinates and check them against
the independent oracle at http://www.hiddenvision.co.uk/ez/.
";

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default())
    .usage(AnsiColor::Green.on_default())
    .literal(AnsiColor::Green.on_default())
    .placeholder(AnsiColor::Green.on_default());

#[derive(Parser, Debug)]
#[command(version, styles=STYLES, about=ABOUT, long_about = LONG_ABOUT)]
pub struct Args {
    #[arg(short, long, global = true, help = "Log every example, not just the summary")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert one coordinate
    Convert {
        #[arg(allow_negative_numbers = true, help = "Latitude in decimal degrees")]
        lat: f64,

        #[arg(allow_negative_numbers = true, help = "Longitude in decimal degrees")]
        lon: f64,
    },

    /// Split a DDM string into degrees, minutes and hemisphere
    Parse {
        #[arg(help = "DDM string, e.g. 07602.34774,W")]
        text: String,

        #[arg(long, value_enum, default_value_t = AxisArg::Lat)]
        axis: AxisArg,
    },

    /// Check the converter against reference answers
    Verify(VerifyArgs),
}

#[derive(clap::Args, Debug)]
pub struct VerifyArgs {
    #[arg(long, default_value = DEFAULT_FIXTURE, conflicts_with = "generate", help = "Example set to replay")]
    pub fixture: PathBuf,

    #[arg(
        long,
        value_name = "COUNT",
        num_args = 0..=1,
        default_missing_value = DEFAULT_COUNT,
        help = "Generate COUNT (default 100) random examples and query the oracle"
    )]
    pub generate: Option<usize>,

    #[arg(long, requires = "generate", help = "Random seed (defaults to a fresh one)")]
    pub seed: Option<u64>,

    #[arg(long, default_value_t = DEFAULT_WORKERS, help = "Concurrent oracle requests")]
    pub workers: usize,

    #[arg(long, default_value = DEFAULT_OUTPUT, help = "Where to save a generated example set")]
    pub output: PathBuf,

    #[arg(long, default_value = BASE_URL, help = "Oracle page URL")]
    pub base_url: String,

    #[arg(long, default_value_t = DEFAULT_TIMEOUT.as_secs(), help = "Per-request oracle timeout in seconds")]
    pub timeout: u64,
}

impl Default for VerifyArgs {
    fn default() -> Self {
        Self {
            fixture: PathBuf::from(DEFAULT_FIXTURE),
            generate: None,
            seed: None,
            workers: DEFAULT_WORKERS,
            output: PathBuf::from(DEFAULT_OUTPUT),
            base_url: BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum AxisArg {
    Lat,
    Lon,
}

impl From<AxisArg> for Axis {
    fn from(arg: AxisArg) -> Self {
        match arg {
            AxisArg::Lat => Axis::Latitude,
            AxisArg::Lon => Axis::Longitude,
        }
    }
}
