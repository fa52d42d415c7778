//! Checks the converter against reference answers, either replayed from a
//! fixture or freshly fetched from an [`Oracle`].

use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use tracing::{debug, info};

use crate::ddm::{Coordinate, Ddm};
use crate::error::HarnessError;
use crate::fixture::ExampleSet;
use crate::oracle::Oracle;

pub const DEFAULT_WORKERS: usize = 2;

/// Always checked first: they exercise degree and minute zero padding.
pub const REGRESSION_EXAMPLES: [(f64, f64); 3] = [
    (66.882115, -76.039129),
    (25.092267, 125.987818),
    (56.166042, -176.45725),
];

pub enum Source<'a> {
    Fixture(PathBuf),
    Generate {
        count: usize,
        seed: u64,
        workers: usize,
        output: PathBuf,
        oracle: &'a dyn Oracle,
    },
}

/// The regression examples followed by `count` uniformly drawn coordinates,
/// rounded to six decimal places.
pub fn generate_examples<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<Coordinate> {
    let mut examples: Vec<Coordinate> = REGRESSION_EXAMPLES
        .iter()
        .copied()
        .map(Coordinate::from)
        .collect();
    examples.extend((0..count).map(|_| {
        let lat = round6(rng.gen::<f64>() * 180.0 - 90.0);
        let lon = round6(rng.gen::<f64>() * 360.0 - 180.0);
        Coordinate::new(lat, lon)
    }));
    examples
}

/// Rounds the exact binary value, ties to even. Scaling by 1e6 first would
/// round an already-inexact product.
fn round6(value: f64) -> f64 {
    format!("{value:.6}").parse().unwrap_or(value)
}

/// Queries `oracle` for every example on a pool of `workers` threads.
///
/// Answers come back in input order; the first failure aborts the batch.
pub fn fetch_answers<O: Oracle + ?Sized>(
    oracle: &O,
    examples: &[Coordinate],
    workers: usize,
) -> Result<Vec<Ddm>, HarnessError> {
    let pool = ThreadPoolBuilder::new()
        .num_threads(workers.max(1))
        .thread_name(|i| format!("oracle-{i}"))
        .build()?;

    info!(examples = examples.len(), workers, "fetching reference answers");
    let answers = pool.install(|| {
        examples
            .par_iter()
            .map(|&coord| -> Result<Ddm, HarnessError> {
                let answer = oracle.answer(coord)?;
                debug!(%coord, %answer, "reference answer");
                Ok(answer)
            })
            .collect::<Result<Vec<_>, HarnessError>>()
    })?;
    Ok(answers)
}

/// Converts every example and compares it with its reference answer.
///
/// Stops at the first mismatch; otherwise returns the number of examples checked.
pub fn verify(set: &ExampleSet) -> Result<usize, HarnessError> {
    for (coordinate, expected) in set.iter() {
        let actual = coordinate
            .to_ddm()
            .map_err(|source| HarnessError::Convert { coordinate, source })?;
        if &actual != expected {
            return Err(HarnessError::Mismatch {
                coordinate,
                actual,
                expected: expected.clone(),
            });
        }
        debug!(%coordinate, %actual, "ok");
    }
    info!(examples = set.len(), "all examples matched");
    Ok(set.len())
}

pub fn run(source: Source<'_>) -> Result<usize, HarnessError> {
    let set = match source {
        Source::Fixture(path) => {
            info!(path = %path.display(), "replaying fixture");
            ExampleSet::load(&path)?
        }
        Source::Generate {
            count,
            seed,
            workers,
            output,
            oracle,
        } => {
            info!(count, seed, "generating examples");
            let mut rng = StdRng::seed_from_u64(seed);
            let examples = generate_examples(count, &mut rng);
            let answers = fetch_answers(oracle, &examples, workers)?;
            let set = ExampleSet::new(examples, answers)?;
            set.save(&output)?;
            info!(path = %output.display(), "saved example set");
            set
        }
    };
    verify(&set)
}
