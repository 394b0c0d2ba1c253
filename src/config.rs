use std::error::Error;
use std::fs::File;

/**
 * File: /src/config.rs
 * Created Date: Saturday, October 17th 2026
 * Author: Zihan
 * -----
 * Last Modified: Sunday, 18th October 2026 11:04:52 am
 * Modified By: the developer formerly known as Zihan at <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 */
use ndarray::Array2;
use ndarray_npy::ReadNpyExt;

use crate::matrix::FactorModel;
use crate::scoring::{DescriptionLengthScorer, SingularityPolicy, DEFAULT_N_BITS};

pub const USAGE: &str =
    "usage: rolx_mdl <V.npy> <G.npy> <F.npy> [n_bits] [propagate|clamp[:eps]|fail] [--verbose]";

/// Command-line arguments of the driver, before any file is touched
#[derive(Debug, Clone, PartialEq)]
pub struct Args {
    pub v_path: String,
    pub g_path: String,
    pub f_path: String,
    pub n_bits: u32,
    pub policy: SingularityPolicy,
    pub verbose: bool,
}

impl Args {
    /// Parse `args` (program name first)
    pub fn parse(args: impl Iterator<Item = String>) -> Result<Args, Box<dyn Error>> {
        let mut verbose = false;
        let mut positional = Vec::new();
        for arg in args.skip(1) {
            if arg == "--verbose" || arg == "-v" {
                verbose = true;
            } else {
                positional.push(arg);
            }
        }
        if positional.len() < 3 || positional.len() > 5 {
            return Err(USAGE.into());
        }

        let mut positional = positional.into_iter();
        // length checked above
        let v_path = positional.next().ok_or(USAGE)?;
        let g_path = positional.next().ok_or(USAGE)?;
        let f_path = positional.next().ok_or(USAGE)?;
        let n_bits = match positional.next() {
            Some(n) => n.parse::<u32>()?,
            None => DEFAULT_N_BITS,
        };
        let policy = match positional.next() {
            Some(p) => p.parse::<SingularityPolicy>()?,
            None => SingularityPolicy::Propagate,
        };

        Ok(Args {
            v_path,
            g_path,
            f_path,
            n_bits,
            policy,
            verbose,
        })
    }
}

pub struct Config {
    // original feature matrix
    matrix: Array2<f64>,
    model: FactorModel,
    scorer: DescriptionLengthScorer,
    verbose: bool,
}

impl Config {
    /// constructor
    ///
    /// # Examples
    /// ```bash
    /// $ cargo run -- data/V.npy data/G.npy data/F.npy 8 clamp:1e-9
    /// ```
    pub fn new(args: impl Iterator<Item = String>) -> Result<Config, Box<dyn Error>> {
        Config::from_args(Args::parse(args)?)
    }

    pub fn from_args(args: Args) -> Result<Config, Box<dyn Error>> {
        let scorer = DescriptionLengthScorer::new(args.n_bits)?.with_policy(args.policy)?;
        let matrix = read_matrix(&args.v_path)?;
        let g = read_matrix(&args.g_path)?;
        let f = read_matrix(&args.f_path)?;

        Ok(Config {
            matrix,
            model: FactorModel::new(g, f),
            scorer,
            verbose: args.verbose,
        })
    }

    pub fn get_matrix(&self) -> &Array2<f64> {
        &self.matrix
    }

    pub fn get_model(&self) -> &FactorModel {
        &self.model
    }

    pub fn get_scorer(&self) -> &DescriptionLengthScorer {
        &self.scorer
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

fn read_matrix(path: &str) -> Result<Array2<f64>, Box<dyn Error>> {
    let reader = File::open(path).map_err(|e| format!("{}: {}", path, e))?;
    Ok(Array2::<f64>::read_npy(reader)?)
}
