/*
 * File: /main.rs
 * Created Date: Saturday October 17th 2026
 * Author: Zihan
 * -----
 * Last Modified: Sunday, 18th October 2026 11:41:03 am
 * Modified By: the developer formerly known as Zihan at <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 */

use std::error::Error;
use std::process;
use std::time::Instant;

use chrono::Local;
use log::{error, info, LevelFilter};

use rolx_mdl::config::{Args, Config};

fn timestamp() -> String {
    Local::now().format("%H:%M:%S").to_string()
}

fn setup_logger(verbose: bool) -> Result<(), log::SetLoggerError> {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    simple_logger::SimpleLogger::new().with_level(level).init()
}

fn run(config: &Config) -> Result<(), Box<dyn Error>> {
    let method = "rolx_mdl";
    let scorer = config.get_scorer();
    let model = config.get_model();

    info!(
        "[method: {}] [{}] V {:?}, rank {}, {} bits, {} policy",
        method,
        timestamp(),
        config.get_matrix().dim(),
        model.rank(),
        scorer.n_bits,
        scorer.policy
    );

    let start_time = Instant::now();
    let costs = scorer.score(config.get_matrix(), model)?;
    info!(
        "[method: {}] [{}] Scored in {:?}",
        method,
        timestamp(),
        start_time.elapsed()
    );

    info!(
        "[method: {}] [{}] encoding cost: {:.4}, error cost: {:.4}, total: {:.4}",
        method,
        timestamp(),
        costs.encoding_cost,
        costs.error_cost,
        costs.total()
    );
    println!("{}\t{}", costs.encoding_cost, costs.error_cost);
    Ok(())
}

fn main() {
    let args = Args::parse(std::env::args()).unwrap_or_else(|err| {
        eprintln!("{}", err);
        process::exit(2);
    });

    if let Err(err) = setup_logger(args.verbose) {
        eprintln!("failed to initialize logger: {}", err);
    }

    let config = Config::from_args(args).unwrap_or_else(|err| {
        error!("{}", err);
        process::exit(2);
    });

    if let Err(err) = run(&config) {
        error!("{}", err);
        process::exit(1);
    }
}
