use std::path::PathBuf;

use clap::Parser;
use djphe::{dj::KeyParams, examples, util::log_error};

#[derive(Clone, Debug, Parser)]
struct Args {
    /// JSON file with key parameters; overrides --bits and -s.
    #[arg(long)]
    params: Option<PathBuf>,

    #[arg(long, default_value_t = 2048)]
    bits: usize,

    #[arg(short, default_value_t = 1)]
    s: u32,

    #[arg(long, default_value_t = 1000)]
    values: usize,

    #[arg(long, default_value_t = 1)]
    threads: usize,

    #[arg(long, default_value_t = false)]
    toy: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let params = match (&args.params, args.toy) {
        (Some(path), _) => match KeyParams::from_json_file(path) {
            Ok(params) => params,
            Err(e) => {
                log::error!("cannot load {}: {}", path.display(), e);
                return;
            }
        },
        (None, true) => KeyParams { s: args.s, ..KeyParams::TOY },
        (None, false) => KeyParams {
            key_bits: args.bits,
            s: args.s,
            ..KeyParams::DEFAULT
        },
    };

    log_error(
        "throughput",
        examples::throughput(&params, args.threads, args.values),
    );
}
