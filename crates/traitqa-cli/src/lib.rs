//! TraitQA command-line support
//!
//! Row file IO, logging setup and the subcommand implementations behind
//! the `traitqa` binary.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod commands;
pub mod io;
pub mod logging;

pub use commands::{
    build_models, load_config, normalize_answer, questions_toml, run_batch, NormalizeOutput,
    RunOptions,
};
pub use io::{read_rows, write_results};
pub use logging::init_logging;
