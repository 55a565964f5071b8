use std::process::ExitCode;

use clap::Parser;
use summit_lab_helpers::cli::{self, commands::clone_oppt::{run, CloneOpptArgs}};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    cli::init_tracing();

    let args = CloneOpptArgs::parse();
    cli::finish(run(args, &mut std::io::stdout()).await)
}
