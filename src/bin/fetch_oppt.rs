use std::process::ExitCode;

use clap::Parser;
use summit_lab_helpers::cli::{self, commands::fetch_oppt::{run, FetchOpptArgs}};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    cli::init_tracing();

    let args = FetchOpptArgs::parse();
    cli::finish(run(args, &mut std::io::stdout()).await)
}
