use std::process::ExitCode;

use clap::Parser;
use summit_lab_helpers::cli::{self, commands::create_sites::{run, CreateSitesArgs}};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    cli::init_tracing();

    let args = CreateSitesArgs::parse();
    cli::finish(run(args, &mut std::io::stdout()).await)
}
