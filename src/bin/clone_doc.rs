use std::process::ExitCode;

use clap::Parser;
use summit_lab_helpers::cli::{self, commands::clone_doc::{run, CloneDocArgs}};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    cli::init_tracing();

    let args = CloneDocArgs::parse();
    cli::finish(run(args, &mut std::io::stdout()).await)
}
