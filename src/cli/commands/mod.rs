// One entry point per binary. Each takes its parsed arguments and the stream
// results are printed to, so the binaries stay thin and tests can capture output.

pub mod clone_doc;
pub mod clone_oppt;
pub mod create_sites;
pub mod fetch_oppt;
