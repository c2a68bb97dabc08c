//! `sidx` binary entry point.

fn main() {
    std::process::exit(sidx_cli::run(std::env::args().collect()));
}
