use std::io;
use std::process;

fn main() {
    let status = raw_curl::cli::main_with(std::env::args_os(), io::stdout().lock(), io::stderr());
    process::exit(status);
}
