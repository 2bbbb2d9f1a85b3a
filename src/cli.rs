//! Command-line surface: option parsing and the functions the binary calls.
use crate::client::{self, ReadPolicy, StreamConnector, TcpConnector};
use crate::error::{Error, Result};
use clap::Parser;
use log::LevelFilter;
use std::ffi::OsString;
use std::io;

/// Fetch a URL with a bare HTTP/1.0 GET and print the raw response.
#[derive(Parser, Debug, PartialEq, Eq)]
#[clap(name = "raw_curl", version)]
pub struct Options {
    /// Log the resolved host, port and path plus connection details to stderr.
    #[clap(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Read until the server closes the connection instead of stopping after one buffer.
    #[clap(long = "drain")]
    pub drain: bool,

    /// The URL to fetch, e.g. http://example.com/get
    pub url: String,
}

impl Options {
    pub fn read_policy(&self) -> ReadPolicy {
        if self.drain {
            ReadPolicy::Drain
        } else {
            ReadPolicy::Single
        }
    }

    /// Logging level used when `RUST_LOG` isn't set.
    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Warn
        }
    }
}

/// Parse `args`, fetch over TCP and report to `out`/`err`. Returns the process exit status:
/// 0 on success (and for `--help`/`--version`), 1 for bad arguments or any failure.
pub fn main_with<I, T, W, E>(args: I, out: W, err: E) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    W: io::Write,
    E: io::Write,
{
    main_with_connector(&TcpConnector, args, out, err)
}

fn main_with_connector<C, I, T, W, E>(connector: &C, args: I, mut out: W, mut err: E) -> i32
where
    C: StreamConnector,
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    W: io::Write,
    E: io::Write,
{
    let options = match Options::try_parse_from(args) {
        Ok(options) => options,
        // --help and --version
        Err(e) if !e.use_stderr() => {
            let _ = write!(out, "{}", e.render());
            let _ = out.flush();
            return 0;
        }
        Err(e) => {
            let _ = write!(err, "{}", e.render());
            return 1;
        }
    };

    // Only the first call in a process installs the logger.
    let _ = env_logger::Builder::new()
        .filter_level(options.log_level())
        .parse_default_env()
        .try_init();

    match run_with(connector, &options, &mut out) {
        Ok(()) => 0,
        Err(e) => {
            log::debug!("{:?}", e);
            let _ = writeln!(err, "error: {}", e);
            1
        }
    }
}

/// Fetch `options.url` over TCP and print the response to `out`.
pub fn run<W: io::Write>(options: &Options, out: W) -> Result<()> {
    run_with(&TcpConnector, options, out)
}

pub fn run_with<C: StreamConnector, W: io::Write>(
    connector: &C,
    options: &Options,
    mut out: W,
) -> Result<()> {
    let response = client::fetch(connector, &options.url, options.read_policy())?;
    writeln!(out, "{}", response.to_text()).map_err(Error::Output)?;
    out.flush().map_err(Error::Output)
}
