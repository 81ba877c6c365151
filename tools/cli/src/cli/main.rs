#![deny(warnings)]
#![warn(unused_extern_crates)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]
#![deny(clippy::unreachable)]
#![deny(clippy::await_holding_lock)]
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::trivially_copy_pass_by_ref)]
#![allow(clippy::expect_used)]

use clap::Parser;
use lsl_cli::LslClientParser;
use std::process::ExitCode;
use tokio::runtime;
use tokio::signal::unix::{signal, SignalKind};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Run the command until it finishes or the process is told to stop. An
/// interrupted command exits with failure, a closed output pipe does not.
async fn run_until_signalled(opt: LslClientParser) -> ExitCode {
    let mut quit = signal(SignalKind::quit()).expect("failed to register SIGQUIT");
    let mut term = signal(SignalKind::terminate()).expect("failed to register SIGTERM");
    let mut pipe = signal(SignalKind::pipe()).expect("failed to register SIGPIPE");

    tokio::select! {
        code = opt.exec() => code,
        _ = quit.recv() => ExitCode::FAILURE,
        _ = term.recv() => ExitCode::FAILURE,
        _ = pipe.recv() => ExitCode::SUCCESS,
    }
}

fn main() -> ExitCode {
    let opt = LslClientParser::parse();

    let fmt_layer = fmt::layer().with_writer(std::io::stderr);

    let filter_layer = if opt.debug() {
        match EnvFilter::try_new("lsl_client=debug,lsl_cli=debug") {
            Ok(f) => f,
            Err(e) => {
                eprintln!("ERROR! Unable to start tracing {:?}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        match EnvFilter::try_from_default_env() {
            Ok(f) => f,
            Err(_) => EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .parse_lossy("lsl_client=warn,lsl_cli=info"),
        }
    };

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();

    let rt = match runtime::Builder::new_current_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("ERROR! Unable to start the async runtime {:?}", e);
            return ExitCode::FAILURE;
        }
    };

    rt.block_on(run_until_signalled(opt))
}
