//! ctk - container metadata and namespaces for 3D scene pipelines

use std::process::ExitCode;

fn main() -> ExitCode {
    match containerkit::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
