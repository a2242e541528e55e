use std::process::ExitCode;

use atomic_mv::output as out;
use atomic_mv::{cli, AtomicMvError};

mod app;
mod logging;

fn main() -> ExitCode {
    let args = match cli::parse() {
        Ok(args) => args,
        Err(e) if cli::is_informational(&e) => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            let usage = AtomicMvError::Usage(cli::usage_message(&e));
            out::print_error(&usage.to_string());
            return ExitCode::from(1);
        }
    };

    match app::run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Typed errors already carry their cause in the message.
            match e.downcast_ref::<AtomicMvError>() {
                Some(am) => out::print_error(&am.to_string()),
                None => out::print_error(&format!("{e:#}")),
            }
            ExitCode::from(1)
        }
    }
}
