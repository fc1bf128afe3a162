use std::process::ExitCode;

use herd::runner::run_with_args;

fn main() -> ExitCode {
    match run_with_args() {
        Ok(run) => {
            println!(
                "The simulation has ended after {} turns.",
                run.outcome.steps_executed
            );
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("herd: {error}");
            ExitCode::FAILURE
        }
    }
}
