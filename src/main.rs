use std::process::ExitCode;

fn main() -> ExitCode {
    match enrollment_areas::app::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("areas: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}
