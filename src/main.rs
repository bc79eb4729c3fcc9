use std::process::ExitCode;

fn main() -> ExitCode {
    match git_subrepo::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("git-subrepo: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
