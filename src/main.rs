use sprig_cli::cli::{App, Args};
use sprig_cli::VERSION;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Args::parse_args();

    // answered before any configuration is read
    if args.version {
        println!("sprig: {}", VERSION);
        return ExitCode::SUCCESS;
    }

    match App::from_env().and_then(|app| app.run(args)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // errors share stdout with the render, one line each
            println!("{}", e);
            ExitCode::FAILURE
        }
    }
}
