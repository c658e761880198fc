//! cfn-check entry point.

use std::process::ExitCode;

use clap::Parser;

use cfn_check::commands;
use cfn_check::console_utils::init_logging;
use cfn_check::opt::{App, SubCommands};

fn main() -> ExitCode {
    let app = App::parse();

    if let Err(error) = init_logging(&app.log_style, &app.verbose, app.log_level) {
        eprintln!("failed to initialize logging: {error}");
        return ExitCode::from(3);
    }

    let result = match app.subcommand {
        SubCommands::Render(opts) => commands::render(opts),
        SubCommands::Validate(opts) => commands::validate(opts),
        SubCommands::Version => {
            println!("{}", clap::crate_version!());
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            let code = error.exit_code();
            eprintln!("{:?}", miette::Report::new(error));
            ExitCode::from(code)
        }
    }
}
