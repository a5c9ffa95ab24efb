extern crate sropt;

use sropt::{cli, commands, logging};
use tracing::error;

fn main() {
	logging::init_cli_logger();

	let app_m = cli::build_cli();

	let result = match app_m.subcommand() {
		("validate", Some(sub_m)) => commands::validate(sub_m),
		("show", Some(sub_m)) => commands::show(sub_m),
		("generate", Some(sub_m)) => commands::generate(sub_m),
		("normalize", Some(sub_m)) => commands::normalize(sub_m),
		_ => unreachable!("clap requires a subcommand"),
	};

	if let Err(err) = result {
		error!("{}", err);
		std::process::exit(1);
	}
}
