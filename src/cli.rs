use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};

pub fn build_cli() -> ArgMatches<'static> {
	App::new("sropt")
		.version("v0.1.0")
		.about("Validates, inspects and generates super-resolution training option files")
		.settings(&[AppSettings::SubcommandRequiredElseHelp, AppSettings::VersionlessSubcommands])
		.subcommand(build_validate_subcommand())
		.subcommand(build_show_subcommand())
		.subcommand(build_generate_subcommand())
		.subcommand(build_normalize_subcommand())
		.get_matches()
}

fn build_validate_subcommand() -> App<'static, 'static> {
	SubCommand::with_name("validate")
		.about("Checks option files against the structural schema")
		.arg(
			Arg::with_name("PATHS")
				.help("Option files or directories of .yml/.yaml files")
				.required(true)
				.multiple(true)
				.index(1),
		)
		.arg(
			Arg::with_name("STRICT")
				.long("strict")
				.help("Treat unknown component types as errors"),
		)
}

fn build_show_subcommand() -> App<'static, 'static> {
	SubCommand::with_name("show")
		.about("Prints a summary of one option file")
		.arg(
			Arg::with_name("CONFIG_FILE")
				.help("The option file to inspect")
				.required(true)
				.index(1),
		)
		.arg(
			Arg::with_name("JSON")
				.long("json")
				.help("Dump the full parsed document as JSON instead"),
		)
}

fn build_generate_subcommand() -> App<'static, 'static> {
	SubCommand::with_name("generate")
		.about("Writes a training option file from a preset")
		.arg(
			Arg::with_name("OUTPUT_FILE")
				.help("Where to write the option file")
				.index(1),
		)
		.arg(
			Arg::with_name("PRESET")
				.long("preset")
				.short("p")
				.value_name("PRESET")
				.possible_values(&["esrgan", "realesrgan", "span"])
				.default_value("esrgan")
				.help("Training recipe to generate"),
		)
		.arg(
			Arg::with_name("SCALE")
				.long("scale")
				.short("s")
				.value_name("N")
				.help("Upscaling factor (default: 4)"),
		)
		.arg(
			Arg::with_name("EXAMPLE")
				.long("example")
				.help("Keep the explanatory comments in the generated file"),
		)
		.arg(
			Arg::with_name("FORCE")
				.long("force")
				.help("Overwrite the output file if it exists"),
		)
}

fn build_normalize_subcommand() -> App<'static, 'static> {
	SubCommand::with_name("normalize")
		.about("Re-serializes an option file in canonical form")
		.arg(
			Arg::with_name("INPUT_FILE")
				.help("The option file to normalize")
				.required(true)
				.index(1),
		)
		.arg(
			Arg::with_name("OUTPUT_FILE")
				.help("Where to write the canonical file (stdout if omitted)")
				.index(2),
		)
}
