use clap::{
    crate_authors, crate_description, crate_name, crate_version, Arg, ArgAction, ArgMatches,
    Command,
};
use std::path::Path;
use unfurl::{api, config::Config};

// The CLI layer should only parse inputs and forward them to library code.
fn main() -> miette::Result<()> {
    let matches = Command::new(crate_name!())
        .about(crate_description!())
        .author(crate_authors!())
        .version(crate_version!())
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Path to a config file (defaults to ./unfurl.toml when present)")
                .global(true),
        )
        .subcommand_required(true)
        .subcommand(
            Command::new("apply")
                .about("Materializes a manifest into a directory tree")
                .arg(
                    Arg::new("manifest")
                        .help("Manifest file, or - to read from stdin")
                        .required(true),
                )
                .arg(Arg::new("destination").help(
                    "Directory the tree is written into (overrides the config, default: files)",
                ))
                .arg(
                    Arg::new("confirm")
                        .help("Preview the tree and ask before writing")
                        .long("confirm")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("preview")
                .about("Prints the tree a manifest would produce without writing it")
                .arg(
                    Arg::new("manifest")
                        .help("Manifest file, or - to read from stdin")
                        .required(true),
                ),
        )
        .subcommand(
            Command::new("pack")
                .about("Serializes a directory into a manifest")
                .arg(
                    Arg::new("directory")
                        .help("Directory to serialize")
                        .required(true),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .help("Write the manifest to a file instead of stdout"),
                )
                .arg(
                    Arg::new("as-string")
                        .long("as-string")
                        .help("Wrap the manifest in a JSON string literal")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("copy")
                .about("Copies a directory tree verbatim to a destination")
                .arg(Arg::new("source").help("Directory to copy").required(true))
                .arg(
                    Arg::new("destination")
                        .help("The destination directory")
                        .required(true),
                ),
        )
        .get_matches();

    let is_verbose = matches.get_flag("verbose");

    init_logging(is_verbose);

    let config = Config::discover(matches.get_one::<String>("config").map(Path::new))
        .map_err(api::UnfurlError::from)?;

    match matches.subcommand() {
        Some(("apply", args)) => handle_apply(args, &config)?,
        Some(("preview", args)) => handle_preview(args, &config)?,
        Some(("pack", args)) => handle_pack(args)?,
        Some(("copy", args)) => handle_copy(args)?,
        _ => unreachable!(),
    }

    Ok(())
}

fn init_logging(is_verbose: bool) {
    let default_filter = if is_verbose { "debug" } else { "warn" };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    log::debug!("executing in verbose mode");
}

fn required<'a>(args: &'a ArgMatches, name: &str) -> &'a str {
    args.get_one::<String>(name)
        .map(String::as_str)
        .unwrap_or_default()
}

fn handle_apply(args: &ArgMatches, config: &Config) -> Result<(), api::UnfurlError> {
    let options = api::ApplyOptions {
        destination: args.get_one::<String>("destination").map(String::as_str),
        confirm: args.get_flag("confirm"),
    };

    api::apply_manifest(required(args, "manifest"), options, config)
}

fn handle_preview(args: &ArgMatches, config: &Config) -> Result<(), api::UnfurlError> {
    api::preview_manifest(required(args, "manifest"), config)
}

fn handle_pack(args: &ArgMatches) -> Result<(), api::UnfurlError> {
    api::pack_directory(
        required(args, "directory"),
        args.get_one::<String>("output").map(String::as_str),
        args.get_flag("as-string"),
    )
}

fn handle_copy(args: &ArgMatches) -> Result<(), api::UnfurlError> {
    api::copy_directory(required(args, "source"), required(args, "destination"))
}
