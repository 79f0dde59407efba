use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of the format names registered by FormatRegistry::with_defaults.
// Build scripts can't access the library, so the list is duplicated here.
const AVAILABLE_FORMATS: &[&str] = &["html", "json", "markdown", "tag"];

fn format_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .help(help)
        .value_parser(clap::builder::PossibleValuesParser::new(AVAILABLE_FORMATS))
        .value_hint(ValueHint::Other)
}

fn input_arg() -> Arg {
    Arg::new("input")
        .help("Input file path")
        .required(true)
        .index(1)
        .value_hint(ValueHint::FilePath)
}

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = Command::new("duplex")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert between Markdown and rich-text markup")
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .help("Path to a duplex.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert between document formats (default command)")
                .arg(input_arg())
                .arg(format_arg("from", "Source format"))
                .arg(format_arg("to", "Target format").required(true))
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output file path (defaults to stdout)")
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("captions")
                .about("List the caption decorations of a document")
                .arg(input_arg())
                .arg(format_arg("from", "Source format")),
        )
        .subcommand(
            Command::new("list-formats").about("List available formats").arg(
                Arg::new("verbose")
                    .long("verbose")
                    .short('v')
                    .action(ArgAction::SetTrue),
            ),
        );

    // Generate completions for bash
    generate_to(Bash, &mut cmd, "duplex", &outdir)?;

    // Generate completions for zsh
    generate_to(Zsh, &mut cmd, "duplex", &outdir)?;

    // Generate completions for fish
    generate_to(Fish, &mut cmd, "duplex", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
