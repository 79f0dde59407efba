// Command-line interface for duplex
//
// This binary exposes the conversion pipeline of duplex-babel: the same Markdown serializer and
// parser an editor runs when switching between rich and Markdown mode, plus the caption scanner.
//
// Converting:
//
// The conversion needs a to and from pair. The from can be auto-detected from the file extension,
// while being overwrittable by an explicit --from flag.
// Usage:
//  duplex <input> --to <format> [--from <format>] [--output <file>]           - Convert between formats (default)
//  duplex convert <input> --to <format> [--from <format>] [--output <file>]   - Same as above (explicit)
//  duplex captions <input> [--from <format>]                                  - List caption decorations
//  duplex list-formats                                                        - List available formats
//
// Extra Parameters:
//
// Format-specific parameters can be passed using --extra-<parameter-name> <value>.
// Parameters that mirror configuration keys (e.g. --extra-bullet-marker) update the loaded
// configuration; the rest are handed to the target format.
// Example:
//  duplex notes.md --to tag --extra-show-pos

use clap::{Arg, ArgAction, Command, ValueHint};
use duplex_babel::decorations::{DecorationKind, DecorationSource};
use duplex_babel::formats::markdown::{MarkdownFormat, MarkdownOptions, MarkdownParser};
use duplex_babel::{Document, FormatRegistry, ParserSettings};
use duplex_config::{DuplexConfig, Loader};
use std::collections::HashMap;
use std::fs;

const SUBCOMMANDS: &[&str] = &["convert", "captions", "list-formats", "help"];

/// Parse extra-* arguments from command line args
/// Returns (cleaned_args_without_extras, extra_params_map)
///
/// Supports both:
/// - `--extra-<key> <value>` (explicit value)
/// - `--extra-<key>` (boolean flag, defaults to "true")
/// - `--extras-<key>` (alias for `--extra-<key>`)
fn parse_extra_args(args: &[String]) -> (Vec<String>, HashMap<String, String>) {
    let mut cleaned_args = Vec::new();
    let mut extra_params = HashMap::new();
    let mut i = 0;

    while i < args.len() {
        let arg = &args[i];

        let key_opt = arg
            .strip_prefix("--extra-")
            .or_else(|| arg.strip_prefix("--extras-"));

        if let Some(key) = key_opt {
            let has_value = args
                .get(i + 1)
                .map(|next| !next.starts_with('-'))
                .unwrap_or(false);

            if has_value {
                extra_params.insert(key.to_string(), args[i + 1].clone());
                i += 2;
            } else {
                extra_params.insert(key.to_string(), "true".to_string());
                i += 1;
            }
            continue;
        }

        cleaned_args.push(arg.clone());
        i += 1;
    }

    (cleaned_args, extra_params)
}

fn input_arg(name: &'static str) -> Arg {
    Arg::new(name)
        .help("Input file path")
        .required(true)
        .index(1)
        .value_hint(ValueHint::FilePath)
}

fn from_arg() -> Arg {
    Arg::new("from")
        .long("from")
        .help("Source format (auto-detected from file extension if not specified)")
        .value_hint(ValueHint::Other)
}

fn build_cli() -> Command {
    Command::new("duplex")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert between Markdown and rich-text markup")
        .long_about(
            "duplex converts documents between GitHub-flavored Markdown and the nested-tag\n\
            markup form used by rich-text editors, the same way an editor does when it\n\
            switches between rich and Markdown mode.\n\n\
            Extra Parameters:\n  \
            Use --extra-<name> [value] to pass options.\n  \
            Boolean flags can omit the value (defaults to 'true').\n\n\
            Examples:\n  \
            duplex notes.md --to html                  # Markdown to markup (stdout)\n  \
            duplex page.html --to markdown -o page.md  # Markup to Markdown file\n  \
            duplex notes.md --to tag --extra-show-pos  # Inspect the document tree\n  \
            duplex captions notes.md                   # List caption decorations",
        )
        .arg_required_else_help(true)
        .subcommand_required(false)
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a duplex.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert between document formats (default command)")
                .long_about(
                    "Convert documents between different formats.\n\n\
                    Supported formats:\n  \
                    - markdown: GitHub-flavored Markdown with ==highlight== (.md)\n  \
                    - html:     Markup form (.html)\n  \
                    - tag:      XML-like dump of the document tree (output only)\n  \
                    - json:     Document tree as JSON (output only)\n\n\
                    The source format is auto-detected from the file extension.\n\
                    Output goes to stdout by default, or use -o to specify a file.",
                )
                .arg(input_arg("input"))
                .arg(from_arg())
                .arg(
                    Arg::new("to")
                        .long("to")
                        .help("Target format (required)")
                        .required(true)
                        .value_hint(ValueHint::Other),
                )
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
                .long_about(
                    "Parse a document and print every decoration the caption scanner\n\
                    produces, one per line: kind, position range and style.\n\n\
                    A caption is a paragraph wrapped in the configured marker,\n\
                    e.g. ^^^Figure 1^^^.",
                )
                .arg(input_arg("input"))
                .arg(from_arg()),
        )
        .subcommand(
            Command::new("list-formats")
                .about("List available formats")
                .arg(
                    Arg::new("verbose")
                        .long("verbose")
                        .short('v')
                        .help("Show descriptions and supported directions")
                        .action(ArgAction::SetTrue),
                ),
        )
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().collect();

    // Parse extra-* arguments before clap processing
    let (cleaned_args, mut extra_params) = parse_extra_args(&args);

    let cli = build_cli();
    let matches = match cli.clone().try_get_matches_from(&cleaned_args) {
        Ok(m) => m,
        Err(e) => {
            // A leading file path means the implicit convert command
            if cleaned_args.len() > 1
                && !cleaned_args[1].starts_with('-')
                && !SUBCOMMANDS.contains(&cleaned_args[1].as_str())
            {
                let mut new_args = vec![cleaned_args[0].clone(), "convert".to_string()];
                new_args.extend_from_slice(&cleaned_args[1..]);

                match cli.try_get_matches_from(&new_args) {
                    Ok(m) => m,
                    Err(e2) => e2.exit(),
                }
            } else {
                e.exit();
            }
        }
    };

    let mut config = load_cli_config(matches.get_one::<String>("config").map(|s| s.as_str()));
    apply_config_overrides(&mut config, &mut extra_params);

    match matches.subcommand() {
        Some(("convert", sub_matches)) => {
            let Some(input) = sub_matches.get_one::<String>("input") else {
                exit_with("input is required");
            };
            let Some(to) = sub_matches.get_one::<String>("to") else {
                exit_with("--to is required");
            };
            let registry = registry_from_config(&config);
            let from = resolve_from(&registry, input, sub_matches.get_one::<String>("from"));
            let output = sub_matches.get_one::<String>("output").map(|s| s.as_str());
            handle_convert_command(&registry, input, &from, to, output, &extra_params);
        }
        Some(("captions", sub_matches)) => {
            let Some(input) = sub_matches.get_one::<String>("input") else {
                exit_with("input is required");
            };
            let registry = registry_from_config(&config);
            let from = resolve_from(&registry, input, sub_matches.get_one::<String>("from"));
            handle_captions_command(&registry, input, &from, &config);
        }
        Some(("list-formats", sub_matches)) => {
            handle_list_formats_command(&registry_from_config(&config), sub_matches.get_flag("verbose"));
        }
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            std::process::exit(1);
        }
    }
}

fn exit_with(message: &str) -> ! {
    eprintln!("Error: {message}");
    std::process::exit(1);
}

/// Registry whose Markdown format follows the loaded configuration
fn registry_from_config(config: &DuplexConfig) -> FormatRegistry {
    let mut registry = FormatRegistry::default();
    let options: MarkdownOptions = (&config.markdown.serialize).into();
    let settings: ParserSettings = (&config.markdown.parse).into();
    registry.register(MarkdownFormat::new(
        options,
        MarkdownParser::from_settings(&settings),
    ));
    registry
}

fn resolve_from(registry: &FormatRegistry, input: &str, explicit: Option<&String>) -> String {
    if let Some(from) = explicit {
        return from.to_string();
    }
    match registry.detect_format_from_filename(input) {
        Some(detected) => detected,
        None => {
            eprintln!("Error: Could not detect format from filename '{input}'");
            eprintln!("Please specify --from explicitly");
            std::process::exit(1);
        }
    }
}

fn read_document(registry: &FormatRegistry, input: &str, from: &str) -> Document {
    if let Err(e) = registry.get(from) {
        exit_with(&e.to_string());
    }

    let source = fs::read_to_string(input).unwrap_or_else(|e| {
        eprintln!("Error reading file '{input}': {e}");
        std::process::exit(1);
    });

    registry.parse(&source, from).unwrap_or_else(|e| {
        eprintln!("Parse error: {e}");
        std::process::exit(1);
    })
}

/// Handle the convert command
fn handle_convert_command(
    registry: &FormatRegistry,
    input: &str,
    from: &str,
    to: &str,
    output: Option<&str>,
    extra_params: &HashMap<String, String>,
) {
    if let Err(e) = registry.get(to) {
        exit_with(&e.to_string());
    }

    let doc = read_document(registry, input, from);
    log::debug!("parsed '{input}' as {from}: {} blocks", doc.children.len());

    let result = registry
        .serialize_with_options(&doc, to, extra_params)
        .unwrap_or_else(|e| {
            eprintln!("Serialization error: {e}");
            std::process::exit(1);
        });

    match output {
        Some(path) => {
            fs::write(path, with_trailing_newline(result)).unwrap_or_else(|e| {
                eprintln!("Error writing file '{path}': {e}");
                std::process::exit(1);
            });
        }
        None => print!("{}", with_trailing_newline(result)),
    }
}

fn with_trailing_newline(mut text: String) -> String {
    if !text.ends_with('\n') {
        text.push('\n');
    }
    text
}

/// Handle the captions command
fn handle_captions_command(registry: &FormatRegistry, input: &str, from: &str, config: &DuplexConfig) {
    let Some(scanner) = config.decorations.caption.scanner() else {
        eprintln!("Caption decorations are disabled in the configuration");
        return;
    };

    let doc = read_document(registry, input, from);
    for decoration in scanner.decorations(&doc) {
        let kind = match decoration.kind {
            DecorationKind::Node => "node",
            DecorationKind::Inline => "inline",
        };
        println!(
            "{kind} {}..{} {}",
            decoration.from, decoration.to, decoration.style
        );
    }
}

/// Handle the list-formats command
fn handle_list_formats_command(registry: &FormatRegistry, verbose: bool) {
    for name in registry.list_formats() {
        if !verbose {
            println!("{name}");
            continue;
        }
        let Ok(format) = registry.get(&name) else {
            continue;
        };
        let directions = match (format.supports_parsing(), format.supports_serialization()) {
            (true, true) => "in/out",
            (true, false) => "in",
            (false, true) => "out",
            (false, false) => "-",
        };
        println!("{name:<10} {directions:<7} {}", format.description());
    }
}

fn load_cli_config(explicit_path: Option<&str>) -> DuplexConfig {
    let loader = Loader::new().with_optional_file("duplex.toml");
    let loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };

    loader.build().unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {err}");
        std::process::exit(1);
    })
}

fn apply_config_overrides(config: &mut DuplexConfig, extra_params: &mut HashMap<String, String>) {
    let serialize = &mut config.markdown.serialize;
    if let Some(raw) = take_override(extra_params, &["bullet-marker", "bullet"]) {
        serialize.bullet_marker = match raw.as_str() {
            "-" | "*" | "+" => raw.chars().next().unwrap_or('-'),
            other => {
                eprintln!("Invalid bullet marker '{other}' for --extra-bullet-marker");
                std::process::exit(1);
            }
        };
    }
    if let Some(raw) = take_override(extra_params, &["emphasis"]) {
        serialize.emphasis_delimiter = raw;
    }
    if let Some(raw) = take_override(extra_params, &["strong"]) {
        serialize.strong_delimiter = raw;
    }
    if let Some(raw) = extra_params.remove("normalize-quotes") {
        serialize.normalize_quotes = parse_bool_arg("normalize-quotes", &raw);
    }
    if let Some(raw) = extra_params.remove("keep-tags") {
        serialize.keep_tags = raw
            .split(',')
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
    }

    let parse = &mut config.markdown.parse;
    if let Some(raw) = extra_params.remove("permissive-strong") {
        parse.permissive_strong = parse_bool_arg("permissive-strong", &raw);
    }
    if let Some(raw) = extra_params.remove("highlight") {
        parse.highlight = parse_bool_arg("highlight", &raw);
    }
    if let Some(raw) = take_override(extra_params, &["literal-task-items", "literal-tasks"]) {
        parse.literal_task_items = parse_bool_arg("literal-task-items", &raw);
    }

    let caption = &mut config.decorations.caption;
    if let Some(raw) = extra_params.remove("captions") {
        caption.enabled = parse_bool_arg("captions", &raw);
    }
    if let Some(raw) = extra_params.remove("caption-marker") {
        caption.marker = raw;
    }
}

fn take_override(map: &mut HashMap<String, String>, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(value) = map.remove(*key) {
            return Some(value);
        }
    }
    None
}

fn parse_bool_arg(flag: &str, raw: &str) -> bool {
    match raw.to_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => true,
        "false" | "0" | "no" | "n" => false,
        other => {
            eprintln!("Invalid boolean value '{other}' for --extra-{flag}");
            std::process::exit(1);
        }
    }
}
