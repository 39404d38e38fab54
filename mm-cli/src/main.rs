// Command-line interface for mm
//
// This binary converts a file into another format, chaining as many
// intermediate conversions as the catalog requires.
//
// The formats are taken from the file names: the input's extension (with a
// content sniff to warn about mislabeled files) and the output's extension.
// Routing happens over the conversion catalog assembled from the builtin
// table plus whatever the installed tools report, then the chosen chain is
// executed through a scratch directory and the result moved onto the
// requested output path.
//
// Usage:
//  mm <input> <output>                   - Convert (formats from extensions)
//  mm <input> <output> --dry-run         - Show the plan, run nothing
//  mm --list-formats                     - List formats and probe the tools
//
// External tools (ffmpeg, pandoc, poppler) are probed, never assumed. A
// route that needs a missing tool is refused with an install hint unless
// --ignore-deps is passed.

use mm_cli::report;

use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use mm_config::{Loader, MmConfig};
use mm_convert::{
    build_graph, detect, probe_report, probe_tools, run_pipeline, OperationRegistry, RoutePlan,
    ToolPaths,
};
use std::path::Path;
use tracing::warn;
use tracing_subscriber::EnvFilter;

fn build_cli() -> Command {
    Command::new("mm")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A program to convert between most file extensions")
        .long_about(
            "mm converts files between formats, chaining conversions when no\n\
            single tool covers the pair.\n\n\
            Formats are taken from the file extensions. The conversion catalog\n\
            is assembled at startup from a builtin table plus what the installed\n\
            tools (ffmpeg, pandoc, poppler) report, so the set of reachable\n\
            formats depends on the machine.\n\n\
            Examples:\n  \
            mm talk.odp talk.pdf                  # One-step conversion\n  \
            mm paper.docx paper.png --dry-run     # Show the planned chain\n  \
            mm clip.mov clip.mp3 --overwrite      # Replace an existing output\n  \
            mm --list-formats                     # What this machine can do"
        )
        .arg_required_else_help(true)
        .arg(
            Arg::new("input")
                .help("The input file to be converted")
                .required_unless_present("list-formats")
                .index(1)
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("output")
                .help("The output file path")
                .required_unless_present("list-formats")
                .index(2)
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("overwrite")
                .long("overwrite")
                .short('o')
                .help("Overwrite the output file if it exists")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("ignore-deps")
                .long("ignore-deps")
                .help("Plan through missing tools and attempt the conversion anyway")
                .long_help(
                    "Route as if every external tool were installed.\n\n\
                    Without this flag, routing prefers chains whose tools are\n\
                    actually available and refuses to execute a chain that needs\n\
                    a missing tool.",
                )
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .help("Print the planned steps without executing them")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .help("List every known format and probe the external tools")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to an mm.toml configuration file")
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("ffmpeg-path")
                .long("ffmpeg-path")
                .value_name("PATH")
                .help("Path to the ffmpeg binary")
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("pandoc-path")
                .long("pandoc-path")
                .value_name("PATH")
                .help("Path to the pandoc binary")
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("pdftoppm-path")
                .long("pdftoppm-path")
                .value_name("PATH")
                .help("Path to the pdftoppm binary")
                .value_hint(ValueHint::FilePath),
        )
}

fn main() {
    init_logging();

    let matches = build_cli().get_matches();

    let config = load_cli_config(&matches);
    let paths = ToolPaths::from(&config.tools);

    if matches.get_flag("list-formats") {
        handle_list_formats_command(&paths);
        return;
    }

    let input = matches
        .get_one::<String>("input")
        .expect("input is required");
    let output = matches
        .get_one::<String>("output")
        .expect("output is required");
    handle_convert_command(input, output, &matches, &config, &paths);
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("MM_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Handle the default convert command
fn handle_convert_command(
    input: &str,
    output: &str,
    matches: &ArgMatches,
    config: &MmConfig,
    paths: &ToolPaths,
) {
    let input_path = Path::new(input);
    if !input_path.is_file() {
        eprintln!("Couldn't find the input file at '{input}'");
        std::process::exit(2);
    }

    let output_path = Path::new(output);
    if output_path.is_file() && !matches.get_flag("overwrite") {
        eprintln!("Output file already exists. Add the --overwrite flag to overwrite");
        std::process::exit(1);
    }

    let starting_format = resolve_format(input_path, true);
    let ending_format = resolve_format(output_path, false);

    let graph = build_graph(paths).unwrap_or_else(|err| {
        eprintln!("Failed to assemble the conversion catalog: {err}");
        std::process::exit(1);
    });
    let available = probe_tools(paths);
    let ignore_deps = matches.get_flag("ignore-deps");

    let plan: RoutePlan = match graph.resolve(&starting_format, &ending_format, &available, ignore_deps)
    {
        Ok(Some(plan)) => plan,
        Ok(None) => {
            eprintln!("No valid conversion path from {starting_format} to {ending_format} was found");
            std::process::exit(1);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    println!("Valid conversion path found: {}", plan.route);

    let missing = plan.route.missing_tools(&available);
    if !missing.is_empty() && !ignore_deps {
        eprint!("{}", report::render_missing_tools(&missing));
        std::process::exit(1);
    }

    if matches.get_flag("dry-run") {
        print!("{}", report::render_steps(&plan.steps, plan.route.requirements()));
        return;
    }

    let registry = OperationRegistry::with_defaults(paths, config.convert.raster_dpi);
    if let Err(err) = run_pipeline(&registry, &plan.steps, input_path, output_path) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

/// Handle the list-formats command
fn handle_list_formats_command(paths: &ToolPaths) {
    let graph = build_graph(paths).unwrap_or_else(|err| {
        eprintln!("Failed to assemble the conversion catalog: {err}");
        std::process::exit(1);
    });

    print!("{}", report::render_formats(&graph));
    println!();
    print!("{}", report::render_probes(&probe_report(paths)));
}

/// Format of a file per its name, with a content sniff for inputs. The
/// extension wins when the two disagree.
fn resolve_format(path: &Path, check_contents: bool) -> String {
    let detection = detect::detect(path, check_contents);
    if detection.disagrees() {
        warn!(
            path = %path.display(),
            extension = detection.extension.as_deref().unwrap_or(""),
            sniffed = detection.sniffed.as_deref().unwrap_or(""),
            "file contents look like a different format, trusting the extension"
        );
    }
    match detection.resolved() {
        Some(format) => format.to_string(),
        None => {
            eprintln!("Couldn't figure out the format for file '{}'", path.display());
            std::process::exit(1);
        }
    }
}

fn load_cli_config(matches: &ArgMatches) -> MmConfig {
    let mut loader = Loader::new().with_optional_file("mm.toml");
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }

    for (flag, key) in [
        ("ffmpeg-path", "tools.ffmpeg"),
        ("pandoc-path", "tools.pandoc"),
        ("pdftoppm-path", "tools.pdftoppm"),
    ] {
        if let Some(value) = matches.get_one::<String>(flag) {
            loader = loader.set_override(key, value.as_str()).unwrap_or_else(|err| {
                eprintln!("Failed to apply --{flag}: {err}");
                std::process::exit(1);
            });
        }
    }

    loader.build().unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {err}");
        std::process::exit(1);
    })
}
