use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of the CLI from src/main.rs. We need to duplicate this here since
// build scripts can't access src/ modules.
fn completion_cli() -> Command {
    Command::new("mm")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A program to convert between most file extensions")
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

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = completion_cli();

    generate_to(Bash, &mut cmd, "mm", &outdir)?;
    generate_to(Zsh, &mut cmd, "mm", &outdir)?;
    generate_to(Fish, &mut cmd, "mm", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
