use std::env;
use std::fs;
use std::io::{self, Write};
use std::process;

use log::{debug, info};
use undaad::config::DecodeOptions;
use undaad::error::Result;
use undaad::game::GameFile;
use undaad::listing::Listing;
use undaad::text::TextStyle;

fn usage(program: &str) {
    eprintln!("Usage: {} <ddb_file> [output_file] [options]", program);
    eprintln!("\nOptions:");
    eprintln!("  -h             Show the header only");
    eprintln!("  -d             Write DSF syntax instead of SCE");
    eprintln!("  -v             Annotate output with offsets and raw bytes");
    eprintln!("  -o <offset>    Start of the DDB inside the file (decimal or 0x hex)");
    eprintln!("  -c <file>      Read options from a TOML file");
    eprintln!("  --help         Show this help message");
}

fn parse_offset(arg: &str) -> Option<usize> {
    match arg.strip_prefix("0x").or_else(|| arg.strip_prefix("0X")) {
        Some(hex) => usize::from_str_radix(hex, 16).ok(),
        None => arg.parse().ok(),
    }
}

/// Switches given on the command line; each overrides the config file
#[derive(Default)]
struct Switches {
    header_only: bool,
    dsf: bool,
    verbose: bool,
    offset: Option<usize>,
    config: Option<String>,
    input: Option<String>,
    output: Option<String>,
}

fn parse_args(args: &[String]) -> Switches {
    let mut switches = Switches::default();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" => switches.header_only = true,
            "-d" => switches.dsf = true,
            "-v" => switches.verbose = true,
            "-o" | "-c" => {
                let Some(value) = args.get(i + 1) else {
                    eprintln!("Option {} needs a value", args[i]);
                    process::exit(1);
                };
                if args[i] == "-c" {
                    switches.config = Some(value.clone());
                } else {
                    match parse_offset(value) {
                        Some(offset) => switches.offset = Some(offset),
                        None => {
                            eprintln!("Invalid offset: {}", value);
                            process::exit(1);
                        }
                    }
                }
                i += 1;
            }
            "--help" => {
                usage(&args[0]);
                process::exit(0);
            }
            arg if !arg.starts_with('-') => {
                if switches.input.is_none() {
                    switches.input = Some(arg.to_string());
                } else if switches.output.is_none() {
                    switches.output = Some(arg.to_string());
                } else {
                    eprintln!("Unexpected argument: {}", arg);
                    process::exit(1);
                }
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }
    switches
}

fn options(switches: &Switches) -> Result<DecodeOptions> {
    let mut options = match &switches.config {
        Some(path) => DecodeOptions::load(path)?,
        None => DecodeOptions::default(),
    };
    if switches.header_only {
        options.header_only = true;
    }
    if switches.dsf {
        options.style = TextStyle::Dsf;
    }
    if switches.verbose {
        options.verbose = true;
    }
    if let Some(offset) = switches.offset {
        options.offset = offset;
    }
    Ok(options)
}

fn run(switches: &Switches, input: &str) -> Result<()> {
    let options = options(switches)?;
    let bytes = fs::read(input)?;
    debug!("Loaded {} bytes from {}", bytes.len(), input);

    let text = if options.header_only {
        GameFile::decode_header(&bytes, &options)?.to_string()
    } else {
        let game = GameFile::decode(&bytes, &options)?;
        info!(
            "{} objects, {} locations, {} processes",
            game.objects.len(),
            game.location_texts.len(),
            game.processes.len()
        );
        Listing::new(&game, options.style, options.verbose).to_string()
    };

    match &switches.output {
        Some(path) => fs::write(path, text.as_bytes())?,
        None => io::stdout().write_all(text.as_bytes())?,
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = env::args().collect();
    let switches = parse_args(&args);
    let Some(input) = switches.input.clone() else {
        usage(&args[0]);
        process::exit(1);
    };

    if let Err(e) = run(&switches, &input) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
