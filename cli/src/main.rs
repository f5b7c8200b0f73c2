//! prettytrace CLI — render error chains from the terminal.
//!
//! Usage:
//! ```bash
//! # Render a JSON chain description
//! prettytrace render --input chain.json
//!
//! # Read the description from stdin, force color, tail-limit the frames
//! cat chain.json | prettytrace render --input - --color --limit -5
//!
//! # Plain output, formatted lines as a JSON array
//! prettytrace render --input chain.json --plain --json
//! ```

use std::env;
use std::io::Read;
use std::process;

use anyhow::Context;

use prettytrace_core::{ErrorDesc, ExcInfo, FormatOptions, FrameWindow, TracebackFormatter};
use prettytrace_render::{theme, DefaultFormatter};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    match args[1].as_str() {
        "render" => {
            if let Err(err) = cmd_render(&args[2..]) {
                eprintln!("Render error: {err:#}");
                process::exit(1);
            }
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" | "-V" => {
            println!("prettytrace {}", env!("CARGO_PKG_VERSION"));
        }
        other => {
            eprintln!("Unknown command: {other}");
            print_usage();
            process::exit(1);
        }
    }
}

fn print_usage() {
    println!("prettytrace {}", env!("CARGO_PKG_VERSION"));
    println!("Render error chains as readable tracebacks\n");
    println!("USAGE:");
    println!("    prettytrace <COMMAND>\n");
    println!("COMMANDS:");
    println!("    render    Render a JSON chain description");
    println!("    version   Print version");
    println!("    help      Print this help\n");
    println!("RENDER FLAGS:");
    println!("    --input <FILE>    Chain description, `-` for stdin  [required]");
    println!("    --theme <PAIRS>   Theme selector (key=value|key=value)");
    println!("    --plain           Classic rendering, no theme");
    println!("    --no-chain        Ignore cause/context links");
    println!("    --limit <N>       Keep the first N frames (last N when negative)");
    println!("    --color           Embed color even when stdout is not a terminal");
    println!("    --json            Emit the formatted lines as a JSON array");
}

fn cmd_render(args: &[String]) -> anyhow::Result<()> {
    let mut input: Option<&str> = None;
    let mut selector: Option<&str> = None;
    let mut plain = false;
    let mut chain = true;
    let mut limit: Option<i64> = None;
    let mut color = false;
    let mut as_json = false;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                i += 1;
                input = args.get(i).map(|s| s.as_str());
            }
            "--theme" => {
                i += 1;
                selector = args.get(i).map(|s| s.as_str());
            }
            "--plain" => plain = true,
            "--no-chain" => chain = false,
            "--limit" => {
                i += 1;
                let raw = args.get(i).context("--limit needs a value")?;
                limit = Some(raw.parse().with_context(|| format!("invalid limit: {raw}"))?);
            }
            "--color" => color = true,
            "--json" => as_json = true,
            flag => {
                anyhow::bail!("unknown flag: {flag}");
            }
        }
        i += 1;
    }

    let input = input.context("--input is required")?;
    let document = read_input(input)?;
    let desc: ErrorDesc =
        serde_json::from_str(&document).context("invalid chain description")?;
    let error = desc.build();

    let formatter = if plain {
        DefaultFormatter::new()
    } else {
        let theme = match selector {
            Some(selector) => theme::parse_theme(selector),
            None => theme::env_theme(prettytrace_render::hook::ENV_THEME)
                .unwrap_or_default(),
        };
        DefaultFormatter::pretty(theme)
    };

    let options = FormatOptions::default()
        .chain(chain)
        .limit(FrameWindow::from_limit(limit))
        .color(color);
    let info = ExcInfo::of(&error);

    if as_json {
        let lines = formatter.format_error(&info, &options);
        println!("{}", serde_json::to_string_pretty(&lines)?);
    } else {
        formatter.write_error(&info, &options, &mut std::io::stdout())?;
    }
    Ok(())
}

fn read_input(input: &str) -> anyhow::Result<String> {
    if input == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("reading stdin")?;
        Ok(buffer)
    } else {
        std::fs::read_to_string(input).with_context(|| format!("reading {input}"))
    }
}
