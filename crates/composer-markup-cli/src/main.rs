use anyhow::{Context, Result, bail};
use composer_markup_config::Config;
use composer_markup_engine::{
    FormattedText, ParseOptions, entities_to_markup, parse_for_editable, parse_formatted_bytes,
};
use std::{
    env,
    io::{Read, stdin},
    path::Path,
    process,
};

const USAGE: &str = "\
Usage:
  composer-markup parse <file|->           committed message JSON from markup
  composer-markup live <file|-> <caret>    live-editing markup and caret
  composer-markup render <json-file|->     markup from formatted text JSON";

enum Command {
    Parse { input: String },
    Live { input: String, caret: usize },
    Render { input: String },
}

fn parse_args(args: &[String]) -> Result<Command> {
    match args {
        [_, cmd, input] if cmd == "parse" => Ok(Command::Parse {
            input: input.clone(),
        }),
        [_, cmd, input, caret] if cmd == "live" => Ok(Command::Live {
            input: input.clone(),
            caret: caret
                .parse()
                .with_context(|| format!("Invalid caret offset: {caret}"))?,
        }),
        [_, cmd, input] if cmd == "render" => Ok(Command::Render {
            input: input.clone(),
        }),
        _ => bail!("Unrecognized arguments"),
    }
}

fn read_input(input: &str) -> Result<Vec<u8>> {
    if input == "-" {
        let mut buf = Vec::new();
        stdin()
            .read_to_end(&mut buf)
            .context("Failed to read standard input")?;
        return Ok(buf);
    }
    std::fs::read(Path::new(input)).with_context(|| format!("Failed to read {input}"))
}

fn load_options() -> Result<ParseOptions> {
    let config_path = Config::default_path();
    match Config::load()? {
        Some(config) => {
            log::info!("Loaded config from {}", config_path.display());
            Ok(config.parse_options())
        }
        None => {
            log::debug!("No config at {}, using defaults", config_path.display());
            Ok(ParseOptions::default())
        }
    }
}

fn run(command: Command) -> Result<()> {
    let options = load_options()?;
    match command {
        Command::Parse { input } => {
            let formatted = parse_formatted_bytes(&read_input(&input)?, &options)?;
            println!("{}", serde_json::to_string_pretty(&formatted)?);
        }
        Command::Live { input, caret } => {
            let bytes = read_input(&input)?;
            let markup = std::str::from_utf8(&bytes).context("Markup is not valid UTF-8")?;
            let live = parse_for_editable(markup, caret, &options);
            println!("{}", live.markup);
            println!("caret: {}", live.caret);
            println!("active: {}", live.active_style);
        }
        Command::Render { input } => {
            let bytes = read_input(&input)?;
            let json = std::str::from_utf8(&bytes).context("Input is not valid UTF-8")?;
            let formatted = FormattedText::from_json(json)?;
            println!("{}", entities_to_markup(&formatted));
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Warn)
        .init();

    let args: Vec<String> = env::args().collect();
    let command = match parse_args(&args) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("{USAGE}");
            process::exit(1);
        }
    };

    run(command)
}
