use std::fs;
use std::io::{self, Read};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "html-placeholders",
    version,
    about = "Swap translatable HTML text for placeholders and back"
)]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,

    /// Read extra settings from a local TOML file
    #[arg(short = 'r', long = "read-settings", global = true)]
    read_settings: Option<String>,

    /// Enable verbose logging
    #[arg(long = "verbose", global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum CliCommand {
    /// Extract translatable text into a placeholder map (JSON on stdout)
    Extract {
        /// HTML file to read (default: stdin)
        #[arg(short = 'i', long = "input")]
        input: Option<String>,

        /// Extra CSS selector to exclude (repeatable)
        #[arg(short = 'e', long = "exclude")]
        exclude: Vec<String>,

        /// Include selector/attribute context for each string
        #[arg(long = "with-context")]
        with_context: bool,
    },
    /// Substitute translated text back into placeholder-bearing HTML
    Reconstruct {
        /// Placeholder HTML or extraction JSON (default: stdin)
        #[arg(short = 'i', long = "input")]
        input: Option<String>,

        /// JSON object of placeholder -> translated text
        #[arg(short = 't', long = "translations")]
        translations: String,

        /// Target language; sets lang/dir on <html>
        #[arg(short = 'l', long = "lang")]
        lang: Option<String>,
    },
    /// List placeholders that have no translation yet
    Missing {
        /// Extraction JSON written by `extract`
        #[arg(short = 'e', long = "extraction")]
        extraction: String,

        /// JSON object of placeholder -> translated text
        #[arg(short = 't', long = "translations")]
        translations: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    html_placeholders::logging::init(cli.verbose)?;

    let (command, input) = match cli.command {
        CliCommand::Extract {
            input,
            exclude,
            with_context,
        } => (
            html_placeholders::Command::Extract {
                excluded_selectors: exclude,
                with_context,
            },
            read_input(input.as_deref())?,
        ),
        CliCommand::Reconstruct {
            input,
            translations,
            lang,
        } => (
            html_placeholders::Command::Reconstruct {
                translations: read_file(&translations)?,
                language: lang,
            },
            read_input(input.as_deref())?,
        ),
        CliCommand::Missing {
            extraction,
            translations,
        } => (
            html_placeholders::Command::Missing {
                translations: read_file(&translations)?,
            },
            read_file(&extraction)?,
        ),
    };

    let output = html_placeholders::run(
        html_placeholders::Config {
            command,
            settings_path: cli.read_settings,
        },
        input,
    )?;

    println!("{}", output);
    Ok(())
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => read_file(path),
        None => {
            let mut buffer = Vec::new();
            io::stdin()
                .read_to_end(&mut buffer)
                .with_context(|| "failed to read stdin")?;
            Ok(html_placeholders::html::decode_html(&buffer)?.to_string())
        }
    }
}

fn read_file(path: &str) -> Result<String> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path))?;
    Ok(html_placeholders::html::decode_html(&bytes)?.to_string())
}
