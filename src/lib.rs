use anyhow::{Context, Result, anyhow};
use std::path::Path;
use tracing::info;

pub mod handler;
pub mod html;
pub mod languages;
pub mod logging;
pub mod settings;

pub use handler::{HtmlHandler, PlaceholderDocument, PlaceholderHandler};
pub use html::{
    ExtractOptions, ExtractionResult, HtmlExtractor, ReconstructOptions, TextMap, extract_html,
    reconstruct_html,
};

#[derive(Debug, Clone)]
pub enum Command {
    Extract {
        excluded_selectors: Vec<String>,
        with_context: bool,
    },
    Reconstruct {
        translations: String,
        language: Option<String>,
    },
    Missing {
        translations: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub command: Command,
    pub settings_path: Option<String>,
}

pub fn run(config: Config, input: String) -> Result<String> {
    let settings_path = config.settings_path.as_deref().map(Path::new);
    let settings = settings::load_settings(settings_path)?;
    if input.trim().is_empty() {
        return Err(anyhow!("input is empty"));
    }

    match config.command {
        Command::Extract {
            excluded_selectors,
            with_context,
        } => {
            let mut options = settings.extract_options();
            options.excluded_selectors.extend(excluded_selectors);
            options.capture_context |= with_context;
            let handler = HtmlHandler::new(options, settings.reconstruct_options(None));
            let result = handler.extractor().extract(&input)?;
            serde_json::to_string_pretty(&result).with_context(|| "failed to write extraction json")
        }
        Command::Reconstruct {
            translations,
            language,
        } => {
            let translated = parse_text_map(&translations)?;
            let modified_html = modified_html_from_input(&input)?;
            let handler = HtmlHandler::new(
                settings.extract_options(),
                settings.reconstruct_options(language),
            );
            handler.replace_placeholders(&modified_html, &translated)
        }
        Command::Missing { translations } => {
            let extraction: ExtractionResult = serde_json::from_str(&input)
                .with_context(|| "failed to parse extraction json")?;
            let translated = parse_text_map(&translations)?;
            let missing = html::missing_placeholders(&extraction.text_map, &translated);
            info!(
                "missing: {} of {} placeholders untranslated",
                missing.len(),
                extraction.text_map.len()
            );
            serde_json::to_string_pretty(&missing).with_context(|| "failed to write missing json")
        }
    }
}

fn parse_text_map(raw: &str) -> Result<TextMap> {
    serde_json::from_str(raw).with_context(|| "failed to parse translations json (expected a flat object)")
}

/// Reconstruction accepts either the placeholder-bearing HTML itself or the
/// JSON written by `extract`.
fn modified_html_from_input(input: &str) -> Result<String> {
    if input.trim_start().starts_with('{') {
        let extraction: ExtractionResult =
            serde_json::from_str(input).with_context(|| "failed to parse extraction json")?;
        return Ok(extraction.modified_html);
    }
    Ok(input.to_string())
}
