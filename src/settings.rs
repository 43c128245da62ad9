use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::html::{DEFAULT_PAGE_STATE_SCRIPT_IDS, ExtractOptions, ReconstructOptions};

const DEFAULT_SETTINGS_TOML: &str = include_str!("../settings.toml");

const SETTINGS_FILE: &str = "html-placeholders.toml";
const LOCAL_SETTINGS_FILE: &str = "html-placeholders.local.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExcludedTranslationBlock {
    pub name: String,
    #[serde(default)]
    pub selectors: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub excluded_blocks: Vec<ExcludedTranslationBlock>,
    pub capture_context: bool,
    pub page_state_script_ids: Vec<String>,
    pub set_lang: bool,
    pub set_direction: bool,
    pub overwrite_og_locale: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            excluded_blocks: Vec::new(),
            capture_context: false,
            page_state_script_ids: DEFAULT_PAGE_STATE_SCRIPT_IDS
                .iter()
                .map(|id| id.to_string())
                .collect(),
            set_lang: true,
            set_direction: true,
            overwrite_og_locale: false,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    extraction: Option<ExtractionSettings>,
    excluded_blocks: Option<Vec<ExcludedTranslationBlock>>,
    reconstruction: Option<ReconstructionSettings>,
}

#[derive(Debug, Default, Deserialize)]
struct ExtractionSettings {
    capture_context: Option<bool>,
    page_state_script_ids: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
struct ReconstructionSettings {
    set_lang: Option<bool>,
    set_direction: Option<bool>,
    overwrite_og_locale: Option<bool>,
}

pub fn load_settings(extra_path: Option<&Path>) -> Result<Settings> {
    load_settings_from(Path::new("."), extra_path)
}

pub fn load_settings_from(base_dir: &Path, extra_path: Option<&Path>) -> Result<Settings> {
    let mut settings = Settings::default();
    let defaults: SettingsFile = toml::from_str(DEFAULT_SETTINGS_TOML)
        .with_context(|| "failed to parse bundled settings")?;
    settings.merge(defaults);

    let mut ordered_paths = vec![base_dir.join(SETTINGS_FILE), base_dir.join(LOCAL_SETTINGS_FILE)];
    if let Some(extra) = extra_path {
        if !extra.exists() {
            return Err(anyhow!("settings file not found: {}", extra.display()));
        }
        ordered_paths.push(extra.to_path_buf());
    }

    for path in ordered_paths {
        if path.exists() {
            settings.merge(read_settings_file(&path)?);
        }
    }

    Ok(settings)
}

fn read_settings_file(path: &Path) -> Result<SettingsFile> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read settings: {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("failed to parse settings: {}", path.display()))
}

impl Settings {
    fn merge(&mut self, incoming: SettingsFile) {
        if let Some(extraction) = incoming.extraction {
            if let Some(capture) = extraction.capture_context {
                self.capture_context = capture;
            }
            if let Some(ids) = extraction.page_state_script_ids {
                self.page_state_script_ids = ids
                    .into_iter()
                    .map(|id| id.trim().to_string())
                    .filter(|id| !id.is_empty())
                    .collect();
            }
        }
        if let Some(blocks) = incoming.excluded_blocks {
            for block in blocks {
                if let Some(existing) = self
                    .excluded_blocks
                    .iter_mut()
                    .find(|existing| existing.name == block.name)
                {
                    *existing = block;
                } else {
                    self.excluded_blocks.push(block);
                }
            }
        }
        if let Some(reconstruction) = incoming.reconstruction {
            if let Some(value) = reconstruction.set_lang {
                self.set_lang = value;
            }
            if let Some(value) = reconstruction.set_direction {
                self.set_direction = value;
            }
            if let Some(value) = reconstruction.overwrite_og_locale {
                self.overwrite_og_locale = value;
            }
        }
    }

    pub fn excluded_selectors(&self) -> Vec<String> {
        self.excluded_blocks
            .iter()
            .flat_map(|block| block.selectors.iter())
            .map(|selector| selector.trim().to_string())
            .filter(|selector| !selector.is_empty())
            .collect()
    }

    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            excluded_selectors: self.excluded_selectors(),
            capture_context: self.capture_context,
            page_state_script_ids: self.page_state_script_ids.clone(),
        }
    }

    pub fn reconstruct_options(&self, language: Option<String>) -> ReconstructOptions {
        ReconstructOptions {
            language,
            set_lang: self.set_lang,
            set_direction: self.set_direction,
            overwrite_og_locale: self.overwrite_og_locale,
        }
    }
}
