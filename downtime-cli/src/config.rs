use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use downtime_ingest::{LoaderOptions, MonthExtractor};
use downtime_rules::{PipelineOptions, SummaryOptions};

/// Looked up inside the scanned directory when `--config` is not given.
pub const CONFIG_FILE_NAME: &str = "downtime.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub input: InputSection,
    pub report: ReportSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSection {
    /// Substring every export filename carries; also the primary pattern prefix.
    pub file_marker: String,
    pub extension: String,
    pub preferred_sheet: String,
    pub category_column: String,
    pub max_header_offset: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSection {
    pub sample_size: usize,
}

impl Default for InputSection {
    fn default() -> Self {
        Self {
            file_marker: "detenciones-Llenado_V2".to_string(),
            extension: "xlsx".to_string(),
            preferred_sheet: "detalle".to_string(),
            category_column: "CODIGO DETENCION".to_string(),
            max_header_offset: 9,
        }
    }
}

impl Default for ReportSection {
    fn default() -> Self {
        Self { sample_size: 5 }
    }
}

impl Config {
    pub fn extractor(&self) -> Result<MonthExtractor> {
        MonthExtractor::new(&self.input.file_marker, &self.input.extension)
            .context("building filename patterns")
    }

    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            loader: LoaderOptions {
                preferred_sheet: self.input.preferred_sheet.clone(),
                max_header_offset: self.input.max_header_offset,
            },
            summary: SummaryOptions {
                category_column: self.input.category_column.clone(),
                sample_size: self.report.sample_size,
            },
        }
    }
}

/// An explicit path must exist; the implicit `downtime.toml` is optional.
pub fn load_config(dir: &Path, explicit: Option<&Path>) -> Result<Config> {
    let path: PathBuf = match explicit {
        Some(p) => {
            if !p.exists() {
                bail!("config not found: {}", p.display());
            }
            p.to_path_buf()
        }
        None => {
            let p = dir.join(CONFIG_FILE_NAME);
            if !p.exists() {
                return Ok(Config::default());
            }
            p
        }
    };

    let s = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", path.display()))
}
