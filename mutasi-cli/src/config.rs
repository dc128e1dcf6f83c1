use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Datelike, Utc};
use chrono_tz::Tz;
use mutasi_report::ExportFormat;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::ensure_mutasi_home;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub export: ExportSection,
    #[serde(default)]
    pub parse: ParseSection,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExportSection {
    #[serde(default)]
    pub format: ExportFormat,
    /// Write exports here instead of next to each input file
    pub out_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseSection {
    /// Year for statements whose PERIODE carries none. Unset means "this year".
    pub fallback_year: Option<i32>,
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

impl Default for ParseSection {
    fn default() -> Self {
        Self {
            fallback_year: None,
            timezone: default_timezone(),
        }
    }
}

fn default_timezone() -> String {
    "Asia/Jakarta".to_string()
}

impl Config {
    /// Configured fallback year, or the current year in the configured timezone.
    pub fn fallback_year(&self, now: DateTime<Utc>) -> Result<i32> {
        match self.parse.fallback_year {
            Some(year) => Ok(year),
            None => year_in_timezone(&self.parse.timezone, now),
        }
    }
}

pub fn year_in_timezone(timezone: &str, now: DateTime<Utc>) -> Result<i32> {
    let tz: Tz = timezone
        .parse()
        .map_err(|e| anyhow!("invalid timezone {timezone:?}: {e}"))?;
    Ok(now.with_timezone(&tz).year())
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_mutasi_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
}

pub fn load_config_from(p: &Path) -> Result<Config> {
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_config_to(cfg: &Config, p: &Path) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config_to(&Config::default(), &p)?;
    println!("Wrote {}", p.display());
    Ok(())
}

pub fn show_config() -> Result<()> {
    let p = config_path()?;
    let cfg = load_config_from(&p)?;
    println!("# {}", p.display());
    print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
    Ok(())
}
