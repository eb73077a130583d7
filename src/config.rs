use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::{env, fs, io};

use serde::Deserialize;

use crate::list_view::SortOrder;

const EXE_DIR_PLACEHOLDER: &str = "${exe_dir}";

#[derive(Deserialize, Debug)]
pub struct Paths {
    pub posts_dir: PathBuf,
    pub images_dir: PathBuf,
}

fn default_page_size() -> u32 { 10 }

#[derive(Deserialize, Debug)]
pub struct Defaults {
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default)]
    pub sort_order: SortOrder,
}

impl Default for Defaults {
    fn default() -> Self {
        Defaults {
            page_size: default_page_size(),
            sort_order: SortOrder::default(),
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct Server {
    pub address: String,
    pub port: u16,
}

#[derive(Deserialize, Debug)]
pub struct Log {
    pub level: LogLevel,
    pub log_to_console: bool,
    pub location: Option<PathBuf>,
}

#[derive(Deserialize, Copy, Clone, Debug, PartialEq)]
pub enum LogLevel {
    Critical = 0,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Deserialize, Debug)]
pub struct Config {
    pub paths: Paths,
    #[serde(default)]
    pub defaults: Defaults,
    pub server: Server,
    pub log: Option<Log>,
}

fn parse_path(path: PathBuf) -> io::Result<PathBuf> {
    if !path.starts_with(EXE_DIR_PLACEHOLDER) {
        return Ok(path);
    }

    let cur_exe = env::current_exe()?;
    let Some(exe_dir) = cur_exe.parent() else {
        return Err(io::Error::new(ErrorKind::NotFound, format!("No parent directory for {}", cur_exe.display())));
    };
    Ok(replace_exe_dir(&path, exe_dir))
}

fn replace_exe_dir(path: &Path, exe_dir: &Path) -> PathBuf {
    match path.strip_prefix(EXE_DIR_PLACEHOLDER) {
        Ok(rest) => exe_dir.join(rest),
        Err(_) => path.to_path_buf(),
    }
}

pub fn config_from_str(cfg_content: &str) -> io::Result<Config> {
    let mut cfg: Config = match toml::from_str::<Config>(cfg_content) {
        Ok(cfg) => cfg,
        Err(e) => return Err(io::Error::new(
            ErrorKind::InvalidData, format!("Error parsing configuration file: {}", e))),
    };

    cfg.paths = Paths {
        posts_dir: parse_path(cfg.paths.posts_dir)?,
        images_dir: parse_path(cfg.paths.images_dir)?,
    };
    if let Some(ref mut log) = cfg.log {
        log.location = log.location.take().map(parse_path).transpose()?;
    }

    Ok(cfg)
}

pub fn read_config(cfg_path: &Path) -> io::Result<Config> {
    let cfg_content = match fs::read_to_string(cfg_path) {
        Ok(content) => content,
        Err(e) => return Err(io::Error::new(e.kind(), format!("Error opening configuration file {}: {}", cfg_path.display(), e))),
    };

    config_from_str(&cfg_content)
}
