//! Configuration management module.
//!
//! This module handles loading and saving the application configuration:
//! frame rate, foreground headline, the particle fields to render and the
//! decorative layers to draw.

mod error;

pub use error::ConfigError;

use crate::decor::DecorOptions;
use crate::error::AppError;
use crate::field::{ColorTemplate, FieldOptions, DEFAULT_PARTICLE_COUNT, DEFAULT_TEMPLATE};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

const FILE_NAME: &str = "config.yml";
const DEFAULT_DIRECTORY_PATH: &str = ".config/particle-field";

/// Highest supported frame rate.
///
pub const MAX_FRAME_RATE: u32 = 240;

/// Oversees management of configuration file.
///
#[derive(Clone, Debug)]
pub struct Config {
    pub frame_rate: u32,
    pub headline: String,
    pub fields: Vec<FieldOptions>,
    pub decor: DecorOptions,
    file_path: Option<PathBuf>,
}

/// Define specification for configuration file.
///
#[derive(Serialize, Deserialize)]
struct FileSpec {
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,
    #[serde(default = "default_headline")]
    pub headline: String,
    #[serde(default = "default_fields")]
    pub fields: Vec<FieldSpec>,
    #[serde(default)]
    pub decor: DecorOptions,
}

/// One particle field entry in the configuration file.
///
#[derive(Serialize, Deserialize)]
struct FieldSpec {
    #[serde(default = "default_particle_color")]
    pub particle_color: String,
    #[serde(default = "default_particle_count")]
    pub particle_count: usize,
}

fn default_frame_rate() -> u32 {
    60
}

fn default_headline() -> String {
    "particle-field".to_string()
}

fn default_particle_color() -> String {
    DEFAULT_TEMPLATE.to_string()
}

fn default_particle_count() -> usize {
    DEFAULT_PARTICLE_COUNT
}

fn default_fields() -> Vec<FieldSpec> {
    vec![FieldSpec {
        particle_color: default_particle_color(),
        particle_count: default_particle_count(),
    }]
}

impl Config {
    /// Return a new instance holding the defaults.
    ///
    pub fn new() -> Config {
        Config {
            frame_rate: default_frame_rate(),
            headline: default_headline(),
            fields: vec![FieldOptions::default()],
            decor: DecorOptions::default(),
            file_path: None,
        }
    }

    /// Build a configuration from YAML text, validating every field.
    ///
    pub fn from_yaml(contents: &str) -> Result<Config, AppError> {
        let data: FileSpec = serde_yaml::from_str(contents)
            .map_err(|e| ConfigError::DeserializationFailed(e.to_string()))?;
        Config::from_spec(data)
    }

    fn from_spec(data: FileSpec) -> Result<Config, AppError> {
        if data.frame_rate == 0 || data.frame_rate > MAX_FRAME_RATE {
            return Err(ConfigError::InvalidFrameRate {
                value: data.frame_rate,
                max: MAX_FRAME_RATE,
            }
            .into());
        }
        let fields = data
            .fields
            .iter()
            .enumerate()
            .map(|(index, spec)| {
                ColorTemplate::parse(&spec.particle_color)
                    .map(|color| FieldOptions {
                        color,
                        particle_count: spec.particle_count,
                    })
                    .map_err(|source| ConfigError::InvalidField { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Config {
            frame_rate: data.frame_rate,
            headline: data.headline,
            fields,
            decor: data.decor,
            file_path: None,
        })
    }

    fn to_spec(&self) -> FileSpec {
        FileSpec {
            frame_rate: self.frame_rate,
            headline: self.headline.clone(),
            fields: self
                .fields
                .iter()
                .map(|f| FieldSpec {
                    particle_color: f.color.to_string(),
                    particle_count: f.particle_count,
                })
                .collect(),
            decor: self.decor,
        }
    }

    /// Try to load an existing configuration from the disk using the custom
    /// directory if provided. A missing file leaves the defaults in place.
    ///
    pub fn load(&mut self, custom_path: Option<&str>) -> Result<(), AppError> {
        let dir_path = match custom_path {
            Some(path) => Path::new(&path).to_path_buf(),
            None => Config::default_path()?,
        };
        let file_path = dir_path.join(Path::new(FILE_NAME));

        if file_path.exists() {
            let contents = fs::read_to_string(&file_path).map_err(|e| ConfigError::LoadFailed {
                path: file_path.clone(),
                message: format!("IO error: {}", e),
            })?;
            *self = Config::from_yaml(&contents)?;
        }
        self.file_path = Some(file_path);
        Ok(())
    }

    /// Serialize the current configuration and write it to disk, creating
    /// the parent directory if needed.
    ///
    pub fn save(&self) -> Result<(), AppError> {
        let file_path = self.file_path.as_ref().ok_or(ConfigError::FilePathNotSet)?;
        let content = serde_yaml::to_string(&self.to_spec())
            .map_err(|e| ConfigError::SerializationFailed(e.to_string()))?;

        if let Some(parent) = file_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| ConfigError::CreateDirectoryFailed {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        let mut file = fs::File::create(file_path).map_err(|e| ConfigError::SaveFailed {
            path: file_path.clone(),
            source: e,
        })?;
        write!(file, "{}", content).map_err(|e| ConfigError::SaveFailed {
            path: file_path.clone(),
            source: e,
        })?;
        file.flush().map_err(|e| ConfigError::SaveFailed {
            path: file_path.clone(),
            source: e,
        })?;
        Ok(())
    }

    /// Override the particle count of every configured field.
    ///
    pub fn set_particle_count(&mut self, count: usize) {
        for field in self.fields.iter_mut() {
            field.particle_count = count;
        }
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    /// Whether a configuration file exists at the resolved path.
    ///
    pub fn file_exists(&self) -> bool {
        self.file_path.as_ref().map(|p| p.exists()).unwrap_or(false)
    }

    /// Returns the path buffer for the default configuration directory or an
    /// error if the home directory could not be found.
    ///
    fn default_path() -> Result<PathBuf, AppError> {
        match dirs::home_dir() {
            Some(home) => {
                let home_path = Path::new(&home);
                let default_config_path = Path::new(DEFAULT_DIRECTORY_PATH);
                Ok(home_path.join(default_config_path))
            }
            None => Err(ConfigError::HomeDirectoryNotFound.into()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new()
    }
}
