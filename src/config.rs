use directories::UserDirs;
use regex::Regex;
use serde::Deserialize;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::constants::{CONFIG_DIR, CONFIG_FILE, ENTER_API_TOKEN, ENTER_INSTANCE_URL, ENTER_PROJECT_NAME};
use crate::external_api::report_portal_api::ReportPortalApi;
use crate::external_api::ApiError;

/// Values the api client needs, nothing else
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Instance url
    pub base_url: String,
    /// Project name as it appears in `/api/v1/{project}/...`
    pub project: String,
    /// User token from the ReportPortal profile page
    pub api_token: String,
}

impl Config {
    /// Build config from user answers
    pub fn from_input<R, W>(mut input: R, mut output: W) -> Result<Self, ApiError>
    where
        R: BufRead,
        W: Write,
    {
        let base_url = validate_url(ask(&mut input, &mut output, ENTER_INSTANCE_URL)?)?;
        let project = validate_project(ask(&mut input, &mut output, ENTER_PROJECT_NAME)?)?;
        let api_token = ask(&mut input, &mut output, ENTER_API_TOKEN)?;
        validate_api_token(&api_token)?;

        Ok(Self {
            base_url,
            project,
            api_token,
        })
    }

    /// Read config from file
    ///
    /// Параметры:
    /// - path_to_config: путь до конфига приложения
    pub fn get_config(path_to_config: &Path) -> Result<Self, ApiError> {
        if !path_to_config.is_file() {
            return Err(ApiError::ConfigNotFound(path_to_config.display().to_string()));
        }
        let file = File::open(path_to_config)?;
        Ok(serde_json::from_reader(file)?)
    }

    pub fn save(&self, path_to_config: &Path) -> Result<(), ApiError> {
        if let Some(parent) = path_to_config.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path_to_config, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn api_client(&self) -> Result<ReportPortalApi, ApiError> {
        ReportPortalApi::new(&self.base_url, &self.project, &self.api_token)
    }
}

/// `~/.config/rpq/config.json`
pub fn default_config_path() -> Result<PathBuf, ApiError> {
    UserDirs::new()
        .ok_or(ApiError::NotFoundUserDir)
        .map(|user_dirs| user_dirs.home_dir().join(CONFIG_DIR).join(CONFIG_FILE))
}

fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, prompt: &str) -> Result<String, ApiError> {
    output.write_all(prompt.as_bytes())?;
    output.flush()?;
    let mut input_value = String::new();
    input.read_line(&mut input_value)?;
    Ok(input_value.trim().to_string())
}

/// Введенная строка должна быть URL
fn validate_url(mut value: String) -> Result<String, ApiError> {
    let regex = Regex::new(r"^https?://.+$").map_err(|_| ApiError::InvalidUrl)?;
    if !regex.is_match(&value) {
        return Err(ApiError::InvalidUrl);
    }
    while value.ends_with('/') {
        value.pop();
    }
    Ok(value)
}

fn validate_project(value: String) -> Result<String, ApiError> {
    if value.is_empty() {
        return Err(ApiError::EmptyProject);
    }
    Ok(value)
}

/// Валидация токена: ReportPortal выдает UUID
fn validate_api_token(value: &str) -> Result<(), ApiError> {
    Uuid::parse_str(value).map(|_| ()).map_err(|_| ApiError::InvalidToken)
}
