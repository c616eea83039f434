use std::io::{BufRead, Write};
use std::path::Path;

use crate::config::Config;
use crate::constants::Message;
use crate::external_api::ApiError;

/// Ask for config values and save them to `path_to_config`
pub fn init_config<R, W>(path_to_config: &Path, input: R, output: W) -> Result<String, ApiError>
where
    R: BufRead,
    W: Write,
{
    let config = Config::from_input(input, output)?;
    config.save(path_to_config)?;
    tracing::info!(path = %path_to_config.display(), "config saved");
    Ok(Message::ConfigSaved(path_to_config.display().to_string()).to_formatted_string())
}
