//! Configuration commands.
//!
//! - `config show`: Display current configuration
//! - `config get`: Print one value
//! - `config set`: Set a configuration value
//! - `config path`: Print where the configuration lives

use owo_colors::OwoColorize;
use serde_json::json;

use super::CommandOutput;
use crate::cli::OutputOptions;
use crate::config::Config;
use crate::error::Result;

/// Show current configuration
pub fn cmd_config_show(output: OutputOptions) -> Result<()> {
    let config = Config::load()?;
    let token_configured = config.token().is_some();

    let json_output = json!({
        "api_url": config.api_url(),
        "auth": {
            "token_configured": token_configured,
        },
        "timeout": config.timeout,
        "page_size": config.page_size,
        "search_debounce_ms": config.search_debounce_ms,
        "config_file": Config::config_path().to_string_lossy(),
    });

    let mut text_output = String::new();
    text_output.push_str(&format!("{}\n\n", "Configuration:".cyan().bold()));

    match config.api_url() {
        Some(url) => text_output.push_str(&format!("{}: {url}\n", "api_url".cyan())),
        None => text_output.push_str(&format!(
            "{}: {}\n",
            "api_url".cyan(),
            "not configured".dimmed()
        )),
    }

    let token_status = if token_configured {
        "configured".green().to_string()
    } else {
        "not configured".dimmed().to_string()
    };
    text_output.push_str(&format!("{}:\n", "auth".cyan()));
    text_output.push_str(&format!("  token: {token_status}\n\n"));

    text_output.push_str(&format!("{}: {}s\n", "timeout".cyan(), config.timeout));
    text_output.push_str(&format!("{}: {}\n", "page_size".cyan(), config.page_size));
    text_output.push_str(&format!(
        "{}: {}ms\n\n",
        "search_debounce_ms".cyan(),
        config.search_debounce_ms
    ));
    text_output.push_str(&format!(
        "{}",
        format!("Config file: {}", Config::config_path().display()).dimmed()
    ));

    CommandOutput::new(json_output)
        .with_text(text_output)
        .print(output)
}

/// Get a specific configuration value
pub fn cmd_config_get(key: &str, output: OutputOptions) -> Result<()> {
    let config = Config::load()?;
    let value = config.get(key)?;
    let configured = !value.is_empty();

    let text_output = if configured {
        value.clone()
    } else {
        "not configured".dimmed().to_string()
    };
    CommandOutput::new(json!({
        "key": key,
        "value": configured.then_some(value),
        "configured": configured,
        "masked": key == "auth.token" && configured,
    }))
    .with_text(text_output)
    .print(output)
}

/// Set a configuration value
pub fn cmd_config_set(key: &str, value: &str, output: OutputOptions) -> Result<()> {
    let mut config = Config::load()?;
    config.set(key, value)?;
    config.save()?;

    let shown = config.get(key)?;
    CommandOutput::new(json!({
        "action": "config_set",
        "key": key,
        "value": shown,
        "success": true,
    }))
    .with_text(format!("Set {} to {}", key.cyan(), shown))
    .print(output)
}

pub fn cmd_config_path() -> Result<()> {
    println!("{}", Config::config_path().display());
    Ok(())
}

