//! Adapter for the automation platform running the tool: where inputs come
//! from, how secrets are masked, where outputs and failures are reported.

use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::ConfigError;

pub trait ActionHost {
    /// Trimmed value of the named input, empty when unset.
    fn get_input(&self, name: &str) -> String;

    /// Required input read as a YAML 1.2 "Core Schema" boolean.
    fn get_boolean_input(&self, name: &'static str) -> Result<bool, ConfigError> {
        match self.get_input(name).as_str() {
            "" => Err(ConfigError::Missing(name)),
            "true" | "True" | "TRUE" => Ok(true),
            "false" | "False" | "FALSE" => Ok(false),
            _ => Err(ConfigError::InvalidBoolean(name)),
        }
    }

    fn set_secret(&self, value: &str);
    fn set_output(&self, name: &str, value: &str) -> io::Result<()>;
    fn set_failed(&self, message: &str);
}

/// GitHub Actions runner: inputs arrive as `INPUT_<NAME>` variables and
/// outputs go to the file named by `GITHUB_OUTPUT`.
pub struct GithubActions {
    vars: HashMap<String, String>,
}

impl GithubActions {
    pub fn from_env() -> Self {
        Self::new(std::env::vars())
    }

    pub fn new(vars: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            vars: vars.into_iter().collect(),
        }
    }

    fn output_file(&self) -> Option<PathBuf> {
        self.vars
            .get("GITHUB_OUTPUT")
            .filter(|path| !path.is_empty())
            .map(PathBuf::from)
    }
}

fn input_key(name: &str) -> String {
    format!("INPUT_{}", name.replace(' ', "_").to_uppercase())
}

fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn escape_property(value: &str) -> String {
    escape_data(value).replace(':', "%3A").replace(',', "%2C")
}

fn command(name: &str, message: &str) -> String {
    format!("::{name}::{}", escape_data(message))
}

fn add_mask_line(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| command("add-mask", value))
}

fn set_output_line(name: &str, value: &str) -> String {
    format!(
        "::set-output name={}::{}",
        escape_property(name),
        escape_data(value)
    )
}

fn error_line(message: &str) -> String {
    command("error", message)
}

fn output_entry(name: &str, value: &str) -> io::Result<String> {
    if !value.contains('\n') && !value.contains('\r') {
        return Ok(format!("{name}={value}\n"));
    }

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    let delimiter = format!("ghadelimiter_{nanos}");
    if name.contains(&delimiter) || value.contains(&delimiter) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "output value contains the heredoc delimiter",
        ));
    }
    Ok(format!("{name}<<{delimiter}\n{value}\n{delimiter}\n"))
}

impl ActionHost for GithubActions {
    fn get_input(&self, name: &str) -> String {
        self.vars
            .get(&input_key(name))
            .map(|v| v.trim().to_string())
            .unwrap_or_default()
    }

    fn set_secret(&self, value: &str) {
        if let Some(line) = add_mask_line(value) {
            println!("{line}");
        }
    }

    fn set_output(&self, name: &str, value: &str) -> io::Result<()> {
        let Some(path) = self.output_file() else {
            println!("{}", set_output_line(name, value));
            return Ok(());
        };

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(output_entry(name, value)?.as_bytes())
    }

    fn set_failed(&self, message: &str) {
        println!("{}", error_line(message));
    }
}
