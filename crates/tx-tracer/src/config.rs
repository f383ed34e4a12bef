use std::path::PathBuf;

use base::debug;
use serde::Deserialize;

pub const ENDPOINT_ENV: &str = "TRACE_TX_ENDPOINT";
pub const OUTPUT_DIR_ENV: &str = "TRACE_TX_OUTPUT_DIR";

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            output_dir: default_output_dir(),
        }
    }
}

impl Config {
    pub fn read_file(fp: &str) -> Result<Self, String> {
        let data = std::fs::read(fp).map_err(debug)?;
        serde_json::from_slice(&data).map_err(debug)
    }

    /// Applies overrides on top of the loaded values; `None` keeps the current one.
    pub fn with_overrides(mut self, endpoint: Option<String>, output_dir: Option<PathBuf>) -> Self {
        if let Some(endpoint) = endpoint {
            self.endpoint = endpoint;
        }
        if let Some(output_dir) = output_dir {
            self.output_dir = output_dir;
        }
        self
    }
}

fn default_endpoint() -> String {
    "http://localhost:8545".into()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}
