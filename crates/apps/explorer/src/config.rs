use std::env;
use std::path::PathBuf;
use std::time::Duration;

use agent::AgentMode;
use clap::Parser;
use formats::DatasetId;
use streaming::{CatalogError, SourceCatalog};

pub const DEFAULT_DATA_ROOT: &str = "data";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless ocean data explorer session")]
pub struct Args {
    /// Directory or URL prefix holding the dataset files (EXPLORER_DATA_ROOT)
    #[arg(long)]
    pub data_root: Option<String>,

    /// JSON source catalogue; replaces the default layout under the data root (EXPLORER_SOURCES)
    #[arg(long)]
    pub sources: Option<PathBuf>,

    /// Prefix prepended to remote locators, e.g. a CORS proxy (EXPLORER_PROXY_PREFIX)
    #[arg(long)]
    pub proxy_prefix: Option<String>,

    /// Agent backend endpoint; chat is disabled without it (EXPLORER_AGENT_URL)
    #[arg(long)]
    pub agent_url: Option<String>,

    /// Per-request HTTP timeout in seconds (EXPLORER_HTTP_TIMEOUT_SECS)
    #[arg(long)]
    pub http_timeout_secs: Option<String>,

    /// Agent conversation mode: chat or agent (EXPLORER_MODE)
    #[arg(long)]
    pub mode: Option<String>,

    /// Datasets requested at startup
    #[arg(long, value_delimiter = ',', default_value = "plankton,occurrences,predictions")]
    pub load: Vec<String>,
}

#[derive(Debug)]
pub enum ConfigError {
    Catalog(CatalogError),
    InvalidTimeout(String),
    InvalidMode(String),
    UnknownDataset(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Catalog(e) => write!(f, "source catalogue: {e}"),
            ConfigError::InvalidTimeout(v) => write!(f, "invalid HTTP timeout {v:?}"),
            ConfigError::InvalidMode(v) => write!(f, "invalid mode {v:?} (expected chat or agent)"),
            ConfigError::UnknownDataset(v) => write!(f, "unknown dataset {v:?}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Catalog(e) => Some(e),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub catalog: SourceCatalog,
    pub proxy_prefix: Option<String>,
    pub agent_url: Option<String>,
    pub http_timeout: Duration,
    pub mode: AgentMode,
    pub initial_loads: Vec<DatasetId>,
}

/// Command-line value, else the environment variable; blanks count as unset.
fn setting(cli: Option<String>, var: &str) -> Option<String> {
    cli.or_else(|| env::var(var).ok())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Config {
    pub fn from_args(args: Args) -> Result<Self, ConfigError> {
        let catalog = match args
            .sources
            .or_else(|| setting(None, "EXPLORER_SOURCES").map(PathBuf::from))
        {
            Some(path) => SourceCatalog::load(path).map_err(ConfigError::Catalog)?,
            None => {
                let root = setting(args.data_root, "EXPLORER_DATA_ROOT")
                    .unwrap_or_else(|| DEFAULT_DATA_ROOT.to_string());
                SourceCatalog::rooted_at(&root)
            }
        };

        let http_timeout = match setting(args.http_timeout_secs, "EXPLORER_HTTP_TIMEOUT_SECS") {
            Some(v) => v
                .parse::<u64>()
                .ok()
                .filter(|s| *s > 0)
                .map(Duration::from_secs)
                .ok_or(ConfigError::InvalidTimeout(v))?,
            None => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        };

        let mode = match setting(args.mode, "EXPLORER_MODE") {
            Some(v) => AgentMode::parse(&v).ok_or(ConfigError::InvalidMode(v))?,
            None => AgentMode::default(),
        };

        let initial_loads = args
            .load
            .iter()
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
            .map(|k| DatasetId::from_key(k).ok_or_else(|| ConfigError::UnknownDataset(k.to_string())))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            catalog,
            proxy_prefix: setting(args.proxy_prefix, "EXPLORER_PROXY_PREFIX"),
            agent_url: setting(args.agent_url, "EXPLORER_AGENT_URL"),
            http_timeout,
            mode,
            initial_loads,
        })
    }
}
