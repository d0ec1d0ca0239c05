use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::{self, ConfigError};
use crate::document_index::DocumentIndexer;
use crate::index_service::IndexService;
use crate::logging;
use crate::platform::NativeOs;
use crate::program_index::ProgramIndexer;
use crate::prompt::UnconfiguredPromptClient;
use crate::query_router::QueryRouter;
use crate::settings_store::{SettingsError, SettingsStore};
use crate::transport;
use crate::window_switcher::WindowSwitcher;

#[derive(Debug)]
pub enum RuntimeError {
    Config(ConfigError),
    Settings(SettingsError),
    Io(std::io::Error),
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(error) => write!(f, "config error: {error}"),
            Self::Settings(error) => write!(f, "settings error: {error}"),
            Self::Io(error) => write!(f, "io error: {error}"),
        }
    }
}

impl std::error::Error for RuntimeError {}

impl From<ConfigError> for RuntimeError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<SettingsError> for RuntimeError {
    fn from(value: SettingsError) -> Self {
        Self::Settings(value)
    }
}

impl From<std::io::Error> for RuntimeError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunOptions {
    pub config_path: Option<PathBuf>,
}

pub fn parse_cli_args(args: &[String]) -> Result<RunOptions, String> {
    let mut options = RunOptions::default();
    let mut index = 0;
    while index < args.len() {
        let arg = &args[index];
        if let Some(value) = arg.strip_prefix("--config=") {
            options.config_path = Some(PathBuf::from(value));
        } else if arg == "--config" {
            index += 1;
            let value = args
                .get(index)
                .ok_or_else(|| "--config requires a path".to_string())?;
            options.config_path = Some(PathBuf::from(value));
        } else {
            return Err(format!("unknown argument: {arg}"));
        }
        index += 1;
    }
    Ok(options)
}

pub fn run() -> Result<(), RuntimeError> {
    run_with_options(RunOptions::default())
}

/// Wires the whole engine together and serves JSON lines on stdin/stdout
/// until EOF or an explicit quit command.
pub fn run_with_options(options: RunOptions) -> Result<(), RuntimeError> {
    if let Err(error) = logging::init() {
        eprintln!("[quicknav-core] log init failed: {error}");
    }

    let config = config::load(options.config_path.as_deref())?;
    if let Err(message) = config::validate(&config) {
        return Err(RuntimeError::Config(ConfigError::Parse(message)));
    }
    if !config.config_path.exists() {
        config::save(&config)?;
        logging::info(&format!(
            "wrote default config to {}",
            config.config_path.display()
        ));
    }
    logging::info(&format!(
        "startup settings_path={} document_root={} shortcut_roots={}",
        config.settings_path.display(),
        config.document_root.display(),
        config.shortcut_roots.len(),
    ));

    let mut store = SettingsStore::open(config.settings_path.clone())?;
    store.ensure_defaults()?;

    let os = Arc::new(NativeOs);
    let program_indexer = ProgramIndexer::new(os.clone(), config.shortcut_roots.clone());
    let document_indexer = DocumentIndexer::new(config.document_root.clone());
    let service = Arc::new(IndexService::new(store, program_indexer, document_indexer));
    service.spawn_rebuild_all();

    let windows = Arc::new(WindowSwitcher::new(os));
    let router = QueryRouter::new(service.clone(), windows, Arc::new(UnconfiguredPromptClient))
        .with_async_text_sink(Arc::new(|text| {
            let mut stdout = std::io::stdout().lock();
            let _ = writeln!(stdout, "{}", transport::async_text_event(text));
        }));

    serve_lines(&router, &service)
}

fn serve_lines(router: &QueryRouter, service: &Arc<IndexService>) -> Result<(), RuntimeError> {
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let reply = transport::handle_line(router, service, trimmed);
        {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", reply.payload)?;
            stdout.flush()?;
        }
        if reply.quit {
            logging::info("quit requested; shutting down");
            break;
        }
    }
    Ok(())
}
