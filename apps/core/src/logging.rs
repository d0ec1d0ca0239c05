use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};
use std::time::{SystemTime, UNIX_EPOCH};

const LOG_FILE_NAME: &str = "quicknav.log";
const ARCHIVE_PREFIX: &str = "quicknav-";
const MAX_LOG_BYTES: u64 = 1_000_000;
const MAX_ARCHIVES: usize = 5;

static SINK: OnceLock<Mutex<File>> = OnceLock::new();

#[derive(Clone, Copy)]
enum Level {
    Info,
    Warn,
    Error,
}

impl Level {
    fn tag(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }
}

pub fn logs_dir() -> PathBuf {
    crate::config::stable_app_data_dir().join("logs")
}

/// Opens the append-only log sink, rotating first when the current file has
/// outgrown its budget. Calling again is a no-op.
pub fn init() -> Result<(), std::io::Error> {
    let dir = logs_dir();
    fs::create_dir_all(&dir)?;

    let active = dir.join(LOG_FILE_NAME);
    if file_len(&active) >= MAX_LOG_BYTES {
        fs::rename(&active, dir.join(archive_name()))?;
        prune_archives(&dir)?;
    }

    let file = OpenOptions::new().create(true).append(true).open(&active)?;
    let _ = SINK.set(Mutex::new(file));

    hook_panics();
    Ok(())
}

pub fn info(message: &str) {
    emit(Level::Info, message);
}

pub fn warn(message: &str) {
    emit(Level::Warn, message);
}

pub fn error(message: &str) {
    emit(Level::Error, message);
}

/// Logging before `init` (or with a poisoned sink) is dropped silently.
fn emit(level: Level, message: &str) {
    let Some(Ok(mut file)) = SINK.get().map(Mutex::lock) else {
        return;
    };
    let (secs, millis) = timestamp();
    let _ = writeln!(file, "[{secs}.{millis:03}] [{}] {message}", level.tag());
    let _ = file.flush();
}

fn timestamp() -> (u64, u32) {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| (d.as_secs(), d.subsec_millis()))
        .unwrap_or((0, 0))
}

fn file_len(path: &Path) -> u64 {
    fs::metadata(path).map(|meta| meta.len()).unwrap_or(0)
}

fn archive_name() -> String {
    let (secs, _) = timestamp();
    format!("{ARCHIVE_PREFIX}{secs}.log")
}

/// Keeps the newest MAX_ARCHIVES rotated files; archive names sort by their
/// epoch stamp.
fn prune_archives(dir: &Path) -> Result<(), std::io::Error> {
    let mut archives: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| is_archive(path))
        .collect();
    if archives.len() <= MAX_ARCHIVES {
        return Ok(());
    }

    archives.sort();
    let stale_count = archives.len() - MAX_ARCHIVES;
    for stale in archives.drain(..stale_count) {
        let _ = fs::remove_file(stale);
    }
    Ok(())
}

fn is_archive(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.starts_with(ARCHIVE_PREFIX) && name.ends_with(".log"))
        .unwrap_or(false)
}

fn hook_panics() {
    static INSTALLED: OnceLock<()> = OnceLock::new();
    INSTALLED.get_or_init(|| {
        let prior = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let location = panic_info
                .location()
                .map(|l| format!("{}:{}", l.file(), l.line()))
                .unwrap_or_else(|| "unknown".to_string());
            error(&format!(
                "panic at {location}: {}",
                panic_message(panic_info.payload())
            ));
            prior(panic_info);
        }));
    });
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic payload unavailable".to_string()
    }
}
