use std::env;
use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use directories::ProjectDirs;
use tracing_subscriber::{
    EnvFilter, Layer, filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Application infrastructure context.
///
/// Holds identity, the resolved data directory and the logging guard.
pub struct AppContext {
    app_id: &'static str,
    version: &'static str,
    data_dir: PathBuf,
    log_file: PathBuf,
    /// Must stay alive for the whole run so buffered log lines are flushed.
    _log_guard: tracing_appender::non_blocking::WorkerGuard,
}

impl AppContext {
    pub fn app_id(&self) -> &str {
        self.app_id
    }

    pub fn version(&self) -> &'static str {
        self.version
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn log_file(&self) -> &Path {
        &self.log_file
    }
}

/// Application metadata.
///
/// Implement this on a marker type to give a binary its identity.
pub trait Application: Sized + 'static {
    const APP_ID: &'static str;
    const QUALIFIER: &'static str = "br";
    const ORGANIZATION: &'static str = "adfoz";
}

/// Builder performing the common startup work: data directory, log file and
/// the global tracing subscriber.
pub struct AppBuilder<A: Application> {
    version: &'static str,
    data_dir: Option<PathBuf>,
    console: bool,
    _marker: PhantomData<A>,
}

impl<A: Application> AppBuilder<A> {
    pub fn new(version: &'static str) -> Self {
        Self {
            version,
            data_dir: None,
            console: true,
            _marker: PhantomData,
        }
    }

    /// Use `dir` instead of the platform data directory.
    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    /// Whether log lines are also written to stderr. Terminal UIs turn this
    /// off, otherwise the log output tears the drawn frame.
    pub fn console(mut self, enabled: bool) -> Self {
        self.console = enabled;
        self
    }

    /// Initialize logging and return the context.
    ///
    /// Fails if the log directory cannot be created or a global subscriber is
    /// already installed.
    pub fn build(self) -> Result<AppContext, BoxError> {
        let data_dir = self.data_dir.unwrap_or_else(default_data_dir::<A>);
        let log_dir = data_dir.join("logs");
        fs::create_dir_all(&log_dir)?;

        let log_file = log_file_path(&log_dir, A::APP_ID, Local::now());
        let log_filename = log_file
            .file_name()
            .ok_or("log file path has no file name")?;

        let file_appender = tracing_appender::rolling::never(&log_dir, log_filename);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        let env_var = log_env_var(A::APP_ID);

        let file_layer = fmt::Layer::default()
            .with_target(false)
            .with_ansi(false)
            .with_writer(non_blocking)
            .with_filter(level_filter(&env_var));

        let console_layer = self.console.then(|| {
            fmt::Layer::default()
                .with_target(false)
                .with_writer(std::io::stderr)
                .with_filter(level_filter(&env_var))
        });

        tracing_subscriber::registry()
            .with(file_layer)
            .with(console_layer)
            .with(tracing_error::ErrorLayer::default())
            .try_init()?;

        tracing::debug!(app = A::APP_ID, version = self.version, log = %log_file.display(), "logging initialized");

        Ok(AppContext {
            app_id: A::APP_ID,
            version: self.version,
            data_dir,
            log_file,
            _log_guard: guard,
        })
    }
}

/// `<APP_ID>_DATA` if set, otherwise the platform's local data directory.
pub fn default_data_dir<A: Application>() -> PathBuf {
    if let Some(dir) = env::var_os(format!("{}_DATA", A::APP_ID.to_uppercase())) {
        return PathBuf::from(dir);
    }
    ProjectDirs::from(A::QUALIFIER, A::ORGANIZATION, A::APP_ID)
        .map(|dirs| dirs.data_local_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".").join(".data"))
}

/// Name of the variable holding an `EnvFilter` override, e.g. `CHECKOUT_LOG`.
pub fn log_env_var(app_id: &str) -> String {
    format!("{}_LOG", app_id.to_uppercase())
}

fn log_file_path(log_dir: &Path, app_id: &str, now: DateTime<Local>) -> PathBuf {
    log_dir.join(format!("{app_id}-{}.log", now.format("%Y%m%d-%H%M%S")))
}

fn level_filter(env_var: &str) -> EnvFilter {
    #[cfg(debug_assertions)]
    let level = LevelFilter::INFO;

    #[cfg(not(debug_assertions))]
    let level = LevelFilter::WARN;

    EnvFilter::builder()
        .with_default_directive(level.into())
        .with_env_var(env_var)
        .from_env_lossy()
}
