// logs.rs
use dsrconfig::Config;

use tracing::Level;
use tracing_subscriber::{
    Registry, filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Options d'initialisation du système de logging
#[derive(Debug, Clone)]
pub struct LoggingOptions {
    /// Niveau minimum des logs émis
    pub min_level: Level,
    /// Activer la sortie console
    pub enable_console: bool,
    /// Couleurs ANSI sur la console
    pub ansi: bool,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            min_level: Level::INFO,
            enable_console: true,
            ansi: true,
        }
    }
}

impl LoggingOptions {
    /// Construit les options à partir de la section `host.logger` de la configuration
    pub fn from_config(config: &Config) -> Self {
        let configured = config.get_log_min_level();
        let min_level = string_to_level(&configured).unwrap_or_else(|| {
            eprintln!("⚠️ Unknown log level '{}', falling back to INFO", configured);
            Level::INFO
        });

        Self {
            min_level,
            enable_console: config.get_log_enable_console(),
            ansi: config.get_log_ansi(),
        }
    }
}

/// Initialise le système de logging global
///
/// Installe le filtre de niveau puis, si demandé, la sortie console.
/// Retourne `false` si un subscriber global était déjà installé (tests, double
/// initialisation) : l'appel est alors sans effet.
///
/// # Exemple
/// ```rust,no_run
/// use dsrserver::logs::{init_logging, LoggingOptions};
///
/// init_logging(LoggingOptions::default());
/// ```
pub fn init_logging(options: LoggingOptions) -> bool {
    let console = options.enable_console.then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_level(true)
            .with_ansi(options.ansi)
    });

    // L'ordre est important : le filtre doit être appliqué en premier
    Registry::default()
        .with(level_to_levelfilter(options.min_level))
        .with(console)
        .try_init()
        .is_ok()
}

pub fn string_to_level(s: &str) -> Option<Level> {
    match s.trim().to_uppercase().as_str() {
        "ERROR" => Some(Level::ERROR),
        "WARN" | "WARNING" => Some(Level::WARN),
        "INFO" => Some(Level::INFO),
        "DEBUG" => Some(Level::DEBUG),
        "TRACE" => Some(Level::TRACE),
        _ => None,
    }
}

fn level_to_levelfilter(level: Level) -> LevelFilter {
    match level {
        Level::ERROR => LevelFilter::ERROR,
        Level::WARN => LevelFilter::WARN,
        Level::INFO => LevelFilter::INFO,
        Level::DEBUG => LevelFilter::DEBUG,
        Level::TRACE => LevelFilter::TRACE,
    }
}
