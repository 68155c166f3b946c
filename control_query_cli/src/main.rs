//! # Control Query CLI
//!
//! Browse a NIST 800-53 control catalog from the command line.

mod render;

use clap::{Args, Parser, Subcommand, ValueEnum};
use control_query::browser::ViewMode;
use control_query::config::QueryPreferences;
use control_query::logging::{self, codes, FacadeLogger, LogLevel, LoggingService};
use control_query::query::status_filter;
use control_query::tracker::{StatusLookup, UpdatedLookup};
use control_query::{
    log_error, log_info, log_success, ConfigError, ControlBrowser, ControlCatalog, QueryEngine,
    RuntimeConfig, SortDirection, SortKey, TrackerData,
};
use render::{OutputFormat, Row};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "control-query", version, about = "Search and facet NIST 800-53 control catalogs")]
struct Cli {
    /// How diagnostics are written to stderr
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Console)]
    log_format: LogFormat,

    /// Emit debug diagnostics
    #[arg(short, long, global = true)]
    verbose: bool,

    /// TOML file overriding query and logging preferences
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Console,
    Json,
    /// Route through `env_logger`, filtered by `RUST_LOG`
    Env,
}

#[derive(Args, Debug)]
struct Sources {
    /// Controls API export (array or `{"controls": [...]}`)
    #[arg(long)]
    controls: PathBuf,

    /// Tracker export with per-control statuses and update dates
    #[arg(long)]
    tracker: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Filter, sort and page through controls
    Search {
        #[command(flatten)]
        sources: Sources,

        /// Case-insensitive text matched against id, name, intent and official text
        #[arg(long, default_value = "")]
        search: String,

        /// Family code such as AC, or "all"
        #[arg(long, default_value = "all")]
        family: String,

        /// Implementation status label, or "all"
        #[arg(long, default_value = "all")]
        status: String,

        /// id, title, family, status or last-updated
        #[arg(long)]
        sort: Option<SortKey>,

        /// Sort descending
        #[arg(long)]
        desc: bool,

        /// 1-based page number
        #[arg(long, default_value_t = 1)]
        page: usize,

        #[arg(long)]
        page_size: Option<usize>,

        /// card or table
        #[arg(long, default_value = "card")]
        view: ViewMode,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Count controls per implementation status and per family
    Facets {
        #[command(flatten)]
        sources: Sources,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// List the distinct family codes of a catalog
    Families {
        #[arg(long)]
        controls: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => RuntimeConfig::load_from_path(path)?,
        None => RuntimeConfig::from_env()?,
    };
    init_logging(&cli, &config)?;
    log_info!("control-query starting", "command" => command_name(&cli.command));

    match cli.command {
        Command::Search {
            sources,
            search,
            family,
            status,
            sort,
            desc,
            page,
            page_size,
            view,
            format,
        } => {
            let preferences = effective_preferences(&config, page_size)?;
            let (engine, tracker) = load_engine(&sources)?;

            let mut browser = ControlBrowser::new(engine, &preferences);
            browser.type_search(search);
            browser.submit_search();
            browser.set_family(&family);
            browser.set_status(status_filter(&status)?);
            if let Some(key) = sort {
                browser.set_sort(key);
            }
            if desc {
                browser.set_direction(SortDirection::Descending);
            }
            browser.set_view_mode(view);
            browser.go_to_page(page.saturating_sub(1));

            let snapshot = browser.view();
            let rows = rows_for(
                &snapshot.page.items,
                browser.engine().status_lookup(),
                tracker.as_deref(),
            );
            log_success!(
                codes::success::QUERY_COMPLETED,
                "Query completed",
                "matched" => snapshot.matched(),
                "total" => snapshot.total_controls
            );
            print!("{}", render::search(&snapshot, &rows, format)?);
        }
        Command::Facets { sources, format } => {
            let (mut engine, _) = load_engine(&sources)?;
            let statuses = engine.status_facets();
            let families = engine.family_facets();
            print!("{}", render::facets(&statuses, &families, format)?);
        }
        Command::Families { controls } => {
            let mut engine = QueryEngine::new(ControlCatalog::load_from_path(&controls)?);
            for family in engine.families().iter() {
                println!("{}", family);
            }
        }
    }

    Ok(())
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Search { .. } => "search",
        Command::Facets { .. } => "facets",
        Command::Families { .. } => "families",
    }
}

fn init_logging(cli: &Cli, config: &RuntimeConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut preferences = config.logging.clone();
    if cli.verbose {
        preferences.min_log_level = LogLevel::Debug;
    }
    preferences.use_structured_logging = cli.log_format == LogFormat::Json;
    let min_level = preferences.min_log_level;
    logging::config::init_runtime_preferences(preferences)?;

    match cli.log_format {
        LogFormat::Env => {
            let default_filter = if cli.verbose { "debug" } else { "warn" };
            env_logger::Builder::from_env(
                env_logger::Env::default().default_filter_or(default_filter),
            )
            .init();
            let service = LoggingService::new(Arc::new(FacadeLogger::default()), min_level);
            logging::init_global_logging_with_service(Arc::new(service))?;
        }
        LogFormat::Console | LogFormat::Json => logging::init_global_logging()?,
    }
    Ok(())
}

/// Query preferences with command line overrides applied and re-validated
fn effective_preferences(
    config: &RuntimeConfig,
    page_size: Option<usize>,
) -> Result<QueryPreferences, ConfigError> {
    let mut preferences = config.query.clone();
    if let Some(page_size) = page_size {
        preferences.page_size = page_size;
    }
    if let Err(e) = preferences.validate() {
        log_error!(e.code(), &e.to_string(), "page_size" => preferences.page_size);
        return Err(e);
    }
    Ok(preferences)
}

type Loaded = (QueryEngine, Option<Arc<TrackerData>>);

fn load_engine(sources: &Sources) -> Result<Loaded, Box<dyn std::error::Error>> {
    let catalog = ControlCatalog::load_from_path(&sources.controls)?;
    let mut engine = QueryEngine::new(catalog);

    let tracker = match &sources.tracker {
        Some(path) => Some(Arc::new(TrackerData::load_from_path(path)?)),
        None => None,
    };
    if let Some(tracker) = &tracker {
        engine.set_status_lookup(tracker.clone());
        engine.set_updated_lookup(tracker.clone());
    }
    Ok((engine, tracker))
}

fn rows_for(
    controls: &[Arc<control_query::Control>],
    statuses: &dyn StatusLookup,
    updated: Option<&TrackerData>,
) -> Vec<Row> {
    controls
        .iter()
        .map(|control| Row {
            control: Arc::clone(control),
            status: statuses.status_of(control.id()),
            last_updated: updated.and_then(|tracker| tracker.last_updated(control.id())),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use control_query::config::compile_time::query::MAX_PAGE_SIZE;
    use control_query::ImplementationStatus;
    use std::io::Write;

    fn json_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_engine_with_tracker() {
        let controls = json_file(
            r#"{"controls": [
                {"id": "AC-2", "name": "Account Management"},
                {"id": "AU-2", "name": "Event Logging"}
            ]}"#,
        );
        let tracker = json_file(
            r#"{"statuses": {"AU-2": "Implemented"}, "last_updated": {"AU-2": "2024-03-01"}}"#,
        );
        let sources = Sources {
            controls: controls.path().to_path_buf(),
            tracker: Some(tracker.path().to_path_buf()),
        };

        let (mut engine, tracker) = load_engine(&sources).unwrap();
        assert_eq!(engine.catalog().len(), 2);
        assert_eq!(engine.status_facets().get(ImplementationStatus::Implemented), 1);

        let result = engine.run(&control_query::Query::new());
        let rows = rows_for(&result, engine.status_lookup(), tracker.as_deref());
        assert_eq!(rows[0].status, ImplementationStatus::NotStarted);
        assert_eq!(rows[1].status, ImplementationStatus::Implemented);
        assert!(rows[0].last_updated.is_none());
        assert!(rows[1].last_updated.is_some());
    }

    #[test]
    fn test_load_engine_missing_catalog() {
        let sources = Sources {
            controls: PathBuf::from("/definitely/not/controls.json"),
            tracker: None,
        };
        assert!(load_engine(&sources).is_err());
    }

    #[test]
    fn test_page_size_override_is_validated() {
        let config = RuntimeConfig::from_toml_str("[query]\npage_size = 20\n").unwrap();

        assert_eq!(effective_preferences(&config, None).unwrap().page_size, 20);
        assert_eq!(effective_preferences(&config, Some(7)).unwrap().page_size, 7);
        assert_matches!(
            effective_preferences(&config, Some(0)),
            Err(ConfigError::OutOfRange { .. })
        );
        assert_matches!(
            effective_preferences(&config, Some(MAX_PAGE_SIZE + 1)),
            Err(ConfigError::OutOfRange { .. })
        );
    }
}
