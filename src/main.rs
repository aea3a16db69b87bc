use std::process;

use dotenv::dotenv;
use log::{error, info};
use simplelog::{ColorChoice, LevelFilter, TermLogger, TerminalMode};

use gradewatch::config::Config;
use gradewatch::engine::notify_new_grades;
use gradewatch::fetch::fetch_report;
use gradewatch::parser::parse_report;
use gradewatch::{cache, notify};

#[tokio::main]
async fn main() {
    // Loads environment variables from a `.env` file, if present.
    dotenv().ok();

    // Initializes logging with simplelog to the terminal with mixed output (both stdout and stderr) and automatic color support.
    TermLogger::init(
        LevelFilter::Info,
        simplelog::Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .unwrap();

    // Validates the whole configuration up front; nothing touches the
    // network before this succeeds.
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            process::exit(2);
        }
    };

    let mut cache = match cache::build(&config.cache) {
        Ok(cache) => cache,
        Err(e) => {
            error!("Error opening cache: {}", e);
            process::exit(1);
        }
    };

    // `--flush` clears the configured cache and exits without scraping.
    if std::env::args().any(|arg| arg == "--flush") {
        match cache.flush().await {
            Ok(()) => {
                info!("Cache flushed");
                return;
            }
            Err(e) => {
                error!("Error flushing cache: {}", e);
                process::exit(1);
            }
        }
    }

    // Builds the notifier before fetching so an invalid credential aborts
    // the run before the portal is contacted.
    let notifier = match notify::build(&config.notifier).await {
        Ok(notifier) => notifier,
        Err(e) => {
            error!("Error setting up notifier: {}", e);
            process::exit(1);
        }
    };

    let html = match fetch_report(&config).await {
        Ok(html) => {
            info!("Term report retrieved successfully");
            html
        }
        Err(e) => {
            error!("Error retrieving term report: {}", e);
            process::exit(1);
        }
    };

    let (semester, report) = match parse_report(&html) {
        Ok(parsed) => parsed,
        Err(e) => {
            error!("Error parsing term report: {}", e);
            process::exit(1);
        }
    };
    info!("Parsed {} grades for semester {}", report.entries.len(), semester);

    match notify_new_grades(cache.as_mut(), notifier.as_ref(), &semester, &report).await {
        Ok(count) => info!("{} new grades sent", count),
        Err(e) => {
            error!("Error notifying new grades: {}", e);
            process::exit(1);
        }
    }
}
