//! Main application logic and orchestration.

use crate::{
    cli::Config,
    error::{Error, Result},
    output::{create_writer, LogReport, OutputWriter},
    parse_log,
    storage::{MatchId, MatchRecord, MatchStore, SqliteStore},
};
use indicatif::{ProgressBar, ProgressStyle};
use is_terminal::IsTerminal;
use rayon::prelude::*;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Main application runner
pub struct App {
    config: Config,
}

impl App {
    /// Create a new application instance with the given configuration
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run the application with the configured parameters
    pub fn run(self) -> Result<()> {
        let results = self.parse_all()?;

        // A failed log is reported and skipped; the batch carries on
        let mut reports = Vec::with_capacity(results.len());
        for (path, result) in results {
            match result {
                Ok(report) => reports.push(report),
                Err(e) => {
                    log::warn!("skipping {}: {}", path.display(), e);
                    eprintln!("⚠️  Skipping {}: {}", path.display(), e);
                }
            }
        }

        if reports.is_empty() {
            return Err(Error::Generic("No log file could be parsed".to_string()));
        }

        if let Some(db_path) = &self.config.db_path {
            let mut store = SqliteStore::open(db_path)?;
            let stored = persist_reports(&mut store, &reports);
            eprintln!("💾 Stored {} of {} matches in {}", stored, reports.len(), db_path.display());
        }

        let mut writer = create_writer(self.config.output.as_deref())?;
        OutputWriter::write_reports(&reports, self.config.format, &mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Parse every configured log, one independent pipeline per file
    fn parse_all(&self) -> Result<Vec<(PathBuf, Result<LogReport>)>> {
        let files = &self.config.log_files;
        let progress = progress_bar(files.len());

        let parse = || -> Vec<(PathBuf, Result<LogReport>)> {
            files
                .par_iter()
                .map(|path| {
                    let result = process_file(path);
                    progress.inc(1);
                    (path.clone(), result)
                })
                .collect()
        };

        let results = match self.config.jobs {
            Some(jobs) => rayon::ThreadPoolBuilder::new()
                .num_threads(jobs)
                .build()
                .map_err(|e| Error::Generic(format!("Failed to start worker pool: {}", e)))?
                .install(parse),
            None => parse(),
        };

        progress.finish_and_clear();
        Ok(results)
    }
}

/// Read and parse a single log file
pub fn process_file(path: &Path) -> Result<LogReport> {
    let log_data = std::fs::read_to_string(path)?;
    let log = parse_log(&log_data)?;
    log::debug!("{}: {} frags", path.display(), log.frags.len());
    Ok(LogReport {
        source: path.display().to_string(),
        log,
    })
}

/// Store one report's match and frags; logs without a session window are skipped
pub fn persist_report(store: &mut dyn MatchStore, report: &LogReport) -> Result<Option<MatchId>> {
    let session = match &report.log.session {
        Some(session) => session,
        None => {
            log::warn!("{}: no session data, not stored", report.source);
            return Ok(None);
        }
    };

    let match_id = store.insert_match(&MatchRecord::from(session))?;
    store.insert_frags(match_id, &report.log.frags)?;
    Ok(Some(match_id))
}

/// Store every report, returning how many matches were written
pub fn persist_reports(store: &mut dyn MatchStore, reports: &[LogReport]) -> usize {
    let mut stored = 0;
    for report in reports {
        match persist_report(store, report) {
            Ok(Some(_)) => stored += 1,
            Ok(None) => {}
            Err(e) => eprintln!("⚠️  Could not store {}: {}", report.source, e),
        }
    }
    stored
}

fn progress_bar(len: usize) -> ProgressBar {
    if len < 2 || !std::io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }

    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} logs {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=>-");

    let pb = ProgressBar::new(len as u64);
    pb.set_style(style);
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use crate::storage::SqliteStore;

    const SAMPLE_LOG: &str = include_str!("../testdata/log_rollover.txt");

    fn write_log(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn config(files: Vec<PathBuf>, output: &Path, db: Option<PathBuf>) -> Config {
        Config {
            log_files: files,
            format: OutputFormat::Csv,
            output: Some(output.display().to_string()),
            db_path: db,
            jobs: Some(2),
            log_level: log::LevelFilter::Warn,
        }
    }

    #[test]
    fn test_process_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_log(dir.path(), "log00.txt", SAMPLE_LOG);
        let report = process_file(&path).unwrap();
        assert_eq!(report.log.frags.len(), 8);
        assert!(report.source.ends_with("log00.txt"));
    }

    #[test]
    fn test_process_missing_file() {
        let result = process_file(Path::new("/nonexistent/log.txt"));
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_persist_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_log(dir.path(), "log00.txt", SAMPLE_LOG);
        let report = process_file(&path).unwrap();

        let mut store = SqliteStore::in_memory().unwrap();
        let match_id = persist_report(&mut store, &report).unwrap().unwrap();
        assert_eq!(store.frags_for_match(match_id).unwrap().len(), 8);

        // Storing the same match twice is refused and counted as not stored
        assert_eq!(persist_reports(&mut store, &[report]), 0);
        assert_eq!(store.match_count().unwrap(), 1);
    }

    #[test]
    fn test_sessionless_report_is_not_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let without_precache: String = SAMPLE_LOG
            .lines()
            .filter(|line| !line.contains("Precaching level"))
            .map(|line| format!("{}\n", line))
            .collect();
        let path = write_log(dir.path(), "log01.txt", &without_precache);
        let report = process_file(&path).unwrap();

        let mut store = SqliteStore::in_memory().unwrap();
        assert_eq!(persist_report(&mut store, &report).unwrap(), None);
        assert_eq!(store.match_count().unwrap(), 0);
    }

    #[test]
    fn test_run_skips_bad_logs() {
        let dir = tempfile::tempdir().unwrap();
        let good = write_log(dir.path(), "good.txt", SAMPLE_LOG);
        let bad = write_log(dir.path(), "bad.txt", "nothing to see here\n");
        let output = dir.path().join("frags.csv");
        let db = dir.path().join("frags.db");

        App::new(config(vec![good, bad], &output, Some(db.clone()))).run().unwrap();

        let csv = std::fs::read_to_string(&output).unwrap();
        assert_eq!(csv.lines().count(), 8);
        assert_eq!(SqliteStore::open(&db).unwrap().match_count().unwrap(), 1);
    }

    #[test]
    fn test_run_fails_when_nothing_parses() {
        let dir = tempfile::tempdir().unwrap();
        let bad = write_log(dir.path(), "bad.txt", "nothing to see here\n");
        let output = dir.path().join("frags.csv");
        assert!(App::new(config(vec![bad], &output, None)).run().is_err());
    }
}
