//! Output formatting functionality for different export formats.

use crate::datetime::{format_frag_timestamp, format_utc_offset};
use crate::error::Result;
use crate::formatter::format_frag;
use crate::types::{Frag, ParsedLog};
use serde::Serialize;
use std::io::{BufWriter, Write};

/// Supported output formats
#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Session summary with top streaks per log
    Human,
    /// Emoji frag feed
    Pretty,
    /// One CSV row per frag: timestamp, killer[, victim, weapon]
    Csv,
    /// Full report (frags, session, streaks) as JSON
    Json,
}

/// A parsed log together with the path it was read from
#[derive(Debug, Clone, Serialize)]
pub struct LogReport {
    pub source: String,
    #[serde(flatten)]
    pub log: ParsedLog,
}

/// Handles output formatting and writing
pub struct OutputWriter;

impl OutputWriter {
    /// Write reports in the specified format
    pub fn write_reports(reports: &[LogReport], format: OutputFormat, writer: &mut dyn Write) -> Result<()> {
        match format {
            OutputFormat::Human => Self::write_human(reports, writer),
            OutputFormat::Pretty => Self::write_pretty(reports, writer),
            OutputFormat::Csv => {
                for report in reports {
                    write_frags_csv(&report.log.frags, &mut *writer)?;
                }
                Ok(())
            }
            OutputFormat::Json => Self::write_json(reports, writer),
        }
    }

    /// Write a per-log summary: session window, frag counts and top streaks
    fn write_human(reports: &[LogReport], writer: &mut dyn Write) -> Result<()> {
        for report in reports {
            let log = &report.log;
            writeln!(writer, "{}", report.source)?;

            match &log.session {
                Some(session) => {
                    writeln!(writer, "  {:<17} {}", "Mode:", session.mode)?;
                    writeln!(writer, "  {:<17} {}", "Map:", session.map)?;
                    writeln!(writer, "  {:<17} {}", "Start:", format_frag_timestamp(&session.start))?;
                    writeln!(writer, "  {:<17} {}", "End:", format_frag_timestamp(&session.end))?;
                    let duration = session.duration();
                    writeln!(
                        writer,
                        "  {:<17} {}m {:02}s",
                        "Duration:",
                        duration.num_minutes(),
                        duration.num_seconds() % 60
                    )?;
                }
                None => writeln!(writer, "  {:<17} no session data", "Session:")?,
            }

            if let Ok(start) = log.anchor.start_time() {
                writeln!(writer, "  {:<17} {}", "Timezone:", format_utc_offset(&start))?;
            }

            let suicides = log.frags.iter().filter(|f| f.is_suicide()).count();
            writeln!(writer, "  {:<17} {} ({} suicides)", "Frags:", log.frags.len(), suicides)?;

            if let Some((player, len)) = log.streaks.top_killer() {
                writeln!(writer, "  {:<17} {} ({} in a row)", "Top kill streak:", player, len)?;
            }
            if let Some((player, len)) = log.streaks.top_victim() {
                writeln!(writer, "  {:<17} {} ({} in a row)", "Top death streak:", player, len)?;
            }

            writeln!(writer)?;
        }
        Ok(())
    }

    /// Write the emoji frag feed, one line per frag
    fn write_pretty(reports: &[LogReport], writer: &mut dyn Write) -> Result<()> {
        for report in reports {
            if reports.len() > 1 {
                writeln!(writer, "# {}", report.source)?;
            }
            for frag in &report.log.frags {
                writeln!(writer, "{}", format_frag(frag))?;
            }
        }
        Ok(())
    }

    /// Write all reports as one JSON array
    fn write_json(reports: &[LogReport], writer: &mut dyn Write) -> Result<()> {
        serde_json::to_writer_pretty(&mut *writer, reports)?;
        writeln!(writer)?;
        Ok(())
    }
}

/// Export frags as CSV rows of `timestamp, killer, victim, weapon`.
///
/// Suicide rows stop after the killer: absent fields are omitted rather than
/// written as empty columns. No header row; `|` is the quote character.
pub fn write_frags_csv<W: Write>(frags: &[Frag], writer: W) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quote(b'|')
        .from_writer(writer);

    for frag in frags {
        let mut row = vec![format_frag_timestamp(&frag.timestamp), frag.killer.clone()];
        row.extend(frag.victim.iter().cloned());
        row.extend(frag.weapon.iter().cloned());
        csv_writer.write_record(&row)?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Create appropriate writer based on output option
pub fn create_writer(output_file: Option<&str>) -> Result<Box<dyn Write>> {
    let writer: Box<dyn Write> = match output_file {
        Some(path) if path != "-" => Box::new(BufWriter::new(std::fs::File::create(path)?)),
        _ => Box::new(std::io::stdout()),
    };

    Ok(writer)
}
