//! Progress output
//!
//! The sync engine describes what it is doing through [`Reporter`] so it never
//! writes to the console directly. [`ConsoleReporter`] renders those events as
//! styled lines on stdout.

use console::Style;

use crate::sync::{Outcome, SyncReport};

/// Something the sync engine is about to do, or has decided
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncEvent<'a> {
    /// Copying a local module
    Copying { name: &'a str },

    /// Looking up a registry module
    Checking { name: &'a str },

    /// Target already checked out at the resolved version
    UpToDate { name: &'a str, version: &'a str },

    /// Cloning a module at a version
    Fetching { name: &'a str, version: &'a str },
}

/// Sink for progress events
pub trait Reporter {
    fn report(&self, event: SyncEvent<'_>);
}

/// Prints events as `<Verb> <dir>/<name> ...` lines
#[derive(Debug, Clone)]
pub struct ConsoleReporter {
    dir_name: String,
}

impl ConsoleReporter {
    /// `dir_name` is the base name of the manifest directory
    pub fn new(dir_name: impl Into<String>) -> Self {
        Self {
            dir_name: dir_name.into(),
        }
    }

    /// Render an event without printing it
    pub fn format(&self, event: SyncEvent<'_>) -> String {
        let dir = &self.dir_name;
        match event {
            SyncEvent::Copying { name } => {
                format!("{} {dir}/{name}", Style::new().cyan().apply_to("Copying"))
            }
            SyncEvent::Checking { name } => {
                format!("{} {dir}/{name}", Style::new().cyan().apply_to("Checking"))
            }
            SyncEvent::UpToDate { name, version } => format!(
                "{} {dir}/{name} {}",
                Style::new().green().apply_to("Fetched"),
                Style::new()
                    .dim()
                    .apply_to(format!("already up to date at {version}"))
            ),
            SyncEvent::Fetching { name, version } => format!(
                "{} {dir}/{name} at version {}",
                Style::new().yellow().bold().apply_to("Fetching"),
                Style::new().bold().apply_to(version)
            ),
        }
    }

    pub fn print_summary(&self, report: &SyncReport) {
        if report.is_empty() {
            println!("{}", Style::new().dim().apply_to("No modules to fetch"));
            return;
        }

        let up_to_date = report
            .outcomes()
            .filter(|(_, outcome)| matches!(outcome, Outcome::UpToDate { .. }))
            .count();
        let materialized = report.len() - up_to_date;

        println!(
            "{}",
            Style::new().bold().apply_to(format!(
                "{materialized} materialized, {up_to_date} up to date"
            ))
        );
    }
}

impl Reporter for ConsoleReporter {
    fn report(&self, event: SyncEvent<'_>) {
        println!("{}", self.format(event));
    }
}
