//! CLI logic for the umlsync diagram tool.
//!
//! Every class description in the input directory is synchronized into a
//! diagram of the same name in the output directory.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

use log::{error, info, warn};

use umlsync::{
    Synchronizer, UmlSyncError,
    config::CleanupConfig,
    reconcile::{Severity, SyncReport},
};

/// Extension of class description files.
const SOURCE_EXTENSION: &str = "xml";
/// Extension of generated diagrams.
const DIAGRAM_EXTENSION: &str = "drawio";

/// Outcome of a run over an input directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    synchronized: usize,
    failed: Vec<PathBuf>,
}

impl RunSummary {
    /// Number of diagrams written.
    pub fn synchronized(&self) -> usize {
        self.synchronized
    }

    /// Class descriptions that could not be synchronized.
    pub fn failed(&self) -> &[PathBuf] {
        &self.failed
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} diagram(s) synchronized, {} failed",
            self.synchronized,
            self.failed.len()
        )
    }
}

/// Run the umlsync CLI application
///
/// Each `*.xml` file of the input directory, in name order, is parsed and
/// applied to `<stem>.drawio` in the output directory. A file that fails is
/// reported and skipped; the failures are listed in the returned summary.
///
/// # Errors
///
/// Returns `UmlSyncError` for:
/// - Configuration loading errors
/// - A missing or unreadable input directory
/// - An output directory that cannot be created
pub fn run(args: &Args) -> Result<RunSummary, UmlSyncError> {
    info!(
        input_dir = args.input,
        output_dir = args.output;
        "Synchronizing diagrams"
    );

    let app_config = config::load_config(args.config.as_ref())?;
    let flags = CleanupConfig::new(
        args.cleanup_classes,
        args.cleanup_arrows,
        args.cleanup_arrows,
    );
    let cleanup = app_config.cleanup().union(flags);
    let synchronizer = Synchronizer::new(app_config.with_cleanup(cleanup));

    let sources = collect_sources(Path::new(&args.input))?;
    if sources.is_empty() {
        warn!(input_dir = args.input; "No class descriptions found");
    }
    fs::create_dir_all(&args.output)?;

    let mut summary = RunSummary::default();
    for source in sources {
        let Some(stem) = source.file_stem() else {
            continue;
        };
        let mut name = stem.to_os_string();
        name.push(".");
        name.push(DIAGRAM_EXTENSION);
        let output = Path::new(&args.output).join(name);

        match sync_one(&synchronizer, &source, &output) {
            Ok(report) => {
                log_issues(&source, &report);
                info!(
                    input:? = source,
                    output:? = output,
                    report:% = report;
                    "Diagram synchronized"
                );
                summary.synchronized += 1;
            }
            Err(err) => {
                for rendered in error_adapter::render(&err) {
                    error!(input:? = source; "{rendered}");
                }
                summary.failed.push(source);
            }
        }
    }

    info!(summary:% = summary; "Run finished");
    Ok(summary)
}

fn sync_one(
    synchronizer: &Synchronizer,
    source: &Path,
    output: &Path,
) -> Result<SyncReport, UmlSyncError> {
    let text = fs::read_to_string(source)?;
    let model = synchronizer.parse(&text)?;
    synchronizer.sync_file(output, &model)
}

fn log_issues(source: &Path, report: &SyncReport) {
    for issue in report.issues() {
        match issue.severity() {
            Severity::Warning => warn!(input:? = source; "{issue}"),
            Severity::Notice => info!(input:? = source; "{issue}"),
        }
    }
}

/// Lists the class description files of `dir`, sorted by path.
fn collect_sources(dir: &Path) -> Result<Vec<PathBuf>, UmlSyncError> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path.extension().and_then(|ext| ext.to_str()) == Some(SOURCE_EXTENSION)
        })
        .collect();
    files.sort();
    Ok(files)
}
