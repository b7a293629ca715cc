//! umlsync - Keeps draw.io class diagrams in sync with a class model.
//!
//! A class model is read from an XML description of classes, fields and
//! methods, then applied to a `.drawio` file: missing classes are drawn,
//! existing ones are resized and relabelled in place, and inheritance and
//! association edges are added. Anything drawn by hand is left alone, and
//! stale elements are only removed when cleanup is enabled.

pub mod config;
pub mod document;
pub mod layout;
pub mod reconcile;

mod error;

pub use umlsync_core::{descriptor, geometry, markup, metrics, model};

pub use error::UmlSyncError;

use std::path::Path;

use log::{debug, info};

use config::AppConfig;
use document::Document;
use layout::LayoutPlanner;
use model::ClassModel;
use reconcile::{Reconciler, SyncOptions, SyncReport};

/// Entry point for reading class models and applying them to diagrams.
///
/// # Examples
///
/// ```
/// use umlsync::{Synchronizer, config::AppConfig, document::Document};
///
/// let source = r#"<Classes>
///   <Class n="Player" b="Entity">
///     <Fields><Field v="- hp: int" t="Health points" /></Fields>
///     <Methods><Method v="+ Attack(): void" /></Methods>
///   </Class>
///   <Class n="Entity" />
/// </Classes>"#;
///
/// let synchronizer = Synchronizer::new(AppConfig::default());
/// let model = synchronizer.parse(source).expect("valid source");
///
/// let mut document = Document::new();
/// let report = synchronizer.sync_document(&mut document, &model);
///
/// // Two containers, two blocks, a separator and one inheritance edge.
/// assert_eq!(report.created(), 6);
///
/// let again = synchronizer.sync_document(&mut document, &model);
/// assert!(again.is_unchanged());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Synchronizer {
    config: AppConfig,
}

impl Synchronizer {
    /// Create a new synchronizer with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Read a class model from its XML description.
    ///
    /// # Errors
    ///
    /// Returns [`UmlSyncError::Parse`] with every problem found in `source`.
    pub fn parse(&self, source: &str) -> Result<ClassModel, UmlSyncError> {
        info!("Parsing class model");
        let model = umlsync_parser::parse(source)
            .map_err(|err| UmlSyncError::new_parse_error(err, source))?;
        debug!(classes = model.len(); "Class model parsed");
        Ok(model)
    }

    /// Apply `model` to a document in memory.
    ///
    /// Legacy cells are migrated to user objects before reconciliation.
    pub fn sync_document(&self, document: &mut Document, model: &ClassModel) -> SyncReport {
        document.migrate_to_user_objects();
        let options = SyncOptions::from(*self.config.cleanup());
        let planner = LayoutPlanner::new(self.config.layout());
        Reconciler::new(document, model, options, planner).run()
    }

    /// Apply `model` to the diagram at `path`, creating the file if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be read or is not a
    /// usable draw.io diagram, or if saving fails. A failed save leaves the
    /// previous file intact.
    pub fn sync_file(
        &self,
        path: impl AsRef<Path>,
        model: &ClassModel,
    ) -> Result<SyncReport, UmlSyncError> {
        let path = path.as_ref();
        let mut document = Document::open_or_initialize(path)?;
        let report = self.sync_document(&mut document, model);
        document.save(path)?;
        info!(path:? = path, report:% = report; "Diagram synchronized");
        Ok(report)
    }
}
