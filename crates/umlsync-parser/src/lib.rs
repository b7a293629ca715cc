//! # umlsync Parser
//!
//! Reader for class description files. A class description is an XML
//! document listing classes with their base class, fields and methods:
//!
//! ```xml
//! <Classes>
//!   <Class n="Player" b="Entity" t="Controllable hero">
//!     <Fields><Field v="- weapon: Weapon" t="Equipped weapon"/></Fields>
//!     <Methods><Method v="+ Attack(target: Enemy): void"/></Methods>
//!   </Class>
//! </Classes>
//! ```
//!
//! ## Usage
//!
//! ```
//! # use umlsync_parser::{parse, ParseError};
//! fn main() -> Result<(), ParseError> {
//!     let source = r#"
//!         <Classes>
//!           <Class n="Player"><Fields><Field v="- weapon: Weapon"/></Fields></Class>
//!           <Class n="Weapon"/>
//!         </Classes>
//!     "#;
//!
//!     let model = parse(source)?;
//!     let player = model.find_by_name("Player").unwrap();
//!     assert_eq!(model.get(player).associations().len(), 1);
//!     Ok(())
//! }
//! ```

mod associations;
pub mod error;
mod reader;
mod span;

pub use associations::{resolve_associations, type_names};
pub use error::ParseError;
pub use span::Span;

use umlsync_core::model::ClassModel;

/// Parse a class description into a model with resolved associations.
///
/// 1. **Read** - Build one descriptor per `Class` element, in document order
/// 2. **Resolve** - Derive associations from field types
///
/// # Errors
///
/// Returns a [`ParseError`] carrying every problem found: malformed XML, a
/// class without a name, or a class name used twice.
pub fn parse(source: &str) -> Result<ClassModel, ParseError> {
    let mut model = reader::read_model(source)?;
    resolve_associations(&mut model);
    Ok(model)
}
