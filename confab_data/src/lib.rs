//! Shared data model for confab dialog content.
//!
//! Holds the bounded [`Id`] type, the runtime [`Dialog`] model, the serde
//! authoring definitions in [`defs`], and the content analysis passes used
//! by authoring tools ([`reachable_from`], [`validate_dialog`]).

pub mod defs;
pub mod dialog;
pub mod graph;
pub mod id;
pub mod validate;

pub use dialog::{Dialog, DialogError, Page, Response, Target};
pub use graph::reachable_from;
pub use id::{Id, IdError};
pub use validate::{ValidationError, validate_dialog};
