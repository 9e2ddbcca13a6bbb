//! Dialog Module
//!
//! Dialog definitions loaded from TOML/JSON files, kept in a hot-reloadable
//! catalog indexed by id and trigger.

pub mod definition;
pub mod registry;

pub use definition::{
    Action, ActionKind, Button, Dialog, DialogId, Page, RawAction, RawButton, RawDialog,
    RawDialogFile, RawDialogId, RawPage,
};
pub use registry::{DialogCatalog, DialogRegistry, HotReloadEvent};
