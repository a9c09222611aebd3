//! Declarative record-table and breadcrumb navigation components.
//!
//! The crate root re-exports the types an embedding application needs to
//! describe tables ([`TableConfig`], [`FieldSpec`], [`ActionSpec`]), register
//! behavior ([`Handlers`]), and wire panels into a breadcrumb stack
//! ([`NavigationStack`], [`Panel`], [`Region`]).

mod config;
mod error;
mod handlers;
mod nav;
mod panel;
mod table;
mod theme;
mod value;

pub use config::{ActionSpec, FieldSpec, TableConfig};
pub use error::UiError;
pub use handlers::{ActionFn, DisplayFn, Handlers};
pub use nav::{NavigationStack, Region};
pub use panel::{Effect, Effects, Panel, PanelId, PanelMsg, next_panel_id};
pub use table::RecordTable;
pub use theme::{Theme, theme_names};
pub use value::{Record, display_string, lookup_path};
