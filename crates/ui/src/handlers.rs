//! Behavior registry for table configurations.

use std::collections::HashMap;

use crate::panel::Effects;
use crate::table::RecordTable;
use crate::value::Record;

/// Pure derived-value function, keyed by the id a [`FieldSpec`] references.
/// Returning `None` falls back to the field's default value.
///
/// [`FieldSpec`]: crate::FieldSpec
pub type DisplayFn = fn(&Record) -> Option<String>;

/// Action implementation. Row-level invocations receive the page-relative
/// row index; toolbar invocations receive `None`. Side effects go through
/// the table and the effect queue passed in, never through captured
/// globals.
pub type ActionFn = Box<dyn Fn(&mut RecordTable, &mut Effects, Option<usize>)>;

/// Maps handler ids to implementations. A table validates at bind time that
/// every id its config references is present here.
#[derive(Default)]
pub struct Handlers {
    display: HashMap<String, DisplayFn>,
    actions: HashMap<String, ActionFn>,
}

impl Handlers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_display(&mut self, id: impl Into<String>, handler: DisplayFn) -> &mut Self {
        let id = id.into();
        if self.display.insert(id.clone(), handler).is_some() {
            log::warn!("display handler '{id}' registered twice; last wins");
        }
        self
    }

    pub fn register_action<F>(&mut self, id: impl Into<String>, handler: F) -> &mut Self
    where
        F: Fn(&mut RecordTable, &mut Effects, Option<usize>) + 'static,
    {
        let id = id.into();
        if self.actions.insert(id.clone(), Box::new(handler)).is_some() {
            log::warn!("action handler '{id}' registered twice; last wins");
        }
        self
    }

    pub fn has_display(&self, id: &str) -> bool {
        self.display.contains_key(id)
    }

    pub fn has_action(&self, id: &str) -> bool {
        self.actions.contains_key(id)
    }

    pub(crate) fn display_fn(&self, id: &str) -> Option<&DisplayFn> {
        self.display.get(id)
    }

    pub(crate) fn action_fn(&self, id: &str) -> Option<&ActionFn> {
        self.actions.get(id)
    }
}

impl std::fmt::Debug for Handlers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Handlers")
            .field("display", &self.display.keys().collect::<Vec<_>>())
            .field("actions", &self.actions.keys().collect::<Vec<_>>())
            .finish()
    }
}
