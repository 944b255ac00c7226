//! Single-selection state machine for the store grid.
//!
//! States are `None` or `Selected(id)`. Every real change produces a
//! [`SelectionTransition`] naming the entity to deselect (if any) and the
//! entity to select (if any). Rendering layers subscribe to transitions
//! instead of being wired into the controller.
//!
//! Ids are not checked against the catalog here.

use core::fmt;

use storefront_types::EntityId;
use tracing::trace;

/// A change of selection, old id first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionTransition {
    /// The entity to visually deselect, if one was selected.
    pub previous: Option<EntityId>,
    /// The entity to visually select, or `None` after a clear.
    pub current: Option<EntityId>,
}

/// Callback invoked with each selection change.
pub type SelectionListener = Box<dyn FnMut(&SelectionTransition) + Send>;

/// Tracks which catalog entity, if any, is selected.
#[derive(Default)]
pub struct SelectionController {
    selected: Option<EntityId>,
    listeners: Vec<SelectionListener>,
}

impl fmt::Debug for SelectionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionController")
            .field("selected", &self.selected)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl SelectionController {
    /// Create a controller with nothing selected.
    pub const fn new() -> Self {
        Self {
            selected: None,
            listeners: Vec::new(),
        }
    }

    /// The currently selected entity.
    pub const fn selected(&self) -> Option<&EntityId> {
        self.selected.as_ref()
    }

    /// Whether `id` is the current selection.
    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.as_ref().is_some_and(|s| s.as_str() == id)
    }

    /// Register a listener for every future transition.
    pub fn subscribe(&mut self, listener: impl FnMut(&SelectionTransition) + Send + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Select `id`.
    ///
    /// Returns `None` when `id` is already selected; nothing is emitted.
    pub fn select(&mut self, id: impl Into<EntityId>) -> Option<SelectionTransition> {
        let id = id.into();
        if self.selected.as_ref() == Some(&id) {
            return None;
        }
        let previous = self.selected.replace(id.clone());
        Some(self.emit(SelectionTransition {
            previous,
            current: Some(id),
        }))
    }

    /// Return to the `None` state.
    ///
    /// Returns `None` when nothing was selected.
    pub fn clear(&mut self) -> Option<SelectionTransition> {
        let previous = self.selected.take()?;
        Some(self.emit(SelectionTransition {
            previous: Some(previous),
            current: None,
        }))
    }

    fn emit(&mut self, transition: SelectionTransition) -> SelectionTransition {
        trace!(
            previous = ?transition.previous,
            current = ?transition.current,
            "Selection changed"
        );
        for listener in &mut self.listeners {
            listener(&transition);
        }
        transition
    }
}
