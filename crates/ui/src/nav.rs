//! Breadcrumb navigation stack.
//!
//! The stack owns an ordered history of panels. Drill-down pushes a new
//! panel; returning truncates back to an ancestor whose state is preserved,
//! not reconstructed. The trail itself is rendered as one line above the
//! active panel, with jump hints for every ancestor.

use ratatui::Frame;
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::error::UiError;
use crate::panel::{Effect, Effects, Panel, PanelId, PanelMsg};
use crate::theme::Theme;

const CRUMB_SEPARATOR: &str = " ▸ ";

/// Explicit render-region resource handed to a stack at construction.
///
/// Exactly one panel is attached to a region at a time; the stack detaches
/// the outgoing panel before attaching its successor and releases the
/// region when the stack is dropped.
#[derive(Debug)]
pub struct Region {
    name: String,
    attached: Option<PanelId>,
}

impl Region {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attached: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attached(&self) -> Option<PanelId> {
        self.attached
    }

    fn attach(&mut self, panel: PanelId) {
        debug_assert!(self.attached.is_none(), "region already occupied");
        log::debug!("region '{}': attach panel {panel}", self.name);
        self.attached = Some(panel);
    }

    fn detach(&mut self, panel: PanelId) {
        debug_assert_eq!(self.attached, Some(panel), "detaching wrong panel");
        log::debug!("region '{}': detach panel {panel}", self.name);
        self.attached = None;
    }
}

struct Crumb {
    panel: Box<dyn Panel>,
    label: String,
}

/// Push/pop history of full-screen panels with a visible breadcrumb trail.
///
/// Invariant: the crumb list is never empty once constructed, and the
/// active panel is always the last crumb.
pub struct NavigationStack {
    crumbs: Vec<Crumb>,
    region: Region,
}

impl NavigationStack {
    /// Build the stack over `region` with its root panel. The root's
    /// initial effects (typically its first data load) are queued on
    /// `effects`.
    pub fn new(
        region: Region,
        root: Box<dyn Panel>,
        effects: &mut Effects,
    ) -> Result<Self, UiError> {
        let label = labeled(&*root)?;
        let mut stack = Self {
            crumbs: Vec::new(),
            region,
        };
        stack.region.attach(root.id());
        stack.crumbs.push(Crumb { panel: root, label });
        stack.active_mut().on_attach(effects);
        Ok(stack)
    }

    /// Enter a deeper context. The outgoing panel is detached (its event
    /// bindings and in-flight fetches cancelled) before the new panel is
    /// attached.
    pub fn push(&mut self, panel: Box<dyn Panel>, effects: &mut Effects) -> Result<(), UiError> {
        let label = labeled(&*panel)?;
        let outgoing = self.active_mut();
        outgoing.on_detach();
        let outgoing_id = outgoing.id();
        self.region.detach(outgoing_id);
        self.region.attach(panel.id());
        self.crumbs.push(Crumb { panel, label });
        self.active_mut().on_attach(effects);
        Ok(())
    }

    /// Return to the crumb at `index`, dropping everything deeper. The
    /// target's prior state is preserved. An out-of-range index fails with
    /// an index error and leaves the stack unchanged.
    pub fn pop_to(&mut self, index: usize, effects: &mut Effects) -> Result<(), UiError> {
        if index >= self.crumbs.len() {
            return Err(UiError::Index {
                what: "crumb",
                index,
                len: self.crumbs.len(),
            });
        }
        if index == self.crumbs.len() - 1 {
            return Ok(());
        }
        let outgoing = self.active_mut();
        outgoing.on_detach();
        let outgoing_id = outgoing.id();
        self.region.detach(outgoing_id);
        self.crumbs.truncate(index + 1);
        self.region.attach(self.crumbs[index].panel.id());
        self.active_mut().on_attach(effects);
        Ok(())
    }

    /// Return one level; no-op at the root.
    pub fn pop(&mut self, effects: &mut Effects) {
        if self.crumbs.len() > 1 {
            // Length checked above, the index is always valid.
            let _ = self.pop_to(self.crumbs.len() - 2, effects);
        }
    }

    pub fn current(&self) -> &dyn Panel {
        &*self.crumbs[self.crumbs.len() - 1].panel
    }

    pub fn current_mut(&mut self) -> &mut dyn Panel {
        self.active_mut()
    }

    pub fn depth(&self) -> usize {
        self.crumbs.len()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.crumbs.iter().map(|crumb| crumb.label.as_str()).collect()
    }

    /// Route a fetch completion to the panel that issued it, wherever it
    /// sits in the stack. Completions for panels that have been popped
    /// resolve to a not-found error the caller is expected to log and
    /// drop.
    pub fn deliver(
        &mut self,
        panel: PanelId,
        msg: PanelMsg,
        effects: &mut Effects,
    ) -> Result<(), UiError> {
        match self
            .crumbs
            .iter_mut()
            .find(|crumb| crumb.panel.id() == panel)
        {
            Some(crumb) => {
                crumb.panel.deliver(msg, effects);
                Ok(())
            }
            None => Err(UiError::NotFound { what: "panel" }),
        }
    }

    /// Jump keys (Alt+1..9 to an ancestor, Home to the root) are handled
    /// here; everything else goes to the active panel.
    pub fn handle_key(&mut self, key: KeyEvent, effects: &mut Effects) {
        if key.modifiers.contains(KeyModifiers::ALT)
            && let KeyCode::Char(digit @ '1'..='9') = key.code
        {
            let index = digit as usize - '1' as usize;
            if index < self.crumbs.len() {
                // In range by the check above.
                let _ = self.pop_to(index, effects);
            }
            return;
        }
        if key.code == KeyCode::Home && self.crumbs.len() > 1 {
            let _ = self.pop_to(0, effects);
            return;
        }
        self.active_mut().handle_key(key, effects);
    }

    /// Consume navigation effects; everything else is returned for the
    /// embedding application. Pushes may queue follow-up effects (such as
    /// the new panel's initial load), so the queue is drained to a fixed
    /// point.
    pub fn apply(&mut self, mut effects: Effects) -> Result<Vec<Effect>, UiError> {
        let mut remainder = Vec::new();
        while !effects.is_empty() {
            let batch = effects.drain();
            for effect in batch {
                match effect {
                    Effect::Push(panel) => self.push(panel, &mut effects)?,
                    Effect::PopTo(index) => self.pop_to(index, &mut effects)?,
                    Effect::Pop => self.pop(&mut effects),
                    other => remainder.push(other),
                }
            }
        }
        Ok(remainder)
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let layout =
            Layout::vertical([Constraint::Length(1), Constraint::Min(1)]).split(area);
        self.render_trail(frame, layout[0], theme);
        let panel_area = layout[1];
        let active = self.crumbs.len() - 1;
        self.crumbs[active].panel.render(frame, panel_area, theme);
    }

    fn render_trail(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let last = self.crumbs.len() - 1;
        let mut spans = Vec::new();
        for (index, crumb) in self.crumbs.iter().enumerate() {
            if index > 0 {
                spans.push(Span::styled(CRUMB_SEPARATOR, theme.status));
            }
            if index < last {
                // Ancestors are jump targets; the leaf is not clickable.
                spans.push(Span::styled(
                    format!("{} {}", index + 1, crumb.label),
                    theme.breadcrumb,
                ));
            } else {
                spans.push(Span::styled(crumb.label.clone(), theme.breadcrumb_active));
            }
        }
        if last > 0 {
            spans.push(Span::styled("   (Alt+n jump, Esc back)", theme.status));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn active_mut(&mut self) -> &mut dyn Panel {
        let last = self.crumbs.len() - 1;
        &mut *self.crumbs[last].panel
    }
}

impl Drop for NavigationStack {
    fn drop(&mut self) {
        if let Some(crumb) = self.crumbs.last_mut() {
            crumb.panel.on_detach();
            let id = crumb.panel.id();
            self.region.detach(id);
        }
    }
}

fn labeled(panel: &dyn Panel) -> Result<String, UiError> {
    let label = panel.label().trim();
    if label.is_empty() {
        return Err(UiError::configuration(
            "panel pushed without a breadcrumb label",
        ));
    }
    Ok(label.to_string())
}
