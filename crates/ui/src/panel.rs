//! Panels and the effect queue that connects them to their owners.
//!
//! Handlers never call collaborators directly. They queue [`Effect`]s, and
//! the owning stack/application drains the queue strictly after the
//! triggering handler has returned. Navigation effects are consumed by the
//! [`NavigationStack`](crate::NavigationStack); the rest (fetches, command
//! invocations) are handed to the embedding application.

use std::sync::atomic::{AtomicU64, Ordering};

use ratatui::Frame;
use ratatui::crossterm::event::KeyEvent;
use ratatui::layout::Rect;

use crate::theme::Theme;
use crate::value::Record;

/// Process-wide unique panel identifier, used to route asynchronous fetch
/// completions back to the panel that requested them.
pub type PanelId = u64;

static NEXT_PANEL_ID: AtomicU64 = AtomicU64::new(1);

pub fn next_panel_id() -> PanelId {
    NEXT_PANEL_ID.fetch_add(1, Ordering::Relaxed)
}

/// Completion of an asynchronous operation, delivered to the panel that
/// issued it. Errors arrive as display text; transport detail stays in the
/// client layer.
#[derive(Debug)]
pub enum PanelMsg {
    Records {
        token: u64,
        outcome: Result<Vec<Record>, String>,
    },
}

/// A deferred side effect queued by a handler.
pub enum Effect {
    /// Enter a deeper context.
    Push(Box<dyn Panel>),
    /// Return to the crumb at `index`.
    PopTo(usize),
    /// Return one level; no-op at the root.
    Pop,
    /// Fetch a collection for `panel`; the completion must carry `token`.
    Load {
        panel: PanelId,
        token: u64,
        collection: String,
    },
    /// Issue a command against one resource. Local state is not updated
    /// optimistically; observing the effect requires an explicit reload.
    Invoke {
        collection: String,
        id: String,
        command: String,
    },
    /// Open an external URL (visualization embeds).
    OpenUrl(String),
    /// Show a transient status-line message.
    Status(String),
}

impl std::fmt::Debug for Effect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Effect::Push(panel) => f.debug_tuple("Push").field(&panel.label()).finish(),
            Effect::PopTo(index) => f.debug_tuple("PopTo").field(index).finish(),
            Effect::Pop => write!(f, "Pop"),
            Effect::Load {
                panel,
                token,
                collection,
            } => f
                .debug_struct("Load")
                .field("panel", panel)
                .field("token", token)
                .field("collection", collection)
                .finish(),
            Effect::Invoke {
                collection,
                id,
                command,
            } => f
                .debug_struct("Invoke")
                .field("collection", collection)
                .field("id", id)
                .field("command", command)
                .finish(),
            Effect::OpenUrl(url) => f.debug_tuple("OpenUrl").field(url).finish(),
            Effect::Status(text) => f.debug_tuple("Status").field(text).finish(),
        }
    }
}

/// Ordered queue of deferred effects.
#[derive(Debug, Default)]
pub struct Effects {
    queue: Vec<Effect>,
}

impl Effects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_panel(&mut self, panel: Box<dyn Panel>) {
        self.queue.push(Effect::Push(panel));
    }

    pub fn pop_to(&mut self, index: usize) {
        self.queue.push(Effect::PopTo(index));
    }

    pub fn pop(&mut self) {
        self.queue.push(Effect::Pop);
    }

    pub fn load(&mut self, panel: PanelId, token: u64, collection: impl Into<String>) {
        self.queue.push(Effect::Load {
            panel,
            token,
            collection: collection.into(),
        });
    }

    pub fn invoke(
        &mut self,
        collection: impl Into<String>,
        id: impl Into<String>,
        command: impl Into<String>,
    ) {
        self.queue.push(Effect::Invoke {
            collection: collection.into(),
            id: id.into(),
            command: command.into(),
        });
    }

    pub fn open_url(&mut self, url: impl Into<String>) {
        self.queue.push(Effect::OpenUrl(url.into()));
    }

    pub fn status(&mut self, text: impl Into<String>) {
        self.queue.push(Effect::Status(text.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn drain(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.queue)
    }
}

/// A full-screen unit pushable onto the navigation stack.
///
/// A panel carries its own internal state plus whatever context it was
/// constructed with. It holds no back-reference to its stack; all outward
/// interaction goes through the [`Effects`] queue passed into its methods.
pub trait Panel {
    /// Stable unique id, used to route fetch completions.
    fn id(&self) -> PanelId;

    /// Breadcrumb label. Must be non-empty to be pushable.
    fn label(&self) -> &str;

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme);

    fn handle_key(&mut self, key: KeyEvent, effects: &mut Effects);

    /// Deliver the completion of an asynchronous operation this panel
    /// issued. Default: ignore.
    fn deliver(&mut self, msg: PanelMsg, effects: &mut Effects) {
        let _ = (msg, effects);
    }

    /// Called when the panel becomes the active crumb, both on first push
    /// and when navigation returns to it. Prior state is preserved across
    /// reattachment; panels decide themselves whether to reload.
    fn on_attach(&mut self, effects: &mut Effects) {
        let _ = effects;
    }

    /// Called before the panel stops being the active crumb. Must cancel
    /// any in-flight fetches so late completions cannot mutate it.
    fn on_detach(&mut self) {}
}
