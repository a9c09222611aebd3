//! Read-only drill-down views for one dataflow.

use ratatui::Frame;
use ratatui::crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::Rect;
use ratatui::widgets::{Paragraph, Wrap};

use flowdeck_ui::{Effects, Panel, PanelId, Record, Theme, lookup_path, next_panel_id};

/// Pretty-printed record view pushed from the dataflow list, either as the
/// full descriptor ("config") or a summarized report.
pub struct DataflowDetailPanel {
    id: PanelId,
    label: String,
    body: String,
    scroll: u16,
}

impl DataflowDetailPanel {
    /// The dataflow's full descriptor.
    pub fn config(record: &Record) -> Self {
        Self::build("Dataflow Config", record, false)
    }

    /// Deployment summary followed by the descriptor.
    pub fn report(record: &Record) -> Self {
        Self::build("Dataflow Report", record, true)
    }

    fn build(kind: &str, record: &Record, summarize: bool) -> Self {
        let dataflow_id = record
            .get("id")
            .and_then(|value| value.as_str())
            .unwrap_or("unknown");
        let mut body = String::new();
        if summarize {
            for (title, path) in [
                ("Status", "status"),
                ("Masters", "master.numOfInstances"),
                ("Workers", "worker.numOfInstances"),
            ] {
                let value = lookup_path(record, path)
                    .map(|value| value.to_string())
                    .unwrap_or_else(|| "-".to_string());
                body.push_str(&format!("{title}: {value}\n"));
            }
            body.push('\n');
        }
        body.push_str(
            &serde_json::to_string_pretty(record).unwrap_or_else(|_| record.to_string()),
        );
        Self {
            id: next_panel_id(),
            label: format!("{kind}: {dataflow_id}"),
            body,
            scroll: 0,
        }
    }
}

impl Panel for DataflowDetailPanel {
    fn id(&self) -> PanelId {
        self.id
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let max_scroll = self.body.lines().count().saturating_sub(1) as u16;
        self.scroll = self.scroll.min(max_scroll);
        let paragraph = Paragraph::new(self.body.as_str())
            .style(theme.status)
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0));
        frame.render_widget(paragraph, area);
    }

    fn handle_key(&mut self, key: KeyEvent, effects: &mut Effects) {
        match key.code {
            KeyCode::Up => self.scroll = self.scroll.saturating_sub(1),
            KeyCode::Down => self.scroll = self.scroll.saturating_add(1),
            KeyCode::Esc => effects.pop(),
            _ => {}
        }
    }
}
