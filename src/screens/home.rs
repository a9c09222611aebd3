//! Root dashboard menu: dataflow lists and analytics reports.

use ratatui::Frame;
use ratatui::crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::Rect;
use ratatui::widgets::{List, ListItem, ListState};

use flowdeck_ui::{Effects, Panel, PanelId, Theme, next_panel_id};

use crate::kibana;

use super::{DataflowListPanel, VisualizationPanel};

const LABEL: &str = "Dashboard";

// Saved-visualization queries are maintained alongside the Kibana
// dashboards; they are opaque here.
const WEBPAGE_STAT_QUERY: &str =
    "(filters:!(),linked:!f,query:(query_string:(analyze_wildcard:!t,query:'*')))";
const ADS_STAT_QUERY: &str =
    "(filters:!(),linked:!f,query:(query_string:(analyze_wildcard:!t,query:'*')))";
const REPORT_WINDOW: &str = "30m";

enum MenuTarget {
    ActiveDataflows,
    HistoryDataflows,
    Report {
        label: &'static str,
        visualization: &'static str,
        query: &'static str,
    },
}

struct MenuEntry {
    title: &'static str,
    target: MenuTarget,
}

pub struct HomePanel {
    id: PanelId,
    entries: Vec<MenuEntry>,
    cursor: usize,
    page_size: usize,
    kibana_server: String,
}

impl HomePanel {
    pub fn new(page_size: usize, kibana_server: String) -> Self {
        let entries = vec![
            MenuEntry {
                title: "Active Dataflows",
                target: MenuTarget::ActiveDataflows,
            },
            MenuEntry {
                title: "History Dataflows",
                target: MenuTarget::HistoryDataflows,
            },
            MenuEntry {
                title: "Webpage Stat Report",
                target: MenuTarget::Report {
                    label: "Webpage Stat Report",
                    visualization: "Analytics-Webpage-Stat",
                    query: WEBPAGE_STAT_QUERY,
                },
            },
            MenuEntry {
                title: "Advertising Stat Report",
                target: MenuTarget::Report {
                    label: "Advertising Stat Report",
                    visualization: "Analytics-Ads-Click-Stat",
                    query: ADS_STAT_QUERY,
                },
            },
        ];
        Self {
            id: next_panel_id(),
            entries,
            cursor: 0,
            page_size,
            kibana_server,
        }
    }

    fn open_entry(&self, effects: &mut Effects) {
        match &self.entries[self.cursor].target {
            MenuTarget::ActiveDataflows => match DataflowListPanel::active(self.page_size) {
                Ok(panel) => effects.push_panel(Box::new(panel)),
                Err(err) => log::error!("broken dataflow table config: {err}"),
            },
            MenuTarget::HistoryDataflows => match DataflowListPanel::history(self.page_size) {
                Ok(panel) => effects.push_panel(Box::new(panel)),
                Err(err) => log::error!("broken dataflow table config: {err}"),
            },
            MenuTarget::Report {
                label,
                visualization,
                query,
            } => {
                let url = kibana::embed_url(&self.kibana_server, visualization, query, REPORT_WINDOW);
                effects.push_panel(Box::new(VisualizationPanel::new(*label, url)));
            }
        }
    }
}

impl Panel for HomePanel {
    fn id(&self) -> PanelId {
        self.id
    }

    fn label(&self) -> &str {
        LABEL
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let items: Vec<ListItem> = self
            .entries
            .iter()
            .map(|entry| ListItem::new(entry.title))
            .collect();
        let list = List::new(items)
            .highlight_style(theme.row_highlight)
            .highlight_symbol("▶ ");
        let mut state = ListState::default();
        state.select(Some(self.cursor));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn handle_key(&mut self, key: KeyEvent, effects: &mut Effects) {
        match key.code {
            KeyCode::Up => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Down => {
                if self.cursor + 1 < self.entries.len() {
                    self.cursor += 1;
                }
            }
            KeyCode::Enter => self.open_entry(effects),
            _ => {}
        }
    }
}
