//! Dataflow list screens: a record table over the `dataflow` collections
//! with drill-down into per-dataflow report and config panels.

use std::sync::Arc;

use ratatui::Frame;
use ratatui::crossterm::event::KeyEvent;
use ratatui::layout::Rect;

use flowdeck_ui::{
    ActionSpec, Effects, FieldSpec, Handlers, Panel, PanelId, PanelMsg, Record, RecordTable,
    TableConfig, Theme, UiError, display_string, lookup_path, next_panel_id,
};

use super::DataflowDetailPanel;

const ACTIVE_COLLECTION: &str = "dataflow";
const HISTORY_COLLECTION: &str = "dataflow-history";

pub struct DataflowListPanel {
    id: PanelId,
    collection: &'static str,
    table: RecordTable,
    loaded: bool,
}

impl DataflowListPanel {
    pub fn active(page_size: usize) -> Result<Self, UiError> {
        Self::new("List Active Dataflow", ACTIVE_COLLECTION, page_size)
    }

    pub fn history(page_size: usize) -> Result<Self, UiError> {
        Self::new("List History Dataflow", HISTORY_COLLECTION, page_size)
    }

    fn new(label: &str, collection: &'static str, page_size: usize) -> Result<Self, UiError> {
        let id = next_panel_id();
        let mut handlers = Handlers::new();
        handlers.register_display("master-instances", |record| {
            lookup_path(record, "master.numOfInstances").and_then(display_string)
        });
        handlers.register_display("worker-instances", |record| {
            lookup_path(record, "worker.numOfInstances").and_then(display_string)
        });
        handlers.register_action("open-report", |table, effects, row| {
            if let Some(record) = selected_record(table, row) {
                effects.push_panel(Box::new(DataflowDetailPanel::report(&record)));
            }
        });
        handlers.register_action("open-config", |table, effects, row| {
            if let Some(record) = selected_record(table, row) {
                effects.push_panel(Box::new(DataflowDetailPanel::config(&record)));
            }
        });
        handlers.register_action("stop", |table, effects, row| {
            dataflow_command(table, effects, row, "stop");
        });
        handlers.register_action("resume", |table, effects, row| {
            dataflow_command(table, effects, row, "resume");
        });
        handlers.register_action("reload", move |table, effects, _row| {
            let token = table.begin_fetch();
            effects.load(id, token, collection);
        });

        let config = TableConfig::new(label)
            .field(
                FieldSpec::new("id", "Dataflow Id")
                    .filterable(true)
                    .on_select("open-report"),
            )
            .field(
                FieldSpec::new("numOfMaster", "Masters")
                    .filterable(true)
                    .display_with("master-instances"),
            )
            .field(
                FieldSpec::new("numOfWorkers", "Workers")
                    .filterable(true)
                    .display_with("worker-instances"),
            )
            .field(FieldSpec::new("status", "Status").filterable(true))
            .row_action(ActionSpec::new("open-config", "config", "Config"))
            .row_action(ActionSpec::new("stop", "stop", "Stop"))
            .row_action(ActionSpec::new("resume", "resume", "Resume"))
            .toolbar_action(ActionSpec::new("reload", "refresh", "Refresh"));

        let table = RecordTable::new(config, Arc::new(handlers))?.with_page_size(page_size);
        Ok(Self {
            id,
            collection,
            table,
            loaded: false,
        })
    }
}

fn selected_record(table: &RecordTable, row: Option<usize>) -> Option<Record> {
    row.and_then(|row| table.record_on_current_page(row)).cloned()
}

fn dataflow_command(
    table: &mut RecordTable,
    effects: &mut Effects,
    row: Option<usize>,
    command: &str,
) {
    let Some(record) = selected_record(table, row) else {
        return;
    };
    let Some(id) = record.get("id").and_then(|value| value.as_str()) else {
        log::warn!("dataflow record without an id; ignoring {command}");
        return;
    };
    effects.invoke(ACTIVE_COLLECTION, id, command);
    effects.status(format!("sent {command} to {id}; Ctrl+R to observe the effect"));
}

impl Panel for DataflowListPanel {
    fn id(&self) -> PanelId {
        self.id
    }

    fn label(&self) -> &str {
        self.table.label()
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        self.table.render(frame, area, theme);
    }

    fn handle_key(&mut self, key: KeyEvent, effects: &mut Effects) {
        self.table.handle_key(key, effects);
    }

    fn deliver(&mut self, msg: PanelMsg, _effects: &mut Effects) {
        match msg {
            PanelMsg::Records { token, outcome } => {
                self.table.apply_fetch(token, outcome);
            }
        }
    }

    fn on_attach(&mut self, effects: &mut Effects) {
        // First attach only; returning to this crumb keeps its view as-is.
        if !self.loaded {
            self.loaded = true;
            let token = self.table.begin_fetch();
            effects.load(self.id, token, self.collection);
        }
    }

    fn on_detach(&mut self) {
        self.table.invalidate_fetches();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowdeck_client::{MemoryClient, ResourceClient};
    use flowdeck_ui::Effect;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::crossterm::event::{KeyCode, KeyModifiers};
    use serde_json::json;

    fn df1() -> Record {
        json!({"id": "df1", "master": {"numOfInstances": 2}, "worker": {"numOfInstances": 4}, "status": "RUNNING"})
    }

    /// Drive the panel the way the application would: attach, extract the
    /// queued load, and deliver its completion.
    fn loaded_panel(records: Vec<Record>) -> DataflowListPanel {
        let mut panel = DataflowListPanel::active(10).unwrap();
        let mut effects = Effects::new();
        panel.on_attach(&mut effects);
        let token = match effects.drain().as_slice() {
            [Effect::Load { panel: id, token, collection }] => {
                assert_eq!(*id, panel.id());
                assert_eq!(collection, "dataflow");
                *token
            }
            other => panic!("expected a single load effect, got {other:?}"),
        };
        let mut effects = Effects::new();
        panel.deliver(
            PanelMsg::Records {
                token,
                outcome: Ok(records),
            },
            &mut effects,
        );
        panel
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let area = *buffer.area();
        let mut text = String::new();
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn renders_id_and_derived_master_count() {
        let mut panel = loaded_panel(vec![df1()]);
        let mut terminal = Terminal::new(TestBackend::new(80, 16)).unwrap();
        let theme = Theme::default();
        terminal
            .draw(|frame| panel.render(frame, frame.area(), &theme))
            .unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("df1"), "missing id cell:\n{text}");
        assert!(text.contains('2'), "missing derived master count:\n{text}");
        assert!(text.contains("Dataflow Id"), "missing header:\n{text}");
    }

    #[test]
    fn stop_key_invokes_the_command_exactly_once() {
        let mut panel = loaded_panel(vec![df1()]);
        let mut effects = Effects::new();
        // Row actions are Config/Stop/Resume, so Stop is F2.
        panel.handle_key(
            KeyEvent::new(KeyCode::F(2), KeyModifiers::NONE),
            &mut effects,
        );

        let client = MemoryClient::new();
        client.seed("dataflow", vec![df1()]);
        for effect in effects.drain() {
            if let Effect::Invoke {
                collection,
                id,
                command,
            } = effect
            {
                client.invoke(&collection, &id, &command).unwrap();
            }
        }
        assert_eq!(
            client.invocations(),
            vec![(
                "dataflow".to_string(),
                "df1".to_string(),
                "stop".to_string()
            )]
        );
    }

    #[test]
    fn selecting_a_row_pushes_the_report_panel() {
        let mut panel = loaded_panel(vec![df1()]);
        let mut effects = Effects::new();
        panel.handle_key(
            KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE),
            &mut effects,
        );
        match effects.drain().as_slice() {
            [Effect::Push(pushed)] => {
                assert!(pushed.label().contains("df1"), "label: {}", pushed.label());
            }
            other => panic!("expected a push effect, got {other:?}"),
        }
    }

    #[test]
    fn refresh_queues_a_new_load_with_a_fresh_token() {
        let mut panel = loaded_panel(vec![df1()]);
        let mut effects = Effects::new();
        panel.handle_key(
            KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL),
            &mut effects,
        );
        match effects.drain().as_slice() {
            [Effect::Load { collection, .. }] => assert_eq!(collection, "dataflow"),
            other => panic!("expected a load effect, got {other:?}"),
        }
    }

    #[test]
    fn reattach_does_not_reload() {
        let mut panel = loaded_panel(vec![df1()]);
        panel.on_detach();
        let mut effects = Effects::new();
        panel.on_attach(&mut effects);
        assert!(effects.is_empty(), "reattach must preserve state, not refetch");
    }
}
