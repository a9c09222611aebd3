//! Configuration-driven record table.
//!
//! The table interprets a bound [`TableConfig`]; it has no behavior of its
//! own beyond that interpretation. The rendering pipeline is
//! filter -> sort -> paginate -> resolve display values -> affordances, and
//! re-rendering with unchanged state is idempotent.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::collections::HashSet;
use std::sync::Arc;

use ratatui::Frame;
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, Paragraph, Row, Table, TableState};
use throbber_widgets_tui::{Throbber, ThrobberState};
use unicode_width::UnicodeWidthStr;

use crate::config::{FieldSpec, TableConfig};
use crate::error::UiError;
use crate::handlers::Handlers;
use crate::panel::Effects;
use crate::theme::Theme;
use crate::value::{Record, display_string, lookup_path};

const DEFAULT_PAGE_SIZE: usize = 15;
const MAX_COLUMN_WIDTH: u16 = 48;
const TABLE_COLUMN_SPACING: u16 = 2;

/// A bound table instance: immutable config plus the mutable view state
/// (records, filter text, visible columns, sort, page, cursor).
pub struct RecordTable {
    config: Arc<TableConfig>,
    handlers: Arc<Handlers>,
    records: Vec<Record>,
    /// Indices into `records` after filter and sort.
    view: Vec<usize>,
    filter_text: String,
    visible_columns: BTreeSet<String>,
    sort_field: Option<String>,
    current_page: usize,
    page_size: usize,
    cursor: usize,
    fetch_seq: u64,
    pending_fetch: Option<u64>,
    loading: bool,
    error: Option<String>,
    throbber: ThrobberState,
}

impl RecordTable {
    /// Bind `config` against `handlers`. Validates the config and fails
    /// loudly on malformed descriptions; does not fetch any data.
    pub fn new(config: TableConfig, handlers: Arc<Handlers>) -> Result<Self, UiError> {
        validate(&config, &handlers)?;
        let visible_columns = config
            .fields
            .iter()
            .filter(|field| field.toggled)
            .map(|field| field.key.clone())
            .collect();
        Ok(Self {
            config: Arc::new(config),
            handlers,
            records: Vec::new(),
            view: Vec::new(),
            filter_text: String::new(),
            visible_columns,
            sort_field: None,
            current_page: 0,
            page_size: DEFAULT_PAGE_SIZE,
            cursor: 0,
            fetch_seq: 0,
            pending_fetch: None,
            loading: false,
            error: None,
            throbber: ThrobberState::default(),
        })
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn label(&self) -> &str {
        &self.config.label
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Replace the full record set. Resets the page to 0 and preserves the
    /// filter text and visible-column set.
    pub fn load_records(&mut self, records: Vec<Record>) {
        self.records = records;
        self.current_page = 0;
        self.error = None;
        self.refresh_view();
    }

    pub fn set_filter_text(&mut self, text: impl Into<String>) {
        self.filter_text = text.into();
        self.current_page = 0;
        self.refresh_view();
    }

    pub fn filter_text(&self) -> &str {
        &self.filter_text
    }

    /// Flip visibility of `key`; silently ignores keys the config does not
    /// define.
    pub fn toggle_column(&mut self, key: &str) {
        if self.config.field_by_key(key).is_none() {
            return;
        }
        if !self.visible_columns.remove(key) {
            self.visible_columns.insert(key.to_string());
        }
    }

    pub fn visible_columns(&self) -> &BTreeSet<String> {
        &self.visible_columns
    }

    pub fn visible_fields(&self) -> Vec<&FieldSpec> {
        self.config
            .fields
            .iter()
            .filter(|field| self.visible_columns.contains(&field.key))
            .collect()
    }

    /// Sort by `key` (stable, ascending); `None` restores insertion order.
    pub fn set_sort_field(&mut self, key: Option<&str>) {
        self.sort_field = key.map(str::to_string);
        self.refresh_view();
    }

    pub fn sort_field(&self) -> Option<&str> {
        self.sort_field.as_deref()
    }

    /// Advance the sort field through the visible columns, ending back at
    /// insertion order.
    pub fn cycle_sort(&mut self) {
        let keys: Vec<String> = self
            .visible_fields()
            .iter()
            .map(|field| field.key.clone())
            .collect();
        let next = match &self.sort_field {
            None => keys.first().cloned(),
            Some(current) => keys
                .iter()
                .position(|key| key == current)
                .and_then(|pos| keys.get(pos + 1).cloned()),
        };
        self.sort_field = next;
        self.refresh_view();
    }

    pub fn set_page(&mut self, page: usize) {
        self.current_page = page.min(self.page_count().saturating_sub(1));
        self.clamp_cursor();
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_count(&self) -> usize {
        self.view.len().div_ceil(self.page_size).max(1)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of records visible after filtering.
    pub fn filtered_len(&self) -> usize {
        self.view.len()
    }

    pub fn total_len(&self) -> usize {
        self.records.len()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Resolve the cell text for `field` on `record`: registered display
    /// handler first, then the dotted attribute path, then the field's
    /// default value. Total for any well-formed record.
    pub fn resolve_display_value(&self, field: &FieldSpec, record: &Record) -> String {
        if let Some(id) = &field.display
            && let Some(display) = self.handlers.display_fn(id)
            && let Some(text) = display(record)
        {
            return text;
        }
        if let Some(value) = lookup_path(record, &field.key)
            && let Some(text) = display_string(value)
        {
            return text;
        }
        field.default_value.clone()
    }

    /// Record under `row` on the currently rendered page. Row indices are
    /// page-relative on the filtered, sorted view; this is part of the
    /// contract, since callers resolve "the record under this row" only at
    /// activation time.
    pub fn record_on_current_page(&self, row: usize) -> Option<&Record> {
        let index = *self.page_indices().get(row)?;
        self.records.get(index)
    }

    /// Invoke a row action for the page-relative `row`.
    pub fn invoke_row_action(
        &mut self,
        action_index: usize,
        row: usize,
        effects: &mut Effects,
    ) -> Result<(), UiError> {
        let actions = self.config.row_actions.len();
        if action_index >= actions {
            return Err(UiError::Index {
                what: "row action",
                index: action_index,
                len: actions,
            });
        }
        let rows = self.page_indices().len();
        if row >= rows {
            return Err(UiError::Index {
                what: "row",
                index: row,
                len: rows,
            });
        }
        let id = self.config.row_actions[action_index].id.clone();
        self.run_action(&id, effects, Some(row))
    }

    /// Invoke a toolbar action; toolbar handlers receive no row index.
    pub fn invoke_toolbar_action(
        &mut self,
        action_index: usize,
        effects: &mut Effects,
    ) -> Result<(), UiError> {
        let actions = self.config.toolbar_actions.len();
        if action_index >= actions {
            return Err(UiError::Index {
                what: "toolbar action",
                index: action_index,
                len: actions,
            });
        }
        let id = self.config.toolbar_actions[action_index].id.clone();
        self.run_action(&id, effects, None)
    }

    /// Run the `on_select` handler of the first field that declares one,
    /// for the cursor row. No-op when the page is empty or no field is
    /// selectable.
    pub fn activate_selection(&mut self, effects: &mut Effects) {
        if self.cursor >= self.page_indices().len() {
            return;
        }
        let id = self
            .config
            .fields
            .iter()
            .find_map(|field| field.on_select.clone());
        if let Some(id) = id {
            let row = self.cursor;
            // Validated at bind time; a miss here is a registry bug.
            if self.run_action(&id, effects, Some(row)).is_err() {
                log::error!("select handler '{id}' disappeared from the registry");
            }
        }
    }

    fn run_action(
        &mut self,
        id: &str,
        effects: &mut Effects,
        row: Option<usize>,
    ) -> Result<(), UiError> {
        let handlers = Arc::clone(&self.handlers);
        let Some(action) = handlers.action_fn(id) else {
            return Err(UiError::NotFound {
                what: "action handler",
            });
        };
        action(self, effects, row);
        Ok(())
    }

    /// Start a fetch and return its token. Newer tokens invalidate older
    /// ones, so a late completion of a superseded request is discarded.
    pub fn begin_fetch(&mut self) -> u64 {
        self.fetch_seq += 1;
        self.pending_fetch = Some(self.fetch_seq);
        self.loading = true;
        self.fetch_seq
    }

    /// Apply a fetch completion. Returns `false` when the token is stale
    /// and the completion was discarded. A failed fetch records an inline
    /// error and leaves the prior records visible.
    pub fn apply_fetch(&mut self, token: u64, outcome: Result<Vec<Record>, String>) -> bool {
        if self.pending_fetch != Some(token) {
            log::debug!(
                "table '{}': ignoring stale fetch response (token {token})",
                self.config.label
            );
            return false;
        }
        self.pending_fetch = None;
        self.loading = false;
        match outcome {
            Ok(records) => self.load_records(records),
            Err(message) => {
                log::warn!("table '{}': fetch failed: {message}", self.config.label);
                self.error = Some(message);
            }
        }
        true
    }

    /// Cancel all outstanding fetches. Called when the owning panel is
    /// detached so late completions cannot mutate it.
    pub fn invalidate_fetches(&mut self) {
        self.pending_fetch = None;
        self.loading = false;
    }

    pub fn move_cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_cursor_down(&mut self) {
        let rows = self.page_indices().len();
        if self.cursor + 1 < rows {
            self.cursor += 1;
        }
    }

    /// Standard key bindings shared by every table panel: type to filter,
    /// arrows to move, PgUp/PgDn to page, Enter to activate, F-keys for
    /// row actions, Ctrl+R for the primary toolbar action, Ctrl+S to cycle
    /// sort, Ctrl+1..9 to toggle columns, Esc to clear the filter or go
    /// back.
    pub fn handle_key(&mut self, key: KeyEvent, effects: &mut Effects) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('r') => {
                    if !self.config.toolbar_actions.is_empty() {
                        let _ = self.invoke_toolbar_action(0, effects);
                    }
                }
                KeyCode::Char('s') => self.cycle_sort(),
                KeyCode::Char(digit @ '1'..='9') => {
                    let position = digit as usize - '1' as usize;
                    if let Some(key) = self.config.fields.get(position).map(|f| f.key.clone()) {
                        self.toggle_column(&key);
                    }
                }
                _ => {}
            }
            return;
        }
        match key.code {
            KeyCode::Char(c) => {
                let mut text = self.filter_text.clone();
                text.push(c);
                self.set_filter_text(text);
            }
            KeyCode::Backspace => {
                if !self.filter_text.is_empty() {
                    let mut text = self.filter_text.clone();
                    text.pop();
                    self.set_filter_text(text);
                }
            }
            KeyCode::Up => self.move_cursor_up(),
            KeyCode::Down => self.move_cursor_down(),
            KeyCode::PageUp => self.set_page(self.current_page.saturating_sub(1)),
            KeyCode::PageDown => self.set_page(self.current_page + 1),
            KeyCode::Enter => self.activate_selection(effects),
            KeyCode::F(n) if n >= 1 => {
                let action = n as usize - 1;
                if action < self.config.row_actions.len()
                    && self.cursor < self.page_indices().len()
                {
                    let _ = self.invoke_row_action(action, self.cursor, effects);
                }
            }
            KeyCode::Esc => {
                if self.filter_text.is_empty() {
                    effects.pop();
                } else {
                    self.set_filter_text("");
                }
            }
            _ => {}
        }
    }

    fn page_indices(&self) -> &[usize] {
        let start = self.current_page * self.page_size;
        if start >= self.view.len() {
            return &[];
        }
        let end = (start + self.page_size).min(self.view.len());
        &self.view[start..end]
    }

    fn refresh_view(&mut self) {
        self.view = filter_indices(
            &self.records,
            &self.config,
            &self.handlers,
            &self.filter_text,
        );
        if let Some(sort_key) = self.sort_field.clone()
            && let Some(field) = self.config.field_by_key(&sort_key)
        {
            let mut keyed: Vec<(SortKey, usize)> = self
                .view
                .iter()
                .map(|&index| {
                    (
                        SortKey::parse(&self.resolve_display_value(field, &self.records[index])),
                        index,
                    )
                })
                .collect();
            keyed.sort_by(|a, b| a.0.cmp(&b.0));
            self.view = keyed.into_iter().map(|(_, index)| index).collect();
        }
        self.current_page = self.current_page.min(self.page_count().saturating_sub(1));
        self.clamp_cursor();
    }

    fn clamp_cursor(&mut self) {
        let rows = self.page_indices().len();
        self.cursor = self.cursor.min(rows.saturating_sub(1));
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let mut constraints = vec![Constraint::Length(1), Constraint::Min(1)];
        if self.error.is_some() {
            constraints.push(Constraint::Length(1));
        }
        constraints.push(Constraint::Length(1));
        let layout = Layout::vertical(constraints).split(area);

        self.render_header_line(frame, layout[0], theme);

        let table_area = layout[1];
        if self.page_indices().is_empty() {
            let empty = Paragraph::new("No records")
                .centered()
                .style(theme.empty);
            frame.render_widget(empty, table_area);
        } else {
            self.render_table(frame, table_area, theme);
        }

        if self.error.is_some() {
            let message = format!("error: {} (showing previous data)", self.error.as_deref().unwrap_or(""));
            frame.render_widget(Paragraph::new(message).style(theme.error), layout[2]);
        }
        self.render_footer(frame, layout[layout.len() - 1], theme);
    }

    fn render_header_line(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let mut spans = vec![
            Span::styled(self.config.label.clone(), theme.prompt),
            Span::raw("  filter> "),
            Span::raw(self.filter_text.clone()),
            Span::styled(
                format!(
                    "  {}/{}  page {}/{}",
                    self.filtered_len(),
                    self.total_len(),
                    self.current_page + 1,
                    self.page_count()
                ),
                theme.status,
            ),
        ];
        if let Some(sort) = &self.sort_field {
            spans.push(Span::styled(format!("  sort:{sort}"), theme.status));
        }
        if self.loading {
            self.throbber.calc_next();
            spans.push(Span::raw(" "));
            spans.push(Throbber::default().to_symbol_span(&self.throbber));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_table(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let fields = self.visible_fields();
        if fields.is_empty() {
            let hint = Paragraph::new("All columns hidden (Ctrl+1..9 to toggle)")
                .centered()
                .style(theme.empty);
            frame.render_widget(hint, area);
            return;
        }

        let page_records: Vec<&Record> = self
            .page_indices()
            .iter()
            .map(|&index| &self.records[index])
            .collect();
        let cells: Vec<Vec<String>> = page_records
            .iter()
            .map(|record| {
                fields
                    .iter()
                    .map(|field| self.resolve_display_value(field, record))
                    .collect()
            })
            .collect();

        let widths: Vec<Constraint> = fields
            .iter()
            .enumerate()
            .map(|(column, field)| {
                let mut width = field.label.width();
                for row in &cells {
                    width = width.max(row[column].width());
                }
                Constraint::Length((width as u16).min(MAX_COLUMN_WIDTH))
            })
            .collect();

        let header = Row::new(
            fields
                .iter()
                .map(|field| Cell::from(field.label.clone()))
                .collect::<Vec<_>>(),
        )
        .style(theme.header)
        .height(1);
        let rows: Vec<Row> = cells
            .into_iter()
            .map(|row| Row::new(row.into_iter().map(Cell::from).collect::<Vec<_>>()))
            .collect();

        let table = Table::new(rows, widths)
            .header(header)
            .column_spacing(TABLE_COLUMN_SPACING)
            .row_highlight_style(theme.row_highlight)
            .highlight_symbol("▶ ");
        let mut state = TableState::default();
        state.select(Some(self.cursor));
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let mut parts: Vec<String> = Vec::new();
        if self
            .config
            .fields
            .iter()
            .any(|field| field.on_select.is_some())
        {
            parts.push("Enter Open".to_string());
        }
        for (index, action) in self.config.row_actions.iter().enumerate() {
            parts.push(format!("F{} {}", index + 1, action.label));
        }
        if let Some(action) = self.config.toolbar_actions.first() {
            parts.push(format!("^R {}", action.label));
        }
        parts.push("^S Sort".to_string());
        parts.push("Esc Back".to_string());
        let footer = Paragraph::new(parts.join("  ")).style(theme.status);
        frame.render_widget(footer, area);
    }
}

impl std::fmt::Debug for RecordTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordTable")
            .field("label", &self.config.label)
            .field("records", &self.records.len())
            .field("filtered", &self.view.len())
            .field("filter_text", &self.filter_text)
            .field("current_page", &self.current_page)
            .finish()
    }
}

/// Filtered view as a pure function of `(records, filter text, fields)`.
fn filter_indices(
    records: &[Record],
    config: &TableConfig,
    handlers: &Handlers,
    filter_text: &str,
) -> Vec<usize> {
    let needle = filter_text.trim().to_lowercase();
    if needle.is_empty() {
        return (0..records.len()).collect();
    }
    records
        .iter()
        .enumerate()
        .filter(|(_, record)| {
            config
                .fields
                .iter()
                .filter(|field| field.filterable)
                .any(|field| {
                    resolve_with(handlers, field, record)
                        .to_lowercase()
                        .contains(&needle)
                })
        })
        .map(|(index, _)| index)
        .collect()
}

fn resolve_with(handlers: &Handlers, field: &FieldSpec, record: &Record) -> String {
    if let Some(id) = &field.display
        && let Some(display) = handlers.display_fn(id)
        && let Some(text) = display(record)
    {
        return text;
    }
    if let Some(value) = lookup_path(record, &field.key)
        && let Some(text) = display_string(value)
    {
        return text;
    }
    field.default_value.clone()
}

/// Precomputed sort key for one cell. Numeric cells order before text
/// cells, numbers by value and text lexically, giving a total order even
/// when one column mixes both kinds.
#[derive(Debug)]
enum SortKey {
    Num(f64),
    Text(String),
}

impl SortKey {
    fn parse(cell: &str) -> Self {
        match cell.parse::<f64>() {
            Ok(value) => SortKey::Num(value),
            Err(_) => SortKey::Text(cell.to_string()),
        }
    }
}

impl Ord for SortKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Num(a), SortKey::Num(b)) => a.total_cmp(b),
            (SortKey::Num(_), SortKey::Text(_)) => Ordering::Less,
            (SortKey::Text(_), SortKey::Num(_)) => Ordering::Greater,
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for SortKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SortKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SortKey {}

fn validate(config: &TableConfig, handlers: &Handlers) -> Result<(), UiError> {
    if config.label.trim().is_empty() {
        return Err(UiError::configuration("table label must not be empty"));
    }
    let mut keys = HashSet::new();
    for field in &config.fields {
        if field.label.trim().is_empty() {
            return Err(UiError::configuration(format!(
                "field '{}' has an empty label",
                field.key
            )));
        }
        if !keys.insert(field.key.as_str()) {
            return Err(UiError::configuration(format!(
                "duplicate field key '{}'",
                field.key
            )));
        }
        if let Some(id) = &field.display
            && !handlers.has_display(id)
        {
            return Err(UiError::configuration(format!(
                "field '{}' references unknown display handler '{id}'",
                field.key
            )));
        }
        if let Some(id) = &field.on_select
            && !handlers.has_action(id)
        {
            return Err(UiError::configuration(format!(
                "field '{}' references unknown select handler '{id}'",
                field.key
            )));
        }
    }
    for (scope, actions) in [
        ("row", &config.row_actions),
        ("toolbar", &config.toolbar_actions),
    ] {
        let mut ids = HashSet::new();
        for action in actions {
            if action.label.trim().is_empty() {
                return Err(UiError::configuration(format!(
                    "{scope} action '{}' has an empty label",
                    action.id
                )));
            }
            if !ids.insert(action.id.as_str()) {
                return Err(UiError::configuration(format!(
                    "duplicate {scope} action id '{}'",
                    action.id
                )));
            }
            if !handlers.has_action(&action.id) {
                return Err(UiError::configuration(format!(
                    "{scope} action references unknown handler '{}'",
                    action.id
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ActionSpec;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn dataflow_config() -> TableConfig {
        TableConfig::new("List Dataflow")
            .field(
                FieldSpec::new("id", "Dataflow Id")
                    .filterable(true)
                    .with_default("-"),
            )
            .field(
                FieldSpec::new("numOfMaster", "Masters")
                    .filterable(true)
                    .with_default("-")
                    .display_with("master-instances"),
            )
            .field(FieldSpec::new("status", "Status").filterable(true))
    }

    fn dataflow_handlers() -> Arc<Handlers> {
        let mut handlers = Handlers::new();
        handlers.register_display("master-instances", |record| {
            lookup_path(record, "master.numOfInstances").and_then(display_string)
        });
        Arc::new(handlers)
    }

    fn records() -> Vec<Record> {
        vec![
            json!({"id": "df1", "master": {"numOfInstances": 2}, "status": "RUNNING"}),
            json!({"id": "df2", "master": {"numOfInstances": 1}, "status": "STOPPED"}),
            json!({"id": "other", "status": "RUNNING"}),
        ]
    }

    fn table() -> RecordTable {
        let mut table = RecordTable::new(dataflow_config(), dataflow_handlers()).unwrap();
        table.load_records(records());
        table
    }

    #[test]
    fn validation_rejects_duplicate_field_keys() {
        let config = dataflow_config().field(FieldSpec::new("id", "Again"));
        let err = RecordTable::new(config, dataflow_handlers()).unwrap_err();
        assert!(matches!(err, UiError::Configuration { .. }));
    }

    #[test]
    fn validation_rejects_unknown_handler_ids() {
        let config = TableConfig::new("t").field(FieldSpec::new("id", "Id").display_with("nope"));
        assert!(RecordTable::new(config, dataflow_handlers()).is_err());

        let config = TableConfig::new("t")
            .field(FieldSpec::new("id", "Id"))
            .row_action(ActionSpec::new("missing", "x", "X"));
        assert!(RecordTable::new(config, dataflow_handlers()).is_err());
    }

    #[test]
    fn validation_rejects_empty_labels() {
        assert!(RecordTable::new(TableConfig::new("  "), dataflow_handlers()).is_err());
        let config = TableConfig::new("t").field(FieldSpec::new("id", ""));
        assert!(RecordTable::new(config, dataflow_handlers()).is_err());
    }

    #[test]
    fn resolve_display_value_never_fails_and_defaults() {
        let table = table();
        let config = table.config().clone();
        let masters = config.field_by_key("numOfMaster").unwrap();
        let rows: Vec<String> = records()
            .iter()
            .map(|record| table.resolve_display_value(masters, record))
            .collect();
        // Third record has no master sub-object; the default applies.
        assert_eq!(rows, vec!["2", "1", "-"]);
    }

    #[test]
    fn filtering_is_pure_and_resets_page() {
        let mut table = table().with_page_size(2);
        table.set_page(1);
        table.set_filter_text("df");
        assert_eq!(table.current_page(), 0);
        assert_eq!(table.filtered_len(), 2);
        let first: Vec<String> = (0..table.filtered_len())
            .filter_map(|row| table.record_on_current_page(row))
            .map(|record| record["id"].as_str().unwrap().to_string())
            .collect();
        table.set_filter_text("df");
        let second: Vec<String> = (0..table.filtered_len())
            .filter_map(|row| table.record_on_current_page(row))
            .map(|record| record["id"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn filter_matches_display_values_of_filterable_fields() {
        let mut table = table();
        // "2" only appears through the master-instances display handler.
        table.set_filter_text("2");
        let ids: Vec<&str> = (0..table.filtered_len())
            .filter_map(|row| table.record_on_current_page(row))
            .map(|record| record["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["df1", "df2"]);
    }

    #[test]
    fn pagination_clamps_and_is_idempotent() {
        let mut table = table().with_page_size(2);
        table.load_records(records());
        assert_eq!(table.page_count(), 2);
        table.set_page(99);
        assert_eq!(table.current_page(), 1);
        let before: Vec<String> = (0..2)
            .filter_map(|row| table.record_on_current_page(row))
            .map(|r| r["id"].to_string())
            .collect();
        table.set_page(1);
        let after: Vec<String> = (0..2)
            .filter_map(|row| table.record_on_current_page(row))
            .map(|r| r["id"].to_string())
            .collect();
        assert_eq!(before, after);
    }

    #[test]
    fn reload_resets_page_but_keeps_filter_and_columns() {
        let mut table = table().with_page_size(1);
        table.set_filter_text("df");
        table.toggle_column("status");
        table.set_page(1);
        table.load_records(records());
        assert_eq!(table.current_page(), 0);
        assert_eq!(table.filter_text(), "df");
        assert!(!table.visible_columns().contains("status"));
    }

    #[test]
    fn toggling_twice_restores_visible_columns() {
        let mut table = table();
        let before = table.visible_columns().clone();
        table.toggle_column("status");
        assert!(!table.visible_columns().contains("status"));
        table.toggle_column("status");
        assert_eq!(table.visible_columns(), &before);
    }

    #[test]
    fn toggling_unknown_column_is_a_no_op() {
        let mut table = table();
        let before = table.visible_columns().clone();
        table.toggle_column("bogus");
        assert_eq!(table.visible_columns(), &before);
    }

    #[test]
    fn row_actions_resolve_page_relative_indices() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_in_handler = Rc::clone(&seen);
        let mut handlers = Handlers::new();
        handlers.register_action("note", move |table, _effects, row| {
            let record = table.record_on_current_page(row.unwrap()).unwrap();
            seen_in_handler
                .borrow_mut()
                .push(record["id"].as_str().unwrap().to_string());
        });
        let config = TableConfig::new("t")
            .field(FieldSpec::new("id", "Id").filterable(true))
            .row_action(ActionSpec::new("note", "n", "Note"));
        let mut table = RecordTable::new(config, Arc::new(handlers))
            .unwrap()
            .with_page_size(1);
        table.load_records(records());
        // Filter narrows the view, then page 1 holds df2; row 0 on that
        // page must resolve to df2, not the raw records[0].
        table.set_filter_text("df");
        table.set_page(1);
        let mut effects = Effects::new();
        table.invoke_row_action(0, 0, &mut effects).unwrap();
        assert_eq!(seen.borrow().as_slice(), ["df2".to_string()]);
    }

    #[test]
    fn row_action_bounds_fail_loudly() {
        let mut table = table();
        let mut effects = Effects::new();
        let err = table.invoke_row_action(9, 0, &mut effects).unwrap_err();
        assert!(matches!(err, UiError::Index { what: "row action", .. }));
        let err = table.invoke_row_action(0, 0, &mut effects).unwrap_err();
        // No row actions registered on this config either.
        assert!(matches!(err, UiError::Index { .. }));
    }

    #[test]
    fn stable_sort_orders_by_display_value() {
        let mut table = table();
        table.set_sort_field(Some("numOfMaster"));
        let ids: Vec<&str> = (0..table.filtered_len())
            .filter_map(|row| table.record_on_current_page(row))
            .map(|record| record["id"].as_str().unwrap())
            .collect();
        // Numeric cells order before text; the "-" default is text.
        assert_eq!(ids, vec!["df2", "df1", "other"]);
        table.set_sort_field(None);
        let ids: Vec<&str> = (0..table.filtered_len())
            .filter_map(|row| table.record_on_current_page(row))
            .map(|record| record["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["df1", "df2", "other"]);
    }

    #[test]
    fn sort_keys_are_transitive_across_numeric_and_text_cells() {
        let nine = SortKey::parse("9");
        let ten = SortKey::parse("10");
        let text = SortKey::parse("2a");
        assert_eq!(nine.cmp(&ten), Ordering::Less);
        assert_eq!(ten.cmp(&text), Ordering::Less);
        assert_eq!(nine.cmp(&text), Ordering::Less);
    }

    #[test]
    fn sorting_a_column_mixing_numbers_and_text_partitions_cleanly() {
        let mut records = Vec::new();
        for i in 0..500 {
            records.push(json!({"id": format!("n{i}"), "status": format!("{}", i % 20)}));
            records.push(json!({"id": format!("t{i}"), "status": format!("{}a", i % 20)}));
        }
        let mut table = RecordTable::new(dataflow_config(), dataflow_handlers())
            .unwrap()
            .with_page_size(2000);
        table.load_records(records);
        table.set_sort_field(Some("status"));

        let cells: Vec<String> = (0..table.filtered_len())
            .filter_map(|row| table.record_on_current_page(row))
            .map(|record| record["status"].as_str().unwrap().to_string())
            .collect();
        let first_text = cells
            .iter()
            .position(|cell| cell.parse::<f64>().is_err())
            .unwrap();
        assert_eq!(first_text, 500);
        assert!(cells[first_text..].iter().all(|c| c.parse::<f64>().is_err()));
        let numbers: Vec<f64> = cells[..first_text]
            .iter()
            .map(|cell| cell.parse().unwrap())
            .collect();
        assert!(numbers.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn stale_fetch_completion_is_discarded() {
        let mut table = table();
        let first = table.begin_fetch();
        let second = table.begin_fetch();
        assert!(table.apply_fetch(second, Ok(vec![json!({"id": "fresh"})])));
        assert!(!table.apply_fetch(first, Ok(vec![json!({"id": "stale"})])));
        assert_eq!(table.total_len(), 1);
        assert_eq!(
            table.record_on_current_page(0).unwrap()["id"],
            json!("fresh")
        );
    }

    #[test]
    fn failed_fetch_keeps_prior_records_visible() {
        let mut table = table();
        let token = table.begin_fetch();
        assert!(table.apply_fetch(token, Err("backend unreachable".into())));
        assert_eq!(table.total_len(), 3);
        assert_eq!(table.error(), Some("backend unreachable"));
        // A later successful reload clears the inline error.
        let token = table.begin_fetch();
        table.apply_fetch(token, Ok(records()));
        assert!(table.error().is_none());
    }

    #[test]
    fn detaching_invalidates_in_flight_fetches() {
        let mut table = table();
        let token = table.begin_fetch();
        table.invalidate_fetches();
        assert!(!table.apply_fetch(token, Ok(vec![json!({"id": "late"})])));
        assert_eq!(table.total_len(), 3);
    }
}
