//! Opaque analytics visualization panel.
//!
//! A terminal cannot embed the chart itself; the panel shows the composed
//! embed URL and hands it to the system browser on request.

use ratatui::Frame;
use ratatui::crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use flowdeck_ui::{Effects, Panel, PanelId, Theme, next_panel_id};

pub struct VisualizationPanel {
    id: PanelId,
    label: String,
    url: String,
}

impl VisualizationPanel {
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: next_panel_id(),
            label: label.into(),
            url: url.into(),
        }
    }
}

impl Panel for VisualizationPanel {
    fn id(&self) -> PanelId {
        self.id
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let lines = vec![
            Line::from(Span::styled(self.label.clone(), theme.prompt)),
            Line::default(),
            Line::from(self.url.clone()),
            Line::default(),
            Line::from(Span::styled(
                "o open in browser   Esc back",
                theme.status,
            )),
        ];
        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
    }

    fn handle_key(&mut self, key: KeyEvent, effects: &mut Effects) {
        match key.code {
            KeyCode::Char('o') => effects.open_url(self.url.clone()),
            KeyCode::Esc => effects.pop(),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowdeck_ui::Effect;
    use ratatui::crossterm::event::KeyModifiers;

    #[test]
    fn open_key_queues_the_url() {
        let mut panel = VisualizationPanel::new("Webpage Stat Report", "http://kibana/viz");
        let mut effects = Effects::new();
        panel.handle_key(
            KeyEvent::new(KeyCode::Char('o'), KeyModifiers::NONE),
            &mut effects,
        );
        match effects.drain().as_slice() {
            [Effect::OpenUrl(url)] => assert_eq!(url, "http://kibana/viz"),
            other => panic!("expected an open-url effect, got {other:?}"),
        }
    }
}
