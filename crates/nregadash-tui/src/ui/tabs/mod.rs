pub mod compare;
pub mod data;
pub mod overview;
pub mod trends;

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use nregadash_core::{Label, Language};

use super::styles;

/// Placeholder panel for "nothing fetched yet" and "no data" states.
pub(crate) fn render_placeholder(frame: &mut Frame, title: &str, message: &str, area: Rect) {
    let block = Block::default()
        .title(format!(" {} ", title))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    let paragraph = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(format!("  {}", message), styles::muted_style())),
    ])
    .block(block);
    frame.render_widget(paragraph, area);
}

/// Message shown before the first fetch, e.g. "Fetch Data [f]".
pub(crate) fn fetch_prompt(lang: Language) -> String {
    format!("{} [f]", Label::FetchData.text(lang))
}
