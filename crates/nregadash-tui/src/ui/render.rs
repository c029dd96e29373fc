use chrono::Utc;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use nregadash_core::utils::age_display;
use nregadash_core::{Label, Language, RemoteSource};

use crate::app::{App, AppState, Focus, Tab};

use super::styles;
use super::tabs::{compare, data, overview, trends};

/// Width of the region/district picker column
const SIDEBAR_WIDTH: u16 = 28;

pub fn render<R: RemoteSource>(frame: &mut Frame, app: &App<R>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar and subtitle
            Constraint::Length(3), // Tabs
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_tabs(frame, app, chunks[1]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(40)])
        .split(chunks[2]);
    render_pickers(frame, app, body[0]);
    render_main_content(frame, app, body[1]);

    render_status_bar(frame, app, chunks[3]);

    if matches!(app.state, AppState::ShowingHelp) {
        render_help_overlay(frame, app.language);
    }
}

fn render_title_bar<R: RemoteSource>(frame: &mut Frame, app: &App<R>, area: Rect) {
    let title = format!("  {}", Label::Title.text(app.language));
    let help_hint = "[?] Help";
    let title_len = title.chars().count();

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat(
            area.width
                .saturating_sub(title_len as u16 + help_hint.len() as u16 + 4)
                as usize,
        )),
        Span::styled(help_hint, styles::muted_style()),
    ]);

    let subtitle_line = Line::from(Span::styled(
        format!("  {}", Label::Subtitle.text(app.language)),
        styles::muted_style(),
    ));

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(vec![title_line, subtitle_line]).block(block);
    frame.render_widget(paragraph, area);
}

fn render_tabs<R: RemoteSource>(frame: &mut Frame, app: &App<R>, area: Rect) {
    let mut spans = vec![Span::raw(" ")];
    for (i, tab) in Tab::ALL.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", styles::muted_style()));
        }
        let label = format!("[{}] {}", i + 1, tab.label().text(app.language));
        let style = if *tab == app.current_tab {
            styles::tab_style(true)
        } else {
            styles::muted_style()
        };
        spans.push(Span::styled(label, style));
    }

    // Language indicator on the right
    let language = format!("[l] {}", app.language.native_name());
    let used: usize = spans.iter().map(|s| s.content.chars().count()).sum();
    let padding = (area.width as usize).saturating_sub(used + language.chars().count() + 2);
    spans.push(Span::raw(" ".repeat(padding)));
    spans.push(Span::styled(language, styles::highlight_style()));

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(paragraph, area);
}

fn render_pickers<R: RemoteSource>(frame: &mut Frame, app: &App<R>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    render_picker(
        frame,
        Label::SelectState.text(app.language),
        &app.regions,
        app.region_selection,
        app.focus == Focus::Region,
        chunks[0],
    );
    render_picker(
        frame,
        Label::SelectDistrict.text(app.language),
        &app.sub_regions,
        app.sub_region_selection,
        app.focus == Focus::SubRegion,
        chunks[1],
    );
}

fn render_picker(
    frame: &mut Frame,
    title: &str,
    names: &[String],
    selection: usize,
    focused: bool,
    area: Rect,
) {
    let items: Vec<ListItem> = names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let style = if i == selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            ListItem::new(Line::from(name.clone())).style(style)
        })
        .collect();

    let block = Block::default()
        .title(format!(" {} ({}) ", title, names.len()))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));

    let list = List::new(items).block(block);

    let mut state = ListState::default();
    if !names.is_empty() {
        state.select(Some(selection));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_main_content<R: RemoteSource>(frame: &mut Frame, app: &App<R>, area: Rect) {
    match app.current_tab {
        Tab::Overview => overview::render(frame, app, area),
        Tab::Trends => trends::render(frame, app, area),
        Tab::Compare => compare::render(frame, app, area),
        Tab::Data => data::render(frame, app, area),
    }
}

fn render_status_bar<R: RemoteSource>(frame: &mut Frame, app: &App<R>, area: Rect) {
    if matches!(app.state, AppState::Searching) {
        let prompt = Line::from(vec![
            Span::styled(
                format!(" {}: ", Label::FindDistrict.text(app.language)),
                styles::highlight_style(),
            ),
            Span::raw(format!("{}_", app.search_query)),
        ]);
        frame.render_widget(
            Paragraph::new(prompt).style(styles::status_bar_style()),
            area,
        );
        return;
    }

    let shortcuts = "[f]etch [c]ompare [/]find [e]xport [q]uit";

    let left_style = if app.status_is_error {
        styles::error_style()
    } else {
        styles::muted_style()
    };
    let left_text = if let Some(ref msg) = app.status_message {
        format!(" {} ", msg)
    } else {
        match app.data.as_ref().and_then(|d| d.last_updated) {
            Some(updated) => format!(" Updated {} ", age_display(updated, Utc::now())),
            None => format!(" {} ", Label::FetchData.text(app.language)),
        }
    };
    let right_text = format!(" {} ", shortcuts);

    let width = area.width as usize;
    let padding_len = width
        .saturating_sub(left_text.chars().count())
        .saturating_sub(right_text.len());
    let status_line = Line::from(vec![
        Span::styled(left_text, left_style),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    let paragraph = Paragraph::new(status_line).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

fn help_line(key: &'static str, desc: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<10}", key), styles::help_key_style()),
        Span::styled(desc, styles::help_desc_style()),
    ])
}

fn glossary_line(lang: Language, term: Label, meaning: Label) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {}: ", term.text(lang)), styles::help_key_style()),
        Span::styled(meaning.text(lang), styles::help_desc_style()),
    ])
}

fn render_help_overlay(frame: &mut Frame, lang: Language) {
    let area = centered_rect_fixed(68, 30, frame.area());
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let help_text = vec![
        Line::from(Span::styled("  nregadash", styles::title_style())),
        Line::from(Span::styled(
            format!("  version {}", version),
            styles::muted_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(" Navigation", styles::highlight_style())),
        help_line("1-4", "Switch tabs"),
        help_line("←/→", "Prev/next tab"),
        help_line("Tab", "Switch state/district list"),
        help_line("↑/↓", "Move selection"),
        help_line("PgUp/PgDn", "Scroll monthly data"),
        Line::from(""),
        Line::from(Span::styled(" Actions", styles::highlight_style())),
        help_line("f, Enter", "Fetch selected district"),
        help_line("c", "Compare all districts of the state"),
        help_line("/", "Find district by city or landmark"),
        help_line("e", "Export report"),
        help_line("l", "Toggle English/हिंदी"),
        help_line("q", "Quit"),
        Line::from(""),
        Line::from(Span::styled(
            format!(" {}", Label::Glossary.text(lang)),
            styles::highlight_style(),
        )),
        glossary_line(lang, Label::Households, Label::HouseholdsHelp),
        glossary_line(lang, Label::PersonDays, Label::PersonDaysHelp),
        glossary_line(lang, Label::Expenditure, Label::ExpenditureHelp),
        glossary_line(lang, Label::AvgWage, Label::AvgWageHelp),
        Line::from(""),
        Line::from(vec![
            Span::styled("       Press ", styles::muted_style()),
            Span::styled("?", styles::help_key_style()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(help_text).block(block), area);
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::test_app;
    use ratatui::{backend::TestBackend, Terminal};

    fn screen_text<R: RemoteSource>(app: &App<R>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_renders_pickers_and_prompt() {
        let app = test_app();
        let text = screen_text(&app);
        assert!(text.contains("Select State (2)"));
        assert!(text.contains("Gaya"));
        assert!(text.contains("[f]etch"));
    }

    #[tokio::test]
    async fn test_renders_every_tab_with_data() {
        let mut app = test_app();
        app.fetch_selected().await;
        app.fetch_comparison().await;
        for tab in Tab::ALL {
            app.current_tab = tab;
            let text = screen_text(&app);
            assert!(text.contains(tab.label().text(app.language)));
        }
    }

    #[test]
    fn test_title_bar_shows_subtitle() {
        let text = screen_text(&test_app());
        assert!(text.contains(Label::Subtitle.text(Language::English)));
    }

    #[test]
    fn test_help_overlay_lists_glossary() {
        let mut app = test_app();
        app.state = AppState::ShowingHelp;
        let text = screen_text(&app);
        assert!(text.contains("Glossary"));
        assert!(text.contains("One person working one day"));
        assert!(text.contains("Find district by city or landmark"));
    }

    #[test]
    fn test_search_prompt_in_status_bar() {
        let mut app = test_app();
        app.state = AppState::Searching;
        app.search_query = "Gomti".to_string();
        let text = screen_text(&app);
        assert!(text.contains("City, town or landmark: Gomti_"));
    }

    #[test]
    fn test_centered_rect_fits_small_area() {
        let area = centered_rect_fixed(68, 30, Rect::new(0, 0, 30, 10));
        assert_eq!(area.width, 30);
        assert_eq!(area.height, 10);
    }
}
