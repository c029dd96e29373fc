use ratatui::{
    layout::{Constraint, Rect},
    widgets::{Block, Borders, Cell, Row, Table},
    Frame,
};

use nregadash_core::utils::{format_grouped, format_indian_number, format_rupees, truncate};
use nregadash_core::{Label, RemoteSource};

use crate::app::App;
use crate::ui::styles;

use super::render_placeholder;

pub fn render<R: RemoteSource>(frame: &mut Frame, app: &App<R>, area: Rect) {
    let lang = app.language;
    let title = Label::CompareDistricts.text(lang);

    if app.comparison.is_empty() {
        render_placeholder(frame, title, &format!("{} [c]", title), area);
        return;
    }

    // Highlight the district currently loaded in the overview
    let loaded = app.loaded_for.as_ref().map(|(_, sub)| sub.as_str());

    let header = Row::new(vec![
        Cell::from(Label::SelectDistrict.text(lang)),
        Cell::from(Label::LatestMonth.text(lang)),
        Cell::from(Label::Households.text(lang)),
        Cell::from(Label::PersonDays.text(lang)),
        Cell::from(Label::Expenditure.text(lang)),
        Cell::from(Label::AvgWage.text(lang)),
    ])
    .style(styles::title_style())
    .height(1);

    let rows: Vec<Row> = app
        .comparison
        .iter()
        .map(|row| {
            let style = if Some(row.sub_region.as_str()) == loaded {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            let record = &row.record;
            Row::new(vec![
                Cell::from(truncate(&row.sub_region, 20)),
                Cell::from(record.period_label()),
                Cell::from(format_grouped(record.households as i64)),
                Cell::from(format_indian_number(record.person_days as f64)),
                Cell::from(format_indian_number(record.expenditure)),
                Cell::from(format_rupees(record.avg_wage)),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(20),
        Constraint::Length(16),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
    ];

    let region = app.selected_region().unwrap_or_default();
    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .title(format!(" {} - {} ({}) ", title, region, app.comparison.len()))
            .title_style(styles::title_style())
            .borders(Borders::ALL)
            .border_style(styles::border_style(true)),
    );
    frame.render_widget(table, area);
}
