use ratatui::{
    layout::{Constraint, Rect},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use nregadash_core::utils::{format_grouped, format_indian_number, format_rupees, month_name};
use nregadash_core::{Label, RemoteSource};

use crate::app::App;
use crate::ui::styles;

use super::{fetch_prompt, render_placeholder};

/// All monthly rows, newest first.
pub fn render<R: RemoteSource>(frame: &mut Frame, app: &App<R>, area: Rect) {
    let lang = app.language;
    let title = Label::MonthlyData.text(lang);

    let Some(data) = app.data.as_ref() else {
        render_placeholder(frame, title, &fetch_prompt(lang), area);
        return;
    };
    if data.is_empty() {
        render_placeholder(frame, title, Label::NoData.text(lang), area);
        return;
    }

    let header = Row::new(vec![
        Cell::from(Label::Month.text(lang)),
        Cell::from(Label::Year.text(lang)),
        Cell::from(Label::Households.text(lang)),
        Cell::from(Label::PersonDays.text(lang)),
        Cell::from(Label::Expenditure.text(lang)),
        Cell::from(Label::AvgWage.text(lang)),
    ])
    .style(styles::title_style())
    .height(1);

    let rows: Vec<Row> = data
        .records
        .iter()
        .map(|record| {
            Row::new(vec![
                Cell::from(month_name(record.month)),
                Cell::from(record.year.to_string()),
                Cell::from(format_grouped(record.households as i64)),
                Cell::from(format_grouped(record.person_days as i64)),
                Cell::from(format_indian_number(record.expenditure)),
                Cell::from(format_rupees(record.avg_wage)),
            ])
            .style(styles::list_item_style())
        })
        .collect();

    let widths = [
        Constraint::Length(10),
        Constraint::Length(6),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(format!(
                    " {} ({}) - {} ",
                    title,
                    data.records.len(),
                    data.provenance.as_str()
                ))
                .title_style(styles::title_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(true)),
        )
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    state.select(Some(app.data_scroll));
    frame.render_stateful_widget(table, area, &mut state);
}
