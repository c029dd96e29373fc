use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
    Frame,
};

use nregadash_core::metrics::{
    seasonal_pattern, year_over_year, MetricField, YearOverYear, SEASON_MONTHS,
};
use nregadash_core::summary::year_over_year_summary;
use nregadash_core::utils::{format_grouped, format_indian_number, format_rupees, month_name};
use nregadash_core::{Label, Language, MetricRecord, RemoteSource};

use crate::app::App;
use crate::ui::styles;

use super::{fetch_prompt, render_placeholder};

pub fn render<R: RemoteSource>(frame: &mut Frame, app: &App<R>, area: Rect) {
    let lang = app.language;
    let title = Label::YearOverYear.text(lang);

    let Some(data) = app.data.as_ref() else {
        render_placeholder(frame, title, &fetch_prompt(lang), area);
        return;
    };
    if data.is_empty() {
        render_placeholder(frame, title, Label::NoData.text(lang), area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(9), Constraint::Min(8)])
        .split(area);

    render_year_over_year(frame, &data.records, lang, chunks[0]);
    render_seasonal(frame, &data.records, lang, chunks[1]);
}

fn render_year_over_year(frame: &mut Frame, records: &[MetricRecord], lang: Language, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let person_days = year_over_year(records, MetricField::PersonDays, SEASON_MONTHS);
    let households = year_over_year(records, MetricField::Households, SEASON_MONTHS);
    let expenditure = year_over_year(records, MetricField::Expenditure, SEASON_MONTHS);

    let header = Row::new(vec![
        Cell::from(Label::Year.text(lang)),
        Cell::from(Label::PersonDays.text(lang)),
        Cell::from(Label::Households.text(lang)),
        Cell::from(Label::Expenditure.text(lang)),
    ])
    .style(styles::title_style())
    .height(1);

    let rows: Vec<Row> = person_days
        .totals
        .iter()
        .map(|(year, total)| {
            Row::new(vec![
                Cell::from(year.to_string()),
                Cell::from(format_indian_number(*total)),
                Cell::from(format_grouped(total_for(&households, *year) as i64)),
                Cell::from(format_indian_number(total_for(&expenditure, *year))),
            ])
            .style(styles::list_item_style())
        })
        .collect();

    let widths = [
        Constraint::Length(6),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
    ];
    let season = format!(
        "{}-{}",
        month_name(*SEASON_MONTHS.start()),
        month_name(*SEASON_MONTHS.end())
    );
    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .title(format!(" {} ({}) ", Label::YearOverYear.text(lang), season))
            .title_style(styles::title_style())
            .borders(Borders::ALL)
            .border_style(styles::border_style(false)),
    );
    frame.render_widget(table, chunks[0]);

    let text = year_over_year_summary(&person_days, lang)
        .unwrap_or_else(|| Label::NotEnoughYears.text(lang).to_string());
    let style = match person_days.percent_change {
        Some(change) => styles::delta_style(change),
        None => styles::muted_style(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(text, style)))
            .block(block)
            .wrap(Wrap { trim: true }),
        chunks[1],
    );
}

fn total_for(yoy: &YearOverYear, year: i32) -> f64 {
    yoy.totals
        .iter()
        .find(|(y, _)| *y == year)
        .map(|(_, total)| *total)
        .unwrap_or(0.0)
}

fn render_seasonal(frame: &mut Frame, records: &[MetricRecord], lang: Language, area: Rect) {
    let pattern = seasonal_pattern(records, SEASON_MONTHS);

    let header = Row::new(vec![
        Cell::from(Label::Month.text(lang)),
        Cell::from(Label::Households.text(lang)),
        Cell::from(Label::PersonDays.text(lang)),
        Cell::from(Label::Expenditure.text(lang)),
        Cell::from(Label::AvgWage.text(lang)),
    ])
    .style(styles::title_style())
    .height(1);

    let rows: Vec<Row> = pattern
        .iter()
        .map(|avg| {
            Row::new(vec![
                Cell::from(format!("{} ({})", month_name(avg.month), avg.years)),
                Cell::from(format_grouped(avg.households.round() as i64)),
                Cell::from(format_indian_number(avg.person_days)),
                Cell::from(format_indian_number(avg.expenditure)),
                Cell::from(format_rupees(avg.avg_wage)),
            ])
            .style(styles::list_item_style())
        })
        .collect();

    let widths = [
        Constraint::Length(16),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
    ];
    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .title(format!(" {} ", Label::SeasonalPatterns.text(lang)))
            .title_style(styles::title_style())
            .borders(Borders::ALL)
            .border_style(styles::border_style(false)),
    );
    frame.render_widget(table, area);
}
