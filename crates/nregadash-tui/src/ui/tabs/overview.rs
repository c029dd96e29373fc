use chrono::Utc;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph, Wrap},
    Frame,
};

use nregadash_core::metrics::{period_delta, trend_window, GroupAverage, PeriodDelta, TREND_WINDOW};
use nregadash_core::summary::performance_summary;
use nregadash_core::utils::{
    age_display, format_delta, format_delta_decimal, format_grouped, format_indian_number,
    format_rupees, month_name,
};
use nregadash_core::{DistrictData, Label, Language, MetricRecord, RemoteSource};

use crate::app::App;
use crate::ui::styles;

use super::{fetch_prompt, render_placeholder};

pub fn render<R: RemoteSource>(frame: &mut Frame, app: &App<R>, area: Rect) {
    let lang = app.language;
    let title = Label::PerformanceSummary.text(lang);

    let Some(data) = app.data.as_ref() else {
        render_placeholder(frame, title, &fetch_prompt(lang), area);
        return;
    };
    let (Some(latest), Some((_, sub_region))) = (data.latest(), app.loaded_for.as_ref()) else {
        render_placeholder(frame, title, Label::NoData.text(lang), area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Provenance banner
            Constraint::Length(5), // Metric cards
            Constraint::Min(10),   // Chart | region average
            Constraint::Length(6), // Summary
        ])
        .split(area);

    render_banner(frame, data, lang, chunks[0]);
    render_cards(frame, latest, period_delta(&data.records), lang, chunks[1]);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[2]);
    render_trend_chart(frame, &data.records, lang, middle[0]);
    render_region_average(frame, latest, app.region_average.as_ref(), lang, middle[1]);

    render_summary(frame, sub_region, &data.records, lang, chunks[3]);
}

fn render_banner(frame: &mut Frame, data: &DistrictData, lang: Language, area: Rect) {
    if !data.needs_banner() {
        return;
    }
    let age = data
        .last_updated
        .map(|updated| age_display(updated, Utc::now()))
        .unwrap_or_default();
    let text = format!(
        " {} ({}, {}) ",
        Label::CachedBanner.text(lang),
        data.provenance.as_str(),
        age
    );
    frame.render_widget(Paragraph::new(text).style(styles::banner_style()), area);
}

fn render_cards(
    frame: &mut Frame,
    latest: &MetricRecord,
    delta: Option<PeriodDelta>,
    lang: Language,
    area: Rect,
) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    let entries = [
        (
            Label::Households,
            format_grouped(latest.households as i64),
            delta.map(|d| (format_delta(d.households), d.households as f64)),
        ),
        (
            Label::PersonDays,
            format_indian_number(latest.person_days as f64),
            delta.map(|d| (format_delta(d.person_days), d.person_days as f64)),
        ),
        (
            Label::Expenditure,
            format_indian_number(latest.expenditure),
            delta.map(|d| (format_delta_decimal(d.expenditure), d.expenditure)),
        ),
        (
            Label::AvgWage,
            format_rupees(latest.avg_wage),
            delta.map(|d| (format_delta_decimal(d.avg_wage), d.avg_wage)),
        ),
    ];

    for ((label, value, change), area) in entries.into_iter().zip(cards.iter()) {
        let mut lines = vec![Line::from(Span::styled(value, styles::highlight_style()))];
        if let Some((text, raw)) = change {
            lines.push(Line::from(Span::styled(text, styles::delta_style(raw))));
        }
        let block = Block::default()
            .title(format!(" {} ", label.text(lang)))
            .title_style(styles::muted_style())
            .borders(Borders::ALL)
            .border_style(styles::border_style(false));
        frame.render_widget(Paragraph::new(lines).block(block), *area);
    }
}

fn render_trend_chart(frame: &mut Frame, records: &[MetricRecord], lang: Language, area: Rect) {
    let window = trend_window(records, TREND_WINDOW);
    let bars: Vec<Bar> = window
        .iter()
        .map(|record| {
            let label: String = month_name(record.month).chars().take(3).collect();
            Bar::default()
                .value(record.person_days)
                .label(Line::from(format!("{} {}", label, record.year % 100)))
                .text_value(format_indian_number(record.person_days as f64))
        })
        .collect();

    let block = Block::default()
        .title(format!(
            " {} - {} ",
            Label::Trend.text(lang),
            Label::PersonDays.text(lang)
        ))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(9)
        .bar_gap(2)
        .bar_style(styles::bar_style())
        .value_style(styles::selected_style());
    frame.render_widget(chart, area);
}

fn render_region_average(
    frame: &mut Frame,
    latest: &MetricRecord,
    average: Option<&GroupAverage>,
    lang: Language,
    area: Rect,
) {
    let block = Block::default()
        .title(format!(" {} ", Label::RegionComparison.text(lang)))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    let Some(avg) = average else {
        let line = Line::from(Span::styled(
            Label::RegionAverageUnavailable.text(lang),
            styles::muted_style(),
        ));
        frame.render_widget(Paragraph::new(line).block(block), area);
        return;
    };

    let row = |label: Label, district: String, state: String| {
        vec![
            Line::from(Span::styled(label.text(lang), styles::highlight_style())),
            Line::from(vec![
                Span::raw(format!("  {:<14}", district)),
                Span::styled(format!("avg {}", state), styles::muted_style()),
            ]),
        ]
    };

    let mut lines = Vec::new();
    lines.extend(row(
        Label::Households,
        format_grouped(latest.households as i64),
        format_grouped(avg.households as i64),
    ));
    lines.extend(row(
        Label::PersonDays,
        format_indian_number(latest.person_days as f64),
        format_indian_number(avg.person_days as f64),
    ));
    lines.extend(row(
        Label::AvgWage,
        format_rupees(latest.avg_wage),
        format_rupees(avg.avg_wage),
    ));
    lines.push(Line::from(Span::styled(
        format!("  n = {}", avg.count),
        styles::muted_style(),
    )));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_summary(
    frame: &mut Frame,
    sub_region: &str,
    records: &[MetricRecord],
    lang: Language,
    area: Rect,
) {
    let block = Block::default()
        .title(format!(" {} ", Label::PerformanceSummary.text(lang)))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    let text = performance_summary(sub_region, records, lang);
    frame.render_widget(
        Paragraph::new(text).block(block).wrap(Wrap { trim: true }),
        area,
    );
}
