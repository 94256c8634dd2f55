//! Report page rendered through the `report.html` template.

use std::collections::BTreeMap;

use askama::Template;

use super::{ReportContext, ReportKind, ReportRequest};
use crate::core::profit_curve::{is_final_cumulative_non_negative, CurvePoint};
use crate::currency::format_date;
use crate::domain::{FirmSummary, TransactionCategory};

const POSITIVE: &str = "#10b981";
const NEGATIVE: &str = "#ef4444";
const CHART_WIDTH: f64 = 500.0;
const CHART_HEIGHT: f64 = 150.0;
const CHART_PAD: f64 = 10.0;

#[derive(Template)]
#[template(path = "report.html")]
struct ReportPage {
    title: &'static str,
    range_label: &'static str,
    generated_on: String,
    plan: &'static str,
    sections: Sections,
    totals: Vec<Tile>,
    performance: Vec<Tile>,
    firms: Vec<FirmRow>,
    categories: Vec<CategoryRow>,
    chart: Option<Chart>,
    transactions: Vec<TransactionRow>,
}

/// Which blocks a report kind shows. Blocks always render in field order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Sections {
    totals: bool,
    performance: bool,
    firms: bool,
    categories: bool,
    curve: bool,
    transactions: bool,
}

struct Tile {
    label: &'static str,
    value: String,
    class: &'static str,
}

struct FirmRow {
    name: String,
    spent: String,
    received: String,
    net: String,
    net_class: &'static str,
}

struct CategoryRow {
    label: &'static str,
    count: usize,
    total: String,
    total_class: &'static str,
}

struct Chart {
    points: String,
    color: &'static str,
    width: f64,
    height: f64,
}

struct TransactionRow {
    date: String,
    firm: String,
    category: &'static str,
    tag_class: &'static str,
    amount: String,
    amount_class: &'static str,
    notes: String,
}

fn sections(kind: ReportKind) -> Sections {
    let all = Sections {
        totals: true,
        performance: true,
        firms: true,
        categories: true,
        curve: true,
        transactions: true,
    };
    match kind {
        ReportKind::Transactions => Sections {
            totals: true,
            transactions: true,
            ..Sections::default()
        },
        ReportKind::Summary => Sections {
            totals: true,
            firms: true,
            curve: true,
            ..Sections::default()
        },
        ReportKind::Performance => Sections {
            performance: true,
            firms: true,
            curve: true,
            ..Sections::default()
        },
        ReportKind::Detailed => Sections {
            totals: false,
            ..all
        },
        ReportKind::Custom => Sections {
            totals: true,
            firms: true,
            ..Sections::default()
        },
        ReportKind::AllInOne => all,
    }
}

/// Renders the full document. Every interpolated value is escaped by the template.
pub fn render_html(
    request: &ReportRequest,
    ctx: &ReportContext<'_>,
) -> Result<String, askama::Error> {
    let page = ReportPage {
        title: request.kind.title(),
        range_label: request.range.label(),
        generated_on: format_date(ctx.generated_on),
        plan: ctx.plan.display_name(),
        sections: sections(request.kind),
        totals: totals(ctx),
        performance: performance(ctx),
        firms: firm_rows(ctx),
        categories: category_rows(ctx),
        chart: chart(ctx.curve),
        transactions: transaction_rows(ctx),
    };
    page.render()
}

fn amount_class(amount: f64) -> &'static str {
    if amount >= 0.0 {
        "amount-positive"
    } else {
        "amount-negative"
    }
}

fn totals(ctx: &ReportContext<'_>) -> Vec<Tile> {
    let totals = &ctx.aggregation.totals;
    let fmt = ctx.formatter;
    vec![
        Tile {
            label: "Total Spent",
            value: fmt.format(totals.spent),
            class: "amount-negative",
        },
        Tile {
            label: "Total Received",
            value: fmt.format(totals.received),
            class: "amount-positive",
        },
        Tile {
            label: "Net Total",
            value: fmt.format(totals.net),
            class: amount_class(totals.net),
        },
        Tile {
            label: "Transactions",
            value: totals.transaction_count.to_string(),
            class: "",
        },
    ]
}

fn best_firm(summaries: &[FirmSummary]) -> Option<&FirmSummary> {
    summaries
        .iter()
        .fold(None, |best: Option<&FirmSummary>, row| match best {
            Some(current) if current.net() >= row.net() => Some(current),
            _ => Some(row),
        })
}

fn percent(part: f64, whole: f64) -> String {
    if whole.abs() < f64::EPSILON {
        "n/a".to_string()
    } else {
        format!("{:.1}%", part / whole * 100.0)
    }
}

fn performance(ctx: &ReportContext<'_>) -> Vec<Tile> {
    let totals = &ctx.aggregation.totals;
    let best = best_firm(&ctx.aggregation.firm_summaries);
    vec![
        Tile {
            label: "Total Net Profit",
            value: ctx.formatter.format(totals.net),
            class: amount_class(totals.net),
        },
        Tile {
            label: "ROI",
            value: percent(totals.net, totals.spent),
            class: amount_class(totals.net),
        },
        Tile {
            label: "Best Performing Firm",
            value: best
                .map(|row| row.name.clone())
                .unwrap_or_else(|| "None".to_string()),
            class: "",
        },
        Tile {
            label: "Profit Share",
            value: percent(best.map(|row| row.received).unwrap_or(0.0), totals.received),
            class: "",
        },
    ]
}

fn firm_rows(ctx: &ReportContext<'_>) -> Vec<FirmRow> {
    let fmt = ctx.formatter;
    ctx.aggregation
        .firm_summaries
        .iter()
        .map(|row| FirmRow {
            name: row.name.clone(),
            spent: fmt.format(row.spent),
            received: fmt.format(row.received),
            net: fmt.format_signed(row.net()),
            net_class: amount_class(row.net()),
        })
        .collect()
}

fn category_rows(ctx: &ReportContext<'_>) -> Vec<CategoryRow> {
    let mut by_category: BTreeMap<&'static str, (usize, f64)> = BTreeMap::new();
    for txn in &ctx.aggregation.transactions {
        let entry = by_category.entry(txn.category.label()).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += txn.amount;
    }
    by_category
        .into_iter()
        .map(|(label, (count, total))| CategoryRow {
            label,
            count,
            total: ctx.formatter.format_signed(total),
            total_class: amount_class(total),
        })
        .collect()
}

fn tag_class(category: TransactionCategory) -> &'static str {
    match category {
        TransactionCategory::Payout => "tag-payout",
        TransactionCategory::Spending => "tag-spending",
        TransactionCategory::Loss => "tag-loss",
    }
}

fn transaction_rows(ctx: &ReportContext<'_>) -> Vec<TransactionRow> {
    ctx.aggregation
        .transactions
        .iter()
        .map(|txn| TransactionRow {
            date: txn.date.clone(),
            firm: txn.firm.clone(),
            category: txn.category.label(),
            tag_class: tag_class(txn.category),
            amount: ctx.formatter.format_signed(txn.amount),
            amount_class: amount_class(txn.amount),
            notes: txn.notes.clone(),
        })
        .collect()
}

/// Polyline coordinates scaled into the chart box. The zero line is always in range.
fn curve_points(curve: &[CurvePoint]) -> String {
    let (min, max) = curve.iter().fold((0.0_f64, 0.0_f64), |(lo, hi), point| {
        (lo.min(point.cumulative_net), hi.max(point.cumulative_net))
    });
    let span = if (max - min).abs() < f64::EPSILON {
        1.0
    } else {
        max - min
    };
    let inner_w = CHART_WIDTH - 2.0 * CHART_PAD;
    let inner_h = CHART_HEIGHT - 2.0 * CHART_PAD;
    let step = if curve.len() > 1 {
        inner_w / (curve.len() - 1) as f64
    } else {
        0.0
    };
    curve
        .iter()
        .enumerate()
        .map(|(idx, point)| {
            let x = CHART_PAD + step * idx as f64;
            let y = CHART_PAD + (max - point.cumulative_net) / span * inner_h;
            format!("{x:.1},{y:.1}")
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn chart(curve: &[CurvePoint]) -> Option<Chart> {
    if curve.is_empty() {
        return None;
    }
    let color = if is_final_cumulative_non_negative(curve) {
        POSITIVE
    } else {
        NEGATIVE
    };
    Some(Chart {
        points: curve_points(curve),
        color,
        width: CHART_WIDTH,
        height: CHART_HEIGHT,
    })
}
