//! Sample revenue report used by the shell.

use chrono::NaiveDate;
use revboard_table::{Alignment, CellValue, ColumnDescriptor, ValueKind};
use rust_decimal::Decimal;

const CHANNELS: [&str; 4] = ["Retail", "Online", "Wholesale", "Partner"];
const DISCOUNT_MODES: [&str; 3] = ["none", "volume", "seasonal"];

/// One line of the revenue report: a period, channel and discount mode with
/// its aggregated figures.
#[derive(Debug, Clone)]
pub struct RevenueRow {
    pub id: String,
    pub period: NaiveDate,
    pub channel: &'static str,
    pub discount_mode: &'static str,
    pub revenue: Decimal,
    pub quantity: i64,
    /// Revenue per unit against target. Missing when the target is unset.
    pub kpi: Option<f64>,
}

/// Generate a deterministic report covering three months.
pub fn sample_rows() -> Vec<RevenueRow> {
    let mut rows = Vec::new();
    for month in 1..=3u32 {
        let Some(period) = NaiveDate::from_ymd_opt(2024, month, 1) else {
            continue;
        };
        for (c, channel) in CHANNELS.iter().enumerate() {
            for (d, discount_mode) in DISCOUNT_MODES.iter().enumerate() {
                let n = rows.len() as i64;
                let quantity = 40 + (n * 53) % 260;
                let cents = quantity * (1_250 + (c as i64) * 310 - (d as i64) * 95);
                rows.push(RevenueRow {
                    id: format!("{}-{}-{}", period.format("%Y%m"), c, d),
                    period,
                    channel,
                    discount_mode,
                    revenue: Decimal::new(cents, 2),
                    quantity,
                    kpi: (n % 7 != 3).then(|| ((n * 37) % 140) as f64 / 100.0),
                });
            }
        }
    }
    rows
}

/// Stable identity key for a report row.
pub fn row_key(row: &RevenueRow, _: usize) -> String {
    row.id.clone()
}

pub fn columns() -> Vec<ColumnDescriptor<RevenueRow>> {
    vec![
        ColumnDescriptor::new("id", "Id", |r: &RevenueRow| r.id.as_str().into())
            .kind(ValueKind::Text)
            .fixed()
            .width(10),
        ColumnDescriptor::new("period", "Period", |r: &RevenueRow| r.period.into())
            .kind(ValueKind::Date)
            .sortable()
            .cell(|_, value| match value {
                CellValue::Date(date) => date.format("%b %Y").to_string(),
                other => other.display(),
            }),
        ColumnDescriptor::new("channel", "Channel", |r: &RevenueRow| r.channel.into())
            .kind(ValueKind::Text)
            .sortable(),
        ColumnDescriptor::new("discount_mode", "Discount", |r: &RevenueRow| {
            r.discount_mode.into()
        })
        .kind(ValueKind::Text)
        .sortable(),
        ColumnDescriptor::new("revenue", "Revenue", |r: &RevenueRow| r.revenue.into())
            .kind(ValueKind::Decimal)
            .sortable()
            .align(Alignment::Right),
        ColumnDescriptor::new("quantity", "Qty", |r: &RevenueRow| CellValue::from(r.quantity))
            .kind(ValueKind::Number)
            .sortable()
            .align(Alignment::Right),
        ColumnDescriptor::new("kpi", "KPI", |r: &RevenueRow| r.kpi.into())
            .kind(ValueKind::Number)
            .sortable()
            .align(Alignment::Right)
            .cell(|_, value| match value {
                CellValue::Float(v) => format!("{:.2}", v),
                other => other.display(),
            }),
    ]
}

/// Serves the report one page at a time, standing in for a remote API.
#[derive(Debug)]
pub struct PagedSource {
    rows: Vec<RevenueRow>,
    page_size: usize,
}

impl PagedSource {
    pub fn new(rows: Vec<RevenueRow>, page_size: usize) -> Self {
        Self {
            rows,
            page_size: page_size.max(1),
        }
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
    }

    pub fn total_pages(&self) -> usize {
        self.rows.len().div_ceil(self.page_size)
    }

    /// Rows of zero-based `page`; empty past the end.
    pub fn fetch(&self, page: usize) -> Vec<RevenueRow> {
        log::debug!("Fetching page {} (size {})", page, self.page_size);
        self.rows
            .chunks(self.page_size)
            .nth(page)
            .map(<[RevenueRow]>::to_vec)
            .unwrap_or_default()
    }
}
