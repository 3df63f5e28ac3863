//! Terminal rendering of the exchange board.
//!
//! One interaction runs fetch → convert → export and produces a
//! [`Dashboard`]; [`render`] then prints either the dashboard or the single
//! failure line. Nothing from a failed interaction is printed.

use chrono::{DateTime, Local};
use log::error;
use std::io::{self, Write};
use std::path::Path;
use tabled::{builder::Builder, settings::Style};

use crate::api::RateSource;
use crate::cache::{Clock, RateCache};
use crate::convert::{build_rows, format_decimal, headline};
use crate::error::BoardResult;
use crate::export::{header, write_csv};
use crate::models::{DisplayRow, RatesSnapshot, TargetCurrency};

pub const TITLE: &str = "💰 多国兑换人民币实时汇率";
pub const FOOTER: &str = "💡 提示：本程序数据源自公共接口，仅供参考，实际请以银行柜台为准。";

/// Metrics shown above the table: label and currency code.
pub const HEADLINES: [(&str, &str); 2] = [("美元/人民币", "USD"), ("欧元/人民币", "EUR")];

#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    pub label: &'static str,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub amount: f64,
    pub date: Option<String>,
    pub metrics: Vec<Metric>,
    pub rows: Vec<DisplayRow>,
}

impl Dashboard {
    pub fn build(
        snapshot: &RatesSnapshot,
        amount: f64,
        targets: &[TargetCurrency],
    ) -> BoardResult<Self> {
        let rows = build_rows(snapshot, amount, targets)?;
        let metrics = HEADLINES
            .iter()
            .map(|&(label, code)| -> BoardResult<Metric> {
                Ok(Metric {
                    label,
                    value: headline(snapshot, code)?,
                })
            })
            .collect::<BoardResult<Vec<_>>>()?;

        Ok(Self {
            amount,
            date: snapshot.date.clone(),
            metrics,
            rows,
        })
    }
}

/// Runs one interaction: cached fetch, conversion, and the optional CSV export.
pub async fn refresh<S: RateSource, C: Clock>(
    cache: &mut RateCache<S, C>,
    amount: f64,
    targets: &[TargetCurrency],
    export_path: Option<&Path>,
) -> BoardResult<Dashboard> {
    let snapshot = cache.get().await?;
    let dashboard = Dashboard::build(&snapshot, amount, targets)?;
    if let Some(path) = export_path {
        write_csv(path, &dashboard.rows, amount)?;
    }
    Ok(dashboard)
}

pub fn render<W: Write>(
    out: &mut W,
    outcome: &BoardResult<Dashboard>,
    amount: f64,
    export_path: Option<&Path>,
    now: &DateTime<Local>,
) -> io::Result<()> {
    writeln!(out, "{}", TITLE)?;
    writeln!(out, "数据更新于: {}", now.format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(out, "人民币金额 (CNY): {}", format_decimal(amount))?;
    writeln!(out)?;

    match outcome {
        Ok(dashboard) => render_dashboard(out, dashboard, export_path)?,
        Err(e) => {
            error!("Render aborted: {}", e);
            writeln!(out, "数据加载失败，请刷新页面重试。错误原因: {}", e)?;
        }
    }

    writeln!(out)?;
    writeln!(out, "{}", FOOTER)
}

fn render_dashboard<W: Write>(
    out: &mut W,
    dashboard: &Dashboard,
    export_path: Option<&Path>,
) -> io::Result<()> {
    for metric in &dashboard.metrics {
        writeln!(out, "  {}  {}", metric.label, format_decimal(metric.value))?;
    }
    if let Some(date) = &dashboard.date {
        writeln!(out, "  (报价日期 {})", date)?;
    }
    writeln!(out)?;

    writeln!(
        out,
        "💵 {} 元人民币的详细兑换清单",
        format_decimal(dashboard.amount)
    )?;
    writeln!(out, "{}", table(dashboard))?;

    if let Some(path) = export_path {
        writeln!(out, "已导出 Excel/CSV: {}", path.display())?;
    }
    Ok(())
}

fn table(dashboard: &Dashboard) -> String {
    let mut builder = Builder::default();
    builder.push_record(header(dashboard.amount));
    for row in &dashboard.rows {
        builder.push_record([
            row.label.clone(),
            format_decimal(row.inverse_rate),
            row.converted.clone(),
        ]);
    }

    let mut table = builder.build();
    table.with(Style::modern());
    table.to_string()
}
