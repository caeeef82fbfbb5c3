//! `totem performance` - daily sales against labor.

use chrono::NaiveDate;
use serde::Serialize;
use totem_recon::{performance_report, DailyPerformanceRecord, LocationId, PerformanceSummary, Store};

use crate::output::print_json;
use crate::{CliError, Context, RangeArgs};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PerformanceResponse {
    summary: PerformanceSummary,
    records: Vec<DailyPerformanceRecord>,
    start_date: NaiveDate,
    end_date: NaiveDate,
}

pub fn cmd_performance(ctx: &Context, location: LocationId, range: &RangeArgs) -> Result<(), CliError> {
    let (start_date, end_date) = ctx.range(range)?;
    if end_date < start_date {
        return Err(CliError::args(format!("--start ({start_date}) is after --end ({end_date})")));
    }
    ctx.store.get_location(location)?;

    let sales = ctx.store.sales_in_range(location, start_date, end_date)?;
    let labor = ctx.store.labor_in_range(location, start_date, end_date)?;
    let records = performance_report(&sales, &labor);
    tracing::debug!(days = records.len(), %start_date, %end_date, "performance report");

    print_json(&PerformanceResponse {
        summary: PerformanceSummary::calculate(&records),
        records,
        start_date,
        end_date,
    })
}
