//! Dashboard aggregation
//!
//! Pure derivations over the entity collections: KPI counts, the
//! leads-by-priority series, monthly sales from won opportunities, recent
//! clients and the pipeline summary. The charting collaborator only accepts
//! arrays of numbers and labels, so everything here is pre-aggregated.

use std::collections::BTreeMap;

use crate::model::{Activity, ActivityStatus, Client, Opportunity, Priority, Stage};

/// Pre-aggregated numeric series for the charting collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    /// Activities still in `Pendiente`.
    pub pending_activities: usize,
    /// Activities in `En Progreso`.
    pub in_progress_activities: usize,
    /// Activity counts by priority: `[alta, media, baja]`.
    pub leads_by_priority: [usize; 3],
    /// Won-opportunity amounts grouped by close month, ascending.
    pub monthly_sales: Series,
    /// Latest clients by registration date, newest first.
    pub recent_clients: Vec<Client>,
    /// Total amount across open pipeline stages.
    pub open_pipeline_value: f64,
    /// Won share of closed opportunities, in percent.
    pub win_rate_pct: f64,
}

/// How many clients the "recent" panel shows.
const RECENT_CLIENTS: usize = 5;

pub fn summarize(
    clients: &[Client],
    activities: &[Activity],
    opportunities: &[Opportunity],
) -> DashboardSummary {
    let pending = count_status(activities, ActivityStatus::Pendiente);
    let in_progress = count_status(activities, ActivityStatus::EnProgreso);

    let leads_by_priority = [
        count_priority(activities, Priority::Alta),
        count_priority(activities, Priority::Media),
        count_priority(activities, Priority::Baja),
    ];

    let won = opportunities
        .iter()
        .filter(|o| o.stage == Stage::CerradaGanada)
        .count();
    let lost = opportunities
        .iter()
        .filter(|o| o.stage == Stage::CerradaPerdida)
        .count();
    let closed = won + lost;
    let win_rate_pct = if closed == 0 {
        0.0
    } else {
        won as f64 / closed as f64 * 100.0
    };

    let open_pipeline_value = opportunities
        .iter()
        .filter(|o| o.stage.is_open())
        .map(|o| o.amount)
        .sum();

    DashboardSummary {
        pending_activities: pending,
        in_progress_activities: in_progress,
        leads_by_priority,
        monthly_sales: monthly_sales(opportunities),
        recent_clients: recent_clients(clients),
        open_pipeline_value,
        win_rate_pct,
    }
}

fn count_status(activities: &[Activity], status: ActivityStatus) -> usize {
    activities.iter().filter(|a| a.status == status).count()
}

fn count_priority(activities: &[Activity], priority: Priority) -> usize {
    activities
        .iter()
        .filter(|a| a.priority == Some(priority))
        .count()
}

/// Won amounts grouped by close month (`YYYY-MM`), ascending by month.
fn monthly_sales(opportunities: &[Opportunity]) -> Series {
    let mut by_month: BTreeMap<String, f64> = BTreeMap::new();
    for opp in opportunities {
        if opp.stage == Stage::CerradaGanada {
            let month = opp.close_date.format("%Y-%m").to_string();
            *by_month.entry(month).or_insert(0.0) += opp.amount;
        }
    }
    Series {
        labels: by_month.keys().cloned().collect(),
        values: by_month.values().copied().collect(),
    }
}

fn recent_clients(clients: &[Client]) -> Vec<Client> {
    let mut sorted: Vec<Client> = clients.to_vec();
    sorted.sort_by(|a, b| b.registered_on.cmp(&a.registered_on).then(b.id.cmp(&a.id)));
    sorted.truncate(RECENT_CLIENTS);
    sorted
}

/// es-ES currency rendering: thousands separated by `.`, decimals by `,`,
/// trailing euro sign. `1234.5` → `"1.234,50 €"`.
pub fn format_currency(amount: f64) -> String {
    let negative = amount < 0.0;
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let fraction = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}{grouped},{fraction:02} €")
}

/// Percentage with one decimal, es-ES comma: `42.857` → `"42,9 %"`.
pub fn format_percent(value: f64) -> String {
    format!("{value:.1} %").replace('.', ",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{sample_activities, sample_clients, sample_opportunities};

    #[test]
    fn kpi_counts_from_seeded_activities() {
        let summary = summarize(
            &sample_clients(),
            &sample_activities(),
            &sample_opportunities(),
        );
        assert_eq!(summary.pending_activities, 2);
        assert_eq!(summary.in_progress_activities, 1);
        assert_eq!(summary.leads_by_priority, [2, 1, 1]);
    }

    #[test]
    fn pipeline_and_win_rate() {
        let summary = summarize(&[], &[], &sample_opportunities());
        // Propuesta 24000 + Negociacion 6200 are open.
        assert!((summary.open_pipeline_value - 30200.0).abs() < f64::EPSILON);
        // One won, one lost.
        assert!((summary.win_rate_pct - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn win_rate_with_no_closed_opportunities_is_zero() {
        let open: Vec<_> = sample_opportunities()
            .into_iter()
            .filter(|o| o.stage.is_open())
            .collect();
        assert_eq!(summarize(&[], &[], &open).win_rate_pct, 0.0);
    }

    #[test]
    fn monthly_sales_groups_won_by_close_month() {
        let summary = summarize(&[], &[], &sample_opportunities());
        assert_eq!(summary.monthly_sales.labels, vec!["2024-12".to_string()]);
        assert_eq!(summary.monthly_sales.values, vec![8500.0]);
    }

    #[test]
    fn recent_clients_newest_first_capped() {
        let summary = summarize(&sample_clients(), &[], &[]);
        assert_eq!(summary.recent_clients.len(), 5);
        assert_eq!(summary.recent_clients[0].name, "Constructora Alfa");
    }

    #[test]
    fn currency_formatting() {
        assert_eq!(format_currency(1234.5), "1.234,50 €");
        assert_eq!(format_currency(0.0), "0,00 €");
        assert_eq!(format_currency(1_000_000.0), "1.000.000,00 €");
        assert_eq!(format_currency(-42.07), "-42,07 €");
    }

    #[test]
    fn percent_formatting() {
        assert_eq!(format_percent(42.857), "42,9 %");
        assert_eq!(format_percent(0.0), "0,0 %");
    }
}
