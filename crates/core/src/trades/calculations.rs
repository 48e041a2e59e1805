//! Derivation of a trade's aggregate figures from its partial executions.

use super::trades_model::{Direction, PartialExecution, Trade, TradeAccount};
use crate::accounts::DEFAULT_ACCOUNT_WEIGHT;

/// R-multiple of one execution: directional price move over initial risk.
///
/// Returns `None` without a stop, or when entry and stop coincide.
pub fn execution_r_multiple(execution: &PartialExecution, direction: Direction) -> Option<f64> {
    let stop = execution.stop_loss?;
    let risk = (execution.entry_price - stop).abs();
    if risk <= f64::EPSILON {
        return None;
    }
    Some(direction.sign() * (execution.exit_price - execution.entry_price) / risk)
}

/// Volume-weighted average of `value` over executions with positive volume.
fn volume_weighted<F>(executions: &[PartialExecution], value: F) -> Option<f64>
where
    F: Fn(&PartialExecution) -> f64,
{
    let total_volume: f64 = executions.iter().map(|e| e.volume).sum();
    if total_volume <= 0.0 {
        return None;
    }
    Some(executions.iter().map(|e| value(e) * e.volume).sum::<f64>() / total_volume)
}

/// Makes `accounts` and `account_id` agree.
///
/// A legacy trade that only has `account_id` gets a single weight-1
/// attribution; otherwise the primary id is the first attribution.
pub fn normalize_attribution(trade: &mut Trade) {
    if trade.accounts.is_empty() {
        if let Some(primary) = trade.account_id.as_ref().filter(|id| !id.is_empty()) {
            trade.accounts = vec![TradeAccount::new(primary.clone(), DEFAULT_ACCOUNT_WEIGHT)];
        }
    }
    trade.account_id = trade.accounts.first().map(|a| a.account_id.clone());
}

/// Recomputes volume, average prices, gross/net result and R from the
/// executions. Trades without executions keep their stored figures.
pub fn apply_executions(trade: &mut Trade) {
    if trade.partial_executions.is_empty() {
        return;
    }

    let direction = trade.direction;
    for execution in trade.partial_executions.iter_mut() {
        if let Some(r) = execution_r_multiple(execution, direction) {
            execution.result_r = r;
        }
    }

    let executions = &trade.partial_executions;
    trade.volume = executions.iter().map(|e| e.volume).sum();
    if let Some(entry) = volume_weighted(executions, |e| e.entry_price) {
        trade.entry_price = entry;
    }
    if let Some(exit) = volume_weighted(executions, |e| e.exit_price) {
        trade.exit_price = exit;
    }
    trade.result_gross = executions.iter().map(|e| e.result_gross).sum();
    trade.result_r = volume_weighted(executions, |e| e.result_r).unwrap_or_else(|| {
        executions.iter().map(|e| e.result_r).sum::<f64>() / executions.len() as f64
    });

    if let Some(first_entry) = executions.iter().map(|e| e.entry_datetime).min() {
        trade.entry_datetime = first_entry;
    }
    if let Some(last_exit) = executions.iter().filter_map(|e| e.exit_datetime).max() {
        trade.exit_datetime = Some(last_exit);
    }

    trade.result_net = trade.result_gross - trade.total_costs();
}

/// Brings a trade into its canonical stored form.
pub fn finalize_trade(trade: &mut Trade) {
    normalize_attribution(trade);
    apply_executions(trade);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn execution(entry: f64, exit: f64, volume: f64, gross: f64, stop: Option<f64>) -> PartialExecution {
        PartialExecution {
            entry_price: entry,
            exit_price: exit,
            volume,
            result_gross: gross,
            result_r: 0.0,
            entry_datetime: Utc.with_ymd_and_hms(2026, 5, 4, 9, 30, 0).unwrap(),
            exit_datetime: Some(Utc.with_ymd_and_hms(2026, 5, 4, 11, 0, 0).unwrap()),
            take_profit: None,
            stop_loss: stop,
        }
    }

    fn bare_trade() -> Trade {
        Trade {
            id: "t1".to_string(),
            entry_datetime: Utc.with_ymd_and_hms(2026, 5, 4, 9, 0, 0).unwrap(),
            exit_datetime: None,
            asset: "ES".to_string(),
            direction: Direction::Long,
            volume: 0.0,
            entry_price: 0.0,
            exit_price: 0.0,
            strategy_id: None,
            accounts: vec![],
            account_id: None,
            result_gross: 0.0,
            commission: 0.0,
            fees: 0.0,
            swap: 0.0,
            slippage: 0.0,
            result_net: 0.0,
            result_r: 0.0,
            partial_executions: vec![],
            checklist_results: serde_json::Value::Null,
            notes: None,
        }
    }

    #[test]
    fn test_execution_r_long_and_short() {
        let long = execution(100.0, 110.0, 1.0, 0.0, Some(95.0));
        assert_eq!(execution_r_multiple(&long, Direction::Long), Some(2.0));

        let short = execution(100.0, 90.0, 1.0, 0.0, Some(105.0));
        assert_eq!(execution_r_multiple(&short, Direction::Short), Some(2.0));
    }

    #[test]
    fn test_execution_r_requires_non_degenerate_stop() {
        assert_eq!(
            execution_r_multiple(&execution(100.0, 110.0, 1.0, 0.0, None), Direction::Long),
            None
        );
        assert_eq!(
            execution_r_multiple(&execution(100.0, 110.0, 1.0, 0.0, Some(100.0)), Direction::Long),
            None
        );
    }

    #[test]
    fn test_apply_executions_aggregates() {
        let mut trade = bare_trade();
        trade.commission = 4.0;
        trade.fees = 1.0;
        trade.partial_executions = vec![
            execution(100.0, 110.0, 1.0, 50.0, Some(95.0)),
            execution(103.0, 106.0, 3.0, 45.0, Some(98.0)),
        ];

        apply_executions(&mut trade);

        assert_eq!(trade.volume, 4.0);
        assert!((trade.entry_price - 102.25).abs() < 1e-9);
        assert!((trade.exit_price - 107.0).abs() < 1e-9);
        assert_eq!(trade.result_gross, 95.0);
        assert_eq!(trade.result_net, 90.0);
        // (2.0 * 1 + 0.6 * 3) / 4
        assert!((trade.result_r - 0.95).abs() < 1e-9);
        assert_eq!(
            trade.exit_datetime,
            Some(Utc.with_ymd_and_hms(2026, 5, 4, 11, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_trade_without_executions_keeps_manual_result() {
        let mut trade = bare_trade();
        trade.result_net = 200.0;
        trade.result_r = 1.5;
        apply_executions(&mut trade);
        assert_eq!(trade.result_net, 200.0);
        assert_eq!(trade.result_r, 1.5);
    }

    #[test]
    fn test_normalize_attribution_migrates_legacy_account_id() {
        let mut trade = bare_trade();
        trade.account_id = Some("acc-1".to_string());
        normalize_attribution(&mut trade);
        assert_eq!(trade.accounts, vec![TradeAccount::new("acc-1", 1.0)]);

        trade.accounts = vec![TradeAccount::new("acc-2", 0.5), TradeAccount::new("acc-1", 0.5)];
        normalize_attribution(&mut trade);
        assert_eq!(trade.account_id.as_deref(), Some("acc-2"));

        trade.accounts.clear();
        trade.account_id = None;
        normalize_attribution(&mut trade);
        assert!(trade.account_id.is_none());
    }
}
