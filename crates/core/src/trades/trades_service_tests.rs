#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration, Utc};

    use crate::events::{DomainEvent, MockDomainEventSink};
    use crate::store::{Document, RecordStore};
    use crate::test_fixtures::{account, store_with};
    use crate::trades::{
        Direction, NewTrade, PartialExecution, TradeAccount, TradeService, TradeServiceTrait,
    };

    fn new_trade(result_net: f64, accounts: &[(&str, f64)]) -> NewTrade {
        let exit = Utc::now() - Duration::hours(1);
        NewTrade {
            id: None,
            entry_datetime: exit - Duration::minutes(15),
            exit_datetime: Some(exit),
            asset: "ES".to_string(),
            direction: Direction::Long,
            volume: 1.0,
            entry_price: 5000.0,
            exit_price: 5010.0,
            strategy_id: None,
            accounts: accounts
                .iter()
                .map(|(id, w)| TradeAccount::new(*id, *w))
                .collect(),
            account_id: None,
            result_gross: result_net,
            commission: 0.0,
            fees: 0.0,
            swap: 0.0,
            slippage: 0.0,
            result_net,
            result_r: 1.0,
            partial_executions: vec![],
            checklist_results: serde_json::Value::Null,
            notes: None,
        }
    }

    async fn setup() -> (Arc<RecordStore>, TradeService, MockDomainEventSink) {
        let mut document = Document::seed();
        document.accounts = vec![account("A", 1000.0, 0.8), account("B", 500.0, 0.9)];
        let store = store_with(document).await;
        let sink = MockDomainEventSink::new();
        store.subscribe(Arc::new(sink.clone()));
        let service = TradeService::new(store.clone());
        (store, service, sink)
    }

    fn funding(store: &RecordStore, id: &str) -> f64 {
        store.snapshot().account(id).unwrap().current_funding
    }

    #[tokio::test]
    async fn test_create_trade_credits_accounts() {
        let (store, service, sink) = setup().await;
        let trade = service
            .create_trade(new_trade(200.0, &[("A", 1.0), ("B", 0.5)]))
            .await
            .unwrap();

        assert!(!trade.id.is_empty());
        assert_eq!(trade.account_id.as_deref(), Some("A"));
        assert_eq!(funding(&store, "A"), 1200.0);
        assert_eq!(funding(&store, "B"), 600.0);

        let events = sink.events();
        assert!(events.contains(&DomainEvent::accounts_changed(vec![
            "A".to_string(),
            "B".to_string()
        ])));
        assert!(events.iter().any(|e| e.affects_goal_progress()));
    }

    #[tokio::test]
    async fn test_create_derives_figures_from_executions() {
        let (store, service, _) = setup().await;
        let mut input = new_trade(0.0, &[("A", 1.0)]);
        input.commission = 5.0;
        input.partial_executions = vec![PartialExecution {
            entry_price: 100.0,
            exit_price: 110.0,
            volume: 2.0,
            result_gross: 20.0,
            result_r: 0.0,
            entry_datetime: input.entry_datetime,
            exit_datetime: input.exit_datetime,
            take_profit: None,
            stop_loss: Some(95.0),
        }];

        let trade = service.create_trade(input).await.unwrap();
        assert_eq!(trade.result_net, 15.0);
        assert!((trade.result_r - 2.0).abs() < 1e-9);
        assert_eq!(funding(&store, "A"), 1015.0);
    }

    #[tokio::test]
    async fn test_update_moves_only_the_difference() {
        let (store, service, _) = setup().await;
        let mut trade = service
            .create_trade(new_trade(200.0, &[("A", 1.0)]))
            .await
            .unwrap();

        trade.result_net = 50.0;
        trade.result_gross = 50.0;
        service.update_trade(trade.clone()).await.unwrap();
        assert_eq!(funding(&store, "A"), 1050.0);

        trade.accounts = vec![TradeAccount::new("B", 1.0)];
        let moved = service.update_trade(trade).await.unwrap();
        assert_eq!(moved.account_id.as_deref(), Some("B"));
        assert_eq!(funding(&store, "A"), 1000.0);
        assert_eq!(funding(&store, "B"), 550.0);
    }

    #[tokio::test]
    async fn test_identical_resave_changes_nothing() {
        let (store, service, sink) = setup().await;
        let trade = service
            .create_trade(new_trade(123.45, &[("A", 0.3), ("B", 0.7)]))
            .await
            .unwrap();
        let revision = store.revision();
        sink.clear();

        service.update_trade(trade).await.unwrap();
        assert_eq!(store.revision(), revision);
        assert!(sink.is_empty());
        assert!((funding(&store, "A") - 1037.035).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_update_unknown_trade_is_not_found() {
        let (_, service, _) = setup().await;
        let mut trade = service
            .create_trade(new_trade(10.0, &[("A", 1.0)]))
            .await
            .unwrap();
        trade.id = "missing".to_string();
        let err = service.update_trade(trade).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_reverts_funding() {
        let (store, service, _) = setup().await;
        let trade = service
            .create_trade(new_trade(-80.0, &[("A", 0.25)]))
            .await
            .unwrap();
        assert_eq!(funding(&store, "A"), 980.0);

        assert!(service.delete_trade(&trade.id).await.unwrap());
        assert_eq!(funding(&store, "A"), 1000.0);
        assert!(!service.delete_trade(&trade.id).await.unwrap());
        assert!(service.get_trade(&trade.id).unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_attribution() {
        let (store, service, _) = setup().await;
        let result = service.create_trade(new_trade(10.0, &[("A", -1.0)])).await;
        assert!(result.is_err());
        assert!(store.snapshot().trades.is_empty());
    }

    #[tokio::test]
    async fn test_list_for_account() {
        let (_, service, _) = setup().await;
        service
            .create_trade(new_trade(10.0, &[("A", 1.0)]))
            .await
            .unwrap();
        service
            .create_trade(new_trade(10.0, &[("B", 1.0)]))
            .await
            .unwrap();
        assert_eq!(service.list_trades().unwrap().len(), 2);
        assert_eq!(service.list_trades_for_account("B").unwrap().len(), 1);
    }
}
