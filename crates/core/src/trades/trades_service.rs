use std::sync::Arc;

use log::debug;

use super::calculations::finalize_trade;
use super::trades_model::{validate_trade, NewTrade, Trade};
use super::trades_traits::TradeServiceTrait;
use crate::errors::{Error, Result};
use crate::events::DomainEvent;
use crate::funding::{apply_deltas, trade_funding_deltas};
use crate::store::{Change, Document, RecordStore};
use crate::utils::record_id;

pub struct TradeService {
    store: Arc<RecordStore>,
}

impl TradeService {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }
}

/// Moves funding for `old -> new` and returns the events for the change.
fn settle(
    doc: &mut Document,
    old: Option<&Trade>,
    new: Option<&Trade>,
    trade_id: &str,
) -> Vec<DomainEvent> {
    let deltas = trade_funding_deltas(old, new);
    let touched = apply_deltas(&mut doc.accounts, &deltas);
    let mut events = vec![DomainEvent::trades_changed(
        vec![trade_id.to_string()],
        touched.clone(),
    )];
    if !touched.is_empty() {
        events.push(DomainEvent::accounts_changed(touched));
    }
    events
}

#[async_trait::async_trait]
impl TradeServiceTrait for TradeService {
    async fn create_trade(&self, new_trade: NewTrade) -> Result<Trade> {
        new_trade.validate()?;
        let id = record_id(new_trade.id.clone());

        let mutation = self
            .store
            .mutate(move |doc| {
                if doc.trade(&id).is_some() {
                    return Err(Error::invalid_input(format!("Trade {} already exists", id)));
                }
                let mut trade = new_trade.into_trade(id);
                finalize_trade(&mut trade);
                let events = settle(doc, None, Some(&trade), &trade.id);
                debug!("Created trade {} ({} net)", trade.id, trade.result_net);
                doc.trades.push(trade.clone());
                Ok(Change::new(trade, events))
            })
            .await?;
        Ok(mutation.value)
    }

    async fn update_trade(&self, trade: Trade) -> Result<Trade> {
        validate_trade(&trade)?;

        let mutation = self
            .store
            .mutate(move |doc| {
                let index = doc
                    .trades
                    .iter()
                    .position(|t| t.id == trade.id)
                    .ok_or_else(|| Error::NotFound(format!("Trade {} not found", trade.id)))?;

                let mut trade = trade;
                finalize_trade(&mut trade);
                let old = doc.trades[index].clone();
                if old == trade {
                    return Ok(Change::unchanged(trade));
                }
                let events = settle(doc, Some(&old), Some(&trade), &trade.id);
                doc.trades[index] = trade.clone();
                Ok(Change::new(trade, events))
            })
            .await?;
        Ok(mutation.value)
    }

    async fn delete_trade(&self, trade_id: &str) -> Result<bool> {
        let trade_id = trade_id.to_string();
        let mutation = self
            .store
            .mutate(move |doc| {
                let Some(index) = doc.trades.iter().position(|t| t.id == trade_id) else {
                    return Ok(Change::unchanged(false));
                };
                let removed = doc.trades.remove(index);
                let events = settle(doc, Some(&removed), None, &removed.id);
                debug!("Deleted trade {}", removed.id);
                Ok(Change::new(true, events))
            })
            .await?;
        Ok(mutation.value)
    }

    fn get_trade(&self, trade_id: &str) -> Result<Trade> {
        self.store
            .snapshot()
            .trade(trade_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Trade {} not found", trade_id)))
    }

    fn list_trades(&self) -> Result<Vec<Trade>> {
        Ok(self.store.snapshot().trades.clone())
    }

    fn list_trades_for_account(&self, account_id: &str) -> Result<Vec<Trade>> {
        Ok(self
            .store
            .snapshot()
            .trades
            .iter()
            .filter(|t| t.involves_account(account_id))
            .cloned()
            .collect())
    }
}
