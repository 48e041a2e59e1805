use std::sync::Arc;

use chrono::Utc;
use log::debug;

use super::accounts_model::{Account, AccountUpdate, NewAccount};
use super::accounts_traits::AccountServiceTrait;
use crate::errors::{Error, Result};
use crate::events::DomainEvent;
use crate::funding::{
    apply_deltas, payout_funding_deltas, recalc_account_funding, reconcile, FundingReconciliation,
};
use crate::payouts::split_for;
use crate::store::{Change, Document, RecordStore};
use crate::utils::record_id;

/// Service for managing accounts.
pub struct AccountService {
    store: Arc<RecordStore>,
}

impl AccountService {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }
}

/// Removes every reference to `account_id` from trades, payouts and goals.
/// Must run after the account itself is gone from `doc.accounts`.
///
/// Returns the events describing what was touched.
fn detach_account(doc: &mut Document, account_id: &str) -> Vec<DomainEvent> {
    let mut events = Vec::new();

    let mut trade_ids = Vec::new();
    for trade in doc.trades.iter_mut().filter(|t| t.involves_account(account_id)) {
        trade.accounts.retain(|a| a.account_id != account_id);
        trade.account_id = trade.accounts.first().map(|a| a.account_id.clone());
        trade_ids.push(trade.id.clone());
    }
    if !trade_ids.is_empty() {
        events.push(DomainEvent::trades_changed(trade_ids, vec![]));
    }

    // Remaining accounts take over the detached share, so each touched
    // payout is re-split and its debit settled again.
    let payout_indexes: Vec<usize> = doc
        .payouts
        .iter()
        .enumerate()
        .filter(|(_, p)| {
            p.account_ids.iter().any(|id| id == account_id)
                || p.split_by_account.contains_key(account_id)
        })
        .map(|(index, _)| index)
        .collect();
    let mut payout_ids = Vec::with_capacity(payout_indexes.len());
    let mut funded = Vec::new();
    for index in payout_indexes {
        let old = doc.payouts[index].clone();
        let mut payout = old.clone();
        payout.account_ids.retain(|id| id != account_id);
        let split = split_for(doc, &payout);
        payout.apply_split(split);
        let deltas = payout_funding_deltas(Some(&old), Some(&payout));
        for id in apply_deltas(&mut doc.accounts, &deltas) {
            if !funded.contains(&id) {
                funded.push(id);
            }
        }
        payout_ids.push(payout.id.clone());
        doc.payouts[index] = payout;
    }
    if !payout_ids.is_empty() {
        events.push(DomainEvent::payouts_changed(payout_ids, funded.clone()));
    }
    if !funded.is_empty() {
        events.push(DomainEvent::accounts_changed(funded));
    }

    let goal_ids: Vec<String> = doc
        .goals
        .iter_mut()
        .filter_map(|g| g.unlink_account(account_id).then(|| g.id.clone()))
        .collect();
    if !goal_ids.is_empty() {
        events.push(DomainEvent::goals_changed(goal_ids));
    }

    events
}

#[async_trait::async_trait]
impl AccountServiceTrait for AccountService {
    async fn create_account(&self, new_account: NewAccount) -> Result<Account> {
        new_account.validate()?;
        let id = record_id(new_account.id.clone());
        debug!("Creating account {} ({})", new_account.name, id);

        let mutation = self
            .store
            .mutate(move |doc| {
                if doc.account(&id).is_some() {
                    return Err(Error::invalid_input(format!(
                        "Account {} already exists",
                        id
                    )));
                }
                let account = new_account.into_account(id, Utc::now());
                doc.accounts.push(account.clone());
                let events = vec![DomainEvent::accounts_changed(vec![account.id.clone()])];
                Ok(Change::new(account, events))
            })
            .await?;
        Ok(mutation.value)
    }

    async fn update_account(&self, account_update: AccountUpdate) -> Result<Option<Account>> {
        account_update.validate()?;

        let mutation = self
            .store
            .mutate(move |doc| {
                let Some(account) = doc.account_mut(&account_update.id) else {
                    debug!("Update skipped, account {} not found", account_update.id);
                    return Ok(Change::unchanged(None));
                };
                account_update.apply_to(account);
                let updated = account.clone();
                let events = vec![DomainEvent::accounts_changed(vec![updated.id.clone()])];
                Ok(Change::new(Some(updated), events))
            })
            .await?;
        Ok(mutation.value)
    }

    async fn delete_account(&self, account_id: &str) -> Result<bool> {
        let account_id = account_id.to_string();
        let mutation = self
            .store
            .mutate(move |doc| {
                let before = doc.accounts.len();
                doc.accounts.retain(|a| a.id != account_id);
                if doc.accounts.len() == before {
                    return Ok(Change::unchanged(false));
                }
                let mut events = vec![DomainEvent::accounts_changed(vec![account_id.clone()])];
                events.extend(detach_account(doc, &account_id));
                debug!("Deleted account {}", account_id);
                Ok(Change::new(true, events))
            })
            .await?;
        Ok(mutation.value)
    }

    fn get_account(&self, account_id: &str) -> Result<Account> {
        self.store
            .snapshot()
            .account(account_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Account {} not found", account_id)))
    }

    fn list_accounts(&self) -> Result<Vec<Account>> {
        Ok(self.store.snapshot().accounts.clone())
    }

    async fn recalc_account_funding(&self, account_id: &str) -> Result<Option<Account>> {
        let account_id = account_id.to_string();
        let mutation = self
            .store
            .mutate(move |doc| {
                let Some(account) = doc.account(&account_id) else {
                    return Ok(Change::unchanged(None));
                };
                let recomputed = recalc_account_funding(account, &doc.trades, &doc.payouts);
                let mut account = account.clone();
                if account.current_funding == recomputed {
                    return Ok(Change::unchanged(Some(account)));
                }
                debug!(
                    "Recomputed funding for {}: {} -> {}",
                    account.id, account.current_funding, recomputed
                );
                account.current_funding = recomputed;
                if let Some(stored) = doc.account_mut(&account_id) {
                    stored.current_funding = recomputed;
                }
                let events = vec![DomainEvent::accounts_changed(vec![account.id.clone()])];
                Ok(Change::new(Some(account), events))
            })
            .await?;
        Ok(mutation.value)
    }

    fn reconcile_funding(&self) -> Result<Vec<FundingReconciliation>> {
        let doc = self.store.snapshot();
        Ok(reconcile(&doc.accounts, &doc.trades, &doc.payouts))
    }
}
