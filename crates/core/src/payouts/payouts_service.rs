use std::sync::Arc;

use chrono::Utc;
use log::debug;

use super::payouts_model::{NewPayout, Payout, PayoutUpdate};
use super::payouts_traits::PayoutServiceTrait;
use super::split::{compute_split, SplitParticipant, SplitResult};
use crate::errors::{Error, Result};
use crate::events::DomainEvent;
use crate::funding::{apply_deltas, payout_funding_deltas};
use crate::store::{Change, Document, RecordStore};
use crate::utils::record_id;

pub struct PayoutService {
    store: Arc<RecordStore>,
}

impl PayoutService {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }
}

/// Split participants for `account_ids`. Unknown accounts keep their whole
/// share.
fn participants(doc: &Document, account_ids: &[String]) -> Vec<SplitParticipant> {
    account_ids
        .iter()
        .map(|id| match doc.account(id) {
            Some(account) => SplitParticipant::from(account),
            None => SplitParticipant {
                account_id: id.clone(),
                profit_split: None,
            },
        })
        .collect()
}

pub(crate) fn split_for(doc: &Document, payout: &Payout) -> SplitResult {
    compute_split(
        payout.amount_solicited,
        &participants(doc, &payout.account_ids),
    )
}

/// Debits/credits accounts for `old -> new` and returns the resulting events.
fn settle(
    doc: &mut Document,
    old: Option<&Payout>,
    new: Option<&Payout>,
    payout_id: &str,
) -> Vec<DomainEvent> {
    let deltas = payout_funding_deltas(old, new);
    let touched = apply_deltas(&mut doc.accounts, &deltas);
    let mut events = vec![DomainEvent::payouts_changed(
        vec![payout_id.to_string()],
        touched.clone(),
    )];
    if !touched.is_empty() {
        events.push(DomainEvent::accounts_changed(touched));
    }
    events
}

#[async_trait::async_trait]
impl PayoutServiceTrait for PayoutService {
    async fn create_payout(&self, new_payout: NewPayout) -> Result<Payout> {
        new_payout.validate()?;
        let id = record_id(new_payout.id.clone());

        let mutation = self
            .store
            .mutate(move |doc| {
                if doc.payout(&id).is_some() {
                    return Err(Error::invalid_input(format!("Payout {} already exists", id)));
                }
                let mut payout = new_payout.into_payout(id, Utc::now());
                let split = split_for(doc, &payout);
                payout.apply_split(split);
                let events = settle(doc, None, Some(&payout), &payout.id);
                debug!(
                    "Created payout {} of {} over {} accounts",
                    payout.id,
                    payout.amount_solicited,
                    payout.account_ids.len()
                );
                doc.payouts.push(payout.clone());
                Ok(Change::new(payout, events))
            })
            .await?;
        Ok(mutation.value)
    }

    async fn update_payout(&self, payout_update: PayoutUpdate) -> Result<Option<Payout>> {
        payout_update.validate()?;

        let mutation = self
            .store
            .mutate(move |doc| {
                let Some(index) = doc.payouts.iter().position(|p| p.id == payout_update.id) else {
                    debug!("Update skipped, payout {} not found", payout_update.id);
                    return Ok(Change::unchanged(None));
                };
                let old = doc.payouts[index].clone();
                let mut payout = old.clone();
                let resplit = payout_update.changes_split(&old);
                payout_update.apply_to(&mut payout);
                if resplit {
                    let split = split_for(doc, &payout);
                    payout.apply_split(split);
                }
                if payout == old {
                    return Ok(Change::unchanged(Some(payout)));
                }
                let events = settle(doc, Some(&old), Some(&payout), &payout.id);
                doc.payouts[index] = payout.clone();
                Ok(Change::new(Some(payout), events))
            })
            .await?;
        Ok(mutation.value)
    }

    async fn delete_payout(&self, payout_id: &str) -> Result<bool> {
        let payout_id = payout_id.to_string();
        let mutation = self
            .store
            .mutate(move |doc| {
                let Some(index) = doc.payouts.iter().position(|p| p.id == payout_id) else {
                    return Ok(Change::unchanged(false));
                };
                let removed = doc.payouts.remove(index);
                let events = settle(doc, Some(&removed), None, &removed.id);
                Ok(Change::new(true, events))
            })
            .await?;
        Ok(mutation.value)
    }

    fn get_payout(&self, payout_id: &str) -> Result<Payout> {
        self.store
            .snapshot()
            .payout(payout_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Payout {} not found", payout_id)))
    }

    fn list_payouts(&self) -> Result<Vec<Payout>> {
        Ok(self.store.snapshot().payouts.clone())
    }

    fn preview_split(&self, amount: f64, account_ids: &[String]) -> Result<SplitResult> {
        let probe = NewPayout {
            amount_solicited: amount,
            account_ids: account_ids.to_vec(),
            ..Default::default()
        };
        probe.validate()?;
        let doc = self.store.snapshot();
        Ok(compute_split(amount, &participants(&doc, account_ids)))
    }
}
