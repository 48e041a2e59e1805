use std::sync::Arc;

use chrono::Utc;

use super::firms_model::{Firm, FirmUpdate, NewFirm};
use super::firms_traits::FirmServiceTrait;
use crate::errors::{Error, Result};
use crate::events::DomainEvent;
use crate::store::{Change, RecordStore};
use crate::utils::record_id;

pub struct FirmService {
    store: Arc<RecordStore>,
}

impl FirmService {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl FirmServiceTrait for FirmService {
    async fn create_firm(&self, new_firm: NewFirm) -> Result<Firm> {
        new_firm.validate()?;
        let id = record_id(new_firm.id.clone());

        let mutation = self
            .store
            .mutate(move |doc| {
                if doc.firm(&id).is_some() {
                    return Err(Error::invalid_input(format!("Firm {} already exists", id)));
                }
                let firm = Firm {
                    id,
                    name: new_firm.name.trim().to_string(),
                    firm_type: new_firm.firm_type,
                    logo: new_firm.logo,
                    date_created: Utc::now(),
                };
                doc.firms.push(firm.clone());
                let events = vec![DomainEvent::firms_changed(vec![firm.id.clone()])];
                Ok(Change::new(firm, events))
            })
            .await?;
        Ok(mutation.value)
    }

    async fn update_firm(&self, firm_update: FirmUpdate) -> Result<Option<Firm>> {
        firm_update.validate()?;

        let mutation = self
            .store
            .mutate(move |doc| {
                let Some(firm) = doc.firms.iter_mut().find(|f| f.id == firm_update.id) else {
                    return Ok(Change::unchanged(None));
                };
                firm_update.apply_to(firm);
                let firm = firm.clone();
                let events = vec![DomainEvent::firms_changed(vec![firm.id.clone()])];
                Ok(Change::new(Some(firm), events))
            })
            .await?;
        Ok(mutation.value)
    }

    async fn delete_firm(&self, firm_id: &str) -> Result<bool> {
        let firm_id = firm_id.to_string();
        let mutation = self
            .store
            .mutate(move |doc| {
                let before = doc.firms.len();
                doc.firms.retain(|f| f.id != firm_id);
                if doc.firms.len() == before {
                    return Ok(Change::unchanged(false));
                }

                let mut detached = Vec::new();
                for account in doc.accounts.iter_mut() {
                    if account.firm_id.as_deref() == Some(firm_id.as_str()) {
                        account.firm_id = None;
                        detached.push(account.id.clone());
                    }
                }
                let mut events = vec![DomainEvent::firms_changed(vec![firm_id])];
                if !detached.is_empty() {
                    events.push(DomainEvent::accounts_changed(detached));
                }
                Ok(Change::new(true, events))
            })
            .await?;
        Ok(mutation.value)
    }

    fn get_firm(&self, firm_id: &str) -> Result<Firm> {
        self.store
            .snapshot()
            .firm(firm_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Firm {} not found", firm_id)))
    }

    fn list_firms(&self) -> Result<Vec<Firm>> {
        Ok(self.store.snapshot().firms.clone())
    }
}
