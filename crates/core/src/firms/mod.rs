//! Firms module - prop-trading companies accounts belong to.

mod firms_model;
mod firms_service;
mod firms_traits;

pub use firms_model::{Firm, FirmUpdate, NewFirm};
pub use firms_service::FirmService;
pub use firms_traits::FirmServiceTrait;
