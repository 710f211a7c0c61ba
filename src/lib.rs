//! Client for the shared device loaner pool: the loaner endpoint's data
//! access layer, device classification, form validation and the borrow and
//! return workflows that tie them together.

pub mod classification;
pub mod config;
pub mod loaner_api;
pub mod site;
pub mod validation;
pub mod workflows;
