//! Persisted-entity shapes and the order state machine.
//!
//! Everything in this crate is plain data plus the transitions the
//! payment core is allowed to make on it. Persistence and the web
//! surface live with the callers.

pub mod catalog;
pub mod customer;
pub mod errors;
pub mod gateway_types;
pub mod invoice;
pub mod payment;
pub mod types;
