//! Gateway integration for the checkout core: the concrete Stripe
//! processor, the search-query builder, the object mapper, the
//! synchronization engine, the processor registry and the HTTP
//! transport.

pub mod client;
pub mod configs;
pub mod mapper;
pub mod query;
pub mod registry;
pub mod stripe;
pub mod sync;
