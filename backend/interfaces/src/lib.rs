//! Contracts every gateway integration must satisfy: the processor
//! lifecycle, the outbound gateway primitives and the event sink.

pub mod events;
pub mod gateway;
pub mod processor;
