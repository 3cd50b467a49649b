//! Repository implementations
//!
//! One repository per aggregate store. Every method takes the tenant id
//! explicitly; nothing here reads ambient tenant state.

pub mod journal;
pub mod credit;
pub mod aging;
pub mod receivables;
