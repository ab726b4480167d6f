//! Domain events module.
//!
//! Services emit these after successful mutations. Hosts implement the sink
//! to fan events out (notification delivery, cache invalidation, audit).

mod domain_event;
mod sink;

pub use domain_event::*;
pub use sink::*;
