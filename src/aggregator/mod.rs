//! Request aggregation subsystem.
//!
//! # Data Flow
//! ```text
//! GET /chat/summary
//!     → coordinator.rs (deadline, fan-out, ordered collection)
//!     → fanout.rs (one task + one-slot channel per upstream, joined at the end)
//!     → response.rs (AggregatedResponse, serialized once)
//!       or error.rs (AggregateError, one of four 500 messages)
//! ```

pub mod coordinator;
pub mod error;
pub mod fanout;
pub mod response;

pub use coordinator::Aggregator;
pub use error::{AggregateError, Degradation, MandatoryService};
pub use fanout::{FanOut, InFlight};
pub use response::AggregatedResponse;
