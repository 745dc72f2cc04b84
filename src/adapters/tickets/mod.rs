//! Ticket Thread Adapters
//!
//! - **InMemoryTicketThreads** - Thread store for development and tests

mod in_memory;

pub use in_memory::InMemoryTicketThreads;
