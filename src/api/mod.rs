//! HTTP surface for the planning services, served with axum.
//!
//! [`router`] wires every route onto one store and clock. Failures answer
//! with an `{"error": message}` body:
//!
//! | Kind of failure | Status |
//! |---|---|
//! | validation, conflict | 400 |
//! | missing entity, empty "due today" query | 404 |
//! | store failure | 500 |

mod error;
mod extract;
mod handlers;
mod payloads;
mod router;
mod state;

pub use router::router;
