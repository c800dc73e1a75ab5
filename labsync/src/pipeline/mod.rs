//! Per-firing batch: resolve, enumerate, then fetch and deliver per tenant.

mod batch;
mod fetch;
