//! The `{ "data": ... }` success envelope.
//!
//! Every handler returns its payload wrapped in [`DataResponse`] so clients
//! can rely on one shape for success bodies, mirroring the `{error, code}`
//! shape errors take in `error.rs`. Typed wrapping keeps the envelope out of
//! individual handlers and away from hand-built `json!` blobs.

use serde::Serialize;

/// Success envelope carrying the handler's payload under `data`.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
