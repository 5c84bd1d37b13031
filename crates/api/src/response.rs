//! Shared response envelope types for API handlers.
//!
//! Reads use a `{ "data": ... }` envelope. Deletes answer with
//! [`DeleteStatus`].

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// `{ "status": true, "msg": ... }` body returned by successful deletes.
#[derive(Debug, Serialize)]
pub struct DeleteStatus {
    pub status: bool,
    pub msg: String,
}

impl DeleteStatus {
    pub fn deleted(entity: &str) -> Self {
        Self {
            status: true,
            msg: format!("{entity} deleted successfully"),
        }
    }
}
