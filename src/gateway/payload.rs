use serde::Serialize;
use uuid::Uuid;

use crate::matching::MatchResult;

/// Body of a successful order-sheet request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSheetResponse {
    pub request_id: Uuid,
    pub results: Vec<MatchResult>,
}

/// An uploaded order-sheet image.
#[derive(Debug)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}
