use serde::Deserialize;

/// Person payload as served by the matching API.
#[derive(Debug, Deserialize)]
pub struct PersonResponse {
    /// Person id, unique within a batch.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Age in years.
    pub age: u8,
    /// Free-form location string.
    pub location: String,
    /// Photo URLs, may be empty.
    #[serde(default)]
    pub pictures: Vec<String>,
}

/// Page envelope wrapping list endpoints.
#[derive(Debug, Deserialize)]
pub struct PageResponse {
    /// The people in this page.
    pub data: Vec<PersonResponse>,
}

/// Error response structure from the API.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    /// Error message from the server.
    pub message: String,
}
