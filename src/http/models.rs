use serde::{Deserialize, Serialize};

/// Message returned by a successful upload.
pub const UPLOAD_SUCCESS_MESSAGE: &str = "File uploaded successfully";

/// Response body for POST /upload
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub message: String,
}

impl UploadResponse {
    pub fn success() -> Self {
        Self {
            message: UPLOAD_SUCCESS_MESSAGE.to_string(),
        }
    }
}

/// Query parameters for GET /scatter-plot
#[derive(Debug, Deserialize)]
pub struct ScatterPlotParams {
    pub x: String,
    pub y: String,
    pub color: String,
    #[serde(default)]
    pub flipper_length_min: i64,
}

/// Query parameters for GET /histogram
#[derive(Debug, Deserialize)]
pub struct HistogramParams {
    pub column: String,
    pub color: String,
    #[serde(default)]
    pub flipper_length_min: i64,
}
