use poem_openapi::Object;
use serde::Deserialize;

#[derive(Object, Deserialize)]
pub struct BadRequestResponse {
    pub message: String,
}

#[derive(Object, Deserialize)]
pub struct UnauthorizedResponse {
    pub message: String,
}

impl Default for UnauthorizedResponse {
    fn default() -> Self {
        Self {
            message: "Unauthorized".to_string(),
        }
    }
}

#[derive(Object, Deserialize)]
pub struct ForbiddenResponse {
    pub message: String,
}

impl Default for ForbiddenResponse {
    fn default() -> Self {
        Self {
            message: "Forbidden".to_string(),
        }
    }
}

#[derive(Object, Deserialize)]
pub struct NotFoundResponse {
    pub message: String,
}

#[derive(Object, Deserialize)]
pub struct ConflictResponse {
    pub message: String,
}

#[derive(Object, Deserialize)]
pub struct InternalServerErrorResponse {
    pub message: String,
}

impl InternalServerErrorResponse {
    /// Logs the failing module/function/step with the underlying error and
    /// returns a generic body. Internal detail stays in the log.
    pub fn new(module: &str, function: &str, step: &str, error: &str) -> Self {
        tracing::error!(module, function, step, error, "internal server error");
        Self {
            message: "Internal server error".to_string(),
        }
    }
}
