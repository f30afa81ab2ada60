use anyhow::Error;
use rocket::{
    http::{ContentType, Status},
    request::Request,
    response::{self, Responder, Response},
    serde::Serialize,
};
use std::io::Cursor;
use tracing::error;

/// Rendered as `{"Error": "<message>"}`.
#[derive(Debug, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ApiError {
    #[serde(skip_serializing)]
    pub code: u16,
    #[serde(rename = "Error")]
    pub message: String,
    #[serde(skip_serializing)]
    pub error: Option<Error>,
}

impl ApiError {
    pub fn new(code: u16, error: Error) -> ApiError {
        ApiError {
            code,
            message: format!("{:#}", error),
            error: Some(error),
        }
    }

    pub fn custom(code: u16, message: &str) -> ApiError {
        ApiError {
            code,
            message: message.to_string(),
            error: None,
        }
    }
}

impl<'r, 'o: 'r> Responder<'r, 'o> for ApiError {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'o> {
        if let Some(error) = &self.error {
            error!(code = self.code, %error, "Error from controller");
        }

        let body = serde_json::to_string(&self).map_err(|e| {
            error!(%e, "Unable to serialize error body");
            Status::InternalServerError
        })?;

        Response::build()
            .header(ContentType::JSON)
            .status(Status::new(self.code))
            .sized_body(body.len(), Cursor::new(body))
            .ok()
    }
}

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        ApiError::new(Status::InternalServerError.code, e)
    }
}
