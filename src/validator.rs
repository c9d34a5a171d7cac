use anyhow::anyhow;
use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use campus_core::AppError;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

/// One message per failed rule, sorted so the output is stable.
fn format_errors(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| match &error.message {
                Some(message) => message.to_string(),
                None => format!("{} is invalid", field),
            })
        })
        .collect();
    messages.sort();
    messages.join(", ")
}

/// Strips axum's prefix and serde's position suffix from a data error.
fn serde_detail(text: &str) -> &str {
    let detail = text.split_once("target type: ").map_or(text, |(_, d)| d);
    detail.rsplit_once(" at line ").map_or(detail, |(d, _)| d)
}

fn rejection_message(rejection: &JsonRejection) -> String {
    match rejection {
        JsonRejection::MissingJsonContentType(_) => {
            "Missing 'Content-Type: application/json' header".to_string()
        }
        JsonRejection::JsonSyntaxError(_) => "Malformed JSON body".to_string(),
        JsonRejection::JsonDataError(e) => {
            let text = e.body_text();
            let detail = serde_detail(&text);
            match detail
                .split("missing field `")
                .nth(1)
                .and_then(|s| s.split('`').next())
            {
                Some(field) => format!("{} is required", field),
                None => format!("Invalid request body: {}", detail),
            }
        }
        _ => "Invalid request body".to_string(),
    }
}

/// JSON body extractor that runs `validator` rules.
///
/// Malformed bodies are rejected with 400, rule violations with 422.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::bad_request(anyhow!(rejection_message(&rejection))))?;

        value
            .validate()
            .map_err(|errors| AppError::unprocessable(anyhow!(format_errors(&errors))))?;

        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Validate)]
    struct Range {
        #[validate(length(min = 1, message = "start is required"))]
        start: String,
        #[validate(length(min = 1))]
        end: String,
    }

    #[test]
    fn test_format_errors_sorted_with_fallback() {
        let errors = Range {
            start: String::new(),
            end: String::new(),
        }
        .validate()
        .unwrap_err();
        assert_eq!(format_errors(&errors), "end is invalid, start is required");
    }

    #[test]
    fn test_serde_detail() {
        assert_eq!(
            serde_detail(
                "Failed to deserialize the JSON body into the target type: session_kind: unknown variant `finale`, expected `normale` or `rattrapage` at line 1 column 80"
            ),
            "session_kind: unknown variant `finale`, expected `normale` or `rattrapage`"
        );
        assert_eq!(serde_detail("missing field `password`"), "missing field `password`");
    }
}
