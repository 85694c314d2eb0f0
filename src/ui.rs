// Terminal output: everything the user sees goes through here so the
// library stays free of printing. Diagnostics go to stderr via tracing;
// this module only writes the user-facing lines to stdout.

use crate::api::ValidationError;
use crate::args::UploadConfig;
use crate::error::UploadError;

pub fn print_sending(config: &UploadConfig) {
    println!(
        "Sending {} ({} bytes) to {}",
        config.file.path.display(),
        config.file.size,
        config.target
    );
}

pub fn print_success(asset_url: &str) {
    println!("Successfully uploaded to {}", asset_url);
}

/// Print the failure, a blank line, then the usage text.
pub fn print_error_and_usage(err: &anyhow::Error, usage: &str) {
    println!("{}\n", describe_error(err));
    println!("{}", usage);
}

/// Message for a failed run. API errors always carry a request id line
/// (empty when the server sent none), then the documentation link and
/// field-level validation errors when present.
pub fn describe_error(err: &anyhow::Error) -> String {
    match err.downcast_ref::<UploadError>() {
        Some(UploadError::Api {
            status,
            message,
            request_id,
            documentation_url,
            errors,
        }) => {
            let mut lines = vec![format!("{}: {}", status, message)];
            lines.push(format!(
                "Request ID: {}",
                request_id.as_deref().unwrap_or_default()
            ));
            if let Some(doc) = documentation_url {
                lines.push(format!("Documentation: {}", doc));
            }
            lines.extend(errors.iter().map(describe_validation_error));
            lines.join("\n")
        }
        _ => err.to_string(),
    }
}

fn describe_validation_error(e: &ValidationError) -> String {
    let mut line = format!("  {}.{}: {}", e.resource, e.field, e.code);
    if let Some(msg) = &e.message {
        line.push(' ');
        line.push_str(msg);
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_lists_all_details() {
        let err = anyhow::Error::new(UploadError::Api {
            status: 422,
            message: "Validation Failed".into(),
            request_id: Some("abc".into()),
            documentation_url: Some("https://docs.example.com".into()),
            errors: vec![ValidationError {
                resource: "ReleaseAsset".into(),
                code: "already_exists".into(),
                field: "name".into(),
                message: Some("name taken".into()),
            }],
        });

        assert_eq!(
            describe_error(&err),
            "422: Validation Failed\n\
             Request ID: abc\n\
             Documentation: https://docs.example.com\n  \
             ReleaseAsset.name: already_exists name taken"
        );
    }

    #[test]
    fn api_error_without_request_id() {
        let err = anyhow::Error::new(UploadError::Api {
            status: 401,
            message: "Bad credentials".into(),
            request_id: None,
            documentation_url: None,
            errors: Vec::new(),
        });
        assert_eq!(describe_error(&err), "401: Bad credentials\nRequest ID: ");
    }

    #[test]
    fn other_errors_use_their_message() {
        let err = anyhow::Error::new(UploadError::InvalidUrl("empty URL".into()));
        assert_eq!(describe_error(&err), "Invalid URL: empty URL");
    }
}
