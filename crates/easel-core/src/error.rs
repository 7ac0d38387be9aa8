use http::StatusCode;

/// Domain errors that know how to present themselves over HTTP
///
/// Feature crates implement this for their error enums; rendering into an
/// actual response stays with the crate that owns the router.
pub trait HttpError: std::error::Error {
    /// HTTP status code for this error
    fn status_code(&self) -> StatusCode;

    /// Machine-readable error kind, used in logs
    fn error_type(&self) -> &'static str;

    /// Message returned to the caller verbatim
    fn client_message(&self) -> String;
}
