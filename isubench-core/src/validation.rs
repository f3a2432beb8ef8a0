//! Response validation pipeline
//!
//! Validators are plain functions over a [`Captured`] response. Their
//! outputs are folded into a [`ValidationResult`], a tree whose leaves are
//! real failures and whose branches may be marked canceled. Cancellation is
//! benchmark shutdown, so a canceled branch is never recorded as an error
//! but still keeps the result from reading as a pass.

use crate::error::{ErrorCode, Failure, FailureResult};
use crate::sink::{ErrorSink, Phase};
use isubench_api_types::InitializeResponse;
use isubench_http::{Captured, HttpError};
use serde::de::DeserializeOwned;
use std::fmt::Display;
use tokio_util::sync::CancellationToken;

pub type Validator<'a> = &'a dyn Fn(&Captured) -> FailureResult<()>;

#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    errors: Vec<Failure>,
    children: Vec<ValidationResult>,
    canceled: bool,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// A result for work cut short by run cancellation
    pub fn canceled() -> Self {
        Self {
            canceled: true,
            ..Self::default()
        }
    }

    /// Map a request error: cancellation and deadline expiry are not defects,
    /// whether the deadline was the run's or the request's own timeout
    pub fn from_request_error(err: &HttpError, code: ErrorCode, cancel: &CancellationToken) -> Self {
        if err.is_canceled() || err.is_timeout() || cancel.is_cancelled() {
            return Self::canceled();
        }
        Failure::new(code, err.to_string()).into()
    }

    pub fn push(&mut self, failure: Failure) {
        self.errors.push(failure);
    }

    pub fn nest(&mut self, child: ValidationResult) {
        self.children.push(child);
    }

    pub fn mark_canceled(&mut self) {
        self.canceled = true;
    }

    pub fn is_canceled(&self) -> bool {
        self.canceled || self.children.iter().any(ValidationResult::is_canceled)
    }

    /// Pass only when no leaf failed and no branch was canceled
    pub fn is_empty(&self) -> bool {
        !self.canceled && self.errors.is_empty() && self.children.iter().all(ValidationResult::is_empty)
    }

    pub fn leaves(&self) -> Vec<&Failure> {
        let mut leaves: Vec<&Failure> = self.errors.iter().collect();
        for child in &self.children {
            leaves.extend(child.leaves());
        }
        leaves
    }

    /// Push every leaf failure into the sink; canceled branches contribute nothing
    pub fn record_into(&self, sink: &ErrorSink, phase: Phase) {
        for failure in self.leaves() {
            sink.add(phase, failure.clone());
        }
    }
}

impl From<Failure> for ValidationResult {
    fn from(failure: Failure) -> Self {
        Self {
            errors: vec![failure],
            ..Self::default()
        }
    }
}

/// Run every validator against the response and collect the failures
pub fn validate_response(res: &Captured, validators: &[Validator<'_>]) -> ValidationResult {
    let mut result = ValidationResult::new();
    for validator in validators {
        if let Err(failure) = validator(res) {
            result.push(failure);
        }
    }
    result
}

/// Status check used on the load path
pub fn with_status_code(expected: u16) -> impl Fn(&Captured) -> FailureResult<()> {
    move |res: &Captured| {
        if res.status != expected {
            return Err(Failure::new(
                ErrorCode::ScenarioStatusCode,
                format!("{} : expected({}) != actual({})", res.endpoint(), expected, res.status),
            ));
        }
        Ok(())
    }
}

/// Decode a JSON body, requiring an `application/json` content type
pub fn parse_json_body<T: DeserializeOwned>(res: &Captured, code: ErrorCode) -> FailureResult<T> {
    if !res.is_json() {
        return Err(Failure::new(
            code,
            format!(
                "{} : content type is not application/json (got {})",
                res.endpoint(),
                res.content_type.as_deref().unwrap_or("none")
            ),
        ));
    }
    res.decode()
        .map_err(|e| Failure::new(code, format!("{} : failed to decode body: {}", res.endpoint(), e)))
}

/// `POST /initialize` must answer 200 with a decodable body
pub fn with_initialization_success(res: &Captured) -> FailureResult<InitializeResponse> {
    if res.status != 200 {
        return Err(Failure::new(
            ErrorCode::InitializeFailed,
            format!("{} : expected(200) != actual({})", res.endpoint(), res.status),
        ));
    }
    parse_json_body(res, ErrorCode::InitializeFailed)
}

/// Where a mismatch was found: the endpoint and a dotted field path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hint {
    pub endpoint: String,
    pub what: String,
}

impl Hint {
    pub fn new(endpoint: impl Into<String>, what: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            what: what.into(),
        }
    }

    /// The same hint with a field name appended to the path
    pub fn field(&self, name: &str) -> Hint {
        Hint::new(self.endpoint.clone(), format!("{}{}", self.what, name))
    }

    pub fn mismatch(&self, expected: impl Display, actual: impl Display) -> Failure {
        Failure::new(
            ErrorCode::ValidationInvalidResponseBody,
            format!(
                "{}: body {} mismatch : expected({}) != actual({})",
                self.endpoint, self.what, expected, actual
            ),
        )
    }

    /// Failure for a body that is missing something outright
    pub fn missing(&self) -> Failure {
        Failure::new(
            ErrorCode::ValidationInvalidResponseBody,
            format!("{}: body {} is missing", self.endpoint, self.what),
        )
    }
}

pub fn assert_equal<T: PartialEq + Display>(expected: T, actual: T, hint: &Hint) -> FailureResult<()> {
    if expected != actual {
        return Err(hint.mismatch(expected, actual));
    }
    Ok(())
}

pub fn assert_status(expected: u16, actual: u16, hint: &Hint) -> FailureResult<()> {
    if expected != actual {
        return Err(Failure::new(
            ErrorCode::ValidationInvalidStatusCode,
            format!(
                "{}: status code mismatch : expected({}) != actual({})",
                hint.endpoint, expected, actual
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use isubench_http::{actions, AgentFactory, AgentKind, HttpMethod};
    use std::time::Duration;

    fn captured(status: u16, content_type: Option<&str>, body: &str) -> Captured {
        Captured {
            method: HttpMethod::Post,
            path: "/login".to_string(),
            status,
            content_type: content_type.map(str::to_string),
            body: body.as_bytes().to_vec(),
        }
    }

    #[test]
    fn test_status_mismatch_message() {
        let res = captured(500, None, "");
        let err = with_status_code(200)(&res).unwrap_err();
        assert_eq!(err.codes(), &[ErrorCode::ScenarioStatusCode]);
        assert_eq!(err.message(), "POST /login : expected(200) != actual(500)");
    }

    #[test]
    fn test_validate_response_runs_every_validator() {
        let res = captured(500, Some("text/plain"), "oops");
        let json = |r: &Captured| parse_json_body::<serde_json::Value>(r, ErrorCode::ScenarioInvalidJson).map(|_| ());
        let status = with_status_code(200);
        let result = validate_response(&res, &[&status, &json]);
        assert!(!result.is_empty());
        assert_eq!(result.leaves().len(), 2);
    }

    #[test]
    fn test_json_body_requires_content_type() {
        let res = captured(200, Some("text/html"), r#"{"language":"rust"}"#);
        let err = parse_json_body::<InitializeResponse>(&res, ErrorCode::ScenarioInvalidJson).unwrap_err();
        assert_eq!(err.codes(), &[ErrorCode::ScenarioInvalidJson]);

        let res = captured(200, Some("application/json"), "{not json");
        assert!(parse_json_body::<InitializeResponse>(&res, ErrorCode::ScenarioInvalidJson).is_err());
    }

    #[test]
    fn test_initialization_success() {
        let ok = captured(200, Some("application/json"), r#"{"language":"rust"}"#);
        assert_eq!(with_initialization_success(&ok).unwrap().language, "rust");

        let bad = captured(503, Some("application/json"), "{}");
        let err = with_initialization_success(&bad).unwrap_err();
        assert_eq!(err.codes(), &[ErrorCode::InitializeFailed]);
    }

    #[test]
    fn test_canceled_branch_is_not_empty_and_records_nothing() {
        let mut result = ValidationResult::new();
        result.nest(ValidationResult::canceled());
        assert!(!result.is_empty());
        assert!(result.is_canceled());

        let sink = ErrorSink::new();
        result.record_into(&sink, Phase::Load);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_request_error_after_cancel_is_canceled() {
        let cancel = CancellationToken::new();
        let result = ValidationResult::from_request_error(
            &HttpError::InvalidUrl("x".into()),
            ErrorCode::ScenarioInvalidRequest,
            &cancel,
        );
        assert!(!result.is_canceled());
        assert_eq!(result.leaves()[0].codes(), &[ErrorCode::ScenarioInvalidRequest]);

        cancel.cancel();
        let result = ValidationResult::from_request_error(
            &HttpError::InvalidUrl("x".into()),
            ErrorCode::ScenarioInvalidRequest,
            &cancel,
        );
        assert!(result.is_canceled());
        assert!(result.leaves().is_empty());

        let result = ValidationResult::from_request_error(
            &HttpError::Canceled,
            ErrorCode::ScenarioInvalidRequest,
            &CancellationToken::new(),
        );
        assert!(result.is_canceled());
    }

    #[tokio::test]
    async fn test_request_timeout_is_canceled_not_a_failure() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        // Accept connections and never answer them
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });
        let factory = AgentFactory::new(
            url::Url::parse(&format!("http://{}/", addr)).unwrap(),
            Duration::from_millis(50),
            Duration::from_secs(1),
            "isubench-test",
        );
        let agent = factory.new_agent(AgentKind::Default).unwrap();
        let cancel = CancellationToken::new();

        let err = actions::post_admin_login(&agent, &cancel, "1", 123456, "password")
            .await
            .unwrap_err();
        assert!(err.is_timeout());

        let result = ValidationResult::from_request_error(&err, ErrorCode::ScenarioInvalidRequest, &cancel);
        assert!(!cancel.is_cancelled());
        assert!(result.is_canceled());
        assert!(!result.is_empty());
        assert!(result.leaves().is_empty());
    }

    #[test]
    fn test_assert_helpers() {
        let hint = Hint::new("GET /user/1/home", "now");
        assert!(assert_equal(5, 5, &hint).is_ok());
        let err = assert_equal(5, 6, &hint).unwrap_err();
        assert_eq!(
            err.message(),
            "GET /user/1/home: body now mismatch : expected(5) != actual(6)"
        );

        let err = assert_status(200, 404, &hint).unwrap_err();
        assert_eq!(err.codes(), &[ErrorCode::ValidationInvalidStatusCode]);
    }
}
