//! Error codes, categories and the failure type carried through scenarios

use std::fmt;
use thiserror::Error;

/// Hierarchical error codes; the prefix decides the category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    InitializeFailedToLoadJson,
    InitializeFailed,
    InitializeInvalidRequest,

    ScenarioStatusCode,
    ScenarioInvalidRequest,
    ScenarioInvalidJson,
    ScenarioInvalidResponse,

    ValidationFailedToLoadJson,
    ValidationInvalidRequest,
    ValidationInvalidStatusCode,
    ValidationInvalidResponseBody,

    InternalCreatingAgent,
    InternalCannotRefreshMaster,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InitializeFailedToLoadJson => "initialize-error-failed-to-load-json",
            ErrorCode::InitializeFailed => "initialize-error-failed",
            ErrorCode::InitializeInvalidRequest => "initialize-error-invalid-req",
            ErrorCode::ScenarioStatusCode => "scenario-error-status-code",
            ErrorCode::ScenarioInvalidRequest => "scenario-error-invalid-request",
            ErrorCode::ScenarioInvalidJson => "scenario-error-invalid-json",
            ErrorCode::ScenarioInvalidResponse => "scenario-error-invalid-response",
            ErrorCode::ValidationFailedToLoadJson => "validation-error-failed-to-load-json",
            ErrorCode::ValidationInvalidRequest => "validation-error-invalid-request",
            ErrorCode::ValidationInvalidStatusCode => "validation-error-invalid-status-code",
            ErrorCode::ValidationInvalidResponseBody => "validation-error-invalid-response-body",
            ErrorCode::InternalCreatingAgent => "internal-error-creating-agent",
            ErrorCode::InternalCannotRefreshMaster => "internal-error-cannot-refresh-master",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Bucket an error lands in when the run is judged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Initialize,
    Scenario,
    Validation,
    Internal,
    Unexpected,
}

impl Category {
    const PREFIXES: [(&'static str, Category); 4] = [
        ("initialize-", Category::Initialize),
        ("scenario-", Category::Scenario),
        ("validation-", Category::Validation),
        ("internal-", Category::Internal),
    ];

    /// Category of a single code string, `None` when no prefix matches
    pub fn of_code(code: &str) -> Option<Category> {
        Self::PREFIXES
            .iter()
            .find(|(prefix, _)| code.starts_with(prefix))
            .map(|(_, category)| *category)
    }

    /// Category of a set of attached codes; the last matching code wins
    pub fn classify<'a>(codes: impl IntoIterator<Item = &'a str>) -> Category {
        codes
            .into_iter()
            .filter_map(Category::of_code)
            .last()
            .unwrap_or(Category::Unexpected)
    }

    /// Every category except scenario fails the run outright
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Category::Scenario)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Initialize => "initialize",
            Category::Scenario => "scenario",
            Category::Validation => "validation",
            Category::Internal => "internal",
            Category::Unexpected => "unexpected",
        }
    }
}

/// An error raised by a validator, action wrapper or phase of the run
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct Failure {
    codes: Vec<ErrorCode>,
    message: String,
}

pub type FailureResult<T> = std::result::Result<T, Failure>;

impl Failure {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            codes: vec![code],
            message: message.into(),
        }
    }

    /// A failure with no code attached; classified as unexpected
    pub fn uncoded(message: impl Into<String>) -> Self {
        Self {
            codes: Vec::new(),
            message: message.into(),
        }
    }

    /// Attach another code, which takes precedence during classification
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.codes.push(code);
        self
    }

    pub fn codes(&self) -> &[ErrorCode] {
        &self.codes
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn category(&self) -> Category {
        Category::classify(self.codes.iter().map(|c| c.as_str()))
    }

    pub fn is_fatal(&self) -> bool {
        self.category().is_fatal()
    }

    /// `code: message`, as shown in the error listing
    pub fn describe(&self) -> String {
        match self.codes.last() {
            Some(code) => format!("{}: {}", code, self.message),
            None => self.message.clone(),
        }
    }
}
