//! Core engine types for isubench
//!
//! This crate holds the pieces every scenario leans on: the actor registry,
//! the shadow model of server state, the structural diff oracle, the
//! response validation pipeline, and the error classifier with its scoring
//! table. Nothing in here schedules work; that lives in `isubench-execution`.

pub mod actor;
pub mod diff;
pub mod error;
pub mod score;
pub mod shadow;
pub mod sink;
pub mod validation;

pub use actor::{
    read_fixtures, Actor, AdminIdentity, AdminUser, Identified, LightSet, LightSetGuard, Platform, Set, SetError,
    User,
};
pub use diff::{diff, Diffable, FieldValue};
pub use error::{Category, ErrorCode, Failure, FailureResult};
pub use score::{ScoreBoard, ScoreSummary, ScoreTag, TagCount};
pub use shadow::ValidationUser;
pub use sink::{ErrorSink, Phase};
pub use validation::{
    assert_equal, assert_status, parse_json_body, validate_response, with_initialization_success,
    with_status_code, Hint, ValidationResult,
};
