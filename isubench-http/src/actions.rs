//! One function per target endpoint
//!
//! Actions only build and send requests. Interpreting the response is the
//! job of the validators in `isubench-core`.

use crate::agent::{Agent, Captured};
use crate::errors::HttpError;
use crate::headers::{with_isu_date, with_json_content, with_master_version, with_session};
use crate::types::HttpMethod;
use chrono::{DateTime, Utc};
use isubench_api_types::{
    AddExpItem, AddExpRequest, AdminLoginRequest, CreateUserRequest, DrawGachaRequest, LoginRequest,
    ReceivePresentRequest, RewardRequest, SetDeckRequest,
};
use reqwest::multipart::{Form, Part};
use reqwest::RequestBuilder;
use std::path::Path;
use tokio_util::sync::CancellationToken;

/// Session produced by a login or registration, threaded through the rest of a flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Login {
    pub session_id: String,
    pub viewer_id: String,
}

/// Master version and effective date a request is made under
#[derive(Debug, Clone, Copy)]
pub struct Stamp<'a> {
    pub master_version: &'a str,
    /// `None` means the wall-clock time at send
    pub isu_date: Option<DateTime<Utc>>,
}

impl<'a> Stamp<'a> {
    pub fn new(master_version: &'a str, isu_date: DateTime<Utc>) -> Self {
        Self {
            master_version,
            isu_date: Some(isu_date),
        }
    }

    pub fn now(master_version: &'a str) -> Self {
        Self {
            master_version,
            isu_date: None,
        }
    }
}

fn stamped(builder: RequestBuilder, stamp: Stamp<'_>) -> RequestBuilder {
    let builder = with_master_version(builder, stamp.master_version);
    let builder = with_isu_date(builder, stamp.master_version, stamp.isu_date);
    with_json_content(builder)
}

fn user_request(
    agent: &Agent,
    method: HttpMethod,
    path: &str,
    stamp: Stamp<'_>,
    login: &Login,
) -> Result<RequestBuilder, HttpError> {
    let builder = agent.request(method, path)?;
    Ok(with_session(stamped(builder, stamp), &login.session_id))
}

fn admin_request(
    agent: &Agent,
    method: HttpMethod,
    path: &str,
    session_id: &str,
    master_version: &str,
) -> Result<RequestBuilder, HttpError> {
    let builder = agent.request(method, path)?;
    let builder = with_session(with_master_version(builder, master_version), session_id);
    Ok(with_json_content(builder))
}

/// `POST /initialize`
pub async fn post_initialize(agent: &Agent, cancel: &CancellationToken) -> Result<Captured, HttpError> {
    let path = "/initialize";
    let builder = with_json_content(agent.request(HttpMethod::Post, path)?);
    agent.send(cancel, HttpMethod::Post, path, builder).await
}

/// `POST /login`
pub async fn post_login(
    agent: &Agent,
    cancel: &CancellationToken,
    stamp: Stamp<'_>,
    user_id: i64,
    viewer_id: &str,
) -> Result<Captured, HttpError> {
    let path = "/login";
    let body = LoginRequest {
        user_id,
        viewer_id: viewer_id.to_string(),
    };
    let builder = stamped(agent.request(HttpMethod::Post, path)?, stamp).json(&body);
    agent.send(cancel, HttpMethod::Post, path, builder).await
}

/// `POST /user`; the platform id doubles as the new user's viewer id
pub async fn post_user(
    agent: &Agent,
    cancel: &CancellationToken,
    stamp: Stamp<'_>,
    platform_id: i64,
    platform_type: i64,
) -> Result<Captured, HttpError> {
    let path = "/user";
    let body = CreateUserRequest {
        viewer_id: platform_id.to_string(),
        platform_type,
    };
    let builder = stamped(agent.request(HttpMethod::Post, path)?, stamp).json(&body);
    agent.send(cancel, HttpMethod::Post, path, builder).await
}

/// `GET /user/{id}/home`
pub async fn get_home(
    agent: &Agent,
    cancel: &CancellationToken,
    stamp: Stamp<'_>,
    user_id: i64,
    login: &Login,
) -> Result<Captured, HttpError> {
    let path = format!("/user/{}/home", user_id);
    let builder = user_request(agent, HttpMethod::Get, &path, stamp, login)?;
    agent.send(cancel, HttpMethod::Get, &path, builder).await
}

/// `POST /user/{id}/reward`
pub async fn post_reward(
    agent: &Agent,
    cancel: &CancellationToken,
    stamp: Stamp<'_>,
    user_id: i64,
    login: &Login,
) -> Result<Captured, HttpError> {
    let path = format!("/user/{}/reward", user_id);
    let body = RewardRequest {
        viewer_id: login.viewer_id.clone(),
    };
    let builder = user_request(agent, HttpMethod::Post, &path, stamp, login)?.json(&body);
    agent.send(cancel, HttpMethod::Post, &path, builder).await
}

/// `GET /user/{id}/item`
pub async fn get_item_list(
    agent: &Agent,
    cancel: &CancellationToken,
    stamp: Stamp<'_>,
    user_id: i64,
    login: &Login,
) -> Result<Captured, HttpError> {
    let path = format!("/user/{}/item", user_id);
    let builder = user_request(agent, HttpMethod::Get, &path, stamp, login)?;
    agent.send(cancel, HttpMethod::Get, &path, builder).await
}

/// `POST /user/{id}/card`
pub async fn post_set_deck(
    agent: &Agent,
    cancel: &CancellationToken,
    stamp: Stamp<'_>,
    user_id: i64,
    login: &Login,
    card_ids: Vec<i64>,
) -> Result<Captured, HttpError> {
    let path = format!("/user/{}/card", user_id);
    let body = SetDeckRequest {
        viewer_id: login.viewer_id.clone(),
        card_ids,
    };
    let builder = user_request(agent, HttpMethod::Post, &path, stamp, login)?.json(&body);
    agent.send(cancel, HttpMethod::Post, &path, builder).await
}

/// `POST /user/{id}/card/addexp/{cardId}`
#[allow(clippy::too_many_arguments)]
pub async fn post_add_exp(
    agent: &Agent,
    cancel: &CancellationToken,
    stamp: Stamp<'_>,
    user_id: i64,
    login: &Login,
    card_id: i64,
    one_time_token: &str,
    items: Vec<AddExpItem>,
) -> Result<Captured, HttpError> {
    let path = format!("/user/{}/card/addexp/{}", user_id, card_id);
    let body = AddExpRequest {
        viewer_id: login.viewer_id.clone(),
        one_time_token: one_time_token.to_string(),
        items,
    };
    let builder = user_request(agent, HttpMethod::Post, &path, stamp, login)?.json(&body);
    agent.send(cancel, HttpMethod::Post, &path, builder).await
}

/// `GET /user/{id}/present/index/1`
pub async fn get_present_list(
    agent: &Agent,
    cancel: &CancellationToken,
    stamp: Stamp<'_>,
    user_id: i64,
    login: &Login,
) -> Result<Captured, HttpError> {
    let path = format!("/user/{}/present/index/1", user_id);
    let builder = user_request(agent, HttpMethod::Get, &path, stamp, login)?;
    agent.send(cancel, HttpMethod::Get, &path, builder).await
}

/// `POST /user/{id}/present/receive`
pub async fn post_receive_presents(
    agent: &Agent,
    cancel: &CancellationToken,
    stamp: Stamp<'_>,
    user_id: i64,
    login: &Login,
    present_ids: Vec<i64>,
) -> Result<Captured, HttpError> {
    let path = format!("/user/{}/present/receive", user_id);
    let body = ReceivePresentRequest {
        viewer_id: login.viewer_id.clone(),
        present_ids,
    };
    let builder = user_request(agent, HttpMethod::Post, &path, stamp, login)?.json(&body);
    agent.send(cancel, HttpMethod::Post, &path, builder).await
}

/// `GET /user/{id}/gacha/index`
pub async fn get_gacha_list(
    agent: &Agent,
    cancel: &CancellationToken,
    stamp: Stamp<'_>,
    user_id: i64,
    login: &Login,
) -> Result<Captured, HttpError> {
    let path = format!("/user/{}/gacha/index", user_id);
    let builder = user_request(agent, HttpMethod::Get, &path, stamp, login)?;
    agent.send(cancel, HttpMethod::Get, &path, builder).await
}

/// `POST /user/{id}/gacha/draw/{gachaId}/10`
#[allow(clippy::too_many_arguments)]
pub async fn post_draw_gacha(
    agent: &Agent,
    cancel: &CancellationToken,
    stamp: Stamp<'_>,
    user_id: i64,
    login: &Login,
    gacha_id: i64,
    one_time_token: &str,
) -> Result<Captured, HttpError> {
    let path = format!("/user/{}/gacha/draw/{}/10", user_id, gacha_id);
    let body = DrawGachaRequest {
        viewer_id: login.viewer_id.clone(),
        one_time_token: one_time_token.to_string(),
    };
    let builder = user_request(agent, HttpMethod::Post, &path, stamp, login)?.json(&body);
    agent.send(cancel, HttpMethod::Post, &path, builder).await
}

/// `POST /admin/login`
pub async fn post_admin_login(
    agent: &Agent,
    cancel: &CancellationToken,
    master_version: &str,
    admin_id: i64,
    password: &str,
) -> Result<Captured, HttpError> {
    let path = "/admin/login";
    let body = AdminLoginRequest {
        user_id: admin_id,
        password: password.to_string(),
    };
    let builder = with_json_content(with_master_version(
        agent.request(HttpMethod::Post, path)?,
        master_version,
    ))
    .json(&body);
    agent.send(cancel, HttpMethod::Post, path, builder).await
}

/// `PUT /admin/master` with the version and present-all bundles as multipart parts
pub async fn put_admin_master(
    agent: &Agent,
    cancel: &CancellationToken,
    session_id: &str,
    master_version: &str,
    version_master: &Path,
    present_all_master: &Path,
) -> Result<Captured, HttpError> {
    let path = "/admin/master";
    let form = Form::new()
        .part("versionMaster", file_part(version_master).await?)
        .part("presentAllMaster", file_part(present_all_master).await?);

    // multipart() sets its own content type with the boundary
    let builder = agent.request(HttpMethod::Put, path)?;
    let builder = with_session(with_master_version(builder, master_version), session_id).multipart(form);
    agent.send(cancel, HttpMethod::Put, path, builder).await
}

async fn file_part(path: &Path) -> Result<Part, HttpError> {
    let contents = tokio::fs::read(path).await.map_err(|source| HttpError::UploadFile {
        path: path.display().to_string(),
        source,
    })?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "master.csv".to_string());
    Ok(Part::bytes(contents).file_name(file_name))
}

/// `DELETE /admin/logout`
pub async fn delete_admin_logout(
    agent: &Agent,
    cancel: &CancellationToken,
    session_id: &str,
    master_version: &str,
) -> Result<Captured, HttpError> {
    let path = "/admin/logout";
    let builder = admin_request(agent, HttpMethod::Delete, path, session_id, master_version)?;
    agent.send(cancel, HttpMethod::Delete, path, builder).await
}

/// `POST /admin/user/{id}/ban`
pub async fn post_admin_ban(
    agent: &Agent,
    cancel: &CancellationToken,
    session_id: &str,
    master_version: &str,
    user_id: i64,
) -> Result<Captured, HttpError> {
    let path = format!("/admin/user/{}/ban", user_id);
    let builder = admin_request(agent, HttpMethod::Post, &path, session_id, master_version)?;
    agent.send(cancel, HttpMethod::Post, &path, builder).await
}

/// `GET /admin/master`
pub async fn get_admin_master(
    agent: &Agent,
    cancel: &CancellationToken,
    session_id: &str,
    master_version: &str,
) -> Result<Captured, HttpError> {
    let path = "/admin/master";
    let builder = admin_request(agent, HttpMethod::Get, path, session_id, master_version)?;
    agent.send(cancel, HttpMethod::Get, path, builder).await
}

/// `GET /admin/user/{id}`
pub async fn get_admin_user(
    agent: &Agent,
    cancel: &CancellationToken,
    session_id: &str,
    master_version: &str,
    user_id: i64,
) -> Result<Captured, HttpError> {
    let path = format!("/admin/user/{}", user_id);
    let builder = admin_request(agent, HttpMethod::Get, &path, session_id, master_version)?;
    agent.send(cancel, HttpMethod::Get, &path, builder).await
}
