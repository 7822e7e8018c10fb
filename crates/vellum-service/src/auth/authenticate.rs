//! Request authentication.
//!
//! A request that carries no credentials for the configured method is
//! anonymous. Credentials that are present but wrong fail with
//! `NotAuthenticated`.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use vellum_core::config::{AuthMethod, Settings};
use vellum_db::model::eperson::EPerson;
use vellum_db::store::RepositoryStore;

use crate::error::{ServiceError, ServiceResult};

use super::depot::{AuthenticatedUser, DepotUser};
use super::password::verify_password;

fn header_str<'a>(req: &'a salvo::Request, name: &str) -> Option<&'a str> {
    req.headers().get(name).and_then(|v| v.to_str().ok())
}

/// Stable id for an e-person known only from configuration or a trusted header.
fn synthetic_id(email: &str) -> uuid::Uuid {
    uuid::Uuid::new_v5(&uuid::Uuid::NAMESPACE_OID, email.to_lowercase().as_bytes())
}

/// ## Summary
/// Builds the request user from a stored e-person, adding its stored group
/// memberships to `extra_groups`.
///
/// ## Errors
/// Returns store errors if the membership lookup fails.
async fn user_from_eperson(
    store: &dyn RepositoryStore,
    eperson: EPerson,
    extra_groups: Vec<uuid::Uuid>,
) -> ServiceResult<AuthenticatedUser> {
    let mut group_ids: Vec<uuid::Uuid> = store
        .eperson_groups(eperson.id)
        .await?
        .into_iter()
        .map(|g| g.id)
        .collect();
    for group in extra_groups {
        if !group_ids.contains(&group) {
            group_ids.push(group);
        }
    }

    Ok(AuthenticatedUser {
        id: eperson.id,
        email: eperson.email,
        name: eperson.name,
        group_ids,
    })
}

#[tracing::instrument(skip(store, config))]
async fn authenticate_single_user(
    store: &dyn RepositoryStore,
    config: &Settings,
) -> ServiceResult<DepotUser> {
    let single_user = config.auth.single_user.as_ref().ok_or_else(|| {
        ServiceError::InvalidConfiguration("Single user config is missing".to_string())
    })?;

    let user = if let Some(eperson) = store.eperson_by_email(&single_user.email).await? {
        tracing::debug!(eperson_id = %eperson.id, "Single user found in store");
        user_from_eperson(store, eperson, single_user.groups.clone()).await?
    } else {
        AuthenticatedUser {
            id: synthetic_id(&single_user.email),
            email: single_user.email.to_lowercase(),
            name: single_user.name.clone(),
            group_ids: single_user.groups.clone(),
        }
    };

    Ok(DepotUser::User(user))
}

/// ## Summary
/// Splits an `Authorization: Basic` header into e-mail and password.
///
/// Returns `Ok(None)` when the header is absent or uses another scheme.
///
/// ## Errors
/// Returns `NotAuthenticated` if the credentials are not valid base64 `user:password`.
fn basic_credentials(req: &salvo::Request) -> ServiceResult<Option<(String, String)>> {
    let Some(header) = header_str(req, "authorization") else {
        return Ok(None);
    };
    let Some(encoded) = header
        .split_once(' ')
        .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("basic"))
        .map(|(_, rest)| rest.trim())
    else {
        return Ok(None);
    };

    let decoded = STANDARD
        .decode(encoded)
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .ok_or(ServiceError::NotAuthenticated)?;
    let (email, password) = decoded
        .split_once(':')
        .ok_or(ServiceError::NotAuthenticated)?;

    Ok(Some((email.to_string(), password.to_string())))
}

#[tracing::instrument(skip(req, store))]
async fn authenticate_basic(
    req: &salvo::Request,
    store: &dyn RepositoryStore,
) -> ServiceResult<DepotUser> {
    let Some((email, password)) = basic_credentials(req)? else {
        return Ok(DepotUser::Public);
    };

    let eperson = store
        .eperson_by_email(&email)
        .await?
        .filter(|e| e.can_log_in)
        .ok_or(ServiceError::NotAuthenticated)?;
    let hash = eperson
        .password_hash
        .as_deref()
        .ok_or(ServiceError::NotAuthenticated)?;
    verify_password(&password, hash)?;

    Ok(DepotUser::User(user_from_eperson(store, eperson, Vec::new()).await?))
}

/// Trusts `user_header` and, when configured, `groups_header` as set by the
/// fronting proxy. The proxy must remove client-supplied copies of both; a
/// forged groups header would grant its groups, administrator included.
#[tracing::instrument(skip(req, store, config))]
async fn authenticate_proxy(
    req: &salvo::Request,
    store: &dyn RepositoryStore,
    config: &Settings,
) -> ServiceResult<DepotUser> {
    let proxy = config.auth.proxy.as_ref().ok_or_else(|| {
        ServiceError::InvalidConfiguration("Proxy auth config is missing".to_string())
    })?;

    let Some(email) = header_str(req, &proxy.user_header)
        .map(str::trim)
        .filter(|e| !e.is_empty())
    else {
        return Ok(DepotUser::Public);
    };

    let header_groups: Vec<uuid::Uuid> = proxy
        .groups_header
        .as_deref()
        .and_then(|name| header_str(req, name))
        .map(|value| {
            value
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .filter_map(|s| {
                    uuid::Uuid::parse_str(s)
                        .inspect_err(|_| tracing::warn!(group = %s, "Ignoring malformed group id"))
                        .ok()
                })
                .collect()
        })
        .unwrap_or_default();

    let user = if let Some(eperson) = store.eperson_by_email(email).await? {
        user_from_eperson(store, eperson, header_groups).await?
    } else {
        AuthenticatedUser {
            id: synthetic_id(email),
            email: email.to_lowercase(),
            name: email.to_string(),
            group_ids: header_groups,
        }
    };

    Ok(DepotUser::User(user))
}

/// ## Summary
/// Authenticate a request based on the configured authentication method.
///
/// ## Errors
/// Returns `NotAuthenticated` for rejected credentials, `InvalidConfiguration`
/// if the method's settings are missing, and store errors from lookups.
#[tracing::instrument(skip(req, store, config))]
pub async fn authenticate(
    req: &salvo::Request,
    store: &dyn RepositoryStore,
    config: &Settings,
) -> ServiceResult<DepotUser> {
    tracing::trace!(auth_method = ?config.auth.method, "Authenticating request");

    match config.auth.method {
        AuthMethod::Anonymous => Ok(DepotUser::Public),
        AuthMethod::SingleUser => authenticate_single_user(store, config).await,
        AuthMethod::BasicAuth => authenticate_basic(req, store).await,
        AuthMethod::Proxy => authenticate_proxy(req, store, config).await,
    }
}
