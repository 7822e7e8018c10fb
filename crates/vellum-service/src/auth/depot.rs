//! Depot helpers for the authenticated user.

use serde::Serialize;

use crate::error::{ServiceError, ServiceResult};

use super::subject::ExpandedSubjects;

pub mod depot_keys {
    pub const AUTHENTICATED_PRINCIPAL: &str = "__authenticated_principal";
}

/// An e-person resolved for the current request, with its group memberships.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticatedUser {
    pub id: uuid::Uuid,
    pub email: String,
    pub name: String,
    pub group_ids: Vec<uuid::Uuid>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DepotUser {
    User(AuthenticatedUser),
    Public,
}

pub fn set_user_in_depot(depot: &mut salvo::Depot, user: DepotUser) {
    depot.insert(depot_keys::AUTHENTICATED_PRINCIPAL, user);
}

/// Get the authenticated user from the depot.
///
/// ## Errors
///
/// Returns `NotAuthenticated` if no user is found in the depot or if the user is public.
pub fn get_user_from_depot(depot: &salvo::Depot) -> ServiceResult<&AuthenticatedUser> {
    let depot_user = depot
        .get::<DepotUser>(depot_keys::AUTHENTICATED_PRINCIPAL)
        .map_err(|_e| ServiceError::NotAuthenticated)?;

    match depot_user {
        DepotUser::User(user) => Ok(user),
        DepotUser::Public => Err(ServiceError::NotAuthenticated),
    }
}

/// Get expanded subjects from the depot.
///
/// A missing user context is treated as an anonymous request.
#[must_use]
pub fn get_subjects_from_depot(depot: &salvo::Depot) -> ExpandedSubjects {
    match depot.get::<DepotUser>(depot_keys::AUTHENTICATED_PRINCIPAL) {
        Ok(DepotUser::User(user)) => ExpandedSubjects::from_user(user),
        Ok(DepotUser::Public) => ExpandedSubjects::unauthenticated_only(),
        Err(_missing) => {
            tracing::warn!("Depot missing user context; defaulting to public subjects");
            ExpandedSubjects::unauthenticated_only()
        }
    }
}
