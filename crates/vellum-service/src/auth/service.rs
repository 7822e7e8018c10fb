//! Casbin enforcement over an actor's expanded subjects.

use std::sync::Arc;

use casbin::CoreApi;

use crate::error::{ServiceError, ServiceResult};

use super::{action::Action, resource::ResourcePath, subject::ExpandedSubjects};

#[derive(Clone)]
pub struct Authorizer {
    enforcer: Arc<casbin::Enforcer>,
}

impl Authorizer {
    #[must_use]
    pub const fn new(enforcer: Arc<casbin::Enforcer>) -> Self {
        Self { enforcer }
    }

    /// Returns `true` as soon as one subject holds `action` on `resource`.
    ///
    /// ## Errors
    /// Returns `CasbinError` if Casbin evaluation fails.
    pub fn check(
        &self,
        subjects: &ExpandedSubjects,
        resource: &ResourcePath,
        action: Action,
    ) -> ServiceResult<bool> {
        let path = resource.to_resource_path();
        let act = action.as_casbin_action();

        for subject in subjects.as_slice() {
            let sub = subject.casbin_subject();
            let allowed = self
                .enforcer
                .enforce((&sub, &path, act))
                .map_err(ServiceError::CasbinError)?;
            tracing::trace!(subject = %sub, path = %path, action = %act, allowed, "Subject checked");

            if allowed {
                return Ok(true);
            }
        }

        tracing::debug!(path = %path, action = %act, "No subject holds the permission");
        Ok(false)
    }

    /// Administrators hold `admin` on the site.
    ///
    /// ## Errors
    /// Returns `CasbinError` if Casbin evaluation fails.
    pub fn is_admin(&self, subjects: &ExpandedSubjects) -> ServiceResult<bool> {
        self.check(subjects, &ResourcePath::site(), Action::Admin)
    }
}

/// ## Errors
/// Returns `InvariantViolation` if the Casbin enforcer is not in the depot.
pub fn authorizer_from_depot(depot: &salvo::Depot) -> ServiceResult<Authorizer> {
    super::casbin::get_enforcer_from_depot(depot).map(Authorizer::new)
}
