//! Delivery rules layered over the generic read policy.
//!
//! Deposit licenses can be hidden from everyone but administrators, and the
//! content of withdrawn or unarchived items is administrator-only. Everything
//! else falls through to the Casbin policy, checked on the object itself and
//! then on its parent item.

use vellum_db::model::bitstream::BitstreamRecord;
use vellum_db::model::item::{Item, ItemRecord};

use crate::error::{ServiceError, ServiceResult};

use super::{Action, Authorizer, ExpandedSubjects, ResourcePath};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    /// No subject holds the permission.
    Policy,
    /// License display is disabled and the actor is not an administrator.
    LicenseRestricted,
    /// The owning item is withdrawn or not yet archived.
    ItemUnavailable,
}

impl std::fmt::Display for DenialReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Policy => "policy",
            Self::LicenseRestricted => "license restricted",
            Self::ItemUnavailable => "item unavailable",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allowed,
    Denied(DenialReason),
}

impl AccessDecision {
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allowed)
    }

    /// ## Errors
    /// Returns `AuthorizationDenied` naming the resource and reason when denied.
    pub fn require(self, resource: &ResourcePath) -> ServiceResult<()> {
        match self {
            Self::Allowed => Ok(()),
            Self::Denied(reason) => Err(ServiceError::AuthorizationDenied(format!(
                "{resource} ({reason})"
            ))),
        }
    }
}

pub struct AuthorizationGate {
    authorizer: Authorizer,
    show_license_bitstreams: bool,
}

impl AuthorizationGate {
    #[must_use]
    pub const fn new(authorizer: Authorizer, show_license_bitstreams: bool) -> Self {
        Self {
            authorizer,
            show_license_bitstreams,
        }
    }

    /// ## Errors
    /// Returns `CasbinError` if policy evaluation fails.
    pub fn is_admin(&self, subjects: &ExpandedSubjects) -> ServiceResult<bool> {
        self.authorizer.is_admin(subjects)
    }

    /// ## Summary
    /// Generic policy check on a single resource.
    ///
    /// ## Errors
    /// Returns `CasbinError` if policy evaluation fails.
    pub fn authorize(
        &self,
        subjects: &ExpandedSubjects,
        resource: &ResourcePath,
        action: Action,
    ) -> ServiceResult<AccessDecision> {
        Ok(
            if self.authorizer.check(subjects, resource, action)? {
                AccessDecision::Allowed
            } else {
                AccessDecision::Denied(DenialReason::Policy)
            },
        )
    }

    /// ## Summary
    /// Decides whether the actor may read an item's metadata page.
    ///
    /// ## Errors
    /// Returns `CasbinError` if policy evaluation fails.
    #[tracing::instrument(skip(self, subjects, item), fields(item_id = %item.id))]
    pub fn authorize_item(
        &self,
        subjects: &ExpandedSubjects,
        item: &Item,
    ) -> ServiceResult<AccessDecision> {
        if !item.is_discoverable() && !self.is_admin(subjects)? {
            return Ok(AccessDecision::Denied(DenialReason::ItemUnavailable));
        }
        self.authorize(subjects, &ResourcePath::item(item.id), Action::Read)
    }

    /// ## Summary
    /// Decides whether the actor may read a bitstream's content.
    ///
    /// ## Errors
    /// Returns `CasbinError` if policy evaluation fails.
    #[tracing::instrument(skip(self, subjects, record), fields(bitstream_id = %record.bitstream.id))]
    pub fn authorize_bitstream(
        &self,
        subjects: &ExpandedSubjects,
        record: &BitstreamRecord,
    ) -> ServiceResult<AccessDecision> {
        let admin_only = if !record.item.is_discoverable() {
            Some(DenialReason::ItemUnavailable)
        } else if record.is_license() && !self.show_license_bitstreams {
            Some(DenialReason::LicenseRestricted)
        } else {
            None
        };

        if let Some(reason) = admin_only {
            let decision = if self.is_admin(subjects)? {
                AccessDecision::Allowed
            } else {
                AccessDecision::Denied(reason)
            };
            tracing::debug!(?decision, "Administrator-only bitstream");
            return Ok(decision);
        }

        let own = self.authorize(
            subjects,
            &ResourcePath::bitstream(record.bitstream.id),
            Action::Read,
        )?;
        if own.is_allowed() {
            return Ok(own);
        }
        self.authorize(subjects, &ResourcePath::item(record.item.id), Action::Read)
    }
}


/// Decides which items a listing may show.
///
/// Listings apply it before counting or paging so totals never include
/// items the actor cannot read.
pub trait ItemVisibility: Send + Sync {
    /// ## Errors
    /// Returns `CasbinError` if policy evaluation fails.
    fn is_visible(&self, item: &Item) -> ServiceResult<bool>;

    /// ## Errors
    /// Returns `CasbinError` if policy evaluation fails.
    fn retain_visible(&self, records: Vec<ItemRecord>) -> ServiceResult<Vec<ItemRecord>> {
        let mut visible = Vec::with_capacity(records.len());
        for record in records {
            if self.is_visible(&record.item)? {
                visible.push(record);
            }
        }
        Ok(visible)
    }
}

/// The gate as seen by one actor.
pub struct ActorView<'a> {
    gate: &'a AuthorizationGate,
    subjects: &'a ExpandedSubjects,
}

impl AuthorizationGate {
    #[must_use]
    pub const fn view<'a>(&'a self, subjects: &'a ExpandedSubjects) -> ActorView<'a> {
        ActorView { gate: self, subjects }
    }
}

impl ItemVisibility for ActorView<'_> {
    fn is_visible(&self, item: &Item) -> ServiceResult<bool> {
        Ok(self.gate.authorize_item(self.subjects, item)?.is_allowed())
    }
}

/// Shows every item.
#[cfg(test)]
pub(crate) struct Unrestricted;

#[cfg(test)]
impl ItemVisibility for Unrestricted {
    fn is_visible(&self, _item: &Item) -> ServiceResult<bool> {
        Ok(true)
    }
}
