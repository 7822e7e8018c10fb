//! Authentication and authorization flow.
//!
//! ## Module Organization
//!
//! - `action`: Actions checked against Casbin (`read`, `admin`)
//! - `authenticate`: Request authentication (anonymous, single user, basic, proxy)
//! - `casbin`: Casbin enforcer initialization and depot integration
//! - `depot`: Helpers for storing and reading the authenticated user in the depot
//! - `gate`: Delivery-specific authorization rules on top of the generic policy
//! - `password`: Password hashing and verification with Argon2
//! - `resource`: Resource paths for authorization
//! - `service`: Casbin enforcement over expanded subjects (`Authorizer`)
//! - `subject`: Subject types and principal expansion

pub mod action;
pub mod authenticate;
pub mod casbin;
pub mod depot;
pub mod gate;
pub mod password;
pub mod resource;
pub mod service;
pub mod subject;

pub use action::Action;
pub use depot::{AuthenticatedUser, DepotUser, get_subjects_from_depot, get_user_from_depot};
pub use gate::{AccessDecision, ActorView, AuthorizationGate, DenialReason, ItemVisibility};
pub use resource::ResourcePath;
pub use service::{Authorizer, authorizer_from_depot};
pub use subject::{ExpandedSubjects, Subject};
