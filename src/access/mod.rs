//! Tenant-isolation access control for OSS-backed assets.
//!
//! Pure decision logic only: nothing in this module performs I/O or holds
//! mutable state.  Every function returns a tagged decision value rather
//! than an error, so the HTTP layer owns the single mapping from decision
//! to status code.

pub mod classify;
pub mod pathgen;
pub mod resolve;
pub mod unified;
pub mod validator;

pub use classify::{classify, is_valid_tenant_id, PathClass, ROOT_NAMESPACE, TENANT_SEGMENT};
pub use pathgen::{photo_asset_path, tenant_asset_path, InvalidTenantId, PhotoCategory};
pub use resolve::{BucketId, BucketResolver};
pub use unified::{UnifiedDecision, UnifiedValidator};
pub use validator::{AccessDecision, AccessType, BucketValidator, DenyReason};
