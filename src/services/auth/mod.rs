pub mod cached;
pub mod context;
pub mod factory;
pub mod identity;
pub mod principal;

pub use cached::CachedIdentityClient;
pub use context::{AuthzContext, ContextError};
pub use factory::build_identity_client;
pub use identity::{HttpIdentityClient, IdentityClient, IdentityClientError};
pub use principal::{BearerToken, InvalidReason, Principal, ValidationOutcome};
