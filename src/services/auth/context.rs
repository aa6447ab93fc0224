/*
 * Responsibility
 * - Principal → AuthzContext (subject + granted authorities)
 * - pure transformation: no I/O, deterministic for identical input
 *
 * Notes
 * - The middleware stores the result in request extensions; handlers read it via `CurrentUser`.
 * - A context is either fully populated or not built at all.
 */
use std::collections::BTreeSet;

use thiserror::Error;

use crate::services::auth::principal::Principal;

pub const ROLE_PREFIX: &str = "ROLE_";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    #[error("principal has an empty username")]
    EmptySubject,
    #[error("principal '{0}' carries no roles or permissions")]
    NoAuthorities(String),
}

/// Per-request authorization context.
///
/// - `subject` is always the principal's username (never its id or email)
/// - roles are granted as `ROLE_<name>`, permissions verbatim
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthzContext {
    subject: String,
    authorities: BTreeSet<String>,
}

impl AuthzContext {
    pub fn from_principal(principal: &Principal) -> Result<Self, ContextError> {
        if principal.username.trim().is_empty() {
            return Err(ContextError::EmptySubject);
        }

        let mut authorities: BTreeSet<String> = principal
            .roles
            .iter()
            .map(|role| format!("{ROLE_PREFIX}{role}"))
            .collect();

        if let Some(permissions) = &principal.permissions {
            authorities.extend(permissions.iter().cloned());
        }

        if authorities.is_empty() {
            return Err(ContextError::NoAuthorities(principal.username.clone()));
        }

        Ok(Self {
            subject: principal.username.clone(),
            authorities,
        })
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn authorities(&self) -> &BTreeSet<String> {
        &self.authorities
    }

    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.contains(authority)
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.authorities.contains(&format!("{ROLE_PREFIX}{role}"))
    }

    pub fn has_any_authority<'a>(&self, required: impl IntoIterator<Item = &'a String>) -> bool {
        required.into_iter().any(|a| self.authorities.contains(a))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(username: &str, roles: &[&str], permissions: Option<&[&str]>) -> Principal {
        Principal {
            id: 42,
            username: username.to_string(),
            email: Some(format!("{username}@example.com")),
            first_name: None,
            last_name: None,
            roles: roles.iter().map(|r| r.to_string()).collect(),
            permissions: permissions.map(|p| p.iter().map(|s| s.to_string()).collect()),
        }
    }

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn admin_role_becomes_prefixed_authority() {
        let ctx = AuthzContext::from_principal(&principal("alice", &["ADMIN"], None)).unwrap();

        assert_eq!(ctx.subject(), "alice");
        assert_eq!(ctx.authorities(), &set(&["ROLE_ADMIN"]));
        assert!(ctx.has_role("ADMIN"));
        assert!(!ctx.has_authority("ADMIN"));
    }

    #[test]
    fn permissions_are_carried_unprefixed() {
        let ctx = AuthzContext::from_principal(&principal(
            "bob",
            &["MANAGER"],
            Some(&["READ_MATERIAL"]),
        ))
        .unwrap();

        assert_eq!(ctx.authorities(), &set(&["ROLE_MANAGER", "READ_MATERIAL"]));
    }

    #[test]
    fn subject_is_username_not_email_or_id() {
        let ctx = AuthzContext::from_principal(&principal("carol", &["USER"], None)).unwrap();
        assert_eq!(ctx.subject(), "carol");
    }

    #[test]
    fn empty_permission_list_adds_nothing() {
        let ctx = AuthzContext::from_principal(&principal("dave", &["USER"], Some(&[]))).unwrap();
        assert_eq!(ctx.authorities(), &set(&["ROLE_USER"]));
    }

    #[test]
    fn partial_contexts_are_refused() {
        assert_eq!(
            AuthzContext::from_principal(&principal("  ", &["ADMIN"], None)),
            Err(ContextError::EmptySubject)
        );
        assert_eq!(
            AuthzContext::from_principal(&principal("erin", &[], None)),
            Err(ContextError::NoAuthorities("erin".into()))
        );
    }

    #[test]
    fn any_authority_matches_one_of_many() {
        let ctx = AuthzContext::from_principal(&principal("frank", &["MANAGER"], None)).unwrap();
        let required = set(&["ROLE_ADMIN", "ROLE_MANAGER"]);
        assert!(ctx.has_any_authority(&required));
        assert!(!ctx.has_any_authority(&set(&["ROLE_ADMIN"])));
    }
}
