//! Catalog name checks
//!
//! Names follow the `{space}_{name}` convention so that a tenant's catalogs can
//! be listed by prefix. Only emptiness is always rejected; the full format is
//! checked when the policy is set to enforce it.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{CatalogError, Result};

/// Namespace segment (letter first), underscore, then the catalog segment
static NAME_FORMAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9]*_[A-Za-z0-9_]+$").expect("catalog name pattern is valid")
});

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NamePolicy {
    pub enforce_format: bool,
}

impl NamePolicy {
    pub fn permissive() -> Self {
        Self {
            enforce_format: false,
        }
    }

    pub fn strict() -> Self {
        Self {
            enforce_format: true,
        }
    }

    pub fn check(&self, name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(invalid(name, "catalog name must not be empty"));
        }
        if self.enforce_format && !NAME_FORMAT.is_match(name) {
            return Err(invalid(
                name,
                "expected '{space}_{name}' using letters, digits and '_' without a leading digit",
            ));
        }
        Ok(())
    }
}

fn invalid(name: &str, reason: &str) -> CatalogError {
    CatalogError::InvalidName {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_always_rejected() {
        assert!(NamePolicy::permissive().check("").is_err());
        assert!(NamePolicy::strict().check("").is_err());
    }

    #[test]
    fn permissive_accepts_anything_else() {
        let policy = NamePolicy::permissive();
        for name in ["t1", "1abc", "a.b-c", "teamA_sales"] {
            assert!(policy.check(name).is_ok(), "{name} should pass");
        }
    }

    #[test]
    fn strict_enforces_space_prefix() {
        let policy = NamePolicy::strict();
        for name in ["teamA_sales", "bi_orders_2024", "x_y"] {
            assert!(policy.check(name).is_ok(), "{name} should pass");
        }
        for name in ["t1", "1team_sales", "team-a_sales", "team.a_sales", "_sales", "team_"] {
            let err = policy.check(name).unwrap_err();
            assert!(matches!(err, CatalogError::InvalidName { .. }), "{name} should fail");
        }
    }
}
