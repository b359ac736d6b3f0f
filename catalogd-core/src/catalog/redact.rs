//! Masking of secret-bearing catalog properties
//!
//! Redaction is a projection: it always produces a fresh map and never
//! touches the stored definition.

use super::types::Properties;

/// Default key suffix that marks a property as a credential
pub const DEFAULT_SECRET_SUFFIX: &str = "-password";

/// Default replacement for masked values
pub const DEFAULT_MASK: &str = "**********";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redactor {
    suffix: String,
    mask: String,
}

impl Default for Redactor {
    fn default() -> Self {
        Self::new(DEFAULT_SECRET_SUFFIX, DEFAULT_MASK)
    }
}

impl Redactor {
    pub fn new(suffix: impl Into<String>, mask: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
            mask: mask.into(),
        }
    }

    pub fn is_secret(&self, key: &str) -> bool {
        key.ends_with(&self.suffix)
    }

    /// Copy `properties`, masking every value whose key denotes a secret
    pub fn redact(&self, properties: &Properties) -> Properties {
        properties
            .iter()
            .map(|(key, value)| {
                let value = if self.is_secret(key) {
                    self.mask.clone()
                } else {
                    value.clone()
                };
                (key.clone(), value)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn props(pairs: &[(&str, &str)]) -> Properties {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn masks_only_secret_suffix() {
        let input = props(&[
            ("connection-url", "jdbc:mysql://db:3306"),
            ("connection-user", "admin"),
            ("connection-password", "hunter2"),
            ("password-file", "/etc/secret"),
        ]);

        let redacted = Redactor::default().redact(&input);

        assert_eq!(
            redacted,
            props(&[
                ("connection-url", "jdbc:mysql://db:3306"),
                ("connection-user", "admin"),
                ("connection-password", DEFAULT_MASK),
                ("password-file", "/etc/secret"),
            ])
        );
    }

    #[test]
    fn input_is_left_untouched() {
        let input = props(&[("db-password", "secret")]);
        let redactor = Redactor::default();

        let first = redactor.redact(&input);
        let second = redactor.redact(&input);

        assert_eq!(first, second);
        assert_eq!(input.get("db-password").map(String::as_str), Some("secret"));
    }

    #[test]
    fn custom_suffix_and_mask() {
        let redactor = Redactor::new(".secret", "<hidden>");
        let out = redactor.redact(&props(&[("s3.secret", "abc"), ("db-password", "x")]));
        assert_eq!(out.get("s3.secret").map(String::as_str), Some("<hidden>"));
        assert_eq!(out.get("db-password").map(String::as_str), Some("x"));
    }

    #[test]
    fn empty_map_redacts_to_empty() {
        assert!(Redactor::default().redact(&Properties::new()).is_empty());
    }
}
