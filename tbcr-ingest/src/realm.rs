//! Realm allow-list policy
//!
//! Which realms the service accepts is external configuration; the import
//! pipeline only asks the policy and propagates a rejection.

use std::collections::HashSet;
use tbcr_common::config::ImportConfig;
use tracing::warn;

/// Decides whether characters from a realm may be imported
pub trait RealmPolicy: Send + Sync {
    fn is_allowed(&self, realm: &str) -> bool;
}

/// Configured allow-list, compared trimmed and case-insensitively
#[derive(Debug, Clone)]
pub struct RealmAllowList {
    /// `None` accepts every realm
    realms: Option<HashSet<String>>,
}

fn realm_key(realm: &str) -> String {
    realm.trim().to_lowercase()
}

impl RealmAllowList {
    /// Accept only the listed realms (an empty list accepts none)
    pub fn new<I, S>(realms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            realms: Some(realms.into_iter().map(|r| realm_key(r.as_ref())).collect()),
        }
    }

    /// Accept every realm
    pub fn allow_any() -> Self {
        Self { realms: None }
    }

    /// Build from the `[import]` config section
    pub fn from_config(config: &ImportConfig) -> Self {
        match &config.allowed_realms {
            Some(realms) => Self::new(realms),
            None => {
                warn!("No realm allow-list configured; accepting imports from every realm");
                Self::allow_any()
            }
        }
    }
}

impl RealmPolicy for RealmAllowList {
    fn is_allowed(&self, realm: &str) -> bool {
        match &self.realms {
            Some(realms) => realms.contains(&realm_key(realm)),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listed_realms_case_insensitive() {
        let policy = RealmAllowList::new(["Everlook", " Venoxis "]);
        assert!(policy.is_allowed("Everlook"));
        assert!(policy.is_allowed("everlook"));
        assert!(policy.is_allowed("VENOXIS "));
        assert!(!policy.is_allowed("Lakeshire"));
    }

    #[test]
    fn test_empty_list_rejects_all() {
        let policy = RealmAllowList::new(Vec::<String>::new());
        assert!(!policy.is_allowed("Everlook"));
    }

    #[test]
    fn test_from_config() {
        let open = RealmAllowList::from_config(&ImportConfig::default());
        assert!(open.is_allowed("Anywhere"));

        let closed = RealmAllowList::from_config(&ImportConfig {
            allowed_realms: Some(vec!["Everlook".to_string()]),
        });
        assert!(closed.is_allowed("Everlook"));
        assert!(!closed.is_allowed("Anywhere"));
    }
}
