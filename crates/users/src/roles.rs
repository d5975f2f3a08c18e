//! Known role keys.

/// Role assigned when a requested role is unknown.
pub const GUEST: &str = "guest";

/// The set of role keys the application knows about.
///
/// `guest` is always present.
#[derive(Debug, Clone)]
pub struct Roles {
    keys: Vec<String>,
}

impl Default for Roles {
    fn default() -> Self {
        Self {
            keys: vec![GUEST.to_string()],
        }
    }
}

impl Roles {
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut roles = Self::default();
        for key in keys {
            roles.add(key);
        }
        roles
    }

    pub fn add(&mut self, key: impl Into<String>) {
        let key = key.into();
        if !self.has(&key) {
            self.keys.push(key);
        }
    }

    pub fn has(&self, key: &str) -> bool {
        self.keys.iter().any(|k| k == key)
    }

    /// Returns `key` if it is known, otherwise [`GUEST`].
    pub fn resolve<'a>(&'a self, key: &'a str) -> &'a str {
        if self.has(key) { key } else { GUEST }
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_role_falls_back_to_guest() {
        let roles = Roles::default();
        assert_eq!(roles.resolve("admin"), GUEST);
    }

    #[test]
    fn test_known_role_resolves() {
        let roles = Roles::new(["admin", "editor"]);
        assert_eq!(roles.resolve("admin"), "admin");
        assert_eq!(roles.keys(), ["guest", "admin", "editor"]);
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut roles = Roles::new(["admin"]);
        roles.add("admin");
        roles.add(GUEST);
        assert_eq!(roles.keys().len(), 2);
    }
}
