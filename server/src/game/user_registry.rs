use std::collections::{HashMap, HashSet};

/// [UserRegistry] is a smart container for keeping track of which identity each connection plays as
///
/// Since the same identity can be logged in from multiple connections, we need to keep track of
/// which connections belong to which identities
#[derive(Debug, Default)]
pub struct UserRegistry {
    connection_to_identity: HashMap<String, String>,
    identity_to_connections: HashMap<String, HashSet<String>>,
}

impl UserRegistry {
    pub fn new() -> Self {
        UserRegistry::default()
    }

    /// Bind a connection to an identity, returns true if the identity had no other connection
    ///
    /// A connection that was bound to another identity must be unbound first.
    pub fn bind(&mut self, connection: &str, identity: &str) -> bool {
        self.connection_to_identity
            .insert(String::from(connection), String::from(identity));

        let connections = self
            .identity_to_connections
            .entry(String::from(identity))
            .or_default();

        connections.insert(String::from(connection));

        connections.len() == 1
    }

    /// Removes a connection, returning its identity and whether that was the identity's last connection
    /// Does nothing and returns None if the connection was never bound
    pub fn unbind(&mut self, connection: &str) -> Option<(String, bool)> {
        let identity = self.connection_to_identity.remove(connection)?;

        let was_last = match self.identity_to_connections.get_mut(&identity) {
            Some(connections) => {
                connections.remove(connection);
                connections.is_empty()
            }
            None => true,
        };

        if was_last {
            self.identity_to_connections.remove(&identity);
        }

        Some((identity, was_last))
    }

    pub fn identity_of(&self, connection: &str) -> Option<&str> {
        self.connection_to_identity
            .get(connection)
            .map(String::as_str)
    }

    pub fn connections_of(&self, identity: &str) -> Vec<String> {
        self.identity_to_connections
            .get(identity)
            .map(|connections| connections.iter().cloned().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_survives_until_last_connection_leaves() {
        let mut registry = UserRegistry::new();

        assert!(registry.bind("c1", "bob"));
        assert!(!registry.bind("c2", "bob"));

        assert_eq!(registry.unbind("c1"), Some(("bob".into(), false)));
        assert_eq!(registry.connections_of("bob"), vec!["c2".to_string()]);
        assert_eq!(registry.unbind("c2"), Some(("bob".into(), true)));
        assert!(registry.connections_of("bob").is_empty());
    }

    #[test]
    fn unknown_connection_is_a_no_op() {
        let mut registry = UserRegistry::new();

        assert_eq!(registry.unbind("ghost"), None);
        assert_eq!(registry.identity_of("ghost"), None);
    }
}
