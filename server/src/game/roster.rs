/// Read-only view of who is playing which role
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RosterSnapshot {
    pub host: Option<String>,
    pub guessers: Vec<String>,
}

/// [Roster] keeps track of the host seat and the guessers of the room.
///
/// The host is never a guesser at the same time and every guesser appears once,
/// in the order they registered.
#[derive(Debug, Default)]
pub struct Roster {
    host: Option<String>,
    guessers: Vec<String>,
}

impl Roster {
    pub fn new() -> Self {
        Roster::default()
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    pub fn is_host(&self, identity: &str) -> bool {
        self.host.as_deref() == Some(identity)
    }

    pub fn is_guesser(&self, identity: &str) -> bool {
        self.guessers.iter().any(|g| g == identity)
    }

    pub fn has_guessers(&self) -> bool {
        !self.guessers.is_empty()
    }

    /// Adds the identity to the guessers, returns false if it is the host or already a guesser
    pub fn register(&mut self, identity: &str) -> bool {
        if self.is_host(identity) || self.is_guesser(identity) {
            return false;
        }

        self.guessers.push(String::from(identity));

        true
    }

    /// Seats the identity as host if the seat is free, moving it out of the guessers
    pub fn promote_to_host(&mut self, identity: &str) -> bool {
        if self.host.is_some() {
            return false;
        }

        self.guessers.retain(|g| g != identity);
        self.host = Some(String::from(identity));

        true
    }

    /// Removes the identity from whichever role it holds, returns false for unknown identities
    pub fn unregister(&mut self, identity: &str) -> bool {
        if self.is_host(identity) {
            self.host = None;
            return true;
        }

        let before = self.guessers.len();
        self.guessers.retain(|g| g != identity);

        self.guessers.len() != before
    }

    pub fn clear(&mut self) {
        self.host = None;
        self.guessers.clear();
    }

    pub fn snapshot(&self) -> RosterSnapshot {
        RosterSnapshot {
            host: self.host.clone(),
            guessers: self.guessers.clone(),
        }
    }
}
