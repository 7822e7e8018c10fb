/// Authorization action, the `act` of a Casbin request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Read metadata or content.
    Read,
    /// Administrative access, checked against the site.
    Admin,
}

impl Action {
    #[must_use]
    pub const fn as_casbin_action(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_casbin_action())
    }
}
