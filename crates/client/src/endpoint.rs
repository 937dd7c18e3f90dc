use std::fmt;

/// Ingestion API routes, relative to the configured base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Customers,
    AccountEvents,
    DepositEvents,
    WithdrawEvents,
    GamingActivityEvents,
    WalletBalanceEvents,
    ReferFriendEvents,
    ExtendedAttributes,
}

impl Endpoint {
    pub const ALL: [Endpoint; 8] = [
        Endpoint::Customers,
        Endpoint::AccountEvents,
        Endpoint::DepositEvents,
        Endpoint::WithdrawEvents,
        Endpoint::GamingActivityEvents,
        Endpoint::WalletBalanceEvents,
        Endpoint::ReferFriendEvents,
        Endpoint::ExtendedAttributes,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Customers => "/customers",
            Endpoint::AccountEvents => "/events/account",
            Endpoint::DepositEvents => "/events/deposit",
            Endpoint::WithdrawEvents => "/events/withdraw",
            Endpoint::GamingActivityEvents => "/events/gaming-activity",
            Endpoint::WalletBalanceEvents => "/events/wallet-balance",
            Endpoint::ReferFriendEvents => "/events/refer-friend",
            Endpoint::ExtendedAttributes => "/extattributes",
        }
    }

    pub fn from_path(path: &str) -> Option<Endpoint> {
        Self::ALL.into_iter().find(|endpoint| endpoint.path() == path)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn paths_are_unique() {
        let paths: HashSet<_> = Endpoint::ALL.iter().map(|e| e.path()).collect();
        assert_eq!(paths.len(), Endpoint::ALL.len());
    }

    #[test]
    fn from_path_inverts_path() {
        for endpoint in Endpoint::ALL {
            assert_eq!(Endpoint::from_path(endpoint.path()), Some(endpoint));
        }
        assert_eq!(Endpoint::from_path("/events/unknown"), None);
    }

    #[test]
    fn display_is_path() {
        assert_eq!(Endpoint::GamingActivityEvents.to_string(), "/events/gaming-activity");
    }
}
