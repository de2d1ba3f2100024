//! Client identity and self-match prevention
//!
//! A client is a firm, optionally acting for one of its own clients (the
//! firm client). Two entries may not trade against each other when they come
//! from the same firm and either carry the same firm client, or one of them
//! is the firm itself trading against one of its clients.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Who requested an order or quote
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Client {
    pub firm_id: String,
    pub firm_client_id: Option<String>,
}

impl Client {
    /// The firm acting on its own account
    pub fn firm(firm_id: impl Into<String>) -> Self {
        Self {
            firm_id: firm_id.into(),
            firm_client_id: None,
        }
    }

    /// The firm acting for one of its clients
    pub fn firm_client(firm_id: impl Into<String>, firm_client_id: impl Into<String>) -> Self {
        Self {
            firm_id: firm_id.into(),
            firm_client_id: Some(firm_client_id.into()),
        }
    }

    pub fn same_firm(&self, other: &Client) -> bool {
        self.firm_id == other.firm_id
    }
}

impl fmt::Display for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.firm_client_id {
            Some(firm_client_id) => write!(f, "{}/{}", self.firm_id, firm_client_id),
            None => write!(f, "{}", self.firm_id),
        }
    }
}

/// Same firm, and the same firm client on both sides (both absent included)
pub fn same_firm_and_same_firm_client(aggressor: &Client, passive: &Client) -> bool {
    aggressor.same_firm(passive) && aggressor.firm_client_id == passive.firm_client_id
}

/// Same firm, and at least one side is the firm itself
pub fn same_firm_but_possible_firm_against_client(aggressor: &Client, passive: &Client) -> bool {
    aggressor.same_firm(passive)
        && (aggressor.firm_client_id.is_none() || passive.firm_client_id.is_none())
}

/// Self-match prevention: true when the two clients must not trade
pub fn cannot_match_these_two_clients(aggressor: &Client, passive: &Client) -> bool {
    same_firm_and_same_firm_client(aggressor, passive)
        || same_firm_but_possible_firm_against_client(aggressor, passive)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_firm_same_firm_client_blocked() {
        let a = Client::firm_client("FIRM-A", "C1");
        let p = Client::firm_client("FIRM-A", "C1");
        assert!(same_firm_and_same_firm_client(&a, &p));
        assert!(cannot_match_these_two_clients(&a, &p));
    }

    #[test]
    fn test_same_firm_no_firm_clients_blocked() {
        let a = Client::firm("FIRM-A");
        let p = Client::firm("FIRM-A");
        assert!(same_firm_and_same_firm_client(&a, &p));
        assert!(cannot_match_these_two_clients(&a, &p));
    }

    #[test]
    fn test_firm_against_own_client_blocked() {
        let firm = Client::firm("FIRM-A");
        let client = Client::firm_client("FIRM-A", "C1");
        assert!(!same_firm_and_same_firm_client(&firm, &client));
        assert!(same_firm_but_possible_firm_against_client(&firm, &client));
        assert!(same_firm_but_possible_firm_against_client(&client, &firm));
        assert!(cannot_match_these_two_clients(&firm, &client));
        assert!(cannot_match_these_two_clients(&client, &firm));
    }

    #[test]
    fn test_different_clients_of_same_firm_allowed() {
        let a = Client::firm_client("FIRM-A", "C1");
        let p = Client::firm_client("FIRM-A", "C2");
        assert!(!cannot_match_these_two_clients(&a, &p));
    }

    #[test]
    fn test_different_firms_allowed() {
        let cases = [
            (Client::firm("FIRM-A"), Client::firm("FIRM-B")),
            (Client::firm_client("FIRM-A", "C1"), Client::firm_client("FIRM-B", "C1")),
            (Client::firm("FIRM-A"), Client::firm_client("FIRM-B", "C1")),
        ];
        for (a, p) in cases {
            assert!(!cannot_match_these_two_clients(&a, &p), "{} vs {} should trade", a, p);
        }
    }

    #[test]
    fn test_client_display() {
        assert_eq!(Client::firm("F").to_string(), "F");
        assert_eq!(Client::firm_client("F", "C").to_string(), "F/C");
    }
}
