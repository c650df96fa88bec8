//! Ownership filter modes requested by list queries

use serde::{Deserialize, Serialize};

/// Which slice of records a list query asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OwnershipFilter {
    /// Records the user owns
    #[default]
    MyItems,
    /// Records owned by the user or anyone reporting to them
    MyTeam,
    /// Records the user is consulted on or informed about
    Consulted,
    /// Owned (or team-owned, for managers) plus consulted records
    AllAccessible,
    /// Every live record in the organization
    AllOrg,
}

impl OwnershipFilter {
    /// All modes, narrowest first
    pub const ALL: [OwnershipFilter; 5] = [
        OwnershipFilter::MyItems,
        OwnershipFilter::MyTeam,
        OwnershipFilter::Consulted,
        OwnershipFilter::AllAccessible,
        OwnershipFilter::AllOrg,
    ];

    /// Wire name of the mode
    pub fn as_str(&self) -> &'static str {
        match self {
            OwnershipFilter::MyItems => "my_items",
            OwnershipFilter::MyTeam => "my_team",
            OwnershipFilter::Consulted => "consulted",
            OwnershipFilter::AllAccessible => "all_accessible",
            OwnershipFilter::AllOrg => "all_org",
        }
    }
}

impl std::fmt::Display for OwnershipFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OwnershipFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "my_items" => Ok(OwnershipFilter::MyItems),
            "my_team" => Ok(OwnershipFilter::MyTeam),
            "consulted" => Ok(OwnershipFilter::Consulted),
            "all_accessible" => Ok(OwnershipFilter::AllAccessible),
            "all_org" => Ok(OwnershipFilter::AllOrg),
            _ => Err(format!("Invalid ownership filter: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_my_items() {
        assert_eq!(OwnershipFilter::default(), OwnershipFilter::MyItems);
    }

    #[test]
    fn test_parse_round_trip() {
        for mode in OwnershipFilter::ALL {
            assert_eq!(mode.as_str().parse::<OwnershipFilter>().unwrap(), mode);
        }
        assert!("everything".parse::<OwnershipFilter>().is_err());
    }

    #[test]
    fn test_serde_uses_wire_names() {
        let json = serde_json::to_string(&OwnershipFilter::AllAccessible).unwrap();
        assert_eq!(json, "\"all_accessible\"");
    }
}
