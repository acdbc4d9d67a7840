//! Feature groups: named bundles of tools enabled together

use tracing::warn;

use super::registry::ToolDescriptor;
use super::{account, aliyun, branching, database, debugging, development, functions, storage};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureGroup {
    Aliyun,
    Account,
    Database,
    Debugging,
    Development,
    Functions,
    Branching,
    Storage,
}

impl FeatureGroup {
    pub const ALL: [FeatureGroup; 8] = [
        Self::Aliyun,
        Self::Account,
        Self::Database,
        Self::Debugging,
        Self::Development,
        Self::Functions,
        Self::Branching,
        Self::Storage,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Aliyun => "aliyun",
            Self::Account => "account",
            Self::Database => "database",
            Self::Debugging => "debugging",
            Self::Development => "development",
            Self::Functions => "functions",
            Self::Branching => "branching",
            Self::Storage => "storage",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL.into_iter().find(|g| g.as_str().eq_ignore_ascii_case(name))
    }

    /// Parse a comma-separated list, dropping unknown names and repeats
    pub fn parse_list(list: &str) -> Vec<Self> {
        let mut groups = Vec::new();
        for name in list.split(',').map(str::trim).filter(|n| !n.is_empty()) {
            match Self::parse(name) {
                Some(group) if !groups.contains(&group) => groups.push(group),
                Some(_) => {}
                None => warn!(feature = name, "ignoring unknown feature group"),
            }
        }
        groups
    }

    /// Whether this group talks to the Supabase Management API
    pub fn uses_management_api(self) -> bool {
        !matches!(self, Self::Aliyun)
    }

    pub fn tools(self) -> Vec<ToolDescriptor> {
        match self {
            Self::Aliyun => aliyun::tools(),
            Self::Account => account::tools(),
            Self::Database => database::tools(),
            Self::Debugging => debugging::tools(),
            Self::Development => development::tools(),
            Self::Functions => functions::tools(),
            Self::Branching => branching::tools(),
            Self::Storage => storage::tools(),
        }
    }
}

impl std::fmt::Display for FeatureGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_parse_list() {
        assert_eq!(
            FeatureGroup::parse_list("aliyun, Database,bogus,,aliyun"),
            vec![FeatureGroup::Aliyun, FeatureGroup::Database]
        );
        assert!(FeatureGroup::parse_list("").is_empty());
    }

    #[test]
    fn test_only_aliyun_skips_management_api() {
        for group in FeatureGroup::ALL {
            assert_eq!(group.uses_management_api(), group != FeatureGroup::Aliyun);
        }
    }

    #[test]
    fn test_tool_names_are_unique_across_groups() {
        let mut seen = HashSet::new();
        for group in FeatureGroup::ALL {
            for descriptor in group.tools() {
                assert!(seen.insert(descriptor.name), "duplicate tool {}", descriptor.name);
            }
        }
        assert!(seen.contains("execute_sql"));
        assert!(seen.contains("execute_project_sql"));
    }
}
