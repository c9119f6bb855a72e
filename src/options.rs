use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

use crate::catalog::ScopeCatalog;

/// Picker option id for the "All" entry that skips the current step.
pub const ALL_OPTION_ID: &str = "all";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    Command,
    Profile,
    Scope,
}

/// A selectable suggestion row. Ephemeral; rebuilt on every render from the
/// catalog and the current query fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionItem {
    pub kind: OptionKind,
    pub id: String,
    pub label: String,
    pub description: Option<String>,
    /// Owning profile id, set for scope options only.
    pub profile: Option<String>,
}

/// Builds and fuzzy-filters the option lists for the three picker modes.
pub struct OptionFilter {
    matcher: SkimMatcherV2,
}

impl OptionFilter {
    pub fn new() -> Self {
        Self {
            matcher: SkimMatcherV2::default(),
        }
    }

    pub fn command_options(&self, query: &str) -> Vec<OptionItem> {
        let all = vec![
            OptionItem {
                kind: OptionKind::Command,
                id: "search".into(),
                label: "Search".into(),
                description: Some("Search notes, lists and plugin content".into()),
                profile: None,
            },
            OptionItem {
                kind: OptionKind::Command,
                id: "pinned".into(),
                label: "Pinned".into(),
                description: Some("Show results tagged as pinned".into()),
                profile: None,
            },
        ];
        self.filter(all, query)
    }

    pub fn profile_options(&self, catalog: &ScopeCatalog, query: &str) -> Vec<OptionItem> {
        let mut items = vec![OptionItem {
            kind: OptionKind::Profile,
            id: ALL_OPTION_ID.into(),
            label: "All".into(),
            description: Some("Search every profile".into()),
            profile: None,
        }];
        items.extend(catalog.profiles().into_iter().map(|instance| OptionItem {
            kind: OptionKind::Profile,
            id: instance.id.clone(),
            label: instance.label.clone(),
            description: None,
            profile: None,
        }));
        self.filter(items, query)
    }

    pub fn scope_options(
        &self,
        catalog: &ScopeCatalog,
        profile: &str,
        query: &str,
    ) -> Vec<OptionItem> {
        let mut items = vec![OptionItem {
            kind: OptionKind::Scope,
            id: ALL_OPTION_ID.into(),
            label: "All".into(),
            description: Some("Search every plugin in this profile".into()),
            profile: Some(profile.to_string()),
        }];
        items.extend(
            catalog
                .scopes_for_profile(profile)
                .into_iter()
                .map(|scope| OptionItem {
                    kind: OptionKind::Scope,
                    id: scope.plugin_id.clone(),
                    label: scope.label.clone(),
                    description: None,
                    profile: Some(profile.to_string()),
                }),
        );
        self.filter(items, query)
    }

    fn filter(&self, items: Vec<OptionItem>, query: &str) -> Vec<OptionItem> {
        if query.is_empty() {
            return items;
        }
        let mut scored: Vec<(OptionItem, i64)> = items
            .into_iter()
            .filter_map(|item| {
                let score = self
                    .matcher
                    .fuzzy_match(&item.label, query)
                    .max(self.matcher.fuzzy_match(&item.id, query))?;
                Some((item, score))
            })
            .collect();
        scored.sort_by(|a, b| b.1.cmp(&a.1));
        scored.into_iter().map(|(item, _)| item).collect()
    }
}

impl Default for OptionFilter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{ScopeInstance, SearchableScope};

    #[test]
    fn command_options_filter_by_fragment() {
        let filter = OptionFilter::new();
        assert_eq!(filter.command_options("").len(), 2);
        let hits = filter.command_options("pin");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "pinned");
    }

    #[test]
    fn scope_options_always_lead_with_all_when_unfiltered() {
        let catalog = ScopeCatalog::new(vec![SearchableScope {
            plugin_id: "notes".into(),
            label: "Notes".into(),
            instances: vec![ScopeInstance {
                id: "home".into(),
                label: "Home".into(),
            }],
        }]);
        let filter = OptionFilter::new();
        let options = filter.scope_options(&catalog, "home", "");
        assert_eq!(options[0].id, ALL_OPTION_ID);
        assert_eq!(options[1].id, "notes");
        assert_eq!(options[1].profile.as_deref(), Some("home"));
    }
}
