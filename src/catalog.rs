use crate::provider::{ScopeInstance, SearchableScope};

/// The profile and plugin-scope vocabulary derived from the fetched scope
/// list. Empty until the background scope fetch lands; a failed fetch leaves
/// it empty, which makes the pickers show no matches.
#[derive(Debug, Clone, Default)]
pub struct ScopeCatalog {
    scopes: Vec<SearchableScope>,
}

impl ScopeCatalog {
    pub fn new(scopes: Vec<SearchableScope>) -> Self {
        Self { scopes }
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    pub fn scopes(&self) -> &[SearchableScope] {
        &self.scopes
    }

    /// Distinct profiles (instance ids) in first-seen order.
    pub fn profiles(&self) -> Vec<&ScopeInstance> {
        let mut seen: Vec<&ScopeInstance> = Vec::new();
        for scope in &self.scopes {
            for instance in &scope.instances {
                if !seen.iter().any(|s| s.id.eq_ignore_ascii_case(&instance.id)) {
                    seen.push(instance);
                }
            }
        }
        seen
    }

    /// Scopes that have an instance in `profile`.
    pub fn scopes_for_profile(&self, profile: &str) -> Vec<&SearchableScope> {
        self.scopes
            .iter()
            .filter(|s| s.instances.iter().any(|i| i.id.eq_ignore_ascii_case(profile)))
            .collect()
    }

    pub fn find_profile(&self, token: &str) -> Option<&ScopeInstance> {
        self.scopes
            .iter()
            .flat_map(|s| &s.instances)
            .find(|i| i.id.eq_ignore_ascii_case(token))
    }

    pub fn find_scope(&self, profile: &str, token: &str) -> Option<&SearchableScope> {
        self.scopes_for_profile(profile)
            .into_iter()
            .find(|s| s.plugin_id.eq_ignore_ascii_case(token))
    }
}
