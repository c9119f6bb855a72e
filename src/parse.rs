use crate::catalog::ScopeCatalog;
use crate::tokenize::{leading_token, split_tokens};

/// Fixed query substituted for the `/pinned` command.
pub const PINNED_QUERY: &str = "tag:pinned";

/// What the current input means. Exactly one mode is active at a time; the
/// engine resets the focus index whenever the mode discriminant changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedState {
    /// Input is empty.
    Idle,
    /// A leading `/` command name is being typed.
    Command { query: String },
    /// `/search` confirmed, a profile is being chosen.
    Profile { query: String },
    /// Profile confirmed, a plugin scope is being chosen.
    Scope { profile: String, query: String },
    /// Free-text search, optionally scoped.
    Query {
        profile: Option<String>,
        scope: Option<String>,
        query: String,
    },
    /// Bare free text without a slash command, unscoped.
    Global { query: String },
}

impl ParsedState {
    pub fn is_searchable(&self) -> bool {
        matches!(self, ParsedState::Query { .. } | ParsedState::Global { .. })
    }

    pub fn is_picker(&self) -> bool {
        !self.is_searchable()
    }

    pub fn same_mode(&self, other: &ParsedState) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    /// Composite key used to deduplicate search scheduling. `None` for
    /// non-searchable modes.
    pub fn identity_key(&self) -> Option<String> {
        match self {
            ParsedState::Query {
                profile,
                scope,
                query,
            } => Some(format!(
                "{}::{}::{}",
                query,
                profile.as_deref().unwrap_or(""),
                scope.as_deref().unwrap_or("")
            )),
            ParsedState::Global { query } => Some(format!("{query}::::")),
            _ => None,
        }
    }
}

/// Per-session markers set by choosing "All" at a picker step. Cleared on
/// palette close or by backspacing over the skipped segment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SkipFlags {
    pub profile: bool,
    pub scope: bool,
}

/// Classify `input` into one of the six modes. Pure; re-run on every input
/// change and whenever the catalog or skip flags change.
pub fn parse(input: &str, catalog: &ScopeCatalog, skips: SkipFlags) -> ParsedState {
    if input.is_empty() {
        return ParsedState::Idle;
    }
    let Some(after_slash) = input.strip_prefix('/') else {
        return ParsedState::Global {
            query: input.to_string(),
        };
    };

    let (command, rest, trailing) = leading_token(after_slash);
    if command.is_empty() {
        return ParsedState::Command {
            query: String::new(),
        };
    }

    let lower = command.to_ascii_lowercase();
    if "pinned".starts_with(&lower) {
        if lower == "pinned" {
            return ParsedState::Global {
                query: PINNED_QUERY.to_string(),
            };
        }
        // Still mid-word; keep the suggestion list up.
        return ParsedState::Command {
            query: command.to_string(),
        };
    }

    let confirmed = !rest.is_empty() || trailing;
    if "search".starts_with(&lower) && confirmed {
        return parse_profile_step(rest, catalog, skips);
    }

    ParsedState::Command {
        query: command.to_string(),
    }
}

fn parse_profile_step(rest: &str, catalog: &ScopeCatalog, skips: SkipFlags) -> ParsedState {
    let (tokens, trailing) = split_tokens(rest);
    if skips.profile {
        return ParsedState::Query {
            profile: None,
            scope: None,
            query: tokens.join(" "),
        };
    }
    let Some(first) = tokens.first() else {
        return ParsedState::Profile {
            query: String::new(),
        };
    };
    let confirmed = tokens.len() > 1 || trailing;
    match catalog.find_profile(first) {
        Some(instance) if confirmed => {
            parse_scope_step(instance.id.clone(), &tokens[1..], trailing, catalog, skips)
        }
        _ => ParsedState::Profile {
            query: (*first).to_string(),
        },
    }
}

fn parse_scope_step(
    profile: String,
    tokens: &[&str],
    trailing: bool,
    catalog: &ScopeCatalog,
    skips: SkipFlags,
) -> ParsedState {
    if skips.scope {
        return ParsedState::Query {
            profile: Some(profile),
            scope: None,
            query: tokens.join(" "),
        };
    }
    let Some(first) = tokens.first() else {
        return ParsedState::Scope {
            profile,
            query: String::new(),
        };
    };
    let confirmed = tokens.len() > 1 || trailing;
    match catalog.find_scope(&profile, first) {
        Some(scope) if confirmed => ParsedState::Query {
            scope: Some(scope.plugin_id.clone()),
            profile: Some(profile),
            query: tokens[1..].join(" "),
        },
        _ => ParsedState::Scope {
            profile,
            query: (*first).to_string(),
        },
    }
}
