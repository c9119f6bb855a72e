use omnibar::catalog::ScopeCatalog;
use omnibar::parse::{parse, ParsedState, SkipFlags, PINNED_QUERY};
use omnibar::provider::{ScopeInstance, SearchableScope};

fn instance(id: &str) -> ScopeInstance {
    ScopeInstance {
        id: id.into(),
        label: id.to_uppercase(),
    }
}

fn catalog() -> ScopeCatalog {
    ScopeCatalog::new(vec![
        SearchableScope {
            plugin_id: "notes".into(),
            label: "Notes".into(),
            instances: vec![instance("home"), instance("work")],
        },
        SearchableScope {
            plugin_id: "lists".into(),
            label: "Lists".into(),
            instances: vec![instance("home")],
        },
        SearchableScope {
            plugin_id: "archive".into(),
            label: "Archive".into(),
            instances: vec![instance("work")],
        },
    ])
}

fn no_skips() -> SkipFlags {
    SkipFlags::default()
}

#[test]
fn empty_input_is_idle() {
    assert_eq!(parse("", &catalog(), no_skips()), ParsedState::Idle);
}

#[test]
fn bare_text_is_a_global_query() {
    for input in ["hello", "hello world ", "tag:urgent", "  padded"] {
        assert_eq!(
            parse(input, &catalog(), no_skips()),
            ParsedState::Global {
                query: input.to_string()
            },
            "input {input:?}"
        );
    }
}

#[test]
fn slash_alone_enters_command_mode() {
    assert_eq!(
        parse("/", &catalog(), no_skips()),
        ParsedState::Command {
            query: String::new()
        }
    );
}

#[test]
fn unknown_command_token_stays_a_filter() {
    assert_eq!(
        parse("/zzz", &catalog(), no_skips()),
        ParsedState::Command {
            query: "zzz".into()
        }
    );
}

#[test]
fn exact_pinned_becomes_a_fixed_global_query() {
    assert_eq!(
        parse("/pinned", &catalog(), no_skips()),
        ParsedState::Global {
            query: PINNED_QUERY.into()
        }
    );
    // Case-insensitive, and trailing text does not change the fixed query.
    assert_eq!(
        parse("/PINNED extra", &catalog(), no_skips()),
        ParsedState::Global {
            query: PINNED_QUERY.into()
        }
    );
}

#[test]
fn pinned_prefix_in_progress_stays_command() {
    assert_eq!(
        parse("/pin", &catalog(), no_skips()),
        ParsedState::Command {
            query: "pin".into()
        }
    );
}

#[test]
fn search_is_not_confirmed_without_trailing_input() {
    assert_eq!(
        parse("/search", &catalog(), no_skips()),
        ParsedState::Command {
            query: "search".into()
        }
    );
    assert_eq!(
        parse("/sea", &catalog(), no_skips()),
        ParsedState::Command {
            query: "sea".into()
        }
    );
}

#[test]
fn confirmed_search_opens_the_profile_picker() {
    assert_eq!(
        parse("/search ", &catalog(), no_skips()),
        ParsedState::Profile {
            query: String::new()
        }
    );
    // A prefix of the command confirms too.
    assert_eq!(
        parse("/sea ", &catalog(), no_skips()),
        ParsedState::Profile {
            query: String::new()
        }
    );
}

#[test]
fn partial_profile_token_filters_the_picker() {
    assert_eq!(
        parse("/search ho", &catalog(), no_skips()),
        ParsedState::Profile { query: "ho".into() }
    );
}

#[test]
fn unknown_profile_stays_in_the_picker_even_when_confirmed() {
    assert_eq!(
        parse("/search zzz ", &catalog(), no_skips()),
        ParsedState::Profile {
            query: "zzz".into()
        }
    );
}

#[test]
fn confirmed_profile_opens_the_scope_picker() {
    assert_eq!(
        parse("/search home ", &catalog(), no_skips()),
        ParsedState::Scope {
            profile: "home".into(),
            query: String::new()
        }
    );
}

#[test]
fn scope_token_still_in_progress_stays_in_the_picker() {
    assert_eq!(
        parse("/search home notes", &catalog(), no_skips()),
        ParsedState::Scope {
            profile: "home".into(),
            query: "notes".into()
        }
    );
}

#[test]
fn scope_outside_the_profile_does_not_match() {
    // "archive" only has a "work" instance.
    assert_eq!(
        parse("/search home archive ", &catalog(), no_skips()),
        ParsedState::Scope {
            profile: "home".into(),
            query: "archive".into()
        }
    );
}

#[test]
fn full_chain_yields_a_scoped_query() {
    assert_eq!(
        parse("/search home notes hello   world", &catalog(), no_skips()),
        ParsedState::Query {
            profile: Some("home".into()),
            scope: Some("notes".into()),
            query: "hello world".into()
        }
    );
}

#[test]
fn profile_match_is_case_insensitive_and_canonicalized() {
    assert_eq!(
        parse("/search HOME NOTES hi", &catalog(), no_skips()),
        ParsedState::Query {
            profile: Some("home".into()),
            scope: Some("notes".into()),
            query: "hi".into()
        }
    );
}

#[test]
fn profile_skip_goes_straight_to_query() {
    let skips = SkipFlags {
        profile: true,
        scope: false,
    };
    assert_eq!(
        parse("/search hello", &catalog(), skips),
        ParsedState::Query {
            profile: None,
            scope: None,
            query: "hello".into()
        }
    );
}

#[test]
fn scope_skip_keeps_the_profile() {
    let skips = SkipFlags {
        profile: false,
        scope: true,
    };
    assert_eq!(
        parse("/search home hello", &catalog(), skips),
        ParsedState::Query {
            profile: Some("home".into()),
            scope: None,
            query: "hello".into()
        }
    );
}

#[test]
fn identity_keys_cover_the_searchable_modes_only() {
    let global = ParsedState::Global {
        query: "abc".into(),
    };
    assert_eq!(global.identity_key().as_deref(), Some("abc::::"));

    let query = ParsedState::Query {
        profile: Some("home".into()),
        scope: Some("notes".into()),
        query: "abc".into(),
    };
    assert_eq!(query.identity_key().as_deref(), Some("abc::home::notes"));

    assert_eq!(ParsedState::Idle.identity_key(), None);
    assert_eq!(
        ParsedState::Profile {
            query: String::new()
        }
        .identity_key(),
        None
    );
}
