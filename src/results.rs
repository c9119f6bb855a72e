use crate::provider::SearchApiResult;

/// How the raw result list is ordered before grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortMode {
    /// Preserve server order.
    Relevance,
    /// List items first, then lists, notes, everything else.
    Items,
    /// Stable sort by plugin id.
    Plugin,
}

impl Default for SortMode {
    fn default() -> Self {
        SortMode::Relevance
    }
}

impl SortMode {
    pub const ALL: [SortMode; 3] = [SortMode::Relevance, SortMode::Items, SortMode::Plugin];

    pub fn as_str(self) -> &'static str {
        match self {
            SortMode::Relevance => "relevance",
            SortMode::Items => "items",
            SortMode::Plugin => "plugin",
        }
    }

    /// Parse a persisted value; unknown or corrupt input yields `None` so the
    /// caller can fall back to the default.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "relevance" => Some(SortMode::Relevance),
            "items" => Some(SortMode::Items),
            "plugin" => Some(SortMode::Plugin),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortMode::Relevance => "Relevance",
            SortMode::Items => "Items first",
            SortMode::Plugin => "Plugin",
        }
    }
}

/// How the sorted list is split into headed groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupMode {
    None,
    Plugin,
    Type,
}

impl Default for GroupMode {
    fn default() -> Self {
        GroupMode::None
    }
}

impl GroupMode {
    pub const ALL: [GroupMode; 3] = [GroupMode::None, GroupMode::Plugin, GroupMode::Type];

    pub fn as_str(self) -> &'static str {
        match self {
            GroupMode::None => "none",
            GroupMode::Plugin => "plugin",
            GroupMode::Type => "type",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "none" => Some(GroupMode::None),
            "plugin" => Some(GroupMode::Plugin),
            "type" => Some(GroupMode::Type),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GroupMode::None => "No grouping",
            GroupMode::Plugin => "By plugin",
            GroupMode::Type => "By type",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultKind {
    ListItem,
    List,
    Note,
    Other,
}

impl ResultKind {
    const ORDER: [ResultKind; 4] = [
        ResultKind::ListItem,
        ResultKind::List,
        ResultKind::Note,
        ResultKind::Other,
    ];

    fn rank(self) -> usize {
        match self {
            ResultKind::ListItem => 0,
            ResultKind::List => 1,
            ResultKind::Note => 2,
            ResultKind::Other => 3,
        }
    }

    pub fn header(self) -> &'static str {
        match self {
            ResultKind::ListItem => "List items",
            ResultKind::List => "Lists",
            ResultKind::Note => "Notes",
            ResultKind::Other => "Other",
        }
    }
}

/// A result whose launch payload carries an item id opens a single list item;
/// otherwise the panel type decides.
pub fn classify(result: &SearchApiResult) -> ResultKind {
    if result.launch.payload.get("itemId").is_some() {
        return ResultKind::ListItem;
    }
    match result.launch.panel_type.as_str() {
        "list" => ResultKind::List,
        "note" => ResultKind::Note,
        _ => ResultKind::Other,
    }
}

/// One row of the rendered list: a group header or a result at a given
/// ordinal in the display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayEntry {
    Header(String),
    /// Index into [`DisplayView::ordered`].
    Result(usize),
}

/// The ordered and grouped view over a raw result list. `ordered` holds
/// indices into the raw slice in display order; the focus cursor indexes it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayView {
    pub ordered: Vec<usize>,
    pub entries: Vec<DisplayEntry>,
}

/// Sort and group `results` into a flat display sequence.
pub fn organize(results: &[SearchApiResult], sort: SortMode, group: GroupMode) -> DisplayView {
    let sorted = sort_indices(results, sort);
    match group {
        GroupMode::None => {
            let entries = (0..sorted.len()).map(DisplayEntry::Result).collect();
            DisplayView {
                ordered: sorted,
                entries,
            }
        }
        GroupMode::Plugin => {
            let mut plugin_order: Vec<&str> = Vec::new();
            for &i in &sorted {
                let id = results[i].plugin_id.as_str();
                if !plugin_order.contains(&id) {
                    plugin_order.push(id);
                }
            }
            let mut view = DisplayView::default();
            for plugin in plugin_order {
                view.entries.push(DisplayEntry::Header(plugin.to_string()));
                for &i in &sorted {
                    if results[i].plugin_id == plugin {
                        view.entries.push(DisplayEntry::Result(view.ordered.len()));
                        view.ordered.push(i);
                    }
                }
            }
            view
        }
        GroupMode::Type => {
            let mut view = DisplayView::default();
            for kind in ResultKind::ORDER {
                let bucket: Vec<usize> = sorted
                    .iter()
                    .copied()
                    .filter(|&i| classify(&results[i]) == kind)
                    .collect();
                if bucket.is_empty() {
                    continue;
                }
                view.entries
                    .push(DisplayEntry::Header(kind.header().to_string()));
                for i in bucket {
                    view.entries.push(DisplayEntry::Result(view.ordered.len()));
                    view.ordered.push(i);
                }
            }
            view
        }
    }
}

fn sort_indices(results: &[SearchApiResult], sort: SortMode) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..results.len()).collect();
    match sort {
        SortMode::Relevance => {}
        // Stable sorts keep the server order inside each bucket.
        SortMode::Items => indices.sort_by_key(|&i| classify(&results[i]).rank()),
        SortMode::Plugin => {
            indices.sort_by(|&a, &b| results[a].plugin_id.cmp(&results[b].plugin_id))
        }
    }
    indices
}
