//! Assembly of a list view from a fetch snapshot and the current address.
//!
//! Row and toolbar rendering are injected callbacks, so one renderer serves
//! every resource type.
use crate::domain::columns::{EmptyStateControl, SearchColumn, SortColumn, Toolbar};
use crate::domain::content::{ContentState, ListItem, ListViewState};
use crate::domain::query::{Parameters, QueryConfig};
use crate::pagination::{DEFAULT_PAGE_SIZE, PaginationModel};
use crate::qs::{encode_non_default_query_string, parse_query_string};

/// Static description of a list plus the address it is rendered for.
pub struct ListViewProps<'a> {
    pub config: &'a QueryConfig,
    pub toolbar: &'a Toolbar,
    /// Header labels, one per rendered cell after the selection column.
    pub columns: &'a [&'a str],
    pub pluralized_item_name: &'a str,
    /// Current query string.
    pub query: &'a str,
    /// Page sizes offered to the user; empty hides the selector.
    pub page_size_options: &'a [usize],
    pub empty_state_controls: &'a [EmptyStateControl],
}

/// What the toolbar callback receives.
pub struct ToolbarProps<'a> {
    pub item_count: usize,
    pub search_columns: &'a [SearchColumn],
    pub sort_columns: &'a [SortColumn],
    pub searchable_keys: &'a [String],
    pub related_searchable_keys: &'a [String],
    /// Shown instead of the controls while nothing matches and no filter is set.
    pub empty_state_controls: &'a [EmptyStateControl],
    pub params: &'a Parameters,
    pub pagination: &'a PaginationModel,
}

/// Body of a list view, one variant per content state.
#[derive(Debug, PartialEq)]
pub enum ListContent<'a, R, E> {
    Loading,
    Error(&'a E),
    Empty { title: String, message: String },
    Table { header: Vec<String>, rows: Vec<R> },
}

impl<R, E> ListContent<'_, R, E> {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Error(_) => "error",
            Self::Empty { .. } => "empty",
            Self::Table { .. } => "populated",
        }
    }
}

#[derive(Debug)]
pub struct ListView<'a, R, P, E> {
    pub label: String,
    pub params: Parameters,
    pub toolbar: P,
    /// Pager shown in the toolbar; always present.
    pub pagination: PaginationModel,
    pub content: ListContent<'a, R, E>,
    /// Pager below the rows; only when there are rows.
    pub bottom_pagination: Option<PaginationModel>,
}

/// Renders a list for the address in `props` and the snapshot in `state`.
///
/// `render_item` runs once per item, in item order, and only when the list
/// is populated.
pub fn render_list<'a, T, E, R, P>(
    props: &ListViewProps<'_>,
    state: &'a ListViewState<T, E>,
    mut render_item: impl FnMut(&T) -> R,
    render_toolbar: impl FnOnce(ToolbarProps<'_>) -> P,
) -> ListView<'a, R, P, E> {
    let params = parse_query_string(props.config, props.query);
    let pagination = PaginationModel::new(
        state.item_count,
        params.page(),
        params.page_size().unwrap_or(DEFAULT_PAGE_SIZE),
        props.page_size_options,
    );

    let plural = props.pluralized_item_name;
    let content = match state.content_state() {
        ContentState::Loading => ListContent::Loading,
        ContentState::Error(error) => ListContent::Error(error),
        ContentState::Empty => ListContent::Empty {
            title: format!("No {plural} Found"),
            message: format!("Please add {plural} to populate this list"),
        },
        ContentState::Populated => ListContent::Table {
            header: std::iter::once(String::new())
                .chain(props.columns.iter().map(|c| c.to_string()))
                .collect(),
            rows: state.items.iter().map(&mut render_item).collect(),
        },
    };

    let toolbar = render_toolbar(ToolbarProps {
        item_count: state.item_count,
        search_columns: props.toolbar.search_columns(),
        sort_columns: props.toolbar.sort_columns(),
        searchable_keys: props.toolbar.searchable_keys(),
        related_searchable_keys: props.toolbar.related_searchable_keys(),
        empty_state_controls: props.empty_state_controls,
        params: &params,
        pagination: &pagination,
    });

    let bottom_pagination = (!state.items.is_empty()).then(|| pagination.clone());

    ListView {
        label: format!("{plural} List"),
        params,
        toolbar,
        pagination,
        content,
        bottom_pagination,
    }
}

/// Finds the item a clicked row stands for.
///
/// Row ids come back from the page as text; anything that is not a number
/// selects nothing.
pub fn select_item<'a, T: ListItem>(items: &'a [T], id: &str) -> Option<&'a T> {
    let id: i32 = id.trim().parse().ok()?;
    items.iter().find(|item| item.id() == id)
}

/// Passes the clicked item to `on_row_click`. Unknown ids are ignored.
pub fn handle_row_click<T, R>(items: &[T], id: &str, on_row_click: impl FnOnce(&T) -> R) -> Option<R>
where
    T: ListItem,
{
    match select_item(items, id) {
        Some(item) => Some(on_row_click(item)),
        None => {
            log::debug!("No row with id {id:?} on this page");
            None
        }
    }
}

/// Identifies the address a fetch was started for.
///
/// Fetches are not cancelled when the user navigates again, so a result is
/// only applied while its ticket still matches the current address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchTicket {
    key: String,
}

impl FetchTicket {
    pub fn issue(config: &QueryConfig, query: &str) -> Self {
        Self {
            key: encode_non_default_query_string(config, &parse_query_string(config, query)),
        }
    }

    /// Whether `query` still resolves to the parameters this fetch used.
    pub fn is_current(&self, config: &QueryConfig, query: &str) -> bool {
        Self::issue(config, query) == *self
    }

    /// Returns the result when it is still current, dropping stale ones.
    pub fn accept<T, E>(
        &self,
        config: &QueryConfig,
        current_query: &str,
        result: ListViewState<T, E>,
    ) -> Option<ListViewState<T, E>> {
        if self.is_current(config, current_query) {
            Some(result)
        } else {
            log::debug!("Discarding stale fetch for {}", self.key);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::PAGE_SIZE_OPTIONS;

    fn config() -> QueryConfig {
        QueryConfig::standard(None, 5, "name").expect("valid config")
    }

    fn props<'a>(config: &'a QueryConfig, toolbar: &'a Toolbar, query: &'a str) -> ListViewProps<'a> {
        ListViewProps {
            config,
            toolbar,
            columns: &["Name", "Type"],
            pluralized_item_name: "Templates",
            query,
            page_size_options: &PAGE_SIZE_OPTIONS,
            empty_state_controls: &[],
        }
    }

    fn toolbar_count(props: ToolbarProps<'_>) -> usize {
        props.item_count
    }

    #[test]
    fn populated_view_renders_rows_in_order() {
        let (config, toolbar) = (config(), Toolbar::default());
        let state = ListViewState::<_, String>::loaded(vec!["a", "b", "c"], 13);

        let mut calls = Vec::new();
        let view = render_list(
            &props(&config, &toolbar, "page=3"),
            &state,
            |item| {
                calls.push(item.to_string());
                item.to_uppercase()
            },
            toolbar_count,
        );

        assert_eq!(calls, vec!["a", "b", "c"]);
        assert_eq!(
            view.content,
            ListContent::Table {
                header: vec![String::new(), "Name".to_string(), "Type".to_string()],
                rows: vec!["A".to_string(), "B".to_string(), "C".to_string()],
            }
        );
        assert_eq!(view.toolbar, 13);
        assert_eq!(view.label, "Templates List");
        assert_eq!(view.pagination.page, 3);
        assert_eq!(view.pagination.total_pages, 3);
        assert_eq!(view.bottom_pagination, Some(view.pagination.clone()));
    }

    #[test]
    fn loading_view_skips_rows_and_bottom_pager() {
        let (config, toolbar) = (config(), Toolbar::default());
        let state = ListViewState::<&str, String>::loading();

        let view = render_list(
            &props(&config, &toolbar, ""),
            &state,
            |_| -> () { panic!("no rows while loading") },
            toolbar_count,
        );

        assert_eq!(view.content.kind(), "loading");
        assert!(view.bottom_pagination.is_none());
    }

    #[test]
    fn error_view_carries_the_error() {
        let (config, toolbar) = (config(), Toolbar::default());
        let state = ListViewState::<&str, String>::failed("404 Not Found".to_string());

        let view = render_list(&props(&config, &toolbar, ""), &state, |i| *i, toolbar_count);

        assert_eq!(view.content, ListContent::Error(&"404 Not Found".to_string()));
    }

    #[test]
    fn empty_view_names_the_resource() {
        let (config, toolbar) = (config(), Toolbar::default());
        let state = ListViewState::<&str, String>::loaded(vec![], 0);

        let view = render_list(&props(&config, &toolbar, ""), &state, |i| *i, toolbar_count);

        assert_eq!(
            view.content,
            ListContent::Empty {
                title: "No Templates Found".to_string(),
                message: "Please add Templates to populate this list".to_string(),
            }
        );
        assert_eq!(view.pagination.item_count, 0);
    }

    #[test]
    fn page_size_comes_from_the_address() {
        let (config, toolbar) = (config(), Toolbar::default());
        let state = ListViewState::<_, String>::loaded(vec![1], 100);

        let view = render_list(
            &props(&config, &toolbar, "page_size=20&page=2"),
            &state,
            |i| *i,
            toolbar_count,
        );

        assert_eq!(view.pagination.per_page, 20);
        assert_eq!(view.pagination.first_index, 21);
        assert_eq!(view.pagination.per_page_options, PAGE_SIZE_OPTIONS.to_vec());
    }

    #[derive(Debug, PartialEq)]
    struct Row(i32);

    impl ListItem for Row {
        fn id(&self) -> i32 {
            self.0
        }
    }

    #[test]
    fn row_click_finds_the_item_by_id() {
        let rows = [Row(4), Row(9), Row(12)];

        assert_eq!(select_item(&rows, "9"), Some(&Row(9)));
        assert_eq!(select_item(&rows, " 12 "), Some(&Row(12)));
        assert_eq!(select_item(&rows, "7"), None);
        assert_eq!(select_item(&rows, "nine"), None);

        let mut clicked = Vec::new();
        assert_eq!(handle_row_click(&rows, "4", |row| clicked.push(row.0)), Some(()));
        assert_eq!(handle_row_click(&rows, "", |row| clicked.push(row.0)), None);
        assert_eq!(clicked, vec![4]);
    }

    #[test]
    fn toolbar_receives_search_keys_and_empty_state_controls() {
        let config = config();
        let toolbar = Toolbar::default()
            .with_searchable_keys(&["id"], &["created_by"])
            .expect("valid keys");
        let controls = [EmptyStateControl::new("Add", "/templates/add")];
        let props = ListViewProps {
            empty_state_controls: &controls,
            ..props(&config, &toolbar, "")
        };
        let state = ListViewState::<&str, String>::loaded(vec![], 0);

        let view = render_list(&props, &state, |i| *i, |toolbar| {
            (
                toolbar.searchable_keys.to_vec(),
                toolbar.related_searchable_keys.to_vec(),
                toolbar.empty_state_controls.to_vec(),
            )
        });

        assert_eq!(
            view.toolbar,
            (
                vec!["id".to_string()],
                vec!["created_by".to_string()],
                controls.to_vec()
            )
        );
    }

    #[test]
    fn stale_fetches_are_dropped() {
        let config = config();
        let ticket = FetchTicket::issue(&config, "page=2");

        assert!(ticket.is_current(&config, "page=2&unrelated.key=1"));
        assert!(
            ticket
                .accept(&config, "page=3", ListViewState::<u8, String>::loaded(vec![1], 1))
                .is_none()
        );
        assert!(
            ticket
                .accept(&config, "?page=2", ListViewState::<u8, String>::loaded(vec![1], 1))
                .is_some()
        );
    }
}
