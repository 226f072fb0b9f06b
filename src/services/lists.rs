//! Loading list pages: fetch rows for the current address and render them.
use crate::domain::columns::{FilterKey, SearchMode};
use crate::domain::content::ListViewState;
use crate::domain::resource::Resource;
use crate::dto::list::{ApiListResponse, FilterChip, ListPageData, RowView, ToolbarView};
use crate::lists::ListDefinition;
use crate::navigation::Location;
use crate::pagination::{DEFAULT_PAGE_SIZE, PaginationModel};
use crate::qs::{encode_query_string, parse_query_string, update_query_string};
use crate::repository::errors::RepositoryError;
use crate::repository::{ResourceListQuery, ResourceReader};
use crate::services::ServiceResult;
use crate::services::list_view::{
    ListContent, ListView, ListViewProps, ToolbarProps, handle_row_click, render_list,
};

fn filter_chips(props: &ToolbarProps<'_>) -> Vec<FilterChip> {
    props
        .params
        .filters()
        .flat_map(|(key, value)| {
            let parsed = FilterKey::parse(key);
            let name = props
                .search_columns
                .iter()
                .find(|column| column.key == parsed.field)
                .map_or(parsed.field, |column| column.name.as_str());
            let label = match parsed.mode {
                SearchMode::And => name.to_string(),
                SearchMode::Or => format!("{name} (or)"),
                SearchMode::Not => format!("{name} (not)"),
            };
            value
                .to_query_values()
                .into_iter()
                .map(move |value| FilterChip {
                    key: key.to_string(),
                    label: label.clone(),
                    value,
                })
        })
        .collect()
}

fn toolbar_view(props: ToolbarProps<'_>) -> ToolbarView {
    let sort = props.params.sort();
    let unfiltered_empty = props.item_count == 0 && props.params.filters().next().is_none();
    ToolbarView {
        item_count: props.item_count,
        search_columns: props.search_columns.to_vec(),
        sort_columns: props.sort_columns.to_vec(),
        searchable_keys: props.searchable_keys.to_vec(),
        related_searchable_keys: props.related_searchable_keys.to_vec(),
        empty_state_controls: if unfiltered_empty {
            props.empty_state_controls.to_vec()
        } else {
            Vec::new()
        },
        sort_key: sort.map(|(key, _)| key.to_string()),
        sort_direction: sort.map(|(_, direction)| direction),
        chips: filter_chips(&props),
    }
}

fn page_data(
    list: &ListDefinition,
    location: &Location,
    view: ListView<'_, RowView, ToolbarView, RepositoryError>,
) -> ListPageData {
    let state = view.content.kind();
    let (error, empty_title, empty_message, header, rows) = match view.content {
        ListContent::Loading => (None, None, None, Vec::new(), Vec::new()),
        ListContent::Error(error) => (Some(error.to_string()), None, None, Vec::new(), Vec::new()),
        ListContent::Empty { title, message } => (None, Some(title), Some(message), Vec::new(), Vec::new()),
        ListContent::Table { header, rows } => (None, None, None, header, rows),
    };

    ListPageData {
        slug: list.slug.to_string(),
        label: view.label,
        path: location.path.clone(),
        query: location.query.clone(),
        state,
        error,
        empty_title,
        empty_message,
        header,
        rows,
        toolbar: view.toolbar,
        pagination: view.pagination,
        bottom_pagination: view.bottom_pagination,
    }
}

/// Fetches and renders `list` for `location`.
///
/// Fetch failures do not fail the page; they render as the list's error state.
pub fn load_list_page<R>(
    repo: &R,
    list: &ListDefinition,
    location: &Location,
    page_size_options: &[usize],
) -> ListPageData
where
    R: ResourceReader + ?Sized,
{
    let params = parse_query_string(&list.config, &location.query);
    let state = match repo.list_resources(ResourceListQuery::from_params(list.collection, &params)) {
        Ok((total, items)) => ListViewState::loaded(items, total),
        Err(err) => {
            log::error!("Failed to list {}: {err}", list.slug);
            ListViewState::failed(err)
        }
    };

    let props = ListViewProps {
        config: &list.config,
        toolbar: &list.toolbar,
        columns: &list.columns,
        pluralized_item_name: list.pluralized_item_name,
        query: &location.query,
        page_size_options,
        empty_state_controls: &list.empty_state_controls,
    };
    let view = render_list(&props, &state, list.render_row, toolbar_view);

    page_data(list, location, view)
}

/// Resolves `query` for `list` and returns the matching rows as data.
pub fn load_api_list<R>(repo: &R, list: &ListDefinition, query: &str) -> ServiceResult<ApiListResponse>
where
    R: ResourceReader + ?Sized,
{
    let params = parse_query_string(&list.config, query);
    let (count, results) = repo
        .list_resources(ResourceListQuery::from_params(list.collection, &params))
        .map_err(|err| {
            log::error!("Failed to list {}: {err}", list.slug);
            err
        })?;

    let pagination = PaginationModel::new(
        count,
        params.page(),
        params.page_size().unwrap_or(DEFAULT_PAGE_SIZE),
        &[],
    );

    Ok(ApiListResponse {
        count,
        backend_query: encode_query_string(&params),
        params,
        pagination,
        results,
    })
}

/// Resolves a row click on the page `location` shows to the row's detail address.
///
/// When no row on that page has the id, or the row has no detail page, the
/// click leads back to `location`.
pub fn select_row<R>(repo: &R, list: &ListDefinition, location: &Location, id: &str) -> ServiceResult<String>
where
    R: ResourceReader + ?Sized,
{
    let params = parse_query_string(&list.config, &location.query);
    let (_, items) = repo.list_resources(ResourceListQuery::from_params(list.collection, &params))?;
    let detail_url = handle_row_click(&items, id, |item| (list.render_row)(item).detail_url).flatten();

    Ok(detail_url.unwrap_or_else(|| {
        let query = update_query_string(&list.config, &location.query, &params);
        Location::new(location.path.as_str(), query).href()
    }))
}

/// Fetches a single row of `list` by id.
pub fn load_api_item<R>(repo: &R, list: &ListDefinition, id: i32) -> ServiceResult<Option<Resource>>
where
    R: ResourceReader + ?Sized,
{
    let query = ResourceListQuery::new(list.collection).filter("id", vec![id.to_string()]);
    let (_, items) = repo.list_resources(query).map_err(|err| {
        log::error!("Failed to load {} {id}: {err}", list.slug);
        err
    })?;
    Ok(items.into_iter().next())
}
