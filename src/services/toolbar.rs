//! Toolbar actions: search, sort and filter removal.
use crate::domain::columns::{SearchMode, Toolbar};
use crate::domain::query::{ORDER_BY, PAGE, Parameters, QueryConfig, SortDirection};
use crate::navigation::Navigator;
use crate::qs::{merge_params, parse_query_string, remove_all_filters, remove_params, replace_params};
use crate::services::ServiceResult;
use crate::services::pagination::push_params;

fn current_params<N>(navigator: &N, config: &QueryConfig) -> Parameters
where
    N: Navigator + ?Sized,
{
    parse_query_string(config, &navigator.location().query)
}

/// Adds a search term on `column_key` and returns to the first page.
///
/// Blank terms are ignored. Returns whether navigation was requested.
pub fn search<N>(
    navigator: &N,
    config: &QueryConfig,
    toolbar: &Toolbar,
    column_key: &str,
    mode: SearchMode,
    term: &str,
) -> ServiceResult<bool>
where
    N: Navigator + ?Sized,
{
    let key = toolbar.search_key(column_key, mode)?;
    let term = term.trim();
    if term.is_empty() {
        return Ok(false);
    }

    let merged = merge_params(
        &current_params(navigator, config),
        &Parameters::new().with(key, term),
    );
    let params = replace_params(&merged, &Parameters::new().with(PAGE, 1_i64));
    Ok(push_params(navigator, config, &params))
}

/// Orders the list by `key` in `direction`; the page resets.
pub fn sort<N>(
    navigator: &N,
    config: &QueryConfig,
    toolbar: &Toolbar,
    key: &str,
    direction: SortDirection,
) -> ServiceResult<bool>
where
    N: Navigator + ?Sized,
{
    let column = toolbar.sort_column(key)?;
    let patch = Parameters::new().with(ORDER_BY, direction.apply(&column.key));
    let params = replace_params(&current_params(navigator, config), &patch);
    Ok(push_params(navigator, config, &params))
}

/// Removes one value of a filter chip.
pub fn remove_filter<N>(navigator: &N, config: &QueryConfig, key: &str, value: &str) -> bool
where
    N: Navigator + ?Sized,
{
    let current = current_params(navigator, config);
    let removed = remove_params(config, &current, &Parameters::new().with(key, value));
    let params = replace_params(&removed, &Parameters::new().with(PAGE, 1_i64));
    push_params(navigator, config, &params)
}

/// Clears every filter, keeping page size and ordering.
pub fn clear_filters<N>(navigator: &N, config: &QueryConfig) -> bool
where
    N: Navigator + ?Sized,
{
    let params = remove_all_filters(config, &current_params(navigator, config));
    push_params(navigator, config, &params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::columns::{ColumnError, SearchColumn, SortColumn};
    use crate::navigation::history::MemoryHistory;
    use crate::navigation::{Location, Navigator};
    use crate::services::ServiceError;

    fn config() -> QueryConfig {
        QueryConfig::standard(Some("template"), 20, "name").expect("valid config")
    }

    fn toolbar() -> Toolbar {
        Toolbar::try_new(
            vec![
                SearchColumn::new("Name", "name").default_column(),
                SearchColumn::new("Description", "description"),
            ],
            vec![SortColumn::new("Name", "name"), SortColumn::new("Modified", "modified")],
        )
        .expect("valid toolbar")
    }

    #[test]
    fn search_adds_term_and_resets_page() {
        let history = MemoryHistory::new(Location::new("/templates", "template.page=4"));

        let pushed = search(&history, &config(), &toolbar(), "name", SearchMode::And, " web ")
            .expect("search accepted");

        assert!(pushed);
        assert_eq!(history.location().query, "template.name__icontains=web");
    }

    #[test]
    fn second_search_accumulates() {
        let history = MemoryHistory::new(Location::new(
            "/templates",
            "template.name__icontains=web",
        ));

        search(&history, &config(), &toolbar(), "name", SearchMode::And, "db").unwrap();
        search(&history, &config(), &toolbar(), "description", SearchMode::Not, "old").unwrap();

        assert_eq!(
            history.location().query,
            "template.name__icontains=web&template.name__icontains=db\
             &template.not__description__icontains=old"
        );
    }

    #[test]
    fn blank_search_does_nothing() {
        let history = MemoryHistory::new(Location::new("/templates", ""));
        assert!(!search(&history, &config(), &toolbar(), "name", SearchMode::And, "  ").unwrap());
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn unknown_columns_are_rejected() {
        let history = MemoryHistory::new(Location::new("/templates", ""));

        let searched = search(&history, &config(), &toolbar(), "status", SearchMode::And, "x");
        assert!(matches!(
            searched,
            Err(ServiceError::Column(ColumnError::NotSearchable(_)))
        ));

        let sorted = sort(&history, &config(), &toolbar(), "status", SortDirection::Ascending);
        assert!(matches!(sorted, Err(ServiceError::Column(ColumnError::NotSortable(_)))));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn sort_sets_order_and_resets_page() {
        let history = MemoryHistory::new(Location::new("/templates", "template.page=3"));

        assert!(sort(&history, &config(), &toolbar(), "modified", SortDirection::Descending).unwrap());
        assert_eq!(history.location().query, "template.order_by=-modified");
    }

    #[test]
    fn removing_chips_and_clearing() {
        let history = MemoryHistory::new(Location::new(
            "/templates",
            "template.page_size=50&template.type=a&template.type=b&template.page=2",
        ));

        assert!(remove_filter(&history, &config(), "type", "a"));
        assert_eq!(
            history.location().query,
            "template.page_size=50&template.type=b"
        );

        assert!(clear_filters(&history, &config()));
        assert_eq!(history.location().query, "template.page_size=50");
    }
}
