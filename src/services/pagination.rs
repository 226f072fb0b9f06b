//! Pagination controls: page clicks and page-size changes become navigation.
//!
//! Both pagers of a table (above and below the rows) call into the same
//! functions, so they always agree. Nothing here fetches; the host re-fetches
//! once it observes the new address.
use crate::domain::query::{PAGE, PAGE_SIZE, Parameters, QueryConfig};
use crate::navigation::{Location, Navigator};
use crate::qs::{parse_query_string, replace_params, update_query_string};

/// Navigates to the address describing `params`.
///
/// Returns `false` without pushing when the target is the address the
/// current one already resolves to, so no duplicate history entry appears.
pub fn push_params<N>(navigator: &N, config: &QueryConfig, params: &Parameters) -> bool
where
    N: Navigator + ?Sized,
{
    let current = navigator.location();
    let query = update_query_string(config, &current.query, params);

    let unchanged = update_query_string(
        config,
        &current.query,
        &parse_query_string(config, &current.query),
    );
    if query == unchanged {
        log::debug!("Skipping navigation to unchanged location {current}");
        return false;
    }

    let target = Location::new(current.path, query);
    log::debug!("Navigating to {target}");
    navigator.push(&target.path, &target.query);
    true
}

/// Moves the list to `page`.
pub fn set_page<N>(navigator: &N, config: &QueryConfig, page: usize) -> bool
where
    N: Navigator + ?Sized,
{
    let current = parse_query_string(config, &navigator.location().query);
    let patch = Parameters::new().with(PAGE, page.max(1));
    push_params(navigator, config, &replace_params(&current, &patch))
}

/// Changes the page size and lands on `page`.
///
/// The landing page is chosen by the caller (usually 1) instead of relying on
/// the reducer's implicit reset.
pub fn set_page_size<N>(navigator: &N, config: &QueryConfig, page_size: usize, page: usize) -> bool
where
    N: Navigator + ?Sized,
{
    let current = parse_query_string(config, &navigator.location().query);
    let patch = Parameters::new()
        .with(PAGE_SIZE, page_size.max(1))
        .with(PAGE, page.max(1));
    push_params(navigator, config, &replace_params(&current, &patch))
}
