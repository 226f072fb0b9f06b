use serde::Serialize;

/// Page sizes offered by the per-page selector.
pub const PAGE_SIZE_OPTIONS: [usize; 4] = [5, 10, 20, 50];

/// Rows per page for lists that declare no page size default.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// How many page links surround the edges and the current page.
#[derive(Clone, Copy, Debug)]
struct Window {
    edge: usize,
    before: usize,
    after: usize,
}

const DEFAULT_WINDOW: Window = Window {
    edge: 2,
    before: 2,
    after: 4,
};

/// Page links for a pager; `None` marks a gap rendered as an ellipsis.
///
/// Only the edge and current-page windows are walked, so the cost does not
/// grow with the number of pages.
fn page_links(total_pages: usize, current_page: usize, window: Window) -> Vec<Option<usize>> {
    let mut windows = [
        (1, window.edge.min(total_pages)),
        (
            current_page.saturating_sub(window.before).max(1),
            current_page.saturating_add(window.after).min(total_pages),
        ),
        (total_pages.saturating_sub(window.edge) + 1, total_pages),
    ];
    windows.sort_unstable();

    let mut links = Vec::new();
    let mut previous = 0;
    for (start, end) in windows {
        if end <= previous {
            continue;
        }
        let start = start.max(previous + 1);
        if start > end {
            continue;
        }
        if start > previous + 1 {
            links.push(None);
        }
        links.extend((start..=end).map(Some));
        previous = end;
    }

    links
}

/// Everything a pager control needs to render one list's position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PaginationModel {
    pub item_count: usize,
    pub page: usize,
    pub per_page: usize,
    pub total_pages: usize,
    /// 1-based index of the first row on the page, 0 when there are no rows.
    pub first_index: usize,
    pub last_index: usize,
    pub previous: Option<usize>,
    pub next: Option<usize>,
    pub pages: Vec<Option<usize>>,
    /// Empty when the list hides the per-page selector.
    pub per_page_options: Vec<usize>,
}

impl PaginationModel {
    pub fn new(item_count: usize, page: usize, per_page: usize, per_page_options: &[usize]) -> Self {
        let page = page.max(1);
        let per_page = per_page.max(1);
        let total_pages = item_count.div_ceil(per_page);

        let offset = (page - 1).saturating_mul(per_page);
        let (first_index, last_index) = if offset < item_count {
            (offset + 1, (offset + per_page).min(item_count))
        } else {
            (0, 0)
        };

        Self {
            item_count,
            page,
            per_page,
            total_pages,
            first_index,
            last_index,
            previous: (page > 1).then(|| (page - 1).min(total_pages.max(1))),
            next: (page < total_pages).then_some(page + 1),
            pages: page_links(total_pages, page, DEFAULT_WINDOW),
            per_page_options: per_page_options.to_vec(),
        }
    }

    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }

    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }
}
