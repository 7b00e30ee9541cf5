//! Per-view query state and its serialization into request parameters.

/// Page size used when none is configured.
pub const DEFAULT_PAGE_SIZE: u32 = 12;

/// A filter the user can change. Paging is handled separately by
/// [`QueryState::set_page`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    Search(String),
    Category(Option<i32>),
    Location(Option<i64>),
}

/// Paging and filter state for one listing view.
///
/// Fields are private so the page-reset rule cannot be bypassed: any filter
/// change puts the view back on page 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    page_number: u32,
    page_size: u32,
    search_text: String,
    category: Option<i32>,
    location: Option<i64>,
}

impl Default for QueryState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE, None)
    }
}

impl QueryState {
    pub fn new(page_size: u32, category: Option<i32>) -> Self {
        Self {
            page_number: 1,
            page_size: page_size.max(1),
            search_text: String::new(),
            category,
            location: None,
        }
    }

    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn category(&self) -> Option<i32> {
        self.category
    }

    pub fn location(&self) -> Option<i64> {
        self.location
    }

    /// Apply a filter and go back to page 1.
    ///
    /// Returns true if the filter value actually changed.
    pub fn set_filter(&mut self, filter: Filter) -> bool {
        let changed = match filter {
            Filter::Search(text) => {
                let changed = self.search_text != text;
                self.search_text = text;
                changed
            }
            Filter::Category(code) => {
                let changed = self.category != code;
                self.category = code;
                changed
            }
            Filter::Location(id) => {
                let changed = self.location != id;
                self.location = id;
                changed
            }
        };
        self.page_number = 1;
        changed
    }

    /// Move to page `n`. Page 0 is treated as page 1.
    pub fn set_page(&mut self, n: u32) {
        self.page_number = n.max(1);
    }

    /// Clear search and location. Category is route-bound and survives.
    pub fn reset(&mut self) {
        self.search_text.clear();
        self.location = None;
        self.page_number = 1;
    }

    /// Query parameters for a listing request.
    ///
    /// Absent filters are omitted, not sent as empty or zero. The one
    /// exception is `category_sentinel`: endpoints that expect an explicit
    /// "all categories" value get it when no category is set.
    pub fn to_params(&self, category_sentinel: Option<i32>) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("Page", self.page_number.to_string()),
            ("PageSize", self.page_size.to_string()),
        ];

        if let Some(code) = self.category.or(category_sentinel) {
            params.push(("Category", code.to_string()));
        }
        if let Some(id) = self.location {
            params.push(("LocationId", id.to_string()));
        }
        let search = self.search_text.trim();
        if !search.is_empty() {
            params.push(("Search", search.to_string()));
        }

        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn new_state_starts_on_page_one() {
        let q = QueryState::new(20, Some(4));
        assert_eq!(q.page_number(), 1);
        assert_eq!(q.page_size(), 20);
        assert_eq!(q.category(), Some(4));
        assert_eq!(q.search_text(), "");
        assert_eq!(q.location(), None);
    }

    #[test]
    fn zero_page_size_is_clamped() {
        assert_eq!(QueryState::new(0, None).page_size(), 1);
    }

    #[test]
    fn filter_change_resets_page() {
        let mut q = QueryState::default();
        q.set_page(5);
        assert!(q.set_filter(Filter::Location(Some(12))));
        assert_eq!(q.page_number(), 1);
    }

    #[test]
    fn unchanged_filter_still_resets_page() {
        let mut q = QueryState::default();
        q.set_filter(Filter::Search("park".into()));
        q.set_page(3);
        assert!(!q.set_filter(Filter::Search("park".into())));
        assert_eq!(q.page_number(), 1);
    }

    #[test]
    fn set_page_zero_clamps_to_one() {
        let mut q = QueryState::default();
        q.set_page(0);
        assert_eq!(q.page_number(), 1);
    }

    #[test]
    fn reset_keeps_category() {
        let mut q = QueryState::new(12, Some(4));
        q.set_filter(Filter::Search("loft".into()));
        q.set_filter(Filter::Location(Some(7)));
        q.set_page(2);
        q.reset();
        assert_eq!(q.category(), Some(4));
        assert_eq!(q.search_text(), "");
        assert_eq!(q.location(), None);
        assert_eq!(q.page_number(), 1);
    }

    #[test]
    fn params_omit_absent_filters() {
        let q = QueryState::new(12, None);
        assert_eq!(
            q.to_params(None),
            vec![("Page", "1".to_string()), ("PageSize", "12".to_string())]
        );
    }

    #[test]
    fn params_include_present_filters() {
        let mut q = QueryState::new(12, Some(4));
        q.set_filter(Filter::Location(Some(31)));
        q.set_filter(Filter::Search("  two bedroom ".into()));
        q.set_page(2);
        assert_eq!(
            q.to_params(None),
            vec![
                ("Page", "2".to_string()),
                ("PageSize", "12".to_string()),
                ("Category", "4".to_string()),
                ("LocationId", "31".to_string()),
                ("Search", "two bedroom".to_string()),
            ]
        );
    }

    #[test]
    fn blank_search_is_omitted() {
        let mut q = QueryState::default();
        q.set_filter(Filter::Search("   ".into()));
        assert!(q.to_params(None).iter().all(|(k, _)| *k != "Search"));
    }

    #[test]
    fn sentinel_used_only_without_category() {
        let q = QueryState::new(12, None);
        assert!(q.to_params(Some(0)).contains(&("Category", "0".to_string())));

        let q = QueryState::new(12, Some(3));
        let params = q.to_params(Some(0));
        assert!(params.contains(&("Category", "3".to_string())));
        assert_eq!(params.iter().filter(|(k, _)| *k == "Category").count(), 1);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Page(u32),
        Filter(Filter),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0u32..50).prop_map(Op::Page),
            "[a-z ]{0,8}".prop_map(|s| Op::Filter(Filter::Search(s))),
            proptest::option::of(0i32..8).prop_map(|c| Op::Filter(Filter::Category(c))),
            proptest::option::of(0i64..100).prop_map(|l| Op::Filter(Filter::Location(l))),
        ]
    }

    proptest! {
        #[test]
        fn filter_always_lands_on_page_one(ops in proptest::collection::vec(op_strategy(), 1..40)) {
            let mut q = QueryState::default();
            for op in ops {
                match op {
                    Op::Page(n) => {
                        let before = q.clone();
                        q.set_page(n);
                        prop_assert_eq!(q.page_number(), n.max(1));
                        prop_assert_eq!(q.search_text(), before.search_text());
                        prop_assert_eq!(q.category(), before.category());
                        prop_assert_eq!(q.location(), before.location());
                        prop_assert_eq!(q.page_size(), before.page_size());
                    }
                    Op::Filter(f) => {
                        q.set_filter(f);
                        prop_assert_eq!(q.page_number(), 1);
                    }
                }
            }
        }
    }
}
