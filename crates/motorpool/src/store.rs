//! In-memory record store.
//!
//! All shared list state (headers, the current page of cars, pagination,
//! search parameters) lives here and changes only through
//! [`CarStore::apply`], so every mutation has one auditable entry point.
//! Pages read the store; the application loop owns it and feeds it events.

use fleet_api::{CarPage, CarRecord, RecordState, SearchParams, SortOrder, TableHeader};

/// Pagination snapshot of the list view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    pub current: u64,
    pub page_size: u64,
    pub total: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            current: 1,
            page_size: 10,
            total: 0,
        }
    }
}

impl Pagination {
    pub fn page_count(&self) -> u64 {
        if self.total == 0 {
            1
        } else {
            self.total.div_ceil(self.page_size.max(1))
        }
    }
}

/// Every way the store can change.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    HeadersLoaded(Vec<TableHeader>),
    CarsLoading,
    CarsLoaded(CarPage),
    CarsFailed(String),
    /// A soft delete succeeded; drop the row locally, no refetch.
    CarRemoved(String),
    SetKeyword(Option<String>),
    SetStateFilter(Option<RecordState>),
    SetPage(u64),
    SetPageSize(u64),
    SetSort { field: String, order: SortOrder },
    ResetSearch,
}

/// Shared list-view state.
#[derive(Debug, Default)]
pub struct CarStore {
    pub headers: Vec<TableHeader>,
    pub cars: Vec<CarRecord>,
    pub pagination: Pagination,
    pub search: SearchParams,
    pub loading: bool,
    pub load_error: Option<String>,
}

impl CarStore {
    pub fn new(page_size: u64) -> Self {
        Self {
            pagination: Pagination {
                page_size,
                ..Pagination::default()
            },
            search: SearchParams {
                size: page_size,
                ..SearchParams::default()
            },
            ..Self::default()
        }
    }

    /// Apply one event. The only mutation entry point.
    pub fn apply(&mut self, event: StoreEvent) {
        match event {
            StoreEvent::HeadersLoaded(headers) => self.headers = headers,
            StoreEvent::CarsLoading => {
                self.loading = true;
                self.load_error = None;
            }
            StoreEvent::CarsLoaded(page) => {
                self.cars = page.response_list;
                self.pagination = Pagination {
                    current: page.page.page,
                    page_size: page.page.size,
                    total: page.page.total_elements,
                };
                self.loading = false;
            }
            StoreEvent::CarsFailed(message) => {
                self.loading = false;
                self.load_error = Some(message);
            }
            StoreEvent::CarRemoved(object_uuid) => {
                self.cars.retain(|car| car.object_uuid != object_uuid);
            }
            StoreEvent::SetKeyword(keyword) => {
                self.search.keyword = keyword;
                self.search.page = 1;
            }
            StoreEvent::SetStateFilter(state) => {
                self.search.state = state;
                self.search.page = 1;
            }
            StoreEvent::SetPage(page) => self.search.page = page.max(1),
            StoreEvent::SetPageSize(size) => {
                self.search.size = size.max(1);
                self.search.page = 1;
            }
            StoreEvent::SetSort { field, order } => {
                self.search.field = field;
                self.search.order = Some(order);
            }
            StoreEvent::ResetSearch => {
                let size = self.pagination.page_size;
                self.search = SearchParams {
                    size,
                    ..SearchParams::default()
                };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleet_api::PageInfo;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    fn car(uuid: &str) -> CarRecord {
        CarRecord {
            object_uuid: uuid.to_string(),
            state: "ACTIVE".to_string(),
            values: BTreeMap::new(),
        }
    }

    fn loaded_page(cars: Vec<CarRecord>, total: u64) -> StoreEvent {
        StoreEvent::CarsLoaded(CarPage {
            page: PageInfo {
                total_elements: total,
                page: 2,
                size: 20,
                has_next: false,
            },
            response_list: cars,
        })
    }

    #[test]
    fn load_updates_rows_and_pagination() {
        let mut store = CarStore::new(10);
        store.apply(StoreEvent::CarsLoading);
        assert!(store.loading);
        store.apply(loaded_page(vec![car("a"), car("b")], 42));
        assert!(!store.loading);
        assert_eq!(store.cars.len(), 2);
        assert_eq!(store.pagination.current, 2);
        assert_eq!(store.pagination.total, 42);
        assert_eq!(store.pagination.page_count(), 3);
    }

    #[test]
    fn soft_delete_removes_row_without_refetch() {
        let mut store = CarStore::new(10);
        store.apply(loaded_page(vec![car("a"), car("b")], 2));
        store.apply(StoreEvent::CarRemoved("a".into()));
        let uuids: Vec<&str> = store.cars.iter().map(|c| c.object_uuid.as_str()).collect();
        assert_eq!(uuids, vec!["b"]);
    }

    #[test]
    fn keyword_and_filter_changes_reset_to_first_page() {
        let mut store = CarStore::new(10);
        store.apply(StoreEvent::SetPage(5));
        assert_eq!(store.search.page, 5);
        store.apply(StoreEvent::SetKeyword(Some("K5".into())));
        assert_eq!(store.search.page, 1);
        assert_eq!(store.search.keyword.as_deref(), Some("K5"));

        store.apply(StoreEvent::SetPage(3));
        store.apply(StoreEvent::SetStateFilter(Some(RecordState::SoftDeleted)));
        assert_eq!(store.search.page, 1);
    }

    #[test]
    fn reset_restores_defaults_but_keeps_page_size() {
        let mut store = CarStore::new(50);
        store.apply(StoreEvent::SetKeyword(Some("EV".into())));
        store.apply(StoreEvent::SetSort {
            field: "carYear".into(),
            order: SortOrder::Desc,
        });
        store.apply(StoreEvent::ResetSearch);
        assert_eq!(store.search.keyword, None);
        assert_eq!(store.search.order, None);
        assert_eq!(store.search.field, "");
        assert_eq!(store.search.size, 50);
    }

    #[test]
    fn failed_load_records_the_error() {
        let mut store = CarStore::new(10);
        store.apply(StoreEvent::CarsLoading);
        store.apply(StoreEvent::CarsFailed("boom".into()));
        assert!(!store.loading);
        assert_eq!(store.load_error.as_deref(), Some("boom"));
    }
}
