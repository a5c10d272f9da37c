use super::{Limit, QueryBuilder};
use crate::client::Executor;
use crate::error::DbResult;
use crate::row::{FromRow, Row};
use serde::Serialize;

/// One page of results plus the totals it was cut from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub total_pages: u64,
    pub current_page: u64,
    pub total_count: u64,
    pub rows: Vec<T>,
}

impl<T> Page<T> {
    /// Convert the rows, keeping the totals.
    pub fn try_map<U, F>(self, f: F) -> DbResult<Page<U>>
    where
        F: FnMut(T) -> DbResult<U>,
    {
        Ok(Page {
            total_pages: self.total_pages,
            current_page: self.current_page,
            total_count: self.total_count,
            rows: self.rows.into_iter().map(f).collect::<DbResult<_>>()?,
        })
    }
}

/// `ceil(total_count / page_size)`; `page_size` is clamped to at least 1.
pub fn total_pages(total_count: u64, page_size: u64) -> u64 {
    total_count.div_ceil(page_size.max(1))
}

/// The limit slot for 1-based `page_number` (clamped to at least 1).
pub(crate) fn page_limit(page_size: u64, page_number: u64) -> Limit {
    let size = page_size.max(1);
    let number = page_number.max(1);
    Limit {
        offset: (number - 1).saturating_mul(size),
        count: size,
    }
}

impl<E: Executor> QueryBuilder<'_, E> {
    /// Count, then select one page.
    ///
    /// Two sequential round trips with no isolation between them: concurrent writes can
    /// make `total_count` disagree with the returned rows. Overwrites the limit slot.
    pub async fn page(&mut self, page_size: u64, page_number: u64) -> DbResult<Page<Row>> {
        let total_count = self.count().await?;
        let limit = page_limit(page_size, page_number);
        self.limit = Some(limit);
        let rows = self.select().await?;

        Ok(Page {
            total_pages: total_pages(total_count, limit.count),
            current_page: page_number.max(1),
            total_count,
            rows,
        })
    }

    /// [`QueryBuilder::page`] mapped through [`FromRow`].
    pub async fn page_as<T: FromRow>(
        &mut self,
        page_size: u64,
        page_number: u64,
    ) -> DbResult<Page<T>> {
        let page = self.page(page_size, page_number).await?;
        page.try_map(|row| T::from_row(&row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0, 20), 0);
        assert_eq!(total_pages(1, 20), 1);
        assert_eq!(total_pages(20, 20), 1);
        assert_eq!(total_pages(21, 20), 2);
        assert_eq!(total_pages(163, 20), 9);
    }

    #[test]
    fn total_pages_clamps_zero_size() {
        assert_eq!(total_pages(5, 0), 5);
    }

    #[test]
    fn page_limit_offsets() {
        assert_eq!(page_limit(20, 3), Limit { offset: 40, count: 20 });
        assert_eq!(page_limit(20, 1), Limit { offset: 0, count: 20 });
        assert_eq!(page_limit(20, 0), Limit { offset: 0, count: 20 });
        assert_eq!(page_limit(0, 2), Limit { offset: 1, count: 1 });
    }

    #[test]
    fn page_serializes_camel_case() {
        let page = Page {
            total_pages: 1,
            current_page: 1,
            total_count: 1,
            rows: vec![1],
        };
        assert_eq!(
            serde_json::to_string(&page).unwrap(),
            r#"{"totalPages":1,"currentPage":1,"totalCount":1,"rows":[1]}"#
        );
    }
}
