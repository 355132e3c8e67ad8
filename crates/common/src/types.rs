//! 通用类型定义

use serde::{Deserialize, Serialize};

/// 分页参数（页码从 0 开始）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pagination {
    pub page_index: u32,
    pub page_size: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page_index: 0,
            page_size: 20,
        }
    }
}

impl Pagination {
    pub fn new(page_index: u32, page_size: u32) -> Self {
        Self {
            page_index,
            page_size,
        }
    }

    pub fn offset(&self) -> u64 {
        self.page_index as u64 * self.page_size as u64
    }

    /// 切换页大小时回到第一页
    pub fn with_page_size(self, page_size: u32) -> Self {
        Self {
            page_index: 0,
            page_size,
        }
    }
}

/// 分页结果
///
/// 后端有时返回分页对象，有时返回裸数组；两者都在边界处统一为此类型。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    pub page_index: u32,
    pub page_size: u32,
}

impl<T> PagedResult<T> {
    pub fn new(items: Vec<T>, total_count: u64, pagination: &Pagination) -> Self {
        Self {
            items,
            total_count,
            page_index: pagination.page_index,
            page_size: pagination.page_size,
        }
    }

    /// 空结果，保留请求的分页参数
    pub fn empty(pagination: &Pagination) -> Self {
        Self::new(Vec::new(), 0, pagination)
    }

    /// 未分页的列表视为仅有一页
    pub fn single_page(items: Vec<T>) -> Self {
        let len = items.len();
        Self {
            items,
            total_count: len as u64,
            page_index: 0,
            page_size: len as u32,
        }
    }

    pub fn total_pages(&self) -> u32 {
        if self.page_size == 0 {
            return if self.total_count > 0 { 1 } else { 0 };
        }
        self.total_count.div_ceil(self.page_size as u64) as u32
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_last_page(&self) -> bool {
        self.page_index + 1 >= self.total_pages()
    }

    /// 当前页在全部结果中的 1 起始区间，用于 "共 N 条中 a-b 条"
    pub fn display_range(&self) -> Option<(u64, u64)> {
        if self.total_count == 0 {
            return None;
        }
        let first = self.page_index as u64 * self.page_size as u64 + 1;
        let last = ((self.page_index as u64 + 1) * self.page_size as u64).min(self.total_count);
        Some((first, last.max(first)))
    }

    /// 分页按钮窗口：最多 `width` 个页码，尽量让当前页居中
    pub fn page_window(&self, width: u32) -> std::ops::Range<u32> {
        let total = self.total_pages();
        if total <= width {
            return 0..total;
        }
        let half = width / 2;
        let start = if self.page_index < half {
            0
        } else if self.page_index + half >= total {
            total - width
        } else {
            self.page_index - half
        };
        start..start + width
    }

    pub fn map<U, F>(self, f: F) -> PagedResult<U>
    where
        F: FnMut(T) -> U,
    {
        PagedResult {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
            page_index: self.page_index,
            page_size: self.page_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        let page = PagedResult::new(vec![1, 2, 3], 45, &Pagination::new(0, 20));
        assert_eq!(page.total_pages(), 3);
        assert!(!page.is_last_page());

        let page = PagedResult::new(vec![1], 40, &Pagination::new(1, 20));
        assert_eq!(page.total_pages(), 2);
        assert!(page.is_last_page());
    }

    #[test]
    fn test_single_page_from_bare_list() {
        let page = PagedResult::single_page(vec!["a", "b"]);
        assert_eq!(page.total_count, 2);
        assert_eq!(page.page_index, 0);
        assert_eq!(page.total_pages(), 1);
    }

    #[test]
    fn test_empty_keeps_pagination() {
        let page: PagedResult<u8> = PagedResult::empty(&Pagination::new(3, 10));
        assert_eq!(page.page_index, 3);
        assert_eq!(page.page_size, 10);
        assert_eq!(page.total_pages(), 0);
        assert_eq!(page.display_range(), None);
    }

    #[test]
    fn test_display_range() {
        let page = PagedResult::new(vec![0; 5], 25, &Pagination::new(2, 10));
        assert_eq!(page.display_range(), Some((21, 25)));
    }

    #[test]
    fn test_page_window() {
        let page = PagedResult::new(vec![0; 10], 30, &Pagination::new(0, 10));
        assert_eq!(page.page_window(5), 0..3);

        let page = PagedResult::new(vec![0; 10], 200, &Pagination::new(1, 10));
        assert_eq!(page.page_window(5), 0..5);
        let page = PagedResult::new(vec![0; 10], 200, &Pagination::new(10, 10));
        assert_eq!(page.page_window(5), 8..13);
        let page = PagedResult::new(vec![0; 10], 200, &Pagination::new(18, 10));
        assert_eq!(page.page_window(5), 15..20);
    }

    #[test]
    fn test_with_page_size_resets_page() {
        let p = Pagination::new(4, 10).with_page_size(50);
        assert_eq!(p, Pagination::new(0, 50));
        assert_eq!(Pagination::new(2, 10).offset(), 20);
    }
}
