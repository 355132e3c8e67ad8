//! 列排序状态
//!
//! 点击同一列切换方向；点击新列时从降序开始。

use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

/// 当前排序列与方向；未选择列时使用各视图的默认顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState<C> {
    column: Option<C>,
    direction: SortDirection,
}

impl<C> Default for SortState<C> {
    fn default() -> Self {
        Self {
            column: None,
            direction: SortDirection::Desc,
        }
    }
}

impl<C: Copy + PartialEq> SortState<C> {
    pub fn by(column: C, direction: SortDirection) -> Self {
        Self {
            column: Some(column),
            direction,
        }
    }

    pub fn column(&self) -> Option<C> {
        self.column
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    /// 点击列头
    pub fn toggle(&mut self, column: C) {
        if self.column == Some(column) {
            self.direction = self.direction.toggled();
        } else {
            self.column = Some(column);
            self.direction = SortDirection::Desc;
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// 按选中列稳定排序，未选中列时保持原顺序
    pub fn sort_by<T>(&self, rows: &mut [T], compare: impl Fn(&T, &T, C) -> Ordering) {
        if let Some(column) = self.column {
            let direction = self.direction;
            rows.sort_by(|a, b| direction.apply(compare(a, b, column)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Col {
        A,
        B,
    }

    #[test]
    fn test_toggle_same_column_alternates() {
        let mut sort = SortState::default();
        sort.toggle(Col::A);
        assert_eq!(sort.column(), Some(Col::A));
        assert_eq!(sort.direction(), SortDirection::Desc);
        sort.toggle(Col::A);
        assert_eq!(sort.direction(), SortDirection::Asc);
        sort.toggle(Col::A);
        assert_eq!(sort.direction(), SortDirection::Desc);
    }

    #[test]
    fn test_new_column_resets_to_desc() {
        let mut sort = SortState::by(Col::A, SortDirection::Asc);
        sort.toggle(Col::B);
        assert_eq!(sort, SortState::by(Col::B, SortDirection::Desc));
    }

    #[test]
    fn test_sort_is_stable() {
        let mut rows = vec![(1, 'a'), (0, 'b'), (1, 'c'), (0, 'd')];
        let sort = SortState::by(Col::A, SortDirection::Asc);
        sort.sort_by(&mut rows, |x, y, _| x.0.cmp(&y.0));
        assert_eq!(rows, vec![(0, 'b'), (0, 'd'), (1, 'a'), (1, 'c')]);
    }
}
