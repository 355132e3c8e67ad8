//! 相邻行分组
//!
//! 只依赖最终排序后的顺序，每次变换后重新计算。

/// 行在所属分组中的位置
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct GroupPosition {
    pub start: bool,
    pub end: bool,
}

impl GroupPosition {
    pub fn is_single(&self) -> bool {
        self.start && self.end
    }

    pub fn is_middle(&self) -> bool {
        !self.start && !self.end
    }
}

/// 连续且键相同的行构成一组
pub fn group_positions<T, K, F>(rows: &[T], key: F) -> Vec<GroupPosition>
where
    K: PartialEq,
    F: Fn(&T) -> K,
{
    let keys: Vec<K> = rows.iter().map(key).collect();
    (0..keys.len())
        .map(|i| GroupPosition {
            start: i == 0 || keys[i - 1] != keys[i],
            end: i + 1 == keys.len() || keys[i + 1] != keys[i],
        })
        .collect()
}
