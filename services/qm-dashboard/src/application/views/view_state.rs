//! 视图状态：加载中、错误、有数据、空，任一时刻只处于其中之一

use errors::AppResult;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum ViewState<T> {
    #[default]
    Loading,
    Error(String),
    Loaded(T),
    Empty,
}

impl<T> ViewState<T> {
    /// 由查询结果得到状态，`is_empty` 判断数据是否为空
    pub fn from_result(result: AppResult<T>, is_empty: impl FnOnce(&T) -> bool) -> Self {
        match result {
            Ok(data) if is_empty(&data) => Self::Empty,
            Ok(data) => Self::Loaded(data),
            Err(e) => Self::Error(e.user_message()),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Loaded(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }
}

impl<T> ViewState<Vec<T>> {
    pub fn from_list(result: AppResult<Vec<T>>) -> Self {
        Self::from_result(result, Vec::is_empty)
    }

    /// 已加载的行；加载中、错误、空都视为没有行
    pub fn items(&self) -> &[T] {
        self.data().map(Vec::as_slice).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use errors::AppError;

    #[test]
    fn test_states_are_exclusive() {
        assert!(ViewState::<Vec<u8>>::default().is_loading());
        assert_eq!(ViewState::from_list(Ok(Vec::<u8>::new())), ViewState::Empty);
        assert_eq!(ViewState::from_list(Ok(vec![1u8])), ViewState::Loaded(vec![1u8]));
        let state: ViewState<Vec<u8>> =
            ViewState::from_list(Err(AppError::external_service("backend down")));
        assert_eq!(state, ViewState::Error("backend down".to_string()));
        assert_eq!(state.data(), None);
        assert_eq!(state.error(), Some("backend down"));
    }

    #[test]
    fn test_finished_list_is_never_loading() {
        let empty = ViewState::from_list(Ok(Vec::<u8>::new()));
        let loaded = ViewState::from_list(Ok(vec![3u8, 4]));
        let failed: ViewState<Vec<u8>> = ViewState::from_list(Err(AppError::not_found("record")));
        for state in [&empty, &loaded, &failed] {
            assert!(!state.is_loading());
        }

        assert_eq!(empty.items(), &[] as &[u8]);
        assert_eq!(empty.error(), None);
        assert_eq!(loaded.items(), &[3u8, 4]);
        assert!(failed.items().is_empty());
        assert!(failed.error().is_some());
    }
}
