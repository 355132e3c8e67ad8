//! 响应信封与列表归一化

use common::types::{PagedResult, Pagination};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    pub body: Option<T>,
    pub msg: Option<String>,
}

/// 分页对象，缺失字段由请求参数补齐
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpringPage<T> {
    #[serde(default = "Vec::new")]
    pub content: Vec<T>,
    pub total_elements: Option<u64>,
    pub size: Option<u32>,
    pub number: Option<u32>,
}

/// 列表响应：裸数组或分页对象
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListBody<T> {
    List(Vec<T>),
    Page(SpringPage<T>),
}

/// 统一为 `PagedResult`
///
/// - 裸数组：视为唯一一页
/// - 分页对象：按其字段，缺失时取请求值
/// - null / 缺失：空结果，保留请求的分页参数
pub fn normalize_list_body<T>(body: Option<ListBody<T>>, requested: &Pagination) -> PagedResult<T> {
    match body {
        Some(ListBody::List(items)) => PagedResult::single_page(items),
        Some(ListBody::Page(page)) => {
            let total_count = page.total_elements.unwrap_or(page.content.len() as u64);
            PagedResult {
                total_count,
                page_index: page.number.unwrap_or(requested.page_index),
                page_size: page.size.unwrap_or(requested.page_size),
                items: page.content,
            }
        }
        None => PagedResult::empty(requested),
    }
}
