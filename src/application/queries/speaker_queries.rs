//! Speaker Queries - 话者列表

use crate::domain::DEFAULT_PAGE_CHARS;

/// 列出所有话者查询
#[derive(Debug, Clone)]
pub struct ListSpeakers {
    /// 单页最大字符数
    pub page_chars: usize,
}

impl Default for ListSpeakers {
    fn default() -> Self {
        Self {
            page_chars: DEFAULT_PAGE_CHARS,
        }
    }
}
