//! 话者列表
//!
//! 把引擎返回的话者整理成一行一条的列表，并按消息长度上限分页

use super::voice::SpeakerId;

/// 默认单页最大字符数（Discord 单条消息上限为 2000）
pub const DEFAULT_PAGE_CHARS: usize = 1900;

/// 话者条目：(显示名, 声线名, ID)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeakerEntry {
    pub display_name: String,
    pub style_name: String,
    pub id: SpeakerId,
}

impl SpeakerEntry {
    pub fn new(display_name: impl Into<String>, style_name: impl Into<String>, id: SpeakerId) -> Self {
        Self {
            display_name: display_name.into(),
            style_name: style_name.into(),
            id,
        }
    }

    /// 列表中的一行
    pub fn to_line(&self) -> String {
        format!("{} ({}): {}", self.display_name, self.style_name, self.id)
    }
}

/// 从引擎取得的话者集合，保持引擎返回的顺序
#[derive(Debug, Clone)]
pub struct SpeakerCatalog {
    entries: Vec<SpeakerEntry>,
}

impl SpeakerCatalog {
    pub fn new(entries: Vec<SpeakerEntry>) -> Self {
        Self { entries }
    }

    pub fn contains(&self, id: SpeakerId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().map(SpeakerEntry::to_line).collect()
    }
}

/// 按字符数分页
///
/// 规则：
/// 1. 行之间用 `\n` 连接，换行符计入长度
/// 2. 一行永远不会被拆到两页
/// 3. 超过上限的单行独占一页，并截断为 `max_chars` 个字符（末尾为 `…`）
///
/// 没有超长行时 `pages.join("\n") == lines.join("\n")`，每页都不超过 `max_chars`
pub fn paginate<S: AsRef<str>>(lines: &[S], max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut pages: Vec<String> = Vec::new();
    // (当前页内容, 当前页字符数)
    let mut current: Option<(String, usize)> = None;

    for line in lines {
        let (line, line_chars) = fit_line(line.as_ref(), max_chars);

        current = match current.take() {
            Some((mut page, chars)) if chars + 1 + line_chars <= max_chars => {
                page.push('\n');
                page.push_str(&line);
                Some((page, chars + 1 + line_chars))
            }
            Some((page, _)) => {
                pages.push(page);
                Some((line, line_chars))
            }
            None => Some((line, line_chars)),
        };
    }

    if let Some((page, _)) = current {
        pages.push(page);
    }

    pages
}

/// 超长行截断到 `max_chars` 个字符
fn fit_line(line: &str, max_chars: usize) -> (String, usize) {
    let chars = line.chars().count();
    if chars <= max_chars {
        return (line.to_string(), chars);
    }
    let mut fitted: String = line.chars().take(max_chars - 1).collect();
    fitted.push('…');
    (fitted, max_chars)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(n: u32) -> Vec<String> {
        (0..n)
            .map(|i| SpeakerEntry::new("四国めたん", "ノーマル", SpeakerId::new(i)).to_line())
            .collect()
    }

    #[test]
    fn test_entry_line() {
        let entry = SpeakerEntry::new("ずんだもん", "あまあま", SpeakerId::new(1));
        assert_eq!(entry.to_line(), "ずんだもん (あまあま): 1");
    }

    #[test]
    fn test_single_page_when_short() {
        let lines = entries(3);
        let pages = paginate(&lines, DEFAULT_PAGE_CHARS);
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0], lines.join("\n"));
    }

    #[test]
    fn test_splits_without_breaking_entries() {
        let lines = entries(300);
        let total: usize = lines.iter().map(|l| l.chars().count() + 1).sum();
        assert!(total > DEFAULT_PAGE_CHARS);

        let pages = paginate(&lines, DEFAULT_PAGE_CHARS);
        assert!(pages.len() >= 2);

        for page in &pages {
            assert!(page.chars().count() <= DEFAULT_PAGE_CHARS);
            for line in page.split('\n') {
                assert!(lines.iter().any(|l| l == line), "split entry: {}", line);
            }
        }

        assert_eq!(pages.join("\n"), lines.join("\n"));
    }

    #[test]
    fn test_oversized_line_is_truncated_on_own_page() {
        let long = "あ".repeat(30);
        let lines = vec!["短い".to_string(), long, "次".to_string()];
        let pages = paginate(&lines, 10);

        let truncated = format!("{}…", "あ".repeat(9));
        assert_eq!(pages, vec!["短い".to_string(), truncated, "次".to_string()]);
        assert!(pages.iter().all(|p| p.chars().count() <= 10));
    }

    #[test]
    fn test_line_at_limit_is_kept() {
        let exact = "い".repeat(10);
        let pages = paginate(&[exact.as_str()], 10);
        assert_eq!(pages, vec![exact]);
    }

    #[test]
    fn test_empty_input() {
        let lines: Vec<String> = Vec::new();
        assert!(paginate(&lines, DEFAULT_PAGE_CHARS).is_empty());
    }

    #[test]
    fn test_catalog_contains() {
        let catalog = SpeakerCatalog::new(vec![
            SpeakerEntry::new("四国めたん", "ノーマル", SpeakerId::new(2)),
            SpeakerEntry::new("ずんだもん", "ノーマル", SpeakerId::new(3)),
        ]);
        assert!(catalog.contains(SpeakerId::new(3)));
        assert!(!catalog.contains(SpeakerId::new(1)));
        assert_eq!(catalog.len(), 2);
    }
}
