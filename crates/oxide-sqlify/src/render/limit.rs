//! LIMIT / OFFSET rendering.

use tracing::debug;

use super::Renderer;
use crate::ast::Limit;
use crate::dialect::LimitStyle;
use crate::Result;

impl Renderer {
    /// Renders a normalized limit in the dialect's spelling; empty when absent.
    ///
    /// # Errors
    ///
    /// See [`Renderer::expr`].
    pub fn limit(&self, limit: Option<&Limit>) -> Result<String> {
        let Some(limit) = limit else {
            return Ok(String::new());
        };
        let count = limit.count.as_ref().map(|e| self.expr(e)).transpose()?;
        let offset = limit.offset.as_ref().map(|e| self.expr(e)).transpose()?;

        // LIMIT has no spelling for PERCENT or WITH TIES.
        if let (Some(count), false) = (&count, limit.fetch_suffix.is_empty()) {
            debug!(suffix = ?limit.fetch_suffix, "Rendering limit as FETCH to keep modifiers");
            return Ok(self.fetch(count, offset.as_deref(), &limit.fetch_suffix.join(" ")));
        }

        let sql = match self.dialect().limit_style() {
            LimitStyle::LimitOffset => match (count, offset) {
                (Some(count), Some(offset))
                    if limit.comma && self.dialect().supports_limit_comma() =>
                {
                    format!("LIMIT {offset}, {count}")
                }
                (Some(count), Some(offset)) => format!("LIMIT {count} OFFSET {offset}"),
                (Some(count), None) => format!("LIMIT {count}"),
                (None, Some(offset)) => format!("OFFSET {offset}"),
                (None, None) => String::new(),
            },
            LimitStyle::FetchOffset => match (count, offset) {
                (Some(count), offset) => self.fetch(&count, offset.as_deref(), "ROWS ONLY"),
                (None, Some(offset)) => format!("OFFSET {offset} ROWS"),
                (None, None) => String::new(),
            },
        };
        Ok(sql)
    }

    /// `[OFFSET o ROWS] FETCH {FIRST | NEXT} c <suffix>`. Dialects that only
    /// accept FETCH after an offset get `OFFSET 0 ROWS`.
    fn fetch(&self, count: &str, offset: Option<&str>, suffix: &str) -> String {
        match offset {
            Some(offset) => format!("OFFSET {offset} ROWS FETCH NEXT {count} {suffix}"),
            None if self.dialect().requires_offset_before_fetch() => {
                format!("OFFSET 0 ROWS FETCH NEXT {count} {suffix}")
            }
            None => format!("FETCH FIRST {count} {suffix}"),
        }
    }
}
