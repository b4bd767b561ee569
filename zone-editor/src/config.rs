//! Editor configuration

/// Default fee list page size
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Editor defaults
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    /// Prefix of generated zone titles ("Zone 1", "Zone 2", ...)
    pub zone_title_prefix: String,
    /// Rows per page in the fee list
    pub page_size: u32,
}

impl EditorConfig {
    pub fn with_zone_title_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.zone_title_prefix = prefix.into();
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            zone_title_prefix: "Zone".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}
