//! Fee list of one origin region
//!
//! Pages through the fees leaving an origin region, tracks row selection
//! and deletes one or many fees.

use std::collections::BTreeSet;

use fee_client::{ClientResult, ShippingFeeApi};
use shared::models::{ShippingFee, ShippingFeeQuery};
use shared::util::format_update_day;
use shared::PageMeta;

use crate::config::EditorConfig;
use crate::notice::Notice;

/// Result of a multi-delete
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteReport {
    pub deleted: Vec<i64>,
    /// Failed ids with the backend's message
    pub failed: Vec<(i64, String)>,
}

impl DeleteReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// Summary notice for the host UI
    pub fn to_notice(&self) -> Notice {
        match (self.deleted.len(), self.failed.len()) {
            (n, 0) => Notice::success(format!("{} shipping fee(s) deleted", n)),
            (0, _) => Notice::error(format!(
                "Failed to delete shipping fees: {}",
                self.failure_text()
            )),
            (n, _) => Notice::warning(format!(
                "{} shipping fee(s) deleted, {} failed: {}",
                n,
                self.failed.len(),
                self.failure_text()
            )),
        }
    }

    fn failure_text(&self) -> String {
        self.failed
            .iter()
            .map(|(id, msg)| format!("#{} {}", id, msg))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone)]
pub struct FeeListing {
    origin: String,
    page: u32,
    limit: u32,
    rows: Vec<ShippingFee>,
    meta: PageMeta,
    selected: BTreeSet<i64>,
}

impl FeeListing {
    pub fn new(origin: impl Into<String>, config: &EditorConfig) -> Self {
        let limit = config.page_size.max(1);
        Self {
            origin: origin.into(),
            page: 1,
            limit,
            rows: Vec::new(),
            meta: PageMeta::new(0, 1, limit),
            selected: BTreeSet::new(),
        }
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn rows(&self) -> &[ShippingFee] {
        &self.rows
    }

    pub fn meta(&self) -> &PageMeta {
        &self.meta
    }

    fn query(&self) -> ShippingFeeQuery {
        ShippingFeeQuery::from_region(self.origin.clone()).paginate(self.page, self.limit)
    }

    /// Reload the current page
    ///
    /// Selected ids that are no longer on the page are dropped.
    pub async fn refresh(&mut self, api: &dyn ShippingFeeApi) -> ClientResult<()> {
        let response = api.list_shipping_fees(&self.query()).await.map_err(|e| {
            tracing::error!(origin = %self.origin, page = self.page, error = %e, "Failed to load shipping fees");
            e
        })?;
        self.rows = response.data;
        self.meta = response.meta;
        let visible: BTreeSet<i64> = self.rows.iter().map(|r| r.id).collect();
        self.selected.retain(|id| visible.contains(id));
        tracing::debug!(origin = %self.origin, page = self.page, rows = self.rows.len(), "Shipping fees loaded");
        Ok(())
    }

    /// Jump to a page (clamped to `>= 1`) and load it
    pub async fn go_to_page(&mut self, page: u32, api: &dyn ShippingFeeApi) -> ClientResult<()> {
        self.page = page.max(1);
        self.refresh(api).await
    }

    // ==================== Row selection ====================

    pub fn toggle_row(&mut self, id: i64) -> bool {
        if self.selected.remove(&id) {
            false
        } else {
            self.selected.insert(id);
            true
        }
    }

    /// Select every row, or clear when all are already selected
    pub fn toggle_all(&mut self) {
        if self.is_all_selected() {
            self.selected.clear();
        } else {
            self.selected = self.rows.iter().map(|r| r.id).collect();
        }
    }

    pub fn is_all_selected(&self) -> bool {
        !self.rows.is_empty() && self.rows.iter().all(|r| self.selected.contains(&r.id))
    }

    pub fn is_selected(&self, id: i64) -> bool {
        self.selected.contains(&id)
    }

    pub fn selected_ids(&self) -> Vec<i64> {
        self.selected.iter().copied().collect()
    }

    /// "Last update" column of a row
    pub fn update_day(row: &ShippingFee) -> String {
        format_update_day(row.updated_at)
    }

    // ==================== Delete ====================

    /// Delete the selected fees concurrently, then reload the page
    pub async fn delete_selected(&mut self, api: &dyn ShippingFeeApi) -> DeleteReport {
        let ids = self.selected_ids();
        self.delete_many(&ids, api).await
    }

    /// Delete a single row
    pub async fn delete_one(&mut self, id: i64, api: &dyn ShippingFeeApi) -> DeleteReport {
        self.delete_many(&[id], api).await
    }

    async fn delete_many(&mut self, ids: &[i64], api: &dyn ShippingFeeApi) -> DeleteReport {
        let mut report = DeleteReport::default();
        if ids.is_empty() {
            return report;
        }

        for (id, result) in api.delete_shipping_fees(ids).await {
            match result {
                Ok(()) => {
                    self.selected.remove(&id);
                    report.deleted.push(id);
                }
                Err(e) => {
                    tracing::error!(fee_id = id, error = %e, "Failed to delete shipping fee");
                    report
                        .failed
                        .push((id, e.user_message("Failed to delete shipping fee")));
                }
            }
        }
        tracing::info!(deleted = report.deleted.len(), failed = report.failed.len(), "Shipping fee delete finished");

        if !report.deleted.is_empty()
            && let Err(e) = self.refresh(api).await
        {
            tracing::warn!(error = %e, "Reload after delete failed");
        }
        report
    }
}
