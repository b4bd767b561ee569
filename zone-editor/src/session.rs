//! Editor session
//!
//! One [`EditorSession`] lives for as long as the zone editor is open. It
//! owns the catalog and partition, the selection, the active tab, the fixed
//! prices, the zone edit buffer, load/save state and pending notices.
//!
//! Network work is split in two phases so a host event loop never holds the
//! session across an await:
//!
//! ```text
//! begin_load()  -> LoadTicket  -- ticket.fetch(..).await --> apply_load(ticket, result)
//! begin_save()  -> SavePlan    -- plan.execute(..).await  --> finish_save(result)
//! ```
//!
//! [`EditorSession::load`] and [`EditorSession::save`] combine the phases.

use fee_client::{ClientResult, RegionApi, ShippingFeeApi};
use shared::error::{AppError, ErrorCode};
use shared::models::{City, CityId, ShippingFee};

use crate::config::EditorConfig;
use crate::error::{EditorError, EditorResult};
use crate::money::parse_price_input;
use crate::notice::Notice;
use crate::partition::Partition;
use crate::persistence::{
    EditorMode, FixedPrices, LoadReport, LoadTicket, LoadedData, SaveFailure, SaveOutcome,
    SavePlan, partition_from_fee,
};
use crate::selection::Selection;
use crate::transfer::{DragPayload, EditorKey, KeyOutcome, TransferTarget};
use crate::zone::{Zone, ZoneRef, default_title};

/// Tab currently shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveView {
    Zone(ZoneRef),
    Unassigned,
}

impl ActiveView {
    /// Drop target matching this tab
    pub fn target(&self) -> TransferTarget {
        match self {
            Self::Zone(zone_ref) => TransferTarget::Zone(*zone_ref),
            Self::Unassigned => TransferTarget::Unassigned,
        }
    }
}

/// Uncommitted title / price edits of one zone
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneEdit {
    pub zone_ref: ZoneRef,
    pub title: String,
    pub price: f64,
}

#[derive(Debug)]
pub struct EditorSession {
    config: EditorConfig,
    mode: EditorMode,
    partition: Partition,
    selection: Selection,
    active: ActiveView,
    prices: FixedPrices,
    zone_edit: Option<ZoneEdit>,
    /// Bumped whenever pending loads must be ignored
    epoch: u64,
    loading: bool,
    saving: bool,
    closed: bool,
    notices: Vec<Notice>,
}

impl EditorSession {
    fn with_mode(mode: EditorMode, prices: FixedPrices, config: EditorConfig) -> Self {
        Self {
            config,
            mode,
            partition: Partition::default(),
            selection: Selection::new(),
            active: ActiveView::Unassigned,
            prices,
            zone_edit: None,
            epoch: 0,
            loading: false,
            saving: false,
            closed: false,
            notices: Vec::new(),
        }
    }

    /// Editor for a new fee leaving `from_region`
    pub fn new_fee(from_region: impl Into<String>, config: EditorConfig) -> Self {
        Self::with_mode(
            EditorMode::Create {
                from_region: from_region.into(),
                to_region: None,
            },
            FixedPrices::default(),
            config,
        )
    }

    /// Editor for an existing fee (typically a list row)
    pub fn open(fee: &ShippingFee, config: EditorConfig) -> Self {
        Self::with_mode(
            EditorMode::Edit {
                fee_id: fee.id,
                from_region: fee.from_region_code.clone(),
                to_region: fee.to_region_code.clone(),
            },
            FixedPrices::from_fee(fee),
            config,
        )
    }

    // ==================== State ====================

    pub fn mode(&self) -> &EditorMode {
        &self.mode
    }

    pub fn fee_id(&self) -> Option<i64> {
        self.mode.fee_id()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    pub fn zones(&self) -> &[Zone] {
        self.partition.zones()
    }

    pub fn catalog(&self) -> &[City] {
        self.partition.catalog()
    }

    /// Cities of a zone in catalog order
    pub fn zone_cities(&self, zone_ref: ZoneRef) -> Vec<&City> {
        self.cities(self.partition.zone_cities(zone_ref))
    }

    pub fn unassigned_cities(&self) -> Vec<&City> {
        self.cities(self.partition.unassigned())
    }

    fn cities(&self, ids: Vec<CityId>) -> Vec<&City> {
        ids.into_iter()
            .filter_map(|id| self.partition.city(id))
            .collect()
    }

    pub fn fixed_prices(&self) -> FixedPrices {
        self.prices
    }

    /// Replace the fixed prices; they are validated on save
    pub fn set_fixed_prices(&mut self, prices: FixedPrices) -> EditorResult<()> {
        self.ensure_open()?;
        self.prices = prices;
        Ok(())
    }

    fn ensure_open(&self) -> EditorResult<()> {
        if self.closed {
            return Err(EditorError::Closed);
        }
        Ok(())
    }

    fn ensure_idle(&self) -> EditorResult<()> {
        self.ensure_open()?;
        if self.saving {
            return Err(EditorError::SaveInProgress);
        }
        Ok(())
    }

    fn ensure_ready(&self) -> EditorResult<()> {
        self.ensure_open()?;
        if self.loading {
            return Err(EditorError::NotReady);
        }
        Ok(())
    }

    fn push_notice(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    // ==================== Notices ====================

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Take all pending notices
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    // ==================== Lifecycle ====================

    /// Pick the destination of a new fee
    ///
    /// Clears the partition and invalidates pending loads. Call
    /// [`begin_load`](Self::begin_load) afterwards to fetch its cities.
    /// Rejected with [`EditorError::SaveInProgress`] while a save is in flight.
    pub fn set_destination(&mut self, region_code: impl Into<String>) -> EditorResult<()> {
        self.ensure_idle()?;
        let region_code = region_code.into();
        match &mut self.mode {
            EditorMode::Create { to_region, .. } => {
                if to_region.as_deref() == Some(region_code.as_str()) {
                    return Ok(());
                }
                *to_region = Some(region_code);
            }
            EditorMode::Edit { .. } => {
                return Err(EditorError::validation(
                    "Destination of an existing shipping fee cannot change",
                ));
            }
        }
        self.reset()
    }

    /// Drop all zones, the catalog and the selection; pending loads become stale
    pub fn reset(&mut self) -> EditorResult<()> {
        self.ensure_idle()?;
        self.epoch += 1;
        self.loading = false;
        self.partition = Partition::default();
        self.selection.clear();
        self.active = ActiveView::Unassigned;
        self.zone_edit = None;
        Ok(())
    }

    /// Close the editor; every later mutation fails with [`EditorError::Closed`]
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.epoch += 1;
        self.loading = false;
        self.selection.clear();
        self.zone_edit = None;
        tracing::debug!(fee_id = ?self.fee_id(), "Zone editor closed");
    }

    // ==================== Load ====================

    /// Start loading the destination's cities (and the fee when editing)
    ///
    /// Any load started earlier becomes stale.
    pub fn begin_load(&mut self) -> EditorResult<LoadTicket> {
        self.ensure_open()?;
        let region_code = self
            .mode
            .to_region()
            .ok_or_else(|| EditorError::Validation(AppError::new(ErrorCode::DestinationRequired)))?
            .to_string();
        self.epoch += 1;
        self.loading = true;
        Ok(LoadTicket {
            epoch: self.epoch,
            region_code,
            fee_id: self.mode.fee_id(),
        })
    }

    /// Apply the result of [`LoadTicket::fetch`]
    ///
    /// Results of superseded loads are discarded with
    /// [`EditorError::StaleLoad`]. A failed load leaves the editor open with
    /// no zones and queues an error notice.
    pub fn apply_load(
        &mut self,
        ticket: LoadTicket,
        result: ClientResult<LoadedData>,
    ) -> EditorResult<LoadReport> {
        self.ensure_open()?;
        if ticket.epoch != self.epoch {
            tracing::warn!(
                region = %ticket.region_code,
                ticket_epoch = ticket.epoch,
                epoch = self.epoch,
                "Discarding stale load result"
            );
            return Err(EditorError::StaleLoad);
        }
        self.loading = false;

        let data = match result {
            Ok(data) => data,
            Err(e) => {
                tracing::error!(region = %ticket.region_code, fee_id = ?ticket.fee_id, error = %e, "Failed to load shipping zones");
                self.partition.clear_zones();
                self.active = ActiveView::Unassigned;
                self.push_notice(Notice::error(e.user_message("Failed to load shipping zones")));
                return Err(e.into());
            }
        };

        let LoadedData { cities, fee } = data;
        let (partition, report) =
            partition_from_fee(cities, fee.as_ref(), &self.config.zone_title_prefix);
        if let Some(fee) = &fee {
            self.prices = FixedPrices::from_fee(fee);
        }
        if !report.unknown_cities.is_empty() {
            tracing::warn!(cities = ?report.unknown_cities, "Dropped zone cities outside the destination catalog");
        }
        if !report.contested_cities.is_empty() {
            tracing::warn!(cities = ?report.contested_cities, "Cities claimed by several zones kept by the first");
        }

        self.partition = partition;
        self.selection.clear();
        self.zone_edit = None;
        self.active = self.first_view();
        tracing::info!(
            region = %ticket.region_code,
            fee_id = ?ticket.fee_id,
            cities = self.partition.catalog().len(),
            zones = self.partition.zone_count(),
            "Zone editor loaded"
        );
        Ok(report)
    }

    /// Load in one call
    pub async fn load(
        &mut self,
        regions: &dyn RegionApi,
        fees: &dyn ShippingFeeApi,
    ) -> EditorResult<LoadReport> {
        let ticket = self.begin_load()?;
        let result = ticket.fetch(regions, fees).await;
        self.apply_load(ticket, result)
    }

    // ==================== Active view ====================

    pub fn active_view(&self) -> ActiveView {
        self.active
    }

    /// Tab index: zones first, the unassigned pool last
    pub fn active_tab(&self) -> usize {
        match self.active {
            ActiveView::Zone(zone_ref) => self
                .partition
                .zone_index(zone_ref)
                .unwrap_or(self.partition.zone_count()),
            ActiveView::Unassigned => self.partition.zone_count(),
        }
    }

    /// Select a tab by index; out-of-range indexes select the unassigned pool
    pub fn set_active_tab(&mut self, index: usize) -> EditorResult<()> {
        let view = self
            .partition
            .zones()
            .get(index)
            .map(|z| ActiveView::Zone(z.zone_ref))
            .unwrap_or(ActiveView::Unassigned);
        self.set_active_view(view)
    }

    /// Switch tabs; an open zone edit is cancelled
    pub fn set_active_view(&mut self, view: ActiveView) -> EditorResult<()> {
        self.ensure_open()?;
        if let ActiveView::Zone(zone_ref) = view
            && self.partition.zone(zone_ref).is_none()
        {
            return Err(EditorError::UnknownZone(zone_ref));
        }
        if view != self.active {
            self.zone_edit = None;
            self.active = view;
        }
        Ok(())
    }

    fn first_view(&self) -> ActiveView {
        self.partition
            .zones()
            .first()
            .map(|z| ActiveView::Zone(z.zone_ref))
            .unwrap_or(ActiveView::Unassigned)
    }

    // ==================== Selection ====================

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Click on a city chip
    pub fn toggle_city(&mut self, city: CityId) -> EditorResult<bool> {
        self.ensure_open()?;
        Ok(self.selection.toggle(city))
    }

    /// Select every city of the active tab; returns how many are selected
    pub fn select_active_view(&mut self) -> EditorResult<usize> {
        self.ensure_ready()?;
        let ids = self.partition.cities_at(self.active.target());
        self.selection.select_all(ids);
        Ok(self.selection.len())
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn handle_key(&mut self, key: EditorKey) -> KeyOutcome {
        if self.closed {
            return KeyOutcome::Ignored;
        }
        match key {
            EditorKey::Escape if self.selection.is_empty() => KeyOutcome::CloseRequested,
            EditorKey::Escape => {
                self.selection.clear();
                KeyOutcome::SelectionCleared
            }
            EditorKey::SelectAll => match self.select_active_view() {
                Ok(count) => KeyOutcome::Selected(count),
                Err(_) => KeyOutcome::Ignored,
            },
        }
    }

    // ==================== Transfers ====================

    /// Payload for a drag starting on `city`
    pub fn drag_start(&self, city: CityId) -> DragPayload {
        DragPayload::for_drag_start(&self.selection, city)
    }

    /// Payload for dragging the whole selection
    pub fn drag_selection(&self) -> Option<DragPayload> {
        DragPayload::from_selection(&self.selection)
    }

    /// Move cities without touching the selection
    pub fn transfer(&mut self, city_ids: &[CityId], target: TransferTarget) -> EditorResult<usize> {
        self.ensure_ready()?;
        let moved = self.partition.transfer(city_ids, target)?;
        tracing::debug!(requested = city_ids.len(), moved, target = ?target, "Cities transferred");
        Ok(moved)
    }

    /// Complete a drop; the selection is cleared afterwards
    pub fn drop_payload(&mut self, target: TransferTarget, payload: &DragPayload) -> EditorResult<usize> {
        self.ensure_ready()?;
        if payload.is_empty() {
            tracing::warn!("Ignoring empty drop");
            return Ok(0);
        }
        let moved = self.transfer(payload.ids(), target)?;
        self.selection.clear();
        Ok(moved)
    }

    /// Complete a drop from raw drag data text
    ///
    /// Malformed text aborts the drop without changing anything.
    pub fn drop_on(&mut self, target: TransferTarget, raw: &str) -> EditorResult<usize> {
        self.ensure_ready()?;
        match DragPayload::parse(raw) {
            Some(payload) => self.drop_payload(target, &payload),
            None => {
                tracing::warn!(raw, "Ignoring malformed drop payload");
                Ok(0)
            }
        }
    }

    /// The "×" on a city chip of a zone being edited
    pub fn remove_city(&mut self, zone_ref: ZoneRef, city: CityId) -> EditorResult<bool> {
        self.ensure_ready()?;
        self.partition.remove_city(zone_ref, city)
    }

    // ==================== Zones ====================

    /// Append "Zone N" at price 0 and switch to it
    pub fn add_zone(&mut self) -> EditorResult<ZoneRef> {
        self.ensure_ready()?;
        let title = default_title(
            &self.config.zone_title_prefix,
            self.partition.zone_count() + 1,
        );
        let zone_ref = self.partition.create_zone(title, 0.0);
        self.set_active_view(ActiveView::Zone(zone_ref))?;
        Ok(zone_ref)
    }

    pub fn create_zone(&mut self, title: impl Into<String>, price: f64) -> EditorResult<ZoneRef> {
        self.ensure_ready()?;
        Ok(self.partition.create_zone(title, price))
    }

    pub fn rename_zone(&mut self, zone_ref: ZoneRef, title: impl Into<String>) -> EditorResult<()> {
        self.ensure_ready()?;
        self.partition.rename_zone(zone_ref, title)
    }

    pub fn set_zone_price(&mut self, zone_ref: ZoneRef, price: f64) -> EditorResult<f64> {
        self.ensure_ready()?;
        self.partition.set_zone_price(zone_ref, price)
    }

    /// Delete a zone
    ///
    /// A persisted zone is deleted on the backend first; if that fails the
    /// zone and its cities stay and an error notice is queued.
    pub async fn delete_zone(&mut self, zone_ref: ZoneRef, api: &dyn ShippingFeeApi) -> EditorResult<()> {
        self.ensure_ready()?;
        let index = self
            .partition
            .zone_index(zone_ref)
            .ok_or(EditorError::UnknownZone(zone_ref))?;

        if let Some(id) = zone_ref.persisted_id() {
            if let Err(e) = api.delete_zone(id).await {
                tracing::error!(zone_id = id, error = %e, "Failed to delete zone");
                self.push_notice(Notice::error(e.user_message("Failed to delete zone")));
                return Err(e.into());
            }
            self.push_notice(Notice::success("Zone deleted"));
        }

        let zone = self.partition.delete_zone(zone_ref)?;
        if self.zone_edit.as_ref().is_some_and(|e| e.zone_ref == zone_ref) {
            self.zone_edit = None;
        }
        if self.active == ActiveView::Zone(zone_ref) {
            let zones = self.partition.zones();
            self.active = zones
                .get(index)
                .or_else(|| zones.last())
                .map(|z| ActiveView::Zone(z.zone_ref))
                .unwrap_or(ActiveView::Unassigned);
        }
        tracing::info!(zone = %zone_ref, title = %zone.title, "Zone removed from editor");
        Ok(())
    }

    // ==================== Zone edit buffer ====================

    pub fn zone_edit(&self) -> Option<&ZoneEdit> {
        self.zone_edit.as_ref()
    }

    /// Open the title / price editor of a zone and show its tab
    pub fn start_edit(&mut self, zone_ref: ZoneRef) -> EditorResult<()> {
        self.ensure_ready()?;
        let zone = self
            .partition
            .zone(zone_ref)
            .ok_or(EditorError::UnknownZone(zone_ref))?;
        let edit = ZoneEdit {
            zone_ref,
            title: zone.title.clone(),
            price: zone.price,
        };
        self.set_active_view(ActiveView::Zone(zone_ref))?;
        self.zone_edit = Some(edit);
        Ok(())
    }

    fn edit_mut(&mut self) -> EditorResult<&mut ZoneEdit> {
        self.ensure_open()?;
        self.zone_edit
            .as_mut()
            .ok_or_else(|| EditorError::validation("No zone is being edited"))
    }

    pub fn set_edit_title(&mut self, title: impl Into<String>) -> EditorResult<()> {
        self.edit_mut()?.title = title.into();
        Ok(())
    }

    pub fn set_edit_price(&mut self, price: f64) -> EditorResult<()> {
        self.edit_mut()?.price = price;
        Ok(())
    }

    /// Price typed as text; unparseable input counts as 0
    pub fn set_edit_price_input(&mut self, text: &str) -> EditorResult<()> {
        self.set_edit_price(parse_price_input(text))
    }

    /// Apply the buffer to its zone
    ///
    /// A blank title is rejected and the buffer stays open.
    pub fn commit_edit(&mut self) -> EditorResult<()> {
        self.ensure_ready()?;
        let Some(edit) = self.zone_edit.take() else {
            return Err(EditorError::validation("No zone is being edited"));
        };
        let title = edit.title.trim().to_string();
        if title.is_empty() {
            self.zone_edit = Some(edit);
            return Err(EditorError::Validation(AppError::new(ErrorCode::ZoneNameInvalid)));
        }
        self.partition.rename_zone(edit.zone_ref, title)?;
        self.partition.set_zone_price(edit.zone_ref, edit.price)?;
        Ok(())
    }

    /// Discard the buffer; returns whether one was open
    pub fn cancel_edit(&mut self) -> bool {
        self.zone_edit.take().is_some()
    }

    // ==================== Save ====================

    /// Validate and snapshot local state for saving
    ///
    /// Validation failures queue an error notice and make no request.
    pub fn begin_save(&mut self) -> EditorResult<SavePlan> {
        self.ensure_open()?;
        if self.saving {
            return Err(EditorError::SaveInProgress);
        }
        if self.loading {
            return Err(EditorError::NotReady);
        }
        let plan = match SavePlan::build(&self.mode, self.prices, &self.partition) {
            Ok(plan) => plan,
            Err(e) => {
                tracing::warn!(error = %e, "Save rejected by validation");
                self.push_notice(Notice::error(e.user_message("Invalid shipping fee")));
                return Err(e);
            }
        };
        self.saving = true;
        tracing::debug!(fee_id = ?self.fee_id(), zones = plan.zone_count(), "Saving shipping fee");
        Ok(plan)
    }

    /// Record the result of [`SavePlan::execute`]
    ///
    /// Success queues a notice and closes the editor. Failure keeps local
    /// state and the editor open; when the fee was created but its zones
    /// were not, the session switches to editing that fee so a retry
    /// updates it instead of creating a duplicate.
    pub fn finish_save(&mut self, result: Result<SaveOutcome, SaveFailure>) -> EditorResult<SaveOutcome> {
        self.saving = false;
        match result {
            Ok(outcome) => {
                self.adopt_fee_id(outcome.fee_id);
                let message = if outcome.created {
                    "Shipping fee created"
                } else {
                    "Shipping fee updated"
                };
                tracing::info!(fee_id = outcome.fee_id, zones = outcome.zone_count, created = outcome.created, "{}", message);
                self.push_notice(Notice::success(message));
                self.close();
                Ok(outcome)
            }
            Err(SaveFailure {
                created_fee_id,
                error,
            }) => {
                if let Some(fee_id) = created_fee_id {
                    tracing::warn!(fee_id, "Shipping fee created but its zones were not; retry will update");
                    self.adopt_fee_id(fee_id);
                }
                tracing::error!(fee_id = ?self.fee_id(), error = %error, "Failed to save shipping fee");
                self.push_notice(Notice::error(error.user_message("Failed to save shipping fee")));
                Err(error.into())
            }
        }
    }

    fn adopt_fee_id(&mut self, fee_id: i64) {
        if let EditorMode::Create {
            from_region,
            to_region: Some(to_region),
        } = &self.mode
        {
            self.mode = EditorMode::Edit {
                fee_id,
                from_region: from_region.clone(),
                to_region: to_region.clone(),
            };
        }
    }

    /// Save in one call
    pub async fn save(&mut self, api: &dyn ShippingFeeApi) -> EditorResult<SaveOutcome> {
        let plan = self.begin_save()?;
        let result = plan.execute(api).await;
        self.finish_save(result)
    }
}
