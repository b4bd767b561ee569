//! Zone Editor - shipping zone partition editor
//!
//! Splits the cities of a destination region into named, priced zones.
//! Cities move between zones and the unassigned pool through multi-select
//! and drag-and-drop; the result is saved to the shipping fee backend
//! through [`fee_client`].
//!
//! # Example
//!
//! ```
//! use zone_editor::{Partition, TransferTarget};
//! use shared::models::City;
//!
//! let mut partition = Partition::new(vec![City::new(1, "A"), City::new(2, "B"), City::new(3, "C")]);
//! let north = partition.create_zone("North", 500.0);
//! partition.transfer(&[1, 2], TransferTarget::Zone(north)).unwrap();
//! assert_eq!(partition.unassigned(), vec![3]);
//! ```

pub mod config;
pub mod error;
pub mod listing;
pub mod logger;
pub mod money;
pub mod notice;
pub mod partition;
pub mod persistence;
pub mod selection;
pub mod session;
pub mod transfer;
pub mod zone;

pub use config::EditorConfig;
pub use error::{EditorError, EditorResult};
pub use listing::{DeleteReport, FeeListing};
pub use notice::{Notice, NoticeLevel};
pub use partition::Partition;
pub use persistence::{
    EditorMode, FixedPrices, LoadReport, LoadTicket, LoadedData, SaveFailure, SaveOutcome,
    SavePlan,
};
pub use selection::Selection;
pub use session::{ActiveView, EditorSession, ZoneEdit};
pub use transfer::{DragPayload, EditorKey, KeyOutcome, TransferTarget};
pub use zone::{Zone, ZoneRef};
