//! Domain types and models

pub mod acta;
pub mod inventory;
pub mod session;
pub mod store;
pub mod user;

pub use acta::{
    acta_file_name, ActaDocument, ActaItem, ActaLocation, ActaNotification, ApprovalResponse,
    ConfirmationOutcome, ConfirmationRequest, DashboardFilter, Movement, Responsible,
};
pub use inventory::{
    AssignedUser, InventoryEnvelope, InventoryField, InventoryItem, InventoryKey,
};
pub use session::{is_safe_redirect, Session};
pub use store::{Store, StoreRef};
pub use user::{User, UserId};
