//! Analysis modal for complex queries.

pub mod modal;

pub use modal::{AnalysisModal, ModalView};
