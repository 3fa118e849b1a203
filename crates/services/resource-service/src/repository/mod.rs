//! Repository layer for data access.
//!
//! One generic implementation serves every table; tables plug in through
//! [`RecordEntity`].

mod condition;
pub mod entities;
mod ops;
mod outcome;
mod pagination;
mod record_entity;
mod store;

pub use outcome::{Destroyed, DestroyedOne, Updated, UpdatedOne, Upserted};
pub use pagination::{next_cursor, PageRequest};
pub use record_entity::RecordEntity;
pub use store::{EntityRepository, SeaRepository, TxRepository};

#[cfg(any(test, feature = "test-utils"))]
pub use store::MockEntityRepository;

use std::sync::Arc;

/// Shared handle to the repository serving entity `E`
pub type DynRepository<E> = Arc<
    dyn EntityRepository<
        <E as RecordEntity>::Record,
        <E as RecordEntity>::Create,
        <E as RecordEntity>::Patch,
    >,
>;
