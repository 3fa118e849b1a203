//! Unit of Work: one database transaction around a unit of business logic.
//!
//! The closure receives a [`TransactionContext`] whose repositories all
//! write through the same transaction. It commits when the closure returns
//! `Ok` and rolls back otherwise.

use std::future::Future;
use std::pin::Pin;

use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};

use common::AppResult;

use crate::repository::{RecordEntity, SeaRepository, TxRepository};

/// Boxed future returned by transaction closures
pub type TxFuture<'a, T> = Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'a>>;

/// Repository access inside one open transaction.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Repository for entity `E` bound to this transaction
    pub fn repo<E: RecordEntity>(&self) -> TxRepository<'a, E> {
        TxRepository::new(self.txn)
    }
}

/// Owns the connection pool and hands out repositories and transactions.
#[derive(Clone)]
pub struct Persistence {
    db: DatabaseConnection,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Pooled repository for entity `E`
    pub fn repository<E: RecordEntity>(&self) -> SeaRepository<E> {
        SeaRepository::new(self.db.clone())
    }

    /// Run `f` in a transaction; commits on `Ok`, rolls back otherwise.
    pub async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        let txn = self.db.begin().await?;
        let outcome = f(TransactionContext::new(&txn)).await;

        match outcome {
            Ok(result) => {
                txn.commit().await?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

/// Shorthand for [`Persistence::transaction`] with an async block body.
#[macro_export]
macro_rules! with_transaction {
    ($persistence:expr, |$ctx:ident| $body:expr) => {
        $persistence
            .transaction(|$ctx| Box::pin(async move { $body }))
            .await
    };
}
