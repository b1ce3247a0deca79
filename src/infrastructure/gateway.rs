//! Persistence gateway
//!
//! Owns the one store connection for the life of the program. Every service
//! borrows the gateway; nothing holds a connection of its own.

use sea_orm::{
    ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbErr, QueryResult, Statement,
    TransactionTrait, Value,
};

use super::db::init_db;

pub struct Gateway {
    conn: DatabaseConnection,
}

impl Gateway {
    /// Connect and make sure the schema exists.
    pub async fn open(database_url: &str) -> Result<Self, DbErr> {
        let conn = init_db(database_url).await?;
        tracing::info!("Connected to the database");
        Ok(Self { conn })
    }

    /// Underlying connection, for entity-level queries.
    pub fn conn(&self) -> &DatabaseConnection {
        &self.conn
    }

    fn statement(&self, sql: &str, params: Vec<Value>) -> Statement {
        Statement::from_sql_and_values(self.conn.get_database_backend(), sql, params)
    }

    /// Run one mutating statement as its own atomic unit.
    ///
    /// Commits on success. On failure the statement is rolled back and the
    /// store error is returned. Returns the number of affected rows.
    pub async fn execute(&self, sql: &str, params: Vec<Value>) -> Result<u64, DbErr> {
        let stmt = self.statement(sql, params);
        let txn = self.conn.begin().await?;

        match txn.execute(stmt).await {
            Ok(result) => {
                txn.commit().await?;
                Ok(result.rows_affected())
            }
            Err(e) => {
                tracing::error!("Error executing statement: {}", e);
                txn.rollback().await?;
                Err(e)
            }
        }
    }

    pub async fn fetch_one(
        &self,
        sql: &str,
        params: Vec<Value>,
    ) -> Result<Option<QueryResult>, DbErr> {
        self.conn.query_one(self.statement(sql, params)).await
    }

    pub async fn fetch_all(&self, sql: &str, params: Vec<Value>) -> Result<Vec<QueryResult>, DbErr> {
        self.conn.query_all(self.statement(sql, params)).await
    }

    /// Start a store transaction spanning several writes.
    ///
    /// Dropping the returned transaction without committing rolls it back.
    pub async fn begin(&self) -> Result<DatabaseTransaction, DbErr> {
        self.conn.begin().await
    }

    pub async fn close(self) -> Result<(), DbErr> {
        self.conn.close().await?;
        tracing::info!("Database connection closed");
        Ok(())
    }
}
