use anyhow::Result;
use sqlx::PgPool;

/// Create ledger tables if they do not exist yet
pub async fn init_schema(pool: &PgPool) -> Result<()> {
    tracing::info!("Initializing ledger schema...");

    for (name, ddl) in [
        ("clients table", CREATE_CLIENTS_TABLE),
        ("accounts table", CREATE_ACCOUNTS_TABLE),
        ("accounts client index", CREATE_ACCOUNTS_CLIENT_INDEX),
        ("transactions table", CREATE_TRANSACTIONS_TABLE),
        ("transactions from index", CREATE_TRANSACTIONS_FROM_INDEX),
        ("transactions to index", CREATE_TRANSACTIONS_TO_INDEX),
    ] {
        sqlx::query(ddl)
            .execute(pool)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to create {}: {}", name, e))?;
    }

    tracing::info!("Ledger schema initialized successfully");
    Ok(())
}

/// Client profiles; the ledger only reads `id`
pub const CREATE_CLIENTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS clients (
    id                BIGSERIAL PRIMARY KEY,
    first_name        TEXT NOT NULL,
    last_name         TEXT NOT NULL,
    email             TEXT NOT NULL UNIQUE,
    residence_address TEXT,
    birth_date        DATE NOT NULL,
    created_at        TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

/// Accounts; `balance >= 0` is enforced by the store itself
pub const CREATE_ACCOUNTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS accounts (
    id             BIGSERIAL PRIMARY KEY,
    client_id      BIGINT NOT NULL REFERENCES clients(id),
    account_number VARCHAR(32) NOT NULL UNIQUE,
    balance        NUMERIC(20, 2) NOT NULL DEFAULT 0
                   CONSTRAINT accounts_balance_non_negative CHECK (balance >= 0),
    created_at     TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

pub const CREATE_ACCOUNTS_CLIENT_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_accounts_client_id ON accounts (client_id)";

/// Immutable transfer records
pub const CREATE_TRANSACTIONS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS transactions (
    id              TEXT PRIMARY KEY DEFAULT gen_random_uuid()::text,
    from_account_id BIGINT NOT NULL REFERENCES accounts(id),
    to_account_id   BIGINT NOT NULL REFERENCES accounts(id),
    amount          NUMERIC(20, 2) NOT NULL CHECK (amount > 0),
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    CONSTRAINT transactions_distinct_accounts CHECK (from_account_id <> to_account_id)
)
"#;

pub const CREATE_TRANSACTIONS_FROM_INDEX: &str = "CREATE INDEX IF NOT EXISTS idx_transactions_from \
     ON transactions (from_account_id, created_at DESC)";

pub const CREATE_TRANSACTIONS_TO_INDEX: &str = "CREATE INDEX IF NOT EXISTS idx_transactions_to \
     ON transactions (to_account_id, created_at DESC)";
