//! Currency tables migration.
//!
//! Creates the exchange rate table and the money amount table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(CURRENCY_TABLES_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            "DROP TABLE IF EXISTS money_amounts CASCADE;
             DROP TABLE IF EXISTS currency_exchange_rates CASCADE;",
        )
        .await?;
        Ok(())
    }
}

const CURRENCY_TABLES_SQL: &str = r"
-- Exchange rates against the system base currency, with display rules
CREATE TABLE currency_exchange_rates (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    iso_code VARCHAR(8) NOT NULL,
    name VARCHAR(64) NOT NULL DEFAULT '',
    symbol VARCHAR(8) NOT NULL DEFAULT '',
    exchange_rate NUMERIC(19, 10) NOT NULL,
    decimal_mark VARCHAR(8) NOT NULL DEFAULT ',',
    thousand_mark VARCHAR(8) NOT NULL DEFAULT ' ',
    decimal_places SMALLINT NOT NULL DEFAULT 2,
    remove_trailing_zeros BOOLEAN NOT NULL DEFAULT TRUE,
    active BOOLEAN NOT NULL DEFAULT FALSE,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_exchange_rate_positive CHECK (exchange_rate > 0),
    CONSTRAINT chk_decimal_places_range CHECK (decimal_places BETWEEN 0 AND 10),
    CONSTRAINT chk_iso_code_upper CHECK (iso_code = upper(iso_code))
);

-- At most one active rate per currency
CREATE UNIQUE INDEX idx_currency_rates_active_code
    ON currency_exchange_rates(iso_code) WHERE active;

CREATE INDEX idx_currency_rates_code ON currency_exchange_rates(iso_code);

-- Money amounts with their base currency snapshot.
-- Unconstrained NUMERIC keeps every digit of amount * rate.
CREATE TABLE money_amounts (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    amount NUMERIC NOT NULL DEFAULT 0,
    currency VARCHAR(8) NOT NULL,
    base_amount NUMERIC NOT NULL DEFAULT 0,
    base_currency VARCHAR(8) NOT NULL,
    base_exchange_rate NUMERIC NOT NULL DEFAULT 1,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_base_exchange_rate_positive CHECK (base_exchange_rate > 0)
);

CREATE INDEX idx_money_amounts_currency ON money_amounts(currency);
";
