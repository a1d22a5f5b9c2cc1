//! Forecast schema migration.
//!
//! Creates companies, the forecast dimensions (regions and lead types), the
//! assumption tables and the derived forecasts table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: COMPANIES AND DIMENSIONS
        // ============================================================
        db.execute_unprepared(COMPANIES_SQL).await?;
        db.execute_unprepared(REGIONS_SQL).await?;
        db.execute_unprepared(LEAD_TYPES_SQL).await?;

        // ============================================================
        // PART 2: INPUTS
        // ============================================================
        db.execute_unprepared(HISTORICAL_VOLUMES_SQL).await?;
        db.execute_unprepared(CONVERSION_RATES_SQL).await?;
        db.execute_unprepared(DEAL_ECONOMICS_SQL).await?;
        db.execute_unprepared(TIME_DISTRIBUTIONS_SQL).await?;

        // ============================================================
        // PART 3: DERIVED FORECASTS
        // ============================================================
        db.execute_unprepared(FORECASTS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_SQL).await?;
        Ok(())
    }
}

const COMPANIES_SQL: &str = r"
CREATE TABLE companies (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const REGIONS_SQL: &str = r"
CREATE TABLE regions (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    name VARCHAR(100) NOT NULL,
    is_enabled BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_regions_company_name UNIQUE (company_id, name)
);

CREATE INDEX idx_regions_company ON regions(company_id);
";

const LEAD_TYPES_SQL: &str = r"
CREATE TABLE lead_types (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    name VARCHAR(100) NOT NULL,
    is_enabled BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_lead_types_company_name UNIQUE (company_id, name)
);

CREATE INDEX idx_lead_types_company ON lead_types(company_id);
";

const HISTORICAL_VOLUMES_SQL: &str = r"
CREATE TABLE historical_volumes (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    region_id UUID NOT NULL REFERENCES regions(id) ON DELETE RESTRICT,
    lead_type_id UUID NOT NULL REFERENCES lead_types(id) ON DELETE RESTRICT,
    year INTEGER NOT NULL,
    quarter SMALLINT NOT NULL CHECK (quarter BETWEEN 1 AND 4),
    volume BIGINT NOT NULL DEFAULT 0 CHECK (volume >= 0),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_historical_volumes_period UNIQUE (company_id, region_id, lead_type_id, year, quarter)
);

CREATE INDEX idx_historical_volumes_company ON historical_volumes(company_id, year, quarter);
";

const CONVERSION_RATES_SQL: &str = r"
-- Basis points: 10000 = 100%
CREATE TABLE conversion_rates (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    region_id UUID NOT NULL REFERENCES regions(id) ON DELETE CASCADE,
    lead_type_id UUID NOT NULL REFERENCES lead_types(id) ON DELETE CASCADE,
    coverage_ratio BIGINT NOT NULL DEFAULT 500,
    win_rate_new BIGINT NOT NULL DEFAULT 2500,
    win_rate_upsell BIGINT NOT NULL DEFAULT 2500,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_conversion_rates_pair UNIQUE (company_id, region_id, lead_type_id)
);
";

const DEAL_ECONOMICS_SQL: &str = r"
-- Cents
CREATE TABLE deal_economics (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    region_id UUID NOT NULL REFERENCES regions(id) ON DELETE CASCADE,
    acv_new BIGINT NOT NULL DEFAULT 10000000,
    acv_upsell BIGINT NOT NULL DEFAULT 5000000,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_deal_economics_region UNIQUE (company_id, region_id)
);
";

const TIME_DISTRIBUTIONS_SQL: &str = r"
-- Shares are basis points and are expected, not enforced, to sum to 10000
CREATE TABLE time_distributions (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    lead_type_id UUID NOT NULL REFERENCES lead_types(id) ON DELETE CASCADE,
    same_quarter_pct BIGINT NOT NULL DEFAULT 8900,
    next_quarter_pct BIGINT NOT NULL DEFAULT 1000,
    two_quarter_pct BIGINT NOT NULL DEFAULT 100,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_time_distributions_lead_type UNIQUE (company_id, lead_type_id)
);
";

const FORECASTS_SQL: &str = r"
CREATE TABLE forecasts (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    region_id UUID NOT NULL REFERENCES regions(id) ON DELETE CASCADE,
    lead_type_id UUID NOT NULL REFERENCES lead_types(id) ON DELETE CASCADE,
    year INTEGER NOT NULL,
    quarter SMALLINT NOT NULL CHECK (quarter BETWEEN 1 AND 4),
    predicted_leads BIGINT NOT NULL,
    predicted_opportunities BIGINT NOT NULL,
    predicted_revenue_new BIGINT NOT NULL,
    predicted_revenue_upsell BIGINT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_forecasts_cell UNIQUE (company_id, region_id, lead_type_id, year, quarter)
);

CREATE INDEX idx_forecasts_company ON forecasts(company_id);
";

const DROP_SQL: &str = r"
DROP TABLE IF EXISTS forecasts CASCADE;
DROP TABLE IF EXISTS time_distributions CASCADE;
DROP TABLE IF EXISTS deal_economics CASCADE;
DROP TABLE IF EXISTS conversion_rates CASCADE;
DROP TABLE IF EXISTS historical_volumes CASCADE;
DROP TABLE IF EXISTS lead_types CASCADE;
DROP TABLE IF EXISTS regions CASCADE;
DROP TABLE IF EXISTS companies CASCADE;
";
