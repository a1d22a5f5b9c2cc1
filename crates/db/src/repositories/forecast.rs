//! Forecast repository: Postgres implementation of [`ForecastStore`].

use pipecast_core::forecast::{
    ConversionRate, DealEconomics, ForecastError, ForecastInputs, ForecastRow, ForecastStore,
    HistoricalVolume, LeadType, Period, Region, TimeDistribution,
};
use pipecast_shared::types::{CompanyId, ForecastRowId, LeadTypeId, RegionId};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tracing::debug;

/// Rows per `INSERT` statement. Postgres caps a statement at 65535 bind
/// parameters and each forecast row binds one per column.
pub const INSERT_BATCH_SIZE: usize = 1_000;

use crate::entities::{
    conversion_rates, deal_economics, forecasts, historical_volumes, lead_types, regions,
    time_distributions,
};

/// Forecast repository backed by `SeaORM`.
#[derive(Debug, Clone)]
pub struct ForecastRepository {
    db: DatabaseConnection,
}

impl ForecastRepository {
    /// Creates a new forecast repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn fetch_inputs(&self, company_id: CompanyId) -> Result<ForecastInputs, DbErr> {
        let company = company_id.into_inner();

        let regions = regions::Entity::find()
            .filter(regions::Column::CompanyId.eq(company))
            .order_by_asc(regions::Column::Name)
            .all(&self.db)
            .await?;
        let lead_types = lead_types::Entity::find()
            .filter(lead_types::Column::CompanyId.eq(company))
            .order_by_asc(lead_types::Column::Name)
            .all(&self.db)
            .await?;
        let history = historical_volumes::Entity::find()
            .filter(historical_volumes::Column::CompanyId.eq(company))
            .order_by_asc(historical_volumes::Column::Year)
            .order_by_asc(historical_volumes::Column::Quarter)
            .all(&self.db)
            .await?;
        let rates = conversion_rates::Entity::find()
            .filter(conversion_rates::Column::CompanyId.eq(company))
            .all(&self.db)
            .await?;
        let economics = deal_economics::Entity::find()
            .filter(deal_economics::Column::CompanyId.eq(company))
            .all(&self.db)
            .await?;
        let distributions = time_distributions::Entity::find()
            .filter(time_distributions::Column::CompanyId.eq(company))
            .all(&self.db)
            .await?;

        Ok(ForecastInputs {
            regions: regions.into_iter().map(region_from_model).collect(),
            lead_types: lead_types.into_iter().map(lead_type_from_model).collect(),
            history: history
                .into_iter()
                .map(history_from_model)
                .collect::<Result<_, _>>()?,
            conversion_rates: rates.into_iter().map(rate_from_model).collect(),
            deal_economics: economics.into_iter().map(economics_from_model).collect(),
            time_distributions: distributions
                .into_iter()
                .map(distribution_from_model)
                .collect(),
        })
    }

    async fn swap_forecasts(
        &self,
        company_id: CompanyId,
        rows: Vec<ForecastRow>,
    ) -> Result<u64, DbErr> {
        let txn = self.db.begin().await?;

        let deleted = forecasts::Entity::delete_many()
            .filter(forecasts::Column::CompanyId.eq(company_id.into_inner()))
            .exec(&txn)
            .await?;

        let written = rows.len() as u64;
        let now = chrono::Utc::now().into();
        for batch in rows.chunks(INSERT_BATCH_SIZE) {
            let models = batch.iter().map(|row| forecast_active_model(row, now));
            forecasts::Entity::insert_many(models).exec(&txn).await?;
        }

        txn.commit().await?;

        debug!(
            %company_id,
            deleted = deleted.rows_affected,
            written,
            "Forecast rows replaced"
        );
        Ok(written)
    }

    async fn fetch_forecasts(&self, company_id: CompanyId) -> Result<Vec<ForecastRow>, DbErr> {
        forecasts::Entity::find()
            .filter(forecasts::Column::CompanyId.eq(company_id.into_inner()))
            .order_by_asc(forecasts::Column::RegionId)
            .order_by_asc(forecasts::Column::LeadTypeId)
            .order_by_asc(forecasts::Column::Year)
            .order_by_asc(forecasts::Column::Quarter)
            .all(&self.db)
            .await?
            .into_iter()
            .map(forecast_from_model)
            .collect()
    }
}

impl ForecastStore for ForecastRepository {
    async fn load_inputs(&self, company_id: CompanyId) -> Result<ForecastInputs, ForecastError> {
        self.fetch_inputs(company_id).await.map_err(storage_error)
    }

    async fn replace_forecasts(
        &self,
        company_id: CompanyId,
        rows: Vec<ForecastRow>,
    ) -> Result<u64, ForecastError> {
        self.swap_forecasts(company_id, rows)
            .await
            .map_err(storage_error)
    }

    async fn list_forecasts(&self, company_id: CompanyId) -> Result<Vec<ForecastRow>, ForecastError> {
        self.fetch_forecasts(company_id).await.map_err(storage_error)
    }
}

fn storage_error(err: DbErr) -> ForecastError {
    ForecastError::storage(err.to_string())
}

/// Builds a [`Period`] from stored columns.
///
/// # Errors
///
/// Returns an error if the quarter is outside 1-4.
pub fn period_from_columns(year: i32, quarter: i16) -> Result<Period, DbErr> {
    u8::try_from(quarter)
        .ok()
        .and_then(|q| Period::new(year, q).ok())
        .ok_or_else(|| DbErr::Type(format!("invalid quarter {quarter} for year {year}")))
}

/// Splits a [`Period`] into stored columns.
#[must_use]
pub fn period_to_columns(period: Period) -> (i32, i16) {
    (period.year(), i16::from(period.quarter()))
}

fn region_from_model(model: regions::Model) -> Region {
    Region {
        id: RegionId::from_uuid(model.id),
        company_id: CompanyId::from_uuid(model.company_id),
        name: model.name,
        is_enabled: model.is_enabled,
    }
}

fn lead_type_from_model(model: lead_types::Model) -> LeadType {
    LeadType {
        id: LeadTypeId::from_uuid(model.id),
        company_id: CompanyId::from_uuid(model.company_id),
        name: model.name,
        is_enabled: model.is_enabled,
    }
}

fn history_from_model(model: historical_volumes::Model) -> Result<HistoricalVolume, DbErr> {
    Ok(HistoricalVolume {
        region_id: RegionId::from_uuid(model.region_id),
        lead_type_id: LeadTypeId::from_uuid(model.lead_type_id),
        period: period_from_columns(model.year, model.quarter)?,
        volume: model.volume,
    })
}

fn rate_from_model(model: conversion_rates::Model) -> ConversionRate {
    ConversionRate {
        region_id: RegionId::from_uuid(model.region_id),
        lead_type_id: LeadTypeId::from_uuid(model.lead_type_id),
        coverage_ratio: model.coverage_ratio,
        win_rate_new: model.win_rate_new,
        win_rate_upsell: model.win_rate_upsell,
    }
}

fn economics_from_model(model: deal_economics::Model) -> DealEconomics {
    DealEconomics {
        region_id: RegionId::from_uuid(model.region_id),
        acv_new: model.acv_new,
        acv_upsell: model.acv_upsell,
    }
}

fn distribution_from_model(model: time_distributions::Model) -> TimeDistribution {
    TimeDistribution {
        lead_type_id: LeadTypeId::from_uuid(model.lead_type_id),
        same_quarter_pct: model.same_quarter_pct,
        next_quarter_pct: model.next_quarter_pct,
        two_quarter_pct: model.two_quarter_pct,
    }
}

fn forecast_from_model(model: forecasts::Model) -> Result<ForecastRow, DbErr> {
    Ok(ForecastRow {
        company_id: CompanyId::from_uuid(model.company_id),
        region_id: RegionId::from_uuid(model.region_id),
        lead_type_id: LeadTypeId::from_uuid(model.lead_type_id),
        period: period_from_columns(model.year, model.quarter)?,
        predicted_leads: model.predicted_leads,
        predicted_opportunities: model.predicted_opportunities,
        predicted_revenue_new: model.predicted_revenue_new,
        predicted_revenue_upsell: model.predicted_revenue_upsell,
    })
}

fn forecast_active_model(
    row: &ForecastRow,
    created_at: sea_orm::prelude::DateTimeWithTimeZone,
) -> forecasts::ActiveModel {
    let (year, quarter) = period_to_columns(row.period);
    forecasts::ActiveModel {
        id: Set(ForecastRowId::new().into_inner()),
        company_id: Set(row.company_id.into_inner()),
        region_id: Set(row.region_id.into_inner()),
        lead_type_id: Set(row.lead_type_id.into_inner()),
        year: Set(year),
        quarter: Set(quarter),
        predicted_leads: Set(row.predicted_leads),
        predicted_opportunities: Set(row.predicted_opportunities),
        predicted_revenue_new: Set(row.predicted_revenue_new),
        predicted_revenue_upsell: Set(row.predicted_revenue_upsell),
        created_at: Set(created_at),
    }
}
