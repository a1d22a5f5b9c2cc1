//! Database seeder for Pipecast development and testing.
//!
//! Seeds one demo company with regions, lead types, eight quarters of lead
//! history and a full set of conversion rates, deal economics and time
//! distributions.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use pipecast_core::forecast::{Period, numeric::defaults};
use pipecast_db::entities::{
    companies, conversion_rates, deal_economics, historical_volumes, lead_types, regions,
    time_distributions,
};
use pipecast_db::repositories::forecast::period_to_columns;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

/// Demo company ID (consistent for all seeds)
const DEMO_COMPANY_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0001);

/// Regions with their (new, upsell) ACV in cents.
const REGIONS: [(&str, i64, i64); 3] = [
    ("North America", 12_000_000, 6_000_000),
    ("EMEA", 9_000_000, 4_500_000),
    ("APAC", 7_500_000, 3_000_000),
];

/// Lead types with their (coverage, win new, win upsell) rates in basis
/// points, base quarterly volume and (same, next, two) quarter shares.
const LEAD_TYPES: [(&str, [i64; 3], i64, [i64; 3]); 3] = [
    ("Inbound", [600, 2_800, 3_200], 1_200, [8_900, 1_000, 100]),
    ("Outbound", [300, 2_000, 2_500], 2_500, [6_000, 3_000, 1_000]),
    ("Partner", [800, 3_500, 3_000], 400, [7_500, 2_000, 500]),
];

/// First seeded history quarter.
const HISTORY_START: (i32, u8) = (2024, 1);

/// Number of seeded history quarters.
const HISTORY_QUARTERS: u32 = 8;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;

    println!("Connecting to database...");
    let db = pipecast_db::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    if companies::Entity::find_by_id(DEMO_COMPANY_ID)
        .one(&db)
        .await?
        .is_some()
    {
        println!("Demo company already exists, skipping...");
        return Ok(());
    }

    println!("Seeding demo company...");
    seed_company(&db).await?;

    println!("Seeding regions and deal economics...");
    let region_ids = seed_regions(&db).await?;

    println!("Seeding lead types and time distributions...");
    let lead_type_ids = seed_lead_types(&db).await?;

    println!("Seeding conversion rates...");
    seed_conversion_rates(&db, &region_ids, &lead_type_ids).await?;

    println!("Seeding lead history...");
    seed_history(&db, &region_ids, &lead_type_ids).await?;

    println!("Seeding complete! Company ID: {DEMO_COMPANY_ID}");
    Ok(())
}

fn now() -> sea_orm::prelude::DateTimeWithTimeZone {
    chrono::Utc::now().into()
}

async fn seed_company(db: &DatabaseConnection) -> anyhow::Result<()> {
    companies::ActiveModel {
        id: Set(DEMO_COMPANY_ID),
        name: Set("Pipecast Demo".to_string()),
        created_at: Set(now()),
    }
    .insert(db)
    .await?;
    Ok(())
}

async fn seed_regions(db: &DatabaseConnection) -> anyhow::Result<Vec<Uuid>> {
    let mut ids = Vec::with_capacity(REGIONS.len());
    for (name, acv_new, acv_upsell) in REGIONS {
        let region_id = Uuid::now_v7();
        regions::ActiveModel {
            id: Set(region_id),
            company_id: Set(DEMO_COMPANY_ID),
            name: Set(name.to_string()),
            is_enabled: Set(true),
            created_at: Set(now()),
        }
        .insert(db)
        .await?;

        deal_economics::ActiveModel {
            id: Set(Uuid::now_v7()),
            company_id: Set(DEMO_COMPANY_ID),
            region_id: Set(region_id),
            acv_new: Set(acv_new),
            acv_upsell: Set(acv_upsell),
            updated_at: Set(now()),
        }
        .insert(db)
        .await?;

        println!("  {name}");
        ids.push(region_id);
    }
    Ok(ids)
}

async fn seed_lead_types(db: &DatabaseConnection) -> anyhow::Result<Vec<Uuid>> {
    let mut ids = Vec::with_capacity(LEAD_TYPES.len());
    for (name, _, _, [same, next, two]) in LEAD_TYPES {
        let lead_type_id = Uuid::now_v7();
        lead_types::ActiveModel {
            id: Set(lead_type_id),
            company_id: Set(DEMO_COMPANY_ID),
            name: Set(name.to_string()),
            is_enabled: Set(true),
            created_at: Set(now()),
        }
        .insert(db)
        .await?;

        time_distributions::ActiveModel {
            id: Set(Uuid::now_v7()),
            company_id: Set(DEMO_COMPANY_ID),
            lead_type_id: Set(lead_type_id),
            same_quarter_pct: Set(same),
            next_quarter_pct: Set(next),
            two_quarter_pct: Set(two),
            updated_at: Set(now()),
        }
        .insert(db)
        .await?;

        println!("  {name}");
        ids.push(lead_type_id);
    }
    Ok(ids)
}

/// Rates for every pair except the last region, which is left on defaults.
async fn seed_conversion_rates(
    db: &DatabaseConnection,
    region_ids: &[Uuid],
    lead_type_ids: &[Uuid],
) -> anyhow::Result<()> {
    let stored_regions = region_ids.len().saturating_sub(1);
    for region_id in &region_ids[..stored_regions] {
        for (lead_type_id, (_, [coverage, win_new, win_upsell], _, _)) in
            lead_type_ids.iter().zip(LEAD_TYPES)
        {
            conversion_rates::ActiveModel {
                id: Set(Uuid::now_v7()),
                company_id: Set(DEMO_COMPANY_ID),
                region_id: Set(*region_id),
                lead_type_id: Set(*lead_type_id),
                coverage_ratio: Set(coverage),
                win_rate_new: Set(win_new),
                win_rate_upsell: Set(win_upsell),
                updated_at: Set(now()),
            }
            .insert(db)
            .await?;
        }
    }
    println!(
        "  {} pairs stored, defaults cover {} bp coverage elsewhere",
        stored_regions * lead_type_ids.len(),
        defaults::COVERAGE_RATIO_BP
    );
    Ok(())
}

/// Volume rises by 5% of each lead type's base every quarter, scaled down for
/// each subsequent region.
async fn seed_history(
    db: &DatabaseConnection,
    region_ids: &[Uuid],
    lead_type_ids: &[Uuid],
) -> anyhow::Result<()> {
    let start = Period::new(HISTORY_START.0, HISTORY_START.1)?;
    let mut rows = 0;
    for (region_rank, region_id) in (1i64..).zip(region_ids) {
        for (lead_type_id, (_, _, base_volume, _)) in lead_type_ids.iter().zip(LEAD_TYPES) {
            for (step, period) in (0i64..).zip(start.horizon(HISTORY_QUARTERS)) {
                let (year, quarter) = period_to_columns(period);
                let volume = base_volume * (20 + step) / 20 / region_rank;
                historical_volumes::ActiveModel {
                    id: Set(Uuid::now_v7()),
                    company_id: Set(DEMO_COMPANY_ID),
                    region_id: Set(*region_id),
                    lead_type_id: Set(*lead_type_id),
                    year: Set(year),
                    quarter: Set(quarter),
                    volume: Set(volume),
                    updated_at: Set(now()),
                }
                .insert(db)
                .await?;
                rows += 1;
            }
        }
    }
    println!("  {rows} history rows");
    Ok(())
}
