use std::sync::Arc;

use tracing::info;

use crate::errors::AppError;
use crate::models::company::NewCompany;
use crate::storage::{CompanyFilters, Storage};

/// Seeds a handful of demo companies on first boot so the UI has something
/// to show. No-op once any company exists.
pub async fn seed_if_empty(storage: &Arc<dyn Storage>) -> Result<(), AppError> {
    let existing = storage.list_companies(&CompanyFilters::default()).await?;
    if !existing.is_empty() {
        return Ok(());
    }

    for company in mock_companies() {
        storage.create_company(&company).await?;
    }

    info!("Database seeded with mock companies");
    Ok(())
}

fn mock_companies() -> Vec<NewCompany> {
    let company = |name: &str,
                   website: &str,
                   sector: &str,
                   stage: &str,
                   location: &str,
                   description: &str,
                   score: i32| NewCompany {
        name: name.to_string(),
        website: website.to_string(),
        sector: Some(sector.to_string()),
        stage: Some(stage.to_string()),
        location: Some(location.to_string()),
        description: Some(description.to_string()),
        logo_url: None,
        score: Some(score),
    };

    vec![
        company(
            "Acme Corp",
            "https://acme.com",
            "B2B SaaS",
            "Series A",
            "San Francisco",
            "Building the next generation of roadrunner traps.",
            85,
        ),
        company(
            "Globex",
            "https://globex.com",
            "Fintech",
            "Seed",
            "New York",
            "Global financial exchange platform.",
            72,
        ),
        company(
            "Soylent",
            "https://soylent.com",
            "FoodTech",
            "Series B",
            "Los Angeles",
            "Engineered nutrition for the future.",
            90,
        ),
        company(
            "Initech",
            "https://initech.com",
            "Enterprise Software",
            "IPO",
            "Austin",
            "Automating TPS reports.",
            60,
        ),
        company(
            "Cyberdyne",
            "https://cyberdyne.com",
            "AI/Robotics",
            "Series C",
            "Silicon Valley",
            "Advanced robotics and AI defense systems.",
            98,
        ),
    ]
}
