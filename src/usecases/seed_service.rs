//! Sample-data seeding. Wipes the store, then fills it with generated clients,
//! projects and time entries. Every row goes through `LedgerStore`, so the same
//! constraints apply as for hand-entered data.

use crate::domain::validation;
use crate::domain::{
    CategoryId, DomainError, NewCategory, NewClient, NewProject, NewTimeEntry, ProjectStatus,
};
use crate::ports::LedgerStore;
use chrono::{Days, NaiveDate};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use tracing::info;

const CATEGORIES: [(&str, &str, &str); 5] = [
    ("Web Development", "Website and web application development", "#FF5733"),
    ("Mobile Development", "Mobile app development", "#33FF57"),
    ("UI/UX Design", "User interface and experience design", "#3357FF"),
    ("Content Writing", "Blog posts, articles, and copywriting", "#F333FF"),
    ("Digital Marketing", "SEO, social media, and online advertising", "#FF33A1"),
];

const TASK_TYPES: [&str; 5] = ["coding", "design", "meeting", "research", "testing"];

const COMPANY_PREFIXES: [&str; 12] = [
    "Blue", "Northwind", "Bright", "Silver", "Granite", "Maple", "Harbor", "Summit", "Pixel",
    "Copper", "Lumen", "Cedar",
];
const COMPANY_SUFFIXES: [&str; 8] = [
    "Labs", "Studio", "Works", "Group", "Digital", "Partners", "Systems", "Collective",
];
const PROJECT_ADJECTIVES: [&str; 8] = [
    "Responsive", "Secure", "Modern", "Scalable", "Unified", "Streamlined", "Custom", "Mobile",
];
const PROJECT_NOUNS: [&str; 8] = [
    "Storefront", "Dashboard", "Booking Portal", "Brand Refresh", "Newsletter", "API",
    "Landing Page", "Analytics Suite",
];
const ACTIVITIES: [&str; 8] = [
    "Implemented feature work",
    "Reviewed feedback with the client",
    "Fixed reported bugs",
    "Drafted wireframes",
    "Wrote documentation",
    "Refactored components",
    "Prepared a status update",
    "Investigated performance",
];

/// Entries are dated within this many days before today.
const ENTRY_WINDOW_DAYS: u64 = 60;
/// Deadlines fall within this many days after today.
const DEADLINE_WINDOW_DAYS: u64 = 180;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedStats {
    pub categories: usize,
    pub clients: usize,
    pub projects: usize,
    pub time_entries: usize,
}

pub struct SeedService {
    store: Arc<dyn LedgerStore>,
    clients: usize,
    rng_seed: Option<u64>,
}

fn pick<'a>(rng: &mut StdRng, items: &[&'a str]) -> &'a str {
    items.choose(rng).copied().unwrap_or_default()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn slug(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase()
}

impl SeedService {
    pub fn new(store: Arc<dyn LedgerStore>, clients: usize, rng_seed: Option<u64>) -> Self {
        Self {
            store,
            clients: clients.max(1),
            rng_seed,
        }
    }

    /// Clears every table and inserts a fresh sample data set.
    pub async fn run(&self, today: NaiveDate) -> Result<SeedStats, DomainError> {
        let mut rng = match self.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.store.clear_all().await?;

        let mut stats = SeedStats::default();
        let mut category_ids: Vec<CategoryId> = Vec::with_capacity(CATEGORIES.len());
        for (name, description, color) in CATEGORIES {
            let input = validation::normalize_new_category(NewCategory {
                name: name.to_string(),
                description: Some(description.to_string()),
                color_code: Some(color.to_string()),
            })?;
            category_ids.push(self.store.insert_category(&input).await?.id);
            stats.categories += 1;
        }

        for index in 0..self.clients {
            let company = format!(
                "{} {}",
                pick(&mut rng, &COMPANY_PREFIXES),
                pick(&mut rng, &COMPANY_SUFFIXES)
            );
            let input = validation::normalize_new_client(NewClient {
                name: company.clone(),
                email: format!("contact{}@{}.example.com", index + 1, slug(&company)),
                company: Some(company.clone()),
                phone: Some(format!("555-{:04}", rng.gen_range(0..10_000))),
                notes: Some(format!("Sample client #{}", index + 1)),
            })?;
            let client = self.store.insert_client(&input).await?;
            stats.clients += 1;

            for _ in 0..rng.gen_range(1..=3) {
                let mut project = NewProject::new(
                    format!(
                        "{} {}",
                        pick(&mut rng, &PROJECT_ADJECTIVES),
                        pick(&mut rng, &PROJECT_NOUNS)
                    ),
                    client.id,
                    round2(rng.gen_range(25.0..=100.0)),
                );
                project.description = Some(format!("{} for {}", project.name, client.name));
                project.status = *ProjectStatus::ALL
                    .choose(&mut rng)
                    .unwrap_or(&ProjectStatus::Active);
                project.deadline = today.checked_add_days(Days::new(
                    rng.gen_range(1..=DEADLINE_WINDOW_DAYS),
                ));
                project.category_id = category_ids.choose(&mut rng).copied();
                let project = validation::normalize_new_project(project)?;
                let project = self.store.insert_project(&project).await?;
                stats.projects += 1;

                for _ in 0..rng.gen_range(5..=20) {
                    let back = rng.gen_range(0..=ENTRY_WINDOW_DAYS);
                    let entry = validation::normalize_new_time_entry(NewTimeEntry {
                        project_id: project.id,
                        date: today.checked_sub_days(Days::new(back)).unwrap_or(today),
                        hours_worked: round2(rng.gen_range(0.5..=8.0)),
                        description: pick(&mut rng, &ACTIVITIES).to_string(),
                        task_type: Some(pick(&mut rng, &TASK_TYPES).to_string()),
                    })?;
                    self.store.insert_time_entry(&entry).await?;
                    stats.time_entries += 1;
                }
            }
        }

        info!(
            categories = stats.categories,
            clients = stats.clients,
            projects = stats.projects,
            time_entries = stats.time_entries,
            "sample data seeded"
        );
        Ok(stats)
    }
}
