use crate::config::DataSettings;
use crate::error::{CampaignError, Result};
use crate::schema::{CustomerRecord, CustomerSegment, DigitalEngagement, Gender, LifeStage};
use crate::utils::round_to_thousand;
use chrono::{Duration, NaiveDate, Utc};
use log::{debug, info};
use rand::seq::SliceRandom;
use rand::{thread_rng, Rng};
use uuid::Builder;

pub const SAVINGS_ACCOUNT: &str = "Savings Account";
pub const CHECKING_ACCOUNT: &str = "Checking Account";

pub const INTERESTS: &[&str] = &[
    "Travel",
    "Investment",
    "Shopping",
    "Technology",
    "Education",
    "Real Estate",
    "Luxury",
    "Family",
    "Retirement",
    "Small Business",
    "International Banking",
    "Cryptocurrency",
    "Sustainable Banking",
    "Health & Insurance",
    "Arts & Culture",
];

pub const CHANNELS: &[&str] = &[
    "Email",
    "SMS",
    "Mobile App",
    "Web",
    "Social Media",
    "Push Notification",
    "Branch Visit",
    "Phone Banking",
];

pub const OCCUPATIONS: &[&str] = &[
    "Software Engineer",
    "Doctor",
    "Teacher",
    "Business Owner",
    "Sales Manager",
    "Financial Analyst",
    "Marketing Manager",
    "Lawyer",
    "Architect",
    "Consultant",
    "Engineer",
    "Professor",
    "Small Business Owner",
    "Executive",
    "Freelancer",
];

/// Every product the bank offers. Personal Loan is never assigned at generation time.
pub const PRODUCTS: &[&str] = &[
    SAVINGS_ACCOUNT,
    CHECKING_ACCOUNT,
    "Credit Card",
    "Investment Account",
    "Mortgage",
    "Personal Loan",
    "Insurance",
    "Business Account",
];

const LOCATIONS: &[&str] = &[
    "Sydney",
    "Melbourne",
    "Brisbane",
    "Perth",
    "Adelaide",
    "Hobart",
    "Darwin",
    "Canberra",
    "Newcastle",
    "Geelong",
    "Wollongong",
    "Cairns",
    "Townsville",
    "Ballarat",
    "Bendigo",
];

pub fn age_multiplier(age: u32) -> f64 {
    match age {
        0..=24 => 0.7,
        25..=34 => 1.0,
        35..=44 => 1.3,
        45..=54 => 1.5,
        _ => 1.4,
    }
}

pub fn occupation_multiplier(occupation: &str) -> f64 {
    match occupation {
        "Software Engineer" => 1.4,
        "Doctor" => 1.8,
        "Business Owner" => 1.6,
        "Financial Analyst" => 1.3,
        "Lawyer" => 1.7,
        "Executive" => 2.0,
        "Professor" => 1.3,
        "Teacher" => 0.9,
        "Freelancer" => 0.8,
        _ => 1.0,
    }
}

/// Point score: income band (0-3) + products (capped at 4) + tenure/2 (capped at 3).
pub fn segment_score(income: f64, product_count: usize, relationship_tenure: u32) -> u32 {
    let income_points = if income > 150_000.0 {
        3
    } else if income > 80_000.0 {
        2
    } else if income > 50_000.0 {
        1
    } else {
        0
    };

    income_points + product_count.min(4) as u32 + (relationship_tenure / 2).min(3)
}

pub fn determine_segment(
    income: f64,
    product_count: usize,
    relationship_tenure: u32,
) -> CustomerSegment {
    match segment_score(income, product_count, relationship_tenure) {
        score if score >= 7 => CustomerSegment::Premium,
        score if score >= 4 => CustomerSegment::Standard,
        _ => CustomerSegment::Basic,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransactionPattern {
    pub transaction_frequency: u32,
    pub average_transaction: f64,
    pub online_transaction_ratio: f64,
    pub international_transaction_ratio: f64,
}

/// Produces synthetic customers whose attributes follow consistent rules
/// (income from age and occupation, products from age and income, segment from a score).
#[derive(Debug, Clone, Default)]
pub struct CustomerDataGenerator {
    settings: DataSettings,
}

impl CustomerDataGenerator {
    pub fn new(settings: DataSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &DataSettings {
        &self.settings
    }

    pub fn generate_income<R: Rng + ?Sized>(&self, rng: &mut R, age: u32, occupation: &str) -> f64 {
        let base_income = rng.gen_range(30_000.0..80_000.0);
        round_to_thousand(base_income * age_multiplier(age) * occupation_multiplier(occupation))
    }

    pub fn generate_transaction_pattern<R: Rng + ?Sized>(&self, rng: &mut R) -> TransactionPattern {
        TransactionPattern {
            transaction_frequency: rng.gen_range(5..=30),
            average_transaction: (rng.gen_range(50.0..5000.0_f64) * 100.0).round() / 100.0,
            online_transaction_ratio: rng.gen_range(0.3..0.9),
            international_transaction_ratio: rng.gen_range(0.0..0.3),
        }
    }

    /// The two base accounts are always held; a credit card joins them when income
    /// allows. A random subset of the remaining eligible products is then added.
    pub fn generate_product_holdings<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        age: u32,
        income: f64,
    ) -> Vec<String> {
        let mut holdings = vec![SAVINGS_ACCOUNT.to_string(), CHECKING_ACCOUNT.to_string()];
        let mut eligible = Vec::new();

        if income > 30_000.0 {
            holdings.push("Credit Card".to_string());
        }
        if income > 80_000.0 || age > 35 {
            eligible.push("Investment Account");
        }
        if age > 30 && income > 60_000.0 {
            eligible.push("Mortgage");
        }
        if age > 25 {
            eligible.push("Insurance");
        }
        if rng.gen_bool(0.2) {
            eligible.push("Business Account");
        }

        let extra = rng.gen_range(0..=eligible.len());
        holdings.extend(
            eligible
                .choose_multiple(rng, extra)
                .map(|product| product.to_string()),
        );

        holdings
    }

    pub fn generate_customer<R: Rng + ?Sized>(&self, rng: &mut R) -> CustomerRecord {
        let age: u32 = rng.gen_range(18..=75);
        let occupation = pick(rng, OCCUPATIONS);
        let income = self.generate_income(rng, age, &occupation);
        let relationship_tenure = rng.gen_range(0..=20).min(age - 18);
        let product_holdings = self.generate_product_holdings(rng, age, income);
        let pattern = self.generate_transaction_pattern(rng);

        let interest_count = rng.gen_range(2..=5);
        let channel_count = rng.gen_range(2..=4);
        let days_since_contact = rng.gen_range(0..=90);

        CustomerRecord {
            id: Builder::from_random_bytes(rng.gen()).into_uuid().to_string(),
            age,
            gender: if rng.gen_bool(0.5) {
                Gender::Male
            } else {
                Gender::Female
            },
            location: pick(rng, LOCATIONS),
            income,
            occupation,
            life_stage: LifeStage::from_age(age),
            customer_segment: determine_segment(
                income,
                product_holdings.len(),
                relationship_tenure,
            ),
            relationship_tenure,
            num_products: product_holdings.len(),
            product_holdings,
            primary_interests: sample(rng, INTERESTS, interest_count),
            preferred_channels: sample(rng, CHANNELS, channel_count),
            digital_engagement: DigitalEngagement::from_online_ratio(
                pattern.online_transaction_ratio,
            ),
            transaction_frequency: pattern.transaction_frequency,
            average_transaction: pattern.average_transaction,
            online_transaction_ratio: pattern.online_transaction_ratio,
            international_transaction_ratio: pattern.international_transaction_ratio,
            credit_score: rng.gen_range(300..=850),
            last_interaction: today() - Duration::days(days_since_contact),
            satisfaction_score: rng.gen_range(1..=100),
            engagement_score: 0.0,
            churn_risk: 0.0,
        }
    }

    /// Generates `num_records` independent customers, rejecting counts outside the
    /// configured bounds before producing anything.
    pub fn generate_dataset_with<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        num_records: usize,
    ) -> Result<Vec<CustomerRecord>> {
        let DataSettings {
            min_records,
            max_records,
            ..
        } = self.settings;

        if num_records < min_records || num_records > max_records {
            return Err(CampaignError::GenerationRange {
                requested: num_records,
                min: min_records,
                max: max_records,
            });
        }

        let mut customers: Vec<CustomerRecord> = (0..num_records)
            .map(|_| self.generate_customer(rng))
            .collect();

        for customer in &mut customers {
            apply_engagement_scores(customer);
        }

        info!("Generated {} synthetic customer records", customers.len());
        debug!(
            "Segment mix: {} Premium, {} Standard, {} Basic",
            count_segment(&customers, CustomerSegment::Premium),
            count_segment(&customers, CustomerSegment::Standard),
            count_segment(&customers, CustomerSegment::Basic)
        );

        Ok(customers)
    }

    pub fn generate_dataset(&self, num_records: usize) -> Result<Vec<CustomerRecord>> {
        self.generate_dataset_with(&mut thread_rng(), num_records)
    }
}

/// `engagement_score = 0.3 * frequency + 0.3 * products + 0.4 * satisfaction`,
/// `churn_risk = 100 - engagement_score`.
pub fn apply_engagement_scores(customer: &mut CustomerRecord) {
    customer.engagement_score = customer.transaction_frequency as f64 * 0.3
        + customer.num_products as f64 * 0.3
        + customer.satisfaction_score as f64 * 0.4;
    customer.churn_risk = 100.0 - customer.engagement_score;
}

pub fn generate_synthetic_data(
    settings: &DataSettings,
    num_records: usize,
) -> Result<Vec<CustomerRecord>> {
    CustomerDataGenerator::new(settings.clone()).generate_dataset(num_records)
}

fn pick<R: Rng + ?Sized>(rng: &mut R, options: &[&str]) -> String {
    options
        .choose(rng)
        .map(|s| s.to_string())
        .unwrap_or_default()
}

fn sample<R: Rng + ?Sized>(rng: &mut R, options: &[&str], count: usize) -> Vec<String> {
    options
        .choose_multiple(rng, count)
        .map(|s| s.to_string())
        .collect()
}

fn count_segment(customers: &[CustomerRecord], segment: CustomerSegment) -> usize {
    customers
        .iter()
        .filter(|c| c.customer_segment == segment)
        .count()
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}
