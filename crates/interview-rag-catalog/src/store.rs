use std::collections::HashMap;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::CompanyCatalog;

/// Seed catalog compiled into the binary
const BUILTIN_CATALOG: &str = include_str!("../data/companies.toml");

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Catalog contains a company with an empty name")]
    EmptyCompanyName,

    #[error("Company '{0}' is defined more than once")]
    DuplicateCompany(String),

    #[error("Question {index} of '{company}' has empty text")]
    EmptyQuestion { company: String, index: usize },
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    #[serde(default)]
    company: Vec<CompanyCatalog>,
}

/// Immutable mapping from company name to its catalog.
///
/// Built once and shared read-only; iteration order is the order in which
/// companies were defined.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    companies: Vec<CompanyCatalog>,
    index: HashMap<String, usize>,
}

impl CatalogStore {
    /// Load the compiled-in seed catalog
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_toml_str(BUILTIN_CATALOG)
    }

    /// Parse a catalog from TOML with one `[[company]]` table per company
    pub fn from_toml_str(content: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(content)?;
        Self::from_companies(file.company)
    }

    /// Build a store from already-constructed records, validating them
    pub fn from_companies(companies: Vec<CompanyCatalog>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(companies.len());

        for (position, company) in companies.iter().enumerate() {
            if company.name.trim().is_empty() {
                return Err(CatalogError::EmptyCompanyName);
            }
            if let Some(i) = company.questions.iter().position(|q| q.text.trim().is_empty()) {
                return Err(CatalogError::EmptyQuestion {
                    company: company.name.clone(),
                    index: i,
                });
            }
            if index.insert(company.name.clone(), position).is_some() {
                return Err(CatalogError::DuplicateCompany(company.name.clone()));
            }
        }

        let store = Self { companies, index };
        debug!(
            companies = store.len(),
            questions = store.question_count(),
            "Catalog loaded"
        );
        Ok(store)
    }

    /// Look up a company by its exact name
    pub fn get(&self, name: &str) -> Option<&CompanyCatalog> {
        self.index.get(name).map(|&i| &self.companies[i])
    }

    /// All companies in definition order
    pub fn all(&self) -> &[CompanyCatalog] {
        &self.companies
    }

    pub fn company_names(&self) -> impl Iterator<Item = &str> {
        self.companies.iter().map(|c| c.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.companies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.companies.is_empty()
    }

    /// Total number of questions across all companies
    pub fn question_count(&self) -> usize {
        self.companies.iter().map(|c| c.questions.len()).sum()
    }
}
