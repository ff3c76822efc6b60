// src/catalog.rs
//! The catalog as the resolver and extractor see it: four page-level reads,
//! already parsed. `RemoteCatalog` backs them with real fetches; tests back
//! them with in-memory pages.

use crate::config::options::CatalogConfig;
use crate::core::net::Fetch;
use crate::error::FetchError;
use crate::ident::StudyId;
use crate::specs::{self, StudyPage};

pub trait CatalogSource {
    /// Every parent study base id the catalog lists.
    fn study_list(&self) -> Result<Vec<String>, FetchError>;

    /// Raw entry names under one base id's directory.
    fn directory_entries(&self, base: &str) -> Result<Vec<String>, FetchError>;

    /// Raw id text of the first search hit for `base`, if any.
    fn search_top_hit(&self, base: &str) -> Result<Option<String>, FetchError>;

    fn study_page(&self, id: &StudyId) -> Result<StudyPage, FetchError>;
}

impl<C: CatalogSource + ?Sized> CatalogSource for &C {
    fn study_list(&self) -> Result<Vec<String>, FetchError> {
        (**self).study_list()
    }
    fn directory_entries(&self, base: &str) -> Result<Vec<String>, FetchError> {
        (**self).directory_entries(base)
    }
    fn search_top_hit(&self, base: &str) -> Result<Option<String>, FetchError> {
        (**self).search_top_hit(base)
    }
    fn study_page(&self, id: &StudyId) -> Result<StudyPage, FetchError> {
        (**self).study_page(id)
    }
}

/// Catalog pages read through a [`Fetch`] and the `specs` parsers.
pub struct RemoteCatalog<F> {
    config: CatalogConfig,
    fetcher: F,
}

impl<F: Fetch> RemoteCatalog<F> {
    pub fn new(config: CatalogConfig, fetcher: F) -> Self {
        Self { config, fetcher }
    }
}

impl<F: Fetch> CatalogSource for RemoteCatalog<F> {
    fn study_list(&self) -> Result<Vec<String>, FetchError> {
        let page = self.fetcher.fetch(&self.config.study_list_url)?;
        Ok(specs::listing::base_ids(&page))
    }

    fn directory_entries(&self, base: &str) -> Result<Vec<String>, FetchError> {
        let page = self.fetcher.fetch(&self.config.directory_url_for(base))?;
        Ok(specs::listing::entries(&page))
    }

    fn search_top_hit(&self, base: &str) -> Result<Option<String>, FetchError> {
        let page = self.fetcher.fetch(&self.config.search_url_for(base))?;
        Ok(specs::search::top_hit(&page))
    }

    fn study_page(&self, id: &StudyId) -> Result<StudyPage, FetchError> {
        let page = self.fetcher.fetch(&self.config.study_page_url_for(id.full()))?;
        Ok(specs::study_page::parse(&page))
    }
}
