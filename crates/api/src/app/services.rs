use std::sync::Arc;

use classroom_infra::{AccessGateway, AllocationEngine, InMemoryCatalog, InMemoryGroupStore};

pub type Engine = AllocationEngine<InMemoryGroupStore, Arc<InMemoryCatalog>>;
pub type Gateway = AccessGateway<InMemoryGroupStore, Arc<InMemoryCatalog>>;

/// Shared state behind every handler.
#[derive(Debug)]
pub struct AppServices {
    catalog: Arc<InMemoryCatalog>,
    gateway: Gateway,
}

impl AppServices {
    pub fn new(catalog: InMemoryCatalog) -> Self {
        let catalog = Arc::new(catalog);
        let engine = Arc::new(AllocationEngine::new(
            InMemoryGroupStore::new(),
            catalog.clone(),
        ));
        Self {
            catalog,
            gateway: AccessGateway::new(engine),
        }
    }

    pub fn catalog(&self) -> &InMemoryCatalog {
        &self.catalog
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    pub fn engine(&self) -> &Engine {
        self.gateway.engine()
    }
}
