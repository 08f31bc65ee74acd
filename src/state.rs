use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::crypto::token::TokenService;
use crate::db::{self, ConnectionProbe, ConnectionStatus, StaticProbe};
use crate::error::Result;
use crate::repositories::{
    CategoryRepository, OwnerRepository, ProductRepository, category::PgCategoryRepository,
    memory::MemoryStore, owner::PgOwnerRepository, product::PgProductRepository,
};
use crate::services::descriptions::{DescriptionGenerator, GeminiDescriptionGenerator};
use crate::services::images::{ImageStore, LocalImageStore};

/// The application's state.
#[derive(Clone)]
pub struct AppState {
    /// The application's configuration.
    pub config: Config,
    /// Issues and verifies session tokens.
    pub tokens: TokenService,
    /// The owner repository.
    pub owners: Arc<dyn OwnerRepository>,
    /// The category repository.
    pub categories: Arc<dyn CategoryRepository>,
    /// The product repository.
    pub products: Arc<dyn ProductRepository>,
    /// Where uploaded product images go.
    pub images: Arc<dyn ImageStore>,
    /// Writes product descriptions.
    pub descriptions: Arc<dyn DescriptionGenerator>,
    /// Reports the persistence layer's connection state.
    pub probe: Arc<dyn ConnectionProbe>,
    /// When the process started serving.
    pub started_at: Instant,
}

impl AppState {
    /// Creates a new `AppState`.
    ///
    /// Connects to PostgreSQL and applies the schema when `DATABASE_URL` is
    /// set; otherwise every repository is backed by one in-memory store.
    ///
    /// # Arguments
    ///
    /// * `config` - The application's configuration.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `AppState`.
    pub async fn new(config: &Config) -> Result<Self> {
        let Some(database_url) = config.database_url.as_deref() else {
            tracing::warn!("⚠️ DATABASE_URL not set, using the in-memory store");
            return Ok(Self::in_memory(config.clone()));
        };

        let pool = db::create_pool(database_url)?;
        db::run_migrations(&pool).await?;
        tracing::info!("✅ Database pool created");

        let mut state = Self::in_memory(config.clone());
        state.owners = Arc::new(PgOwnerRepository::new(pool.clone()));
        state.categories = Arc::new(PgCategoryRepository::new(pool.clone()));
        state.products = Arc::new(PgProductRepository::new(pool.clone()));
        state.probe = Arc::new(pool);
        Ok(state)
    }

    /// State backed by a fresh in-memory store, with the default adapters.
    pub fn in_memory(config: Config) -> Self {
        let store = Arc::new(MemoryStore::new());
        let images = LocalImageStore::new(
            config.upload_dir.clone(),
            format!("{}/uploads", config.public_base_url),
        );
        let descriptions =
            GeminiDescriptionGenerator::new(config.google_api_key.clone(), config.gemini_model.clone());

        Self {
            tokens: TokenService::new(config.jwt_secret.clone()),
            owners: store.clone(),
            categories: store.clone(),
            products: store,
            images: Arc::new(images),
            descriptions: Arc::new(descriptions),
            probe: Arc::new(StaticProbe(ConnectionStatus::Connected)),
            started_at: Instant::now(),
            config,
        }
    }

    /// Replaces the image store.
    pub fn with_images(mut self, images: impl ImageStore + 'static) -> Self {
        self.images = Arc::new(images);
        self
    }

    /// Replaces the description generator.
    pub fn with_descriptions(mut self, descriptions: impl DescriptionGenerator + 'static) -> Self {
        self.descriptions = Arc::new(descriptions);
        self
    }

    /// Replaces the readiness probe.
    pub fn with_probe(mut self, probe: impl ConnectionProbe + 'static) -> Self {
        self.probe = Arc::new(probe);
        self
    }
}
