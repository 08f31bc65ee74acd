pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod flash;
pub mod repositories;
pub mod state;

pub mod crypto {
    pub mod token;
}

pub mod models {
    pub mod analytics;
    pub mod category;
    pub mod owner;
    pub mod product;
}

pub mod services {
    pub mod analytics;
    pub mod auth;
    pub mod categories;
    pub mod descriptions;
    pub mod images;
    pub mod products;
}

pub mod handlers {
    pub mod analytics;
    pub mod categories;
    pub mod docs;
    pub mod health;
    pub mod owners;
    pub mod products;
}

pub mod middleware_layer {
    pub mod auth;
}

pub mod validation {
    pub mod auth;
    pub mod catalog;
}
