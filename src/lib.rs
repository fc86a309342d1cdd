pub mod core {
    pub mod config;
    pub mod error;
    pub mod tracing_init;
}

pub mod actions {
    pub mod attributes;
    pub mod factory;
}

pub mod models {
    pub mod action;
    pub mod peer;
}

pub mod stores {
    pub mod peer_pool;
}

pub mod validation {
    pub mod attributes;
    pub mod resolver;
}

pub mod utils {
    pub mod time;
}
