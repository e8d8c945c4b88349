// Domain-layer modules and shared errors/models
pub mod metrics {
    pub use crate::metrics::*;
}

pub mod ingest {
    pub use crate::ingest::*;
}

pub mod models {
    pub use crate::models::*;
}

pub mod errors {
    pub use crate::errors::*;
}
