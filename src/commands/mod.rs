pub mod events;
pub mod export;
pub mod import;
pub mod publish;
pub mod stats;
pub mod trash;

/// Which records a trash command acts on
pub enum Selection {
    Id(String),
    Summary(String),
}
