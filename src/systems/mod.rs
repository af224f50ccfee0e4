mod bookkeeping;
mod growth;

pub use bookkeeping::BookkeepingSystem;
pub use growth::GrowthSystem;
