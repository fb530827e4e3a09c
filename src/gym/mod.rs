pub mod sanctum;

pub use sanctum::GuardianSanctum;
