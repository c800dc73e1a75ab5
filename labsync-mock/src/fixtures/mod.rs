pub mod results;
pub mod tenants;
