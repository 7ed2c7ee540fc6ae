// Reference data
pub mod brands;
pub mod stacks;
pub mod warehouses;

// Measurements and forecasts
pub mod predictions;
pub mod supplies;
pub mod temperatures;

// Site location and the external weather feed
pub mod locations;
pub mod weather;
