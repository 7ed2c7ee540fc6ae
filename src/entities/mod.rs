pub mod brand;
pub mod current_predict;
pub mod location;
pub mod predict;
pub mod stack;
pub mod supplies;
pub mod temperature;
pub mod warehouse;
