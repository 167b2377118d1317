pub mod explorer;
pub mod monument;
