pub mod locate_button;
pub mod map_view;
pub mod preview_card;
