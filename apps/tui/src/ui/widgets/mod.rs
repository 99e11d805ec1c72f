pub mod cards;
pub mod popup;
