pub mod controls_bar;
pub mod fleet_list;
pub mod header;
pub mod help_popup;
pub mod status_bar;
