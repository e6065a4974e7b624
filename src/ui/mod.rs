pub mod details;
pub mod item_list;
pub mod theme;
pub mod timeline_chart;
pub mod toolbar;
