mod header;
mod list;
mod preview;

pub use header::draw as draw_header;
pub use list::draw as draw_list;
pub use preview::draw as draw_preview;
