pub const APP_TITLE: &str = "Scrape Monitor";
pub const PROGRESS_BAR_WIDTH: usize = 40;
pub const LOG_MIN_ROWS: usize = 5;
pub const LOG_SCROLL_STEP: usize = 10;
pub const DEFAULT_SIZE: (u16, u16) = (100, 30);
