pub mod progress_sidebar;
pub mod results_panel;
pub mod sentence_area;
pub mod timer_bar;
pub mod toast;
pub mod welcome;
pub mod word_options;
