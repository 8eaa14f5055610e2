mod app_tests;
mod utils;
