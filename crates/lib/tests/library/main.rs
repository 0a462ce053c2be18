mod common;
mod pipeline_tests;
mod process_tests;
