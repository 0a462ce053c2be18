mod build_tests;
mod common;
mod configs_tests;
