#![allow(dead_code)]

pub use pedigree_test_utils::{init_tracing, with_timeout};

use std::error::Error;

pub type TestResult = Result<(), Box<dyn Error>>;
