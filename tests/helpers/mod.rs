#![allow(dead_code)]

pub mod ledger_test_helper;
